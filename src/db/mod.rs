//! Database operations (PostgreSQL via sqlx)
//!
//! Every function takes the pool and returns `ServiceResult`; multi-row
//! writes (registration, reservation creation) run inside a single
//! transaction and roll back on any early return.

pub mod api_keys;
pub mod categories;
pub mod customers;
pub mod employees;
pub mod products;
pub mod reservations;

/// Postgres unique-violation (SQLSTATE 23505)
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
