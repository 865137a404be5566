//! Customer model

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Customer record as exposed to the API (no password hash).
///
/// Also the principal attached to requests by the customer guard.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
}
