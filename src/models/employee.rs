//! Employee model

use serde::Serialize;

/// Employee record as exposed to the API (no password hash).
///
/// Also the principal attached to requests by the employee guard.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Employee {
    pub employee_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
}
