//! Employee credential-store queries

use sqlx::PgPool;

use super::is_unique_violation;
use crate::error::{AppError, ErrorCode, ServiceError, ServiceResult};
use crate::models::employee::Employee;

/// Full row for password verification at login
#[derive(Debug, sqlx::FromRow)]
pub struct EmployeeCredentials {
    pub employee_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub position: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
}

pub async fn find_credentials_by_email(
    pool: &PgPool,
    email: &str,
) -> ServiceResult<Option<EmployeeCredentials>> {
    let row = sqlx::query_as(
        "SELECT employee_id, first_name, last_name, email, password_hash, position, is_admin, is_active \
         FROM employees WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Load an active employee by id (guard path).
pub async fn find_active(pool: &PgPool, employee_id: i64) -> ServiceResult<Option<Employee>> {
    let row = sqlx::query_as(
        "SELECT employee_id, first_name, last_name, email, position, is_admin, is_active \
         FROM employees WHERE employee_id = $1 AND is_active = TRUE",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Employee>> {
    let rows = sqlx::query_as(
        "SELECT employee_id, first_name, last_name, email, position, is_admin, is_active \
         FROM employees ORDER BY last_name, first_name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub position: Option<String>,
    pub is_admin: bool,
}

pub async fn create(pool: &PgPool, data: &NewEmployee) -> ServiceResult<Employee> {
    let row = sqlx::query_as(
        "INSERT INTO employees (first_name, last_name, email, password_hash, position, is_admin) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING employee_id, first_name, last_name, email, position, is_admin, is_active",
    )
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(&data.position)
    .bind(data.is_admin)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ServiceError::App(AppError::new(ErrorCode::EmployeeExists))
        } else {
            e.into()
        }
    })?;
    Ok(row)
}

#[derive(Debug, Default)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}

pub async fn update(
    pool: &PgPool,
    employee_id: i64,
    data: &EmployeeUpdate,
) -> ServiceResult<Option<Employee>> {
    let row = sqlx::query_as(
        "UPDATE employees SET \
            first_name = COALESCE($1, first_name), \
            last_name = COALESCE($2, last_name), \
            position = COALESCE($3, position), \
            is_admin = COALESCE($4, is_admin), \
            is_active = COALESCE($5, is_active) \
         WHERE employee_id = $6 \
         RETURNING employee_id, first_name, last_name, email, position, is_admin, is_active",
    )
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.position)
    .bind(data.is_admin)
    .bind(data.is_active)
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
