//! Employee management endpoints (admin only)

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::models::employee::Employee;
use crate::state::AppState;
use crate::util::hash_password;

use super::ApiResult;

/// GET /api/employees
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    let employees = db::employees::list(&state.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(employees))
}

#[derive(Deserialize)]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub position: Option<String>,
    pub is_admin: Option<bool>,
}

/// POST /api/employees
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let email = req.email.trim().to_lowercase();
    if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() || email.is_empty() {
        return Err(AppError::validation("All fields are required"));
    }
    if !email.contains('@') {
        return Err(AppError::validation("Invalid email"));
    }
    if req.password.len() < 8 {
        return Err(AppError::validation("Password must be at least 8 characters"));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hash error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let data = db::employees::NewEmployee {
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        email,
        password_hash,
        position: req.position,
        is_admin: req.is_admin.unwrap_or(false),
    };
    let employee = db::employees::create(&state.pool, &data)
        .await
        .map_err(AppError::from)?;
    Ok((StatusCode::CREATED, Json(employee)))
}

#[derive(Deserialize)]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}

/// PUT /api/employees/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> ApiResult<Employee> {
    let data = db::employees::EmployeeUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        position: req.position,
        is_admin: req.is_admin,
        is_active: req.is_active,
    };
    let employee = db::employees::update(&state.pool, id, &data)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
    Ok(Json(employee))
}
