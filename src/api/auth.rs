//! Authentication endpoints: employee login, customer register/login,
//! current-principal lookups

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::session;
use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::models::customer::Customer;
use crate::models::employee::Employee;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

use super::ApiResult;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: Option<String>,
    pub is_admin: bool,
}

#[derive(Serialize)]
pub struct EmployeeLoginResponse {
    pub token: String,
    pub employee: EmployeeProfile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct CustomerLoginResponse {
    pub token: String,
    pub customer: CustomerProfile,
}

/// POST /api/auth/employee/login
pub async fn employee_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<EmployeeLoginResponse> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let employee = db::employees::find_credentials_by_email(&state.pool, req.email.trim())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !employee.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }
    if !verify_password(&req.password, &employee.password_hash) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    let token = session::issue_employee_token(
        employee.employee_id,
        employee.is_admin,
        &state.jwt_secret,
    )
    .map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(EmployeeLoginResponse {
        token,
        employee: EmployeeProfile {
            id: employee.employee_id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            position: employee.position,
            is_admin: employee.is_admin,
        },
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// POST /api/auth/customer/register
///
/// Creates the customer row and its app user in one transaction, then
/// issues a session token.
pub async fn customer_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<CustomerLoginResponse>), AppError> {
    let email = req.email.trim().to_lowercase();

    if req.first_name.trim().is_empty()
        || req.last_name.trim().is_empty()
        || req.phone.trim().is_empty()
        || email.is_empty()
        || req.password.is_empty()
    {
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

    let data = db::customers::NewCustomer {
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        phone: req.phone.trim().to_string(),
        email: email.clone(),
        password_hash,
    };
    let (customer_id, user_id) = db::customers::register(&state.pool, &data)
        .await
        .map_err(AppError::from)?;

    let token = session::issue_customer_token(user_id, customer_id, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    tracing::info!(customer_id, "customer registered");

    Ok((
        StatusCode::CREATED,
        Json(CustomerLoginResponse {
            token,
            customer: CustomerProfile {
                id: customer_id,
                first_name: data.first_name,
                last_name: data.last_name,
                phone: data.phone,
                email: data.email,
            },
        }),
    ))
}

/// POST /api/auth/customer/login
pub async fn customer_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<CustomerLoginResponse> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let user = db::customers::find_credentials_by_email(&state.pool, &req.email.trim().to_lowercase())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !user.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }
    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    let token = session::issue_customer_token(user.user_id, user.customer_id, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    db::customers::touch_last_login(&state.pool, user.customer_id)
        .await
        .map_err(AppError::from)?;

    Ok(Json(CustomerLoginResponse {
        token,
        customer: CustomerProfile {
            id: user.customer_id,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            email: user.email,
        },
    }))
}

/// GET /api/auth/employee/me
pub async fn employee_me(Extension(employee): Extension<Employee>) -> Json<Employee> {
    Json(employee)
}

/// GET /api/auth/customer/me
pub async fn customer_me(Extension(customer): Extension<Customer>) -> Json<Customer> {
    Json(customer)
}
