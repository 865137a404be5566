//! Customer management endpoints (employee-facing)

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::models::customer::Customer;
use crate::response::Paginated;
use crate::state::AppState;

use super::ApiResult;

#[derive(Deserialize)]
pub struct CustomerListQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/customers
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CustomerListQuery>,
) -> ApiResult<Paginated<Customer>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;

    let customers = db::customers::list(&state.pool, &query.search, limit, offset)
        .await
        .map_err(AppError::from)?;
    let total = db::customers::count(&state.pool, &query.search)
        .await
        .map_err(AppError::from)?;

    Ok(Json(Paginated::new(customers, page, limit, total)))
}

/// GET /api/customers/{id}
pub async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Customer> {
    let customer = db::customers::find(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    Ok(Json(customer))
}

#[derive(Deserialize)]
pub struct UpdateCustomerRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

/// PUT /api/customers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCustomerRequest>,
) -> ApiResult<Customer> {
    let data = db::customers::CustomerUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        phone: req.phone,
        email: req.email,
        is_active: req.is_active,
    };
    let customer = db::customers::update(&state.pool, id, &data)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    Ok(Json(customer))
}
