//! Reservation endpoints
//!
//! The create/list/detail/cancel surface accepts employee sessions,
//! customer sessions, and (for create) anonymous callers with an explicit
//! customer id. A customer principal is always scoped to its own rows by
//! the id from the authenticated context, never a client-supplied field.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db;
use crate::db::reservations::{
    CreateReservation, DEFAULT_EXPIRATION_HOURS, ItemRequest, ReservationFilter,
};
use crate::error::{AppError, ErrorCode};
use crate::models::customer::Customer;
use crate::models::employee::Employee;
use crate::models::reservation::{
    Reservation, ReservationDetail, ReservationStatus, ReservationSummary,
};
use crate::state::AppState;

use super::ApiResult;

#[derive(Deserialize)]
pub struct ItemBody {
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub customer_id: Option<i64>,
    pub items: Option<Vec<ItemBody>>,
    pub expiration_hours: Option<i64>,
    pub notes: Option<String>,
}

/// POST /api/reservations
pub async fn create(
    State(state): State<AppState>,
    employee: Option<Extension<Employee>>,
    customer: Option<Extension<Customer>>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationDetail>), AppError> {
    let items = req.items.unwrap_or_default();
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::ReservationEmpty));
    }
    if items.iter().any(|i| i.quantity <= 0) {
        return Err(AppError::validation("Item quantity must be positive"));
    }
    let expiration_hours = req.expiration_hours.unwrap_or(DEFAULT_EXPIRATION_HOURS);
    if expiration_hours <= 0 {
        return Err(AppError::validation("Expiration hours must be positive"));
    }

    // Channel and creator follow the authenticated principal
    let (customer_id, source, created_by) = if let Some(Extension(customer)) = customer {
        (
            Some(customer.customer_id),
            "Online",
            "Customer".to_string(),
        )
    } else if let Some(Extension(employee)) = employee {
        (
            req.customer_id,
            "POS",
            format!("Employee-{}", employee.employee_id),
        )
    } else {
        (req.customer_id, "POS", "Employee".to_string())
    };
    let Some(customer_id) = customer_id else {
        return Err(AppError::validation("Customer ID is required"));
    };

    let request = CreateReservation {
        customer_id,
        items: items
            .into_iter()
            .map(|i| ItemRequest {
                product_id: i.product_id,
                quantity: i.quantity,
            })
            .collect(),
        expiration_hours,
        notes: req.notes,
        source,
        created_by,
    };

    let reservation = db::reservations::create(&state.pool, &request)
        .await
        .map_err(AppError::from)?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

#[derive(Deserialize)]
pub struct ReservationListQuery {
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub customer_id: Option<i64>,
}

/// GET /api/reservations
///
/// Employees see everything (with filters); customers see their own.
pub async fn list(
    State(state): State<AppState>,
    employee: Option<Extension<Employee>>,
    customer: Option<Extension<Customer>>,
    Query(query): Query<ReservationListQuery>,
) -> ApiResult<Vec<ReservationSummary>> {
    let filter = if let Some(Extension(customer)) = customer {
        ReservationFilter {
            scope_customer_id: Some(customer.customer_id),
            ..Default::default()
        }
    } else if employee.is_some() {
        let status = match query.status {
            Some(ref s) => Some(
                ReservationStatus::from_db(s)
                    .ok_or_else(|| AppError::validation("Invalid status"))?,
            ),
            None => None,
        };
        ReservationFilter {
            scope_customer_id: None,
            status,
            date_from: query.date_from,
            date_to: query.date_to,
            customer_id: query.customer_id,
        }
    } else {
        return Err(AppError::new(ErrorCode::NotAuthenticated));
    };

    let reservations = db::reservations::list(&state.pool, &filter)
        .await
        .map_err(AppError::from)?;
    Ok(Json(reservations))
}

/// GET /api/reservations/{id}
pub async fn get_one(
    State(state): State<AppState>,
    employee: Option<Extension<Employee>>,
    customer: Option<Extension<Customer>>,
    Path(id): Path<i64>,
) -> ApiResult<ReservationDetail> {
    let scope = match (&employee, &customer) {
        (None, Some(Extension(c))) => Some(c.customer_id),
        (Some(_), _) => None,
        (None, None) => return Err(AppError::new(ErrorCode::NotAuthenticated)),
    };

    let reservation = db::reservations::find_detail(&state.pool, id, scope)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;
    Ok(Json(reservation))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// PUT /api/reservations/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Reservation> {
    let Some(status) = req.status else {
        return Err(AppError::validation("Status is required"));
    };
    let status = ReservationStatus::from_db(&status)
        .ok_or_else(|| AppError::validation("Invalid status"))?;

    let reservation = db::reservations::update_status(&state.pool, id, status, &req.notes)
        .await
        .map_err(AppError::from)?;
    Ok(Json(reservation))
}

/// PUT /api/reservations/{id}/cancel
///
/// Answers 404 both for a missing/foreign reservation and for one past
/// its cancellation window.
pub async fn cancel(
    State(state): State<AppState>,
    employee: Option<Extension<Employee>>,
    customer: Option<Extension<Customer>>,
    Path(id): Path<i64>,
) -> ApiResult<Reservation> {
    let scope = match (&employee, &customer) {
        (None, Some(Extension(c))) => Some(c.customer_id),
        (Some(_), _) => None,
        (None, None) => return Err(AppError::new(ErrorCode::NotAuthenticated)),
    };

    let reservation = db::reservations::cancel(&state.pool, id, scope)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotCancellable))?;
    Ok(Json(reservation))
}
