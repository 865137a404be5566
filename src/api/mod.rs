//! API routes

pub mod auth;
pub mod categories;
pub mod customers;
pub mod employees;
pub mod health;
pub mod products;
pub mod reservations;
pub mod service;

use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::{Json, Router, middleware};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{guard, rate_limit};
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth)
    let public = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/categories", get(categories::list))
        .route("/api/products", get(products::list))
        .route("/api/products/{id}", get(products::get_one));

    // Login routes, rate-limited per IP
    let login = Router::new()
        .route("/api/auth/employee/login", post(auth::employee_login))
        .route("/api/auth/customer/login", post(auth::customer_login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::login_rate_limit,
        ));

    let register = Router::new()
        .route("/api/auth/customer/register", post(auth::customer_register))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::register_rate_limit,
        ));

    // Employee session routes
    let employee = Router::new()
        .route("/api/auth/employee/me", get(auth::employee_me))
        .route("/api/categories", post(categories::create))
        .route("/api/categories/{id}", put(categories::update))
        .route("/api/products", post(products::create))
        .route(
            "/api/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route("/api/products/alerts/low-stock", get(products::low_stock))
        .route("/api/customers", get(customers::list))
        .route(
            "/api/customers/{id}",
            get(customers::get_one).put(customers::update),
        )
        .route(
            "/api/reservations/{id}/status",
            put(reservations::update_status),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::employee_auth,
        ));

    // Admin routes: employee guard runs first, then the admin check
    let admin = Router::new()
        .route("/api/employees", get(employees::list).post(employees::create))
        .route("/api/employees/{id}", put(employees::update))
        .layer(middleware::from_fn(guard::require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::employee_auth,
        ));

    // Customer session routes
    let customer = Router::new()
        .route("/api/auth/customer/me", get(auth::customer_me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::customer_auth,
        ));

    // Reservation surface: employee, customer, or anonymous
    let reservation = Router::new()
        .route(
            "/api/reservations",
            get(reservations::list).post(reservations::create),
        )
        .route("/api/reservations/{id}", get(reservations::get_one))
        .route("/api/reservations/{id}/cancel", put(reservations::cancel))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::optional_principal,
        ));

    // Service-to-service routes (API key)
    let service = Router::new()
        .route("/api/service/catalog", get(service::catalog))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::api_key_auth,
        ));

    Router::new()
        .merge(public)
        .merge(login)
        .merge(register)
        .merge(employee)
        .merge(admin)
        .merge(customer)
        .merge(reservation)
        .merge(service)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.allowed_origins))
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::with_message(ErrorCode::NotFound, "Route not found")
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
