//! Category endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::models::category::{Category, CategoryWithCount};
use crate::state::AppState;

use super::ApiResult;

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<CategoryWithCount>> {
    let categories = db::categories::list_with_counts(&state.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(categories))
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Category name is required"));
    }

    let data = db::categories::NewCategory {
        name: req.name.trim().to_string(),
        description: req.description,
        image_url: req.image_url,
        display_order: req.display_order.unwrap_or(0),
    };
    let category = db::categories::create(&state.pool, &data)
        .await
        .map_err(AppError::from)?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCategoryRequest>,
) -> ApiResult<Category> {
    let data = db::categories::CategoryUpdate {
        name: req.name,
        description: req.description,
        image_url: req.image_url,
        display_order: req.display_order,
        is_active: req.is_active,
    };
    let category = db::categories::update(&state.pool, id, &data)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(Json(category))
}
