//! Product endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db;
use crate::db::products::ProductFilter;
use crate::error::{AppError, ErrorCode};
use crate::models::product::{LowStockProduct, Product, ProductSummary};
use crate::response::Paginated;
use crate::state::AppState;

use super::ApiResult;

#[derive(Deserialize)]
pub struct ProductListQuery {
    pub category_id: Option<i64>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<Paginated<ProductSummary>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;

    let filter = ProductFilter {
        category_id: query.category_id,
        status: query.status,
        featured: query.featured.unwrap_or(false),
        search: query.search,
    };

    let products = db::products::list(&state.pool, &filter, limit, offset)
        .await
        .map_err(AppError::from)?;
    let total = db::products::count(&state.pool, &filter)
        .await
        .map_err(AppError::from)?;

    Ok(Json(Paginated::new(products, page, limit, total)))
}

/// GET /api/products/{id}
pub async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Product> {
    let product = db::products::find(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(product))
}

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub quantity_in_stock: Option<i32>,
    pub reorder_level: Option<i32>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let (Some(name), Some(price), Some(category_id)) = (req.name, req.price, req.category_id)
    else {
        return Err(AppError::validation("Name, price, and category are required"));
    };
    if name.trim().is_empty() {
        return Err(AppError::validation("Name, price, and category are required"));
    }
    if price < Decimal::ZERO {
        return Err(AppError::validation("Price must not be negative"));
    }
    if req.quantity_in_stock.is_some_and(|q| q < 0) {
        return Err(AppError::validation("Stock quantity must not be negative"));
    }

    let data = db::products::NewProduct {
        category_id,
        name: name.trim().to_string(),
        description: req.description,
        barcode: req.barcode,
        sku: req.sku,
        price,
        cost_price: req.cost_price,
        tax_rate: req.tax_rate.unwrap_or(Decimal::ZERO),
        quantity_in_stock: req.quantity_in_stock.unwrap_or(0),
        reorder_level: req.reorder_level.unwrap_or(5),
        image_url: req.image_url,
        is_featured: req.is_featured.unwrap_or(false),
    };
    let product = db::products::create(&state.pool, &data)
        .await
        .map_err(AppError::from)?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub quantity_in_stock: Option<i32>,
    pub reorder_level: Option<i32>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProductRequest>,
) -> ApiResult<Product> {
    if req.price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AppError::validation("Price must not be negative"));
    }
    if req.quantity_in_stock.is_some_and(|q| q < 0) {
        return Err(AppError::validation("Stock quantity must not be negative"));
    }

    let data = db::products::ProductUpdate {
        category_id: req.category_id,
        name: req.name,
        description: req.description,
        barcode: req.barcode,
        sku: req.sku,
        price: req.price,
        cost_price: req.cost_price,
        tax_rate: req.tax_rate,
        quantity_in_stock: req.quantity_in_stock,
        reorder_level: req.reorder_level,
        image_url: req.image_url,
        is_featured: req.is_featured,
        is_active: req.is_active,
    };
    let product = db::products::update(&state.pool, id, &data)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Value> {
    let deleted = db::products::soft_delete(&state.pool, id)
        .await
        .map_err(AppError::from)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

/// GET /api/products/alerts/low-stock
pub async fn low_stock(State(state): State<AppState>) -> ApiResult<Vec<LowStockProduct>> {
    let products = db::products::low_stock(&state.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(products))
}
