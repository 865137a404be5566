//! Product model

use rust_decimal::Decimal;
use serde::Serialize;

/// Full product row, returned from create/update/detail queries
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub product_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub tax_rate: Decimal,
    pub quantity_in_stock: i32,
    pub reorder_level: i32,
    pub status: String,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
}

/// Listing row with the category name joined in
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub product_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
    pub price: Decimal,
    pub quantity_in_stock: i32,
    pub status: String,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub category_name: Option<String>,
}

/// Row for the low-stock alert listing
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LowStockProduct {
    pub product_id: i64,
    pub name: String,
    pub quantity_in_stock: i32,
    pub reorder_level: i32,
    pub category_name: Option<String>,
}
