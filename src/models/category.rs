//! Category model

use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

/// Category with the number of active products it contains
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryWithCount {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub product_count: i64,
}
