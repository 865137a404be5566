//! Category database operations

use sqlx::PgPool;

use crate::error::ServiceResult;
use crate::models::category::{Category, CategoryWithCount};

/// Active categories with their active-product counts, in display order.
pub async fn list_with_counts(pool: &PgPool) -> ServiceResult<Vec<CategoryWithCount>> {
    let rows = sqlx::query_as(
        "SELECT c.category_id, c.name, c.description, c.image_url, c.display_order, c.is_active, \
                COUNT(p.product_id) AS product_count \
         FROM categories c \
         LEFT JOIN products p ON c.category_id = p.category_id AND p.is_active = TRUE \
         WHERE c.is_active = TRUE \
         GROUP BY c.category_id \
         ORDER BY c.display_order, c.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: i32,
}

pub async fn create(pool: &PgPool, data: &NewCategory) -> ServiceResult<Category> {
    let row = sqlx::query_as(
        "INSERT INTO categories (name, description, image_url, display_order) \
         VALUES ($1, $2, $3, $4) \
         RETURNING category_id, name, description, image_url, display_order, is_active",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(data.display_order)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

#[derive(Debug, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

pub async fn update(
    pool: &PgPool,
    category_id: i64,
    data: &CategoryUpdate,
) -> ServiceResult<Option<Category>> {
    let row = sqlx::query_as(
        "UPDATE categories SET \
            name = COALESCE($1, name), \
            description = COALESCE($2, description), \
            image_url = COALESCE($3, image_url), \
            display_order = COALESCE($4, display_order), \
            is_active = COALESCE($5, is_active), \
            updated_at = NOW() \
         WHERE category_id = $6 \
         RETURNING category_id, name, description, image_url, display_order, is_active",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.image_url)
    .bind(data.display_order)
    .bind(data.is_active)
    .bind(category_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
