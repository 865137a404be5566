//! Product database operations
//!
//! The listing query is assembled from a structured filter through
//! `QueryBuilder`; every filter value goes through `push_bind`, never
//! into the SQL text.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::is_unique_violation;
use crate::error::{AppError, ErrorCode, ServiceError, ServiceResult};
use crate::models::product::{LowStockProduct, Product, ProductSummary};

const PRODUCT_COLUMNS: &str = "product_id, category_id, name, description, barcode, sku, price, \
     cost_price, tax_rate, quantity_in_stock, reorder_level, status, image_url, is_featured, is_active";

/// Structured listing filter; only active products are ever listed.
#[derive(Debug, Default)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub status: Option<String>,
    pub featured: bool,
    pub search: Option<String>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    qb.push(" WHERE p.is_active = TRUE");
    if let Some(category_id) = filter.category_id {
        qb.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(ref status) = filter.status {
        qb.push(" AND p.status = ").push_bind(status.clone());
    }
    if filter.featured {
        qb.push(" AND p.is_featured = TRUE");
    }
    if let Some(ref search) = filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

pub async fn list(
    pool: &PgPool,
    filter: &ProductFilter,
    limit: i64,
    offset: i64,
) -> ServiceResult<Vec<ProductSummary>> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "SELECT p.product_id, p.category_id, p.name, p.description, p.barcode, p.sku, p.price, \
                p.quantity_in_stock, p.status, p.image_url, p.is_featured, \
                c.name AS category_name \
         FROM products p \
         LEFT JOIN categories c ON p.category_id = c.category_id",
    );
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY p.name LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let rows = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn count(pool: &PgPool, filter: &ProductFilter) -> ServiceResult<i64> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM products p");
    push_filters(&mut qb, filter);
    let total = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(total)
}

pub async fn find(pool: &PgPool, product_id: i64) -> ServiceResult<Option<Product>> {
    let row = sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1 AND is_active = TRUE"
    ))
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub struct NewProduct {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub barcode: Option<String>,
    pub sku: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub tax_rate: Decimal,
    pub quantity_in_stock: i32,
    pub reorder_level: i32,
    pub image_url: Option<String>,
    pub is_featured: bool,
}

pub async fn create(pool: &PgPool, data: &NewProduct) -> ServiceResult<Product> {
    let row = sqlx::query_as(&format!(
        "INSERT INTO products (category_id, name, description, barcode, sku, price, cost_price, \
                               tax_rate, quantity_in_stock, reorder_level, image_url, is_featured) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(data.category_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.barcode)
    .bind(&data.sku)
    .bind(data.price)
    .bind(data.cost_price)
    .bind(data.tax_rate)
    .bind(data.quantity_in_stock)
    .bind(data.reorder_level)
    .bind(&data.image_url)
    .bind(data.is_featured)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ServiceError::App(AppError::with_message(
                ErrorCode::AlreadyExists,
                "Product with this barcode or SKU already exists",
            ))
        } else {
            e.into()
        }
    })?;
    Ok(row)
}

#[derive(Debug, Default)]
pub struct ProductUpdate {
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

pub async fn update(
    pool: &PgPool,
    product_id: i64,
    data: &ProductUpdate,
) -> ServiceResult<Option<Product>> {
    let row = sqlx::query_as(&format!(
        "UPDATE products SET \
            category_id = COALESCE($1, category_id), \
            name = COALESCE($2, name), \
            description = COALESCE($3, description), \
            barcode = COALESCE($4, barcode), \
            sku = COALESCE($5, sku), \
            price = COALESCE($6, price), \
            cost_price = COALESCE($7, cost_price), \
            tax_rate = COALESCE($8, tax_rate), \
            quantity_in_stock = COALESCE($9, quantity_in_stock), \
            reorder_level = COALESCE($10, reorder_level), \
            image_url = COALESCE($11, image_url), \
            is_featured = COALESCE($12, is_featured), \
            is_active = COALESCE($13, is_active), \
            updated_at = NOW() \
         WHERE product_id = $14 AND is_active = TRUE \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(data.category_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.barcode)
    .bind(&data.sku)
    .bind(data.price)
    .bind(data.cost_price)
    .bind(data.tax_rate)
    .bind(data.quantity_in_stock)
    .bind(data.reorder_level)
    .bind(&data.image_url)
    .bind(data.is_featured)
    .bind(data.is_active)
    .bind(product_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ServiceError::App(AppError::with_message(
                ErrorCode::AlreadyExists,
                "Product with this barcode or SKU already exists",
            ))
        } else {
            e.into()
        }
    })?;
    Ok(row)
}

/// Soft delete; returns `false` when no active row matched.
pub async fn soft_delete(pool: &PgPool, product_id: i64) -> ServiceResult<bool> {
    let result = sqlx::query(
        "UPDATE products SET is_active = FALSE, updated_at = NOW() \
         WHERE product_id = $1 AND is_active = TRUE",
    )
    .bind(product_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn low_stock(pool: &PgPool) -> ServiceResult<Vec<LowStockProduct>> {
    let rows = sqlx::query_as(
        "SELECT p.product_id, p.name, p.quantity_in_stock, p.reorder_level, \
                c.name AS category_name \
         FROM products p \
         LEFT JOIN categories c ON p.category_id = c.category_id \
         WHERE p.is_active = TRUE AND p.quantity_in_stock <= p.reorder_level \
         ORDER BY p.quantity_in_stock ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Full active catalog, for the service-to-service export.
pub async fn export_catalog(pool: &PgPool) -> ServiceResult<Vec<ProductSummary>> {
    let rows = sqlx::query_as(
        "SELECT p.product_id, p.category_id, p.name, p.description, p.barcode, p.sku, p.price, \
                p.quantity_in_stock, p.status, p.image_url, p.is_featured, \
                c.name AS category_name \
         FROM products p \
         LEFT JOIN categories c ON p.category_id = c.category_id \
         WHERE p.is_active = TRUE \
         ORDER BY c.display_order, p.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_only_checks_active() {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut qb, &ProductFilter::default());
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM products p WHERE p.is_active = TRUE"
        );
    }

    #[test]
    fn test_all_filters_are_parameterized() {
        let filter = ProductFilter {
            category_id: Some(3),
            status: Some("Available".to_string()),
            featured: true,
            search: Some("injection' OR '1'='1".to_string()),
        };
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM products p");
        push_filters(&mut qb, &filter);
        let sql = qb.sql();
        // category, status, and two search placeholders
        assert!(sql.contains("p.category_id = $1"));
        assert!(sql.contains("p.status = $2"));
        assert!(sql.contains("p.name ILIKE $3"));
        assert!(sql.contains("p.description ILIKE $4"));
        // filter values never reach the SQL text
        assert!(!sql.contains("Available"));
        assert!(!sql.contains("injection"));
    }
}
