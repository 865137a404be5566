//! Customer credential-store queries
//!
//! Customers authenticate through the `app_users` table; the customer row
//! and its app user are created together in one transaction so neither
//! ever exists without the other.

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::is_unique_violation;
use crate::error::{AppError, ErrorCode, ServiceError, ServiceResult};
use crate::models::customer::Customer;

const CUSTOMER_COLUMNS: &str =
    "customer_id, first_name, last_name, phone, email, is_active, last_login";

/// Row for password verification at customer login (app_users join)
#[derive(Debug, sqlx::FromRow)]
pub struct CustomerCredentials {
    pub user_id: i64,
    pub password_hash: String,
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub is_active: bool,
}

pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
}

/// Insert a customer and its app user atomically.
///
/// Returns `(customer_id, user_id)`.
pub async fn register(pool: &PgPool, data: &NewCustomer) -> ServiceResult<(i64, i64)> {
    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT customer_id FROM customers WHERE phone = $1 OR email = $2")
            .bind(&data.phone)
            .bind(&data.email)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(AppError::new(ErrorCode::CustomerExists).into());
    }

    let mut tx = pool.begin().await?;

    let (customer_id,): (i64,) = sqlx::query_as(
        "INSERT INTO customers (first_name, last_name, phone, email, password_hash) \
         VALUES ($1, $2, $3, $4, $5) RETURNING customer_id",
    )
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.password_hash)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ServiceError::App(AppError::new(ErrorCode::CustomerExists))
        } else {
            e.into()
        }
    })?;

    let (user_id,): (i64,) = sqlx::query_as(
        "INSERT INTO app_users (customer_id, username, email, password_hash) \
         VALUES ($1, $2, $3, $4) RETURNING user_id",
    )
    .bind(customer_id)
    .bind(&data.email)
    .bind(&data.email)
    .bind(&data.password_hash)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ServiceError::App(AppError::new(ErrorCode::CustomerExists))
        } else {
            e.into()
        }
    })?;

    tx.commit().await?;
    Ok((customer_id, user_id))
}

pub async fn find_credentials_by_email(
    pool: &PgPool,
    email: &str,
) -> ServiceResult<Option<CustomerCredentials>> {
    let row = sqlx::query_as(
        "SELECT au.user_id, au.password_hash, c.customer_id, c.first_name, c.last_name, \
                c.phone, c.email, c.is_active \
         FROM app_users au JOIN customers c ON au.customer_id = c.customer_id \
         WHERE au.email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Load the active customer behind an app user id (guard path).
pub async fn find_active_by_user_id(pool: &PgPool, user_id: i64) -> ServiceResult<Option<Customer>> {
    let row = sqlx::query_as(
        "SELECT c.customer_id, c.first_name, c.last_name, c.phone, c.email, c.is_active, c.last_login \
         FROM customers c JOIN app_users au ON c.customer_id = au.customer_id \
         WHERE au.user_id = $1 AND c.is_active = TRUE",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn touch_last_login(pool: &PgPool, customer_id: i64) -> ServiceResult<()> {
    sqlx::query("UPDATE customers SET last_login = NOW() WHERE customer_id = $1")
        .bind(customer_id)
        .execute(pool)
        .await?;
    Ok(())
}

fn push_search(qb: &mut QueryBuilder<'_, Postgres>, search: &Option<String>) {
    if let Some(s) = search {
        let pattern = format!("%{s}%");
        qb.push(" AND (first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR last_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR phone ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

pub async fn list(
    pool: &PgPool,
    search: &Option<String>,
    limit: i64,
    offset: i64,
) -> ServiceResult<Vec<Customer>> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE is_active = TRUE"
    ));
    push_search(&mut qb, search);
    qb.push(" ORDER BY last_name, first_name LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let rows = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn count(pool: &PgPool, search: &Option<String>) -> ServiceResult<i64> {
    let mut qb: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("SELECT COUNT(*) FROM customers WHERE is_active = TRUE");
    push_search(&mut qb, search);
    let total = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(total)
}

pub async fn find(pool: &PgPool, customer_id: i64) -> ServiceResult<Option<Customer>> {
    let row = sqlx::query_as(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE customer_id = $1 AND is_active = TRUE"
    ))
    .bind(customer_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

#[derive(Debug, Default)]
pub struct CustomerUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn update(
    pool: &PgPool,
    customer_id: i64,
    data: &CustomerUpdate,
) -> ServiceResult<Option<Customer>> {
    let row = sqlx::query_as(&format!(
        "UPDATE customers SET \
            first_name = COALESCE($1, first_name), \
            last_name = COALESCE($2, last_name), \
            phone = COALESCE($3, phone), \
            email = COALESCE($4, email), \
            is_active = COALESCE($5, is_active) \
         WHERE customer_id = $6 \
         RETURNING {CUSTOMER_COLUMNS}"
    ))
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(data.is_active)
    .bind(customer_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ServiceError::App(AppError::new(ErrorCode::CustomerExists))
        } else {
            e.into()
        }
    })?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_parameterized() {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM customers WHERE is_active = TRUE");
        let search = Some("'; DROP TABLE customers; --".to_string());
        push_search(&mut qb, &search);
        let sql = qb.sql();
        assert!(sql.contains("$1"));
        assert!(sql.contains("$4"));
        assert!(!sql.contains("DROP TABLE"));
    }
}
