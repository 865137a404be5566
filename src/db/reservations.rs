//! Reservation database operations
//!
//! Creation is the one multi-step protocol in the system: stock check,
//! price snapshot, total computation, code allocation, and header + item
//! inserts all run inside a single transaction. Any early return drops
//! the transaction and rolls everything back; no partial reservation is
//! ever visible to another reader.
//!
//! The engine validates availability but takes no row locks and performs
//! no stock decrement: two concurrent reservations against the same
//! low-stock product can both pass the check and both commit. The store's
//! isolation is the only serialization in play.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::is_unique_violation;
use crate::error::{AppError, ErrorCode, ServiceError, ServiceResult};
use crate::models::reservation::{
    Reservation, ReservationDetail, ReservationItem, ReservationStatus, ReservationSummary,
};
use crate::util::generate_reservation_code;

pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;

const RESERVATION_COLUMNS: &str =
    "reservation_id, reservation_code, customer_id, reservation_date, expiration_date, \
     status, total_amount, notes, source, created_by";

pub struct ItemRequest {
    pub product_id: i64,
    pub quantity: i32,
}

pub struct CreateReservation {
    pub customer_id: i64,
    pub items: Vec<ItemRequest>,
    pub expiration_hours: i64,
    pub notes: Option<String>,
    pub source: &'static str,
    pub created_by: String,
}

fn line_subtotal(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Create a reservation with its items atomically.
///
/// Unit prices are read inside the same transaction as the inserts, so
/// the recorded snapshot and the computed total always agree; later
/// catalog price changes never touch an existing reservation.
pub async fn create(pool: &PgPool, req: &CreateReservation) -> ServiceResult<ReservationDetail> {
    let mut tx = pool.begin().await?;

    let customer: Option<(bool,)> =
        sqlx::query_as("SELECT is_active FROM customers WHERE customer_id = $1")
            .bind(req.customer_id)
            .fetch_optional(&mut *tx)
            .await?;
    if !customer.is_some_and(|(active,)| active) {
        return Err(AppError::validation("Customer not found or inactive").into());
    }

    // Availability check and price snapshot in one pass
    let mut unit_prices = Vec::with_capacity(req.items.len());
    let mut total = Decimal::ZERO;
    for item in &req.items {
        let row: Option<(i32, String, Decimal)> = sqlx::query_as(
            "SELECT quantity_in_stock, name, price FROM products \
             WHERE product_id = $1 AND is_active = TRUE",
        )
        .bind(item.product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((stock, name, price)) = row else {
            return Err(AppError::with_message(
                ErrorCode::ProductUnavailable,
                format!("Product with ID {} not found", item.product_id),
            )
            .into());
        };
        if stock < item.quantity {
            return Err(AppError::with_message(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {name}. Available: {stock}, Requested: {}",
                    item.quantity
                ),
            )
            .into());
        }

        total += line_subtotal(price, item.quantity);
        unit_prices.push(price);
    }

    let code = generate_reservation_code();
    let expiration_date = Utc::now() + chrono::Duration::hours(req.expiration_hours);

    let (reservation_id,): (i64,) = sqlx::query_as(
        "INSERT INTO reservations (customer_id, reservation_code, expiration_date, total_amount, \
                                   notes, source, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING reservation_id",
    )
    .bind(req.customer_id)
    .bind(&code)
    .bind(expiration_date)
    .bind(total)
    .bind(&req.notes)
    .bind(req.source)
    .bind(&req.created_by)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ServiceError::App(AppError::new(ErrorCode::CodeConflict))
        } else {
            e.into()
        }
    })?;

    let reservation_ids: Vec<i64> = req.items.iter().map(|_| reservation_id).collect();
    let product_ids: Vec<i64> = req.items.iter().map(|i| i.product_id).collect();
    let quantities: Vec<i32> = req.items.iter().map(|i| i.quantity).collect();
    let subtotals: Vec<Decimal> = req
        .items
        .iter()
        .zip(&unit_prices)
        .map(|(i, price)| line_subtotal(*price, i.quantity))
        .collect();

    sqlx::query(
        "INSERT INTO reservation_items (reservation_id, product_id, quantity, unit_price, subtotal) \
         SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::integer[], $4::numeric[], $5::numeric[])",
    )
    .bind(&reservation_ids)
    .bind(&product_ids)
    .bind(&quantities)
    .bind(&unit_prices)
    .bind(&subtotals)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_detail(pool, reservation_id, None)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InternalError).into())
}

/// Listing filter (employee view); `scope_customer_id` is forced from the
/// authenticated customer, never from a client-supplied field.
#[derive(Debug, Default)]
pub struct ReservationFilter {
    pub scope_customer_id: Option<i64>,
    pub status: Option<ReservationStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub customer_id: Option<i64>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ReservationFilter) {
    qb.push(" WHERE TRUE");
    if let Some(customer_id) = filter.scope_customer_id {
        qb.push(" AND r.customer_id = ").push_bind(customer_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND r.status = ").push_bind(status.as_db());
    }
    if let Some(date_from) = filter.date_from {
        qb.push(" AND r.reservation_date >= ").push_bind(date_from);
    }
    if let Some(date_to) = filter.date_to {
        qb.push(" AND r.reservation_date <= ").push_bind(date_to);
    }
    if let Some(customer_id) = filter.customer_id {
        qb.push(" AND r.customer_id = ").push_bind(customer_id);
    }
}

pub async fn list(pool: &PgPool, filter: &ReservationFilter) -> ServiceResult<Vec<ReservationSummary>> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "SELECT r.reservation_id, r.reservation_code, r.customer_id, \
                c.first_name || ' ' || c.last_name AS customer_name, \
                c.phone AS customer_phone, \
                r.reservation_date, r.expiration_date, r.status, r.total_amount, r.source, r.notes, \
                COUNT(ri.item_id) AS total_items, \
                COALESCE(SUM(ri.quantity), 0) AS total_quantity \
         FROM reservations r \
         JOIN customers c ON r.customer_id = c.customer_id \
         LEFT JOIN reservation_items ri ON r.reservation_id = ri.reservation_id",
    );
    push_filters(&mut qb, filter);
    qb.push(
        " GROUP BY r.reservation_id, c.first_name, c.last_name, c.phone \
         ORDER BY r.reservation_date DESC",
    );
    let rows = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows)
}

/// Load a reservation with customer contact fields and items.
///
/// With `scope_customer_id` set, foreign reservations are invisible.
pub async fn find_detail(
    pool: &PgPool,
    reservation_id: i64,
    scope_customer_id: Option<i64>,
) -> ServiceResult<Option<ReservationDetail>> {
    #[derive(sqlx::FromRow)]
    struct DetailRow {
        #[sqlx(flatten)]
        reservation: Reservation,
        customer_name: String,
        customer_phone: String,
        customer_email: String,
    }

    let base = "SELECT r.reservation_id, r.reservation_code, r.customer_id, r.reservation_date, \
                r.expiration_date, r.status, r.total_amount, r.notes, r.source, r.created_by, \
                c.first_name || ' ' || c.last_name AS customer_name, \
                c.phone AS customer_phone, c.email AS customer_email \
         FROM reservations r JOIN customers c ON r.customer_id = c.customer_id \
         WHERE r.reservation_id = $1";

    let header: Option<DetailRow> = if let Some(customer_id) = scope_customer_id {
        sqlx::query_as(&format!("{base} AND r.customer_id = $2"))
            .bind(reservation_id)
            .bind(customer_id)
            .fetch_optional(pool)
            .await?
    } else {
        sqlx::query_as(base)
            .bind(reservation_id)
            .fetch_optional(pool)
            .await?
    };

    let Some(header) = header else {
        return Ok(None);
    };

    let items: Vec<ReservationItem> = sqlx::query_as(
        "SELECT ri.item_id, ri.reservation_id, ri.product_id, ri.quantity, ri.unit_price, \
                ri.subtotal, p.name AS product_name, p.status AS product_status, \
                p.image_url AS product_image \
         FROM reservation_items ri \
         JOIN products p ON ri.product_id = p.product_id \
         WHERE ri.reservation_id = $1 \
         ORDER BY ri.item_id",
    )
    .bind(reservation_id)
    .fetch_all(pool)
    .await?;

    Ok(Some(ReservationDetail {
        reservation: header.reservation,
        customer_name: header.customer_name,
        customer_phone: header.customer_phone,
        customer_email: header.customer_email,
        items,
    }))
}

/// Privileged status change; the transition graph is enforced.
pub async fn update_status(
    pool: &PgPool,
    reservation_id: i64,
    to: ReservationStatus,
    notes: &Option<String>,
) -> ServiceResult<Reservation> {
    let mut tx = pool.begin().await?;

    let current: Option<(String,)> =
        sqlx::query_as("SELECT status FROM reservations WHERE reservation_id = $1 FOR UPDATE")
            .bind(reservation_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some((current,)) = current else {
        return Err(AppError::new(ErrorCode::ReservationNotFound).into());
    };
    let from = ReservationStatus::from_db(&current)
        .ok_or_else(|| AppError::new(ErrorCode::DatabaseError))?;

    if !from.can_transition_to(to) {
        let message = if from.is_terminal() {
            format!("Reservation is already {}", from.as_db())
        } else {
            format!("Cannot change status from {} to {}", from.as_db(), to.as_db())
        };
        return Err(AppError::with_message(ErrorCode::InvalidStatusTransition, message).into());
    }

    let row: Reservation = sqlx::query_as(&format!(
        "UPDATE reservations SET status = $1, notes = COALESCE($2, notes), updated_at = NOW() \
         WHERE reservation_id = $3 RETURNING {RESERVATION_COLUMNS}"
    ))
    .bind(to.as_db())
    .bind(notes)
    .bind(reservation_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row)
}

/// Self-service cancel: only from Pending or Confirmed, and only the
/// owning customer when scoped. A miss for either reason is a `None`.
pub async fn cancel(
    pool: &PgPool,
    reservation_id: i64,
    scope_customer_id: Option<i64>,
) -> ServiceResult<Option<Reservation>> {
    let base = "UPDATE reservations SET status = 'Cancelled', updated_at = NOW() \
         WHERE reservation_id = $1 AND status IN ('Pending', 'Confirmed')";

    let row = if let Some(customer_id) = scope_customer_id {
        sqlx::query_as(&format!(
            "{base} AND customer_id = $2 RETURNING {RESERVATION_COLUMNS}"
        ))
        .bind(reservation_id)
        .bind(customer_id)
        .fetch_optional(pool)
        .await?
    } else {
        sqlx::query_as(&format!("{base} RETURNING {RESERVATION_COLUMNS}"))
            .bind(reservation_id)
            .fetch_optional(pool)
            .await?
    };
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_line_subtotal_exact() {
        assert_eq!(line_subtotal(dec("10.00"), 2), dec("20.00"));
        // No floating-point drift on cent values
        assert_eq!(line_subtotal(dec("0.10"), 3), dec("0.30"));
        assert_eq!(line_subtotal(dec("19.99"), 7), dec("139.93"));
    }

    #[test]
    fn test_total_equals_sum_of_subtotals() {
        let lines = [(dec("10.00"), 2), (dec("0.10"), 3), (dec("5.25"), 4)];
        let total: Decimal = lines.iter().map(|(p, q)| line_subtotal(*p, *q)).sum();
        assert_eq!(total, dec("41.30"));
    }

    #[test]
    fn test_list_filters_are_parameterized() {
        let filter = ReservationFilter {
            scope_customer_id: None,
            status: Some(ReservationStatus::Pending),
            date_from: Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            date_to: Some(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()),
            customer_id: Some(9),
        };
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM reservations r");
        push_filters(&mut qb, &filter);
        let sql = qb.sql();
        assert!(sql.contains("r.status = $1"));
        assert!(sql.contains("r.reservation_date >= $2"));
        assert!(sql.contains("r.reservation_date <= $3"));
        assert!(sql.contains("r.customer_id = $4"));
        assert!(!sql.contains("Pending"));
        assert!(!sql.contains("2025"));
    }

    #[test]
    fn test_customer_scope_is_first_predicate() {
        let filter = ReservationFilter {
            scope_customer_id: Some(3),
            ..Default::default()
        };
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM reservations r");
        push_filters(&mut qb, &filter);
        assert!(qb.sql().contains("r.customer_id = $1"));
    }
}
