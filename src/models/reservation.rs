//! Reservation model and status state machine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reservation lifecycle status.
///
/// Pending → Confirmed | Cancelled | Expired
/// Confirmed → Completed | Cancelled | Expired
/// Completed, Cancelled, Expired are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Expired,
}

impl ReservationStatus {
    /// Parse the stored TEXT value.
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Confirmed" => Some(Self::Confirmed),
            "Completed" => Some(Self::Completed),
            "Cancelled" => Some(Self::Cancelled),
            "Expired" => Some(Self::Expired),
            _ => None,
        }
    }

    pub const fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Expired => "Expired",
        }
    }

    /// Whether the privileged status update may move this status to `to`.
    pub fn can_transition_to(&self, to: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, to),
            (Pending, Confirmed | Cancelled | Expired) | (Confirmed, Completed | Cancelled | Expired)
        )
    }

    /// Whether the self-service cancel operation applies.
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Expired)
    }
}

/// Reservation header row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Reservation {
    pub reservation_id: i64,
    pub reservation_code: String,
    pub customer_id: i64,
    pub reservation_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub status: String,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub source: String,
    pub created_by: String,
}

/// Listing row with customer info and item aggregates joined in
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReservationSummary {
    pub reservation_id: i64,
    pub reservation_code: String,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub reservation_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub status: String,
    pub total_amount: Decimal,
    pub source: String,
    pub notes: Option<String>,
    pub total_items: i64,
    pub total_quantity: i64,
}

/// Line item with product info joined in.
///
/// `unit_price` is the snapshot taken inside the creating transaction;
/// later catalog price changes never affect it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReservationItem {
    pub item_id: i64,
    pub reservation_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub product_name: String,
    pub product_status: String,
    pub product_image: Option<String>,
}

/// Reservation header with customer contact fields and its items
#[derive(Debug, Clone, Serialize)]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub items: Vec<ReservationItem>,
}

#[cfg(test)]
mod tests {
    use super::ReservationStatus::*;
    use super::*;

    #[test]
    fn test_db_roundtrip() {
        for status in [Pending, Confirmed, Completed, Cancelled, Expired] {
            assert_eq!(ReservationStatus::from_db(status.as_db()), Some(status));
        }
        assert_eq!(ReservationStatus::from_db("Unknown"), None);
        assert_eq!(ReservationStatus::from_db("pending"), None);
    }

    #[test]
    fn test_pending_transitions() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Pending.can_transition_to(Expired));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_confirmed_transitions() {
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Expired));
        assert!(!Confirmed.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_states_are_frozen() {
        for terminal in [Completed, Cancelled, Expired] {
            assert!(terminal.is_terminal());
            for target in [Pending, Confirmed, Completed, Cancelled, Expired] {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn test_cancel_window() {
        assert!(Pending.can_cancel());
        assert!(Confirmed.can_cancel());
        assert!(!Completed.can_cancel());
        assert!(!Cancelled.can_cancel());
        assert!(!Expired.can_cancel());
    }
}
