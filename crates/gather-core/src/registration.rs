// Registration domain types
//
// A registration row exists only as the durable record of a successful
// admission decision. Rows are append-only in this flow: payment-status
// transitions belong to the external payment path, and cancellation does not
// exist here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Payment state of a registration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    /// Status a new registration is created with: free events are paid
    /// immediately, priced events wait for the payment path.
    pub fn for_price(price_cents: i64) -> Self {
        if price_cents == 0 {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

impl From<&str> for PaymentStatus {
    fn from(s: &str) -> Self {
        match s {
            "paid" => PaymentStatus::Paid,
            "refunded" => PaymentStatus::Refunded,
            _ => PaymentStatus::Pending,
        }
    }
}

/// Registration - one user's committed spot at one event
///
/// At most one registration may ever exist per (user_id, event_id) pair; the
/// store enforces this with a uniqueness constraint independent of any
/// locking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Registration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub payment_status: PaymentStatus,
    /// Reference handed back by the external payment processor; unset until
    /// that path runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_ref: Option<String>,
    pub registered_at: DateTime<Utc>,
}
