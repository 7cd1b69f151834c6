//! Order records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use teahouse_core::{OrderId, OrderStatus, UserId};

use super::cart::CartLine;

/// Contact block captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// What the checkout flow hands to the auth store: everything an [`Order`]
/// needs except identity, ownership, and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub items: Vec<CartLine>,
    pub total: Decimal,
    pub customer: OrderCustomer,
    /// Chosen at checkout; validated on submission but not stored on the
    /// order record.
    #[serde(default)]
    pub payment_method: String,
}

/// A submitted order.
///
/// Created exactly once from a signed-in user's cart; immutable afterwards
/// from this crate's perspective. Status changes are applied elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Owning account.
    pub user_id: UserId,
    pub items: Vec<CartLine>,
    pub total: Decimal,
    pub customer: OrderCustomer,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}
