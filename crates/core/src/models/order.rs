//! Order record and its status enumeration.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, RowId};

/// Column list for `raw.orders`, in insert order.
pub const ORDER_COLUMNS: [&str; 5] = [
    "order_id",
    "customer_id",
    "order_date",
    "order_status",
    "total_amount",
];

// ---------------------------------------------------------------------------
// Order status
// ---------------------------------------------------------------------------

/// Lifecycle status stamped on a generated order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in the order the generator picks from.
    pub const ALL: [OrderStatus; 4] = [
        Self::Placed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Value stored in the `order_status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "PLACED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown order status: '{s}'. Valid statuses: {}",
                    Self::ALL.map(Self::as_str).join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Order row
// ---------------------------------------------------------------------------

/// A row destined for the `orders` table.
///
/// `customer_id` is not enforced by the warehouse; the generator only ever
/// emits ids of customers generated in the same run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub order_id: RowId,
    pub customer_id: RowId,
    pub order_date: Date,
    pub order_status: OrderStatus,
    /// Scale is always 2.
    pub total_amount: Decimal,
}
