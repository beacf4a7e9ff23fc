//! Customer record.

use serde::Serialize;

use crate::types::{Date, RowId};

/// Column list for `raw.customers`, in insert order.
pub const CUSTOMER_COLUMNS: [&str; 5] = [
    "customer_id",
    "first_name",
    "last_name",
    "email",
    "signup_date",
];

/// A row destined for the `customers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub customer_id: RowId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub signup_date: Date,
}
