/// Warehouse identifiers are BIGINT; generated ids start at 1.
pub type RowId = i64;

/// Signup and order dates carry no time component.
pub type Date = chrono::NaiveDate;
