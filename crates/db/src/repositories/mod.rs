//! Per-table data access for the generated tables.

pub mod customer_repo;
pub mod order_repo;

pub use customer_repo::CustomerRepo;
pub use order_repo::OrderRepo;
