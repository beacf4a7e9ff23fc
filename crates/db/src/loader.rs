//! Truncate-then-insert loading of a generated dataset.
//!
//! Rows go out in chunks of at most `chunk_size`, one `INSERT` per chunk,
//! strictly in sequence. An empty input issues no statements.

use rawseed_core::batch::ChunkPlan;
use rawseed_core::environment::{Target, CUSTOMERS_TABLE, ORDERS_TABLE};
use rawseed_core::models::customer::{Customer, CUSTOMER_COLUMNS};
use rawseed_core::models::order::{Order, ORDER_COLUMNS};

use crate::repositories::{CustomerRepo, OrderRepo};
use crate::{DbError, DbPool};

/// Empty both tables, customers first.
pub async fn reset_tables(pool: &DbPool, target: &Target) -> Result<(), DbError> {
    CustomerRepo::truncate(pool, target).await?;
    OrderRepo::truncate(pool, target).await?;
    tracing::info!(schema = %target, "Truncated target tables");
    Ok(())
}

pub async fn load_customers(
    pool: &DbPool,
    target: &Target,
    rows: &[Customer],
    chunk_size: usize,
) -> Result<u64, DbError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let plan = ChunkPlan::new(rows.len(), chunk_size, CUSTOMER_COLUMNS.len())?;
    let mut inserted = 0;
    for (index, range) in plan.ranges().enumerate() {
        inserted += CustomerRepo::insert_batch(pool, target, &rows[range]).await?;
        tracing::debug!(
            table = CUSTOMERS_TABLE,
            chunk = index + 1,
            of = plan.chunk_count(),
            "Inserted chunk"
        );
    }

    check_inserted(target.customers_table(), rows.len(), inserted)?;

    tracing::info!(
        table = CUSTOMERS_TABLE,
        rows = inserted,
        chunks = plan.chunk_count(),
        "Loaded table"
    );
    Ok(inserted)
}

pub async fn load_orders(
    pool: &DbPool,
    target: &Target,
    rows: &[Order],
    chunk_size: usize,
) -> Result<u64, DbError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let plan = ChunkPlan::new(rows.len(), chunk_size, ORDER_COLUMNS.len())?;
    let mut inserted = 0;
    for (index, range) in plan.ranges().enumerate() {
        inserted += OrderRepo::insert_batch(pool, target, &rows[range]).await?;
        tracing::debug!(
            table = ORDERS_TABLE,
            chunk = index + 1,
            of = plan.chunk_count(),
            "Inserted chunk"
        );
    }

    check_inserted(target.orders_table(), rows.len(), inserted)?;

    tracing::info!(
        table = ORDERS_TABLE,
        rows = inserted,
        chunks = plan.chunk_count(),
        "Loaded table"
    );
    Ok(inserted)
}

/// The warehouse may accept an INSERT yet store fewer rows (rules,
/// triggers), so the affected-row total must equal the input length.
fn check_inserted(table: String, expected: usize, inserted: u64) -> Result<(), DbError> {
    let expected = expected as u64;
    if inserted != expected {
        return Err(DbError::CountMismatch {
            table,
            expected,
            actual: inserted,
        });
    }
    Ok(())
}

/// Compare table row counts with what was generated.
pub async fn verify_counts(
    pool: &DbPool,
    target: &Target,
    expected_customers: u64,
    expected_orders: u64,
) -> Result<(), DbError> {
    let customers = CustomerRepo::count(pool, target).await?;
    if customers != expected_customers {
        return Err(DbError::CountMismatch {
            table: target.customers_table(),
            expected: expected_customers,
            actual: customers,
        });
    }

    let orders = OrderRepo::count(pool, target).await?;
    if orders != expected_orders {
        return Err(DbError::CountMismatch {
            table: target.orders_table(),
            expected: expected_orders,
            actual: orders,
        });
    }

    Ok(())
}
