//! Repository for the `orders` table.

use sqlx::{Postgres, QueryBuilder};

use rawseed_core::environment::{Target, CUSTOMERS_TABLE, ORDERS_TABLE};
use rawseed_core::models::order::{Order, ORDER_COLUMNS};

use crate::schema::qualified;
use crate::DbPool;

/// Bulk writes and row counts for orders.
pub struct OrderRepo;

impl OrderRepo {
    fn table(target: &Target) -> String {
        qualified(&target.schema, ORDERS_TABLE)
    }

    /// Remove every row.
    pub async fn truncate(pool: &DbPool, target: &Target) -> Result<(), sqlx::Error> {
        let query = format!("TRUNCATE TABLE {}", Self::table(target));
        sqlx::query(&query).execute(pool).await?;
        Ok(())
    }

    /// Insert `rows` with a single multi-row `INSERT ... VALUES`.
    ///
    /// Status is stored as its upper-case name; the amount keeps scale 2.
    pub async fn insert_batch(
        pool: &DbPool,
        target: &Target,
        rows: &[Order],
    ) -> Result<u64, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) ",
            Self::table(target),
            ORDER_COLUMNS.join(", ")
        ));
        builder.push_values(rows, |mut row, order| {
            row.push_bind(order.order_id)
                .push_bind(order.customer_id)
                .push_bind(order.order_date)
                .push_bind(order.order_status.as_str())
                .push_bind(order.total_amount);
        });

        let result = builder.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn count(pool: &DbPool, target: &Target) -> Result<u64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {}", Self::table(target));
        let (count,): (i64,) = sqlx::query_as(&query).fetch_one(pool).await?;
        Ok(count.max(0) as u64)
    }

    pub async fn max_id(pool: &DbPool, target: &Target) -> Result<Option<i64>, sqlx::Error> {
        let query = format!("SELECT MAX(order_id) FROM {}", Self::table(target));
        let (max,): (Option<i64>,) = sqlx::query_as(&query).fetch_one(pool).await?;
        Ok(max)
    }

    /// Orders whose `customer_id` has no matching customer row.
    pub async fn count_orphans(pool: &DbPool, target: &Target) -> Result<u64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM {orders} o
             WHERE NOT EXISTS (
                 SELECT 1 FROM {customers} c WHERE c.customer_id = o.customer_id
             )",
            orders = Self::table(target),
            customers = qualified(&target.schema, CUSTOMERS_TABLE),
        );
        let (count,): (i64,) = sqlx::query_as(&query).fetch_one(pool).await?;
        Ok(count.max(0) as u64)
    }
}
