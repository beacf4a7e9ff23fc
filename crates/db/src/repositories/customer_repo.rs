//! Repository for the `customers` table.

use sqlx::{Postgres, QueryBuilder};

use rawseed_core::environment::{Target, CUSTOMERS_TABLE};
use rawseed_core::models::customer::{Customer, CUSTOMER_COLUMNS};

use crate::schema::qualified;
use crate::DbPool;

/// Bulk writes and row counts for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    fn table(target: &Target) -> String {
        qualified(&target.schema, CUSTOMERS_TABLE)
    }

    /// Remove every row.
    pub async fn truncate(pool: &DbPool, target: &Target) -> Result<(), sqlx::Error> {
        let query = format!("TRUNCATE TABLE {}", Self::table(target));
        sqlx::query(&query).execute(pool).await?;
        Ok(())
    }

    /// Insert `rows` with a single multi-row `INSERT ... VALUES`.
    ///
    /// `rows` must be non-empty and small enough to stay under the
    /// bind-parameter limit. Returns the number of rows inserted.
    pub async fn insert_batch(
        pool: &DbPool,
        target: &Target,
        rows: &[Customer],
    ) -> Result<u64, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) ",
            Self::table(target),
            CUSTOMER_COLUMNS.join(", ")
        ));
        builder.push_values(rows, |mut row, customer| {
            row.push_bind(customer.customer_id)
                .push_bind(&customer.first_name)
                .push_bind(&customer.last_name)
                .push_bind(&customer.email)
                .push_bind(customer.signup_date);
        });

        let result = builder.build().execute(pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn count(pool: &DbPool, target: &Target) -> Result<u64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {}", Self::table(target));
        let (count,): (i64,) = sqlx::query_as(&query).fetch_one(pool).await?;
        Ok(count.max(0) as u64)
    }

    /// Highest customer id, or `None` when the table is empty.
    pub async fn max_id(pool: &DbPool, target: &Target) -> Result<Option<i64>, sqlx::Error> {
        let query = format!("SELECT MAX(customer_id) FROM {}", Self::table(target));
        let (max,): (Option<i64>,) = sqlx::query_as(&query).fetch_one(pool).await?;
        Ok(max)
    }
}
