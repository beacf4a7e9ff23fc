//! Idempotent bootstrap of the `raw` schema and its two tables.
//!
//! DDL is built by plain functions so the statement text can be checked
//! without a live warehouse.

use rawseed_core::environment::{Target, CUSTOMERS_TABLE, ORDERS_TABLE};

use crate::DbPool;

/// Double-quote an identifier, escaping embedded quotes.
///
/// Quoting matters on Redshift, where `raw` is a reserved word.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// `"schema"."table"`.
pub fn qualified(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

pub fn create_schema_sql(target: &Target) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(&target.schema))
}

pub fn create_customers_sql(target: &Target) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            customer_id BIGINT,
            first_name VARCHAR(256),
            last_name VARCHAR(256),
            email VARCHAR(256),
            signup_date DATE
        )",
        qualified(&target.schema, CUSTOMERS_TABLE)
    )
}

pub fn create_orders_sql(target: &Target) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            order_id BIGINT,
            customer_id BIGINT,
            order_date DATE,
            order_status VARCHAR(32),
            total_amount NUMERIC(10, 2)
        )",
        qualified(&target.schema, ORDERS_TABLE)
    )
}

/// Statements in the order they must run.
pub fn bootstrap_statements(target: &Target) -> [String; 3] {
    [
        create_schema_sql(target),
        create_customers_sql(target),
        create_orders_sql(target),
    ]
}

/// Create the schema and both tables if they are missing.
pub async fn bootstrap(pool: &DbPool, target: &Target) -> Result<(), sqlx::Error> {
    for statement in bootstrap_statements(target) {
        sqlx::query(&statement).execute(pool).await?;
    }
    tracing::info!(schema = %target, "Schema bootstrapped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rawseed_core::environment::Environment;

    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("raw"), "\"raw\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(qualified("raw", "orders"), "\"raw\".\"orders\"");
    }

    #[test]
    fn schema_is_created_before_tables() {
        let statements = bootstrap_statements(&Environment::Dev.target());
        assert_eq!(statements[0], "CREATE SCHEMA IF NOT EXISTS \"raw\"");
        assert!(statements[1].contains("\"raw\".\"customers\""));
        assert!(statements[2].contains("\"raw\".\"orders\""));
    }

    #[test]
    fn ddl_is_idempotent() {
        for statement in bootstrap_statements(&Environment::Prod.target()) {
            assert!(statement.contains("IF NOT EXISTS"), "{statement}");
        }
    }

    #[test]
    fn orders_amount_has_two_fraction_digits() {
        let sql = create_orders_sql(&Environment::Dev.target());
        assert!(sql.contains("total_amount NUMERIC(10, 2)"));
    }
}
