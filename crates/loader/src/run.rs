//! One end-to-end run: connect, bootstrap, generate, load, verify.

use anyhow::Context;
use chrono::NaiveDate;

use rawseed_core::batch::LoadSummary;
use rawseed_core::environment::Target;
use rawseed_core::error::CoreError;
use rawseed_core::generate::{check_references, Dataset, GenerationOptions};
use rawseed_db::{loader, schema};

use crate::config::LoaderConfig;

/// Generate the dataset and confirm every order points at a generated
/// customer.
pub fn prepare_dataset(
    options: &GenerationOptions,
    today: NaiveDate,
) -> Result<Dataset, CoreError> {
    let dataset = Dataset::generate(options, today)?;
    check_references(&dataset.customers, &dataset.orders)?;
    Ok(dataset)
}

/// Execute the full load against the configured warehouse.
///
/// Any connector or SQL error aborts the run; nothing is retried.
pub async fn run(config: &LoaderConfig, today: NaiveDate) -> anyhow::Result<LoadSummary> {
    let settings = &config.connection;
    let target = Target {
        database: settings.database.clone(),
        ..config.environment.target()
    };

    if rawseed_db::ensure_database(settings)
        .await
        .with_context(|| format!("Failed to ensure database {}", settings.database))?
    {
        tracing::info!(database = %settings.database, "Database did not exist and was created");
    }

    let pool = rawseed_db::create_pool(settings).await.with_context(|| {
        format!(
            "Failed to connect to {}:{}/{}",
            settings.server.get_host(),
            settings.server.get_port(),
            settings.database
        )
    })?;
    rawseed_db::health_check(&pool)
        .await
        .context("Warehouse health check failed")?;
    tracing::info!(
        environment = %config.environment,
        host = settings.server.get_host(),
        database = %settings.database,
        role = settings.role.as_deref().unwrap_or("-"),
        "Connected to warehouse"
    );

    schema::bootstrap(&pool, &target)
        .await
        .context("Failed to bootstrap schema")?;

    let dataset = prepare_dataset(&config.generation, today)?;
    tracing::info!(
        customers = dataset.customers.len(),
        orders = dataset.orders.len(),
        seed = ?config.generation.seed,
        "Generated dataset"
    );

    loader::reset_tables(&pool, &target)
        .await
        .context("Failed to truncate target tables")?;
    loader::load_customers(&pool, &target, &dataset.customers, config.batch_size)
        .await
        .context("Failed to load customers")?;
    loader::load_orders(&pool, &target, &dataset.orders, config.batch_size)
        .await
        .context("Failed to load orders")?;

    let generated_customers = dataset.customers.len() as u64;
    let generated_orders = dataset.orders.len() as u64;
    loader::verify_counts(&pool, &target, generated_customers, generated_orders).await?;

    pool.close().await;

    Ok(LoadSummary {
        customers: generated_customers,
        orders: generated_orders,
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn prepared_dataset_has_requested_customers() {
        let options = GenerationOptions {
            customers: 75,
            avg_orders: 4,
            seed: Some(11),
        };
        let dataset = prepare_dataset(&options, today()).unwrap();

        assert_eq!(dataset.customers.len(), 75);
        assert!(dataset
            .orders
            .iter()
            .all(|o| (1..=75).contains(&o.customer_id)));
    }

    #[test]
    fn prepared_dataset_is_reproducible_with_seed() {
        let options = GenerationOptions {
            customers: 20,
            avg_orders: 5,
            seed: Some(99),
        };
        assert_eq!(
            prepare_dataset(&options, today()).unwrap(),
            prepare_dataset(&options, today()).unwrap()
        );
    }
}
