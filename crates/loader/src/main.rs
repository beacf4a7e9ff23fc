use anyhow::Context;

use rawseed::config::LoaderConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    rawseed::telemetry::init();

    let config = LoaderConfig::from_env().context("Failed to load configuration")?;
    let today = chrono::Utc::now().date_naive();

    let summary = rawseed::run::run(&config, today).await?;
    println!("{summary}");
    Ok(())
}
