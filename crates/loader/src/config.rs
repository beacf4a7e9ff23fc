use rawseed_core::batch::{validate_chunk_size, DEFAULT_CHUNK_SIZE};
use rawseed_core::environment::Environment;
use rawseed_core::error::CoreError;
use rawseed_core::generate::{GenerationOptions, DEFAULT_AVG_ORDERS, DEFAULT_CUSTOMERS};
use rawseed_core::models::customer::CUSTOMER_COLUMNS;
use rawseed_core::models::order::ORDER_COLUMNS;
use rawseed_db::{ConnectionSettings, PgConnectOptions, PgSslMode};

/// Loader configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub environment: Environment,
    pub connection: ConnectionSettings,
    pub generation: GenerationOptions,
    /// Rows per INSERT statement.
    pub batch_size: usize,
}

impl LoaderConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var              | Default                         |
    /// |----------------------|---------------------------------|
    /// | `ENV`                | `dev`                           |
    /// | `WAREHOUSE_HOST`     | `localhost`                     |
    /// | `WAREHOUSE_PORT`     | `5432`                          |
    /// | `WAREHOUSE_USER`     | required                        |
    /// | `WAREHOUSE_PASSWORD` | required                        |
    /// | `WAREHOUSE_ROLE`     | `<env>_role` (empty disables)   |
    /// | `WAREHOUSE_ADMIN_DB` | unset (database must exist)     |
    /// | `WAREHOUSE_SSL`      | `prefer`                        |
    /// | `N_CUSTOMERS`        | `1000`                          |
    /// | `AVG_ORDERS`         | `5`                             |
    /// | `BATCH_SIZE`         | `1000`                          |
    /// | `RNG_SEED`           | unset (random)                  |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| CoreError::Config(format!("{key} must be set")))
        };

        let environment: Environment = match var("ENV") {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };

        // An explicitly empty role turns off SET ROLE.
        let role = match lookup("WAREHOUSE_ROLE") {
            Some(role) if role.trim().is_empty() => None,
            Some(role) => Some(role.trim().to_string()),
            None => Some(environment.default_role()),
        };

        let ssl_mode: PgSslMode = match var("WAREHOUSE_SSL") {
            Some(raw) => raw
                .parse()
                .map_err(|_| CoreError::Config(format!("WAREHOUSE_SSL: invalid mode '{raw}'")))?,
            None => PgSslMode::Prefer,
        };

        let host = var("WAREHOUSE_HOST").unwrap_or_else(|| "localhost".into());
        let server = PgConnectOptions::new()
            .host(&host)
            .port(parse_or(&var, "WAREHOUSE_PORT", 5432)?)
            .username(&required("WAREHOUSE_USER")?)
            .password(&required("WAREHOUSE_PASSWORD")?)
            .ssl_mode(ssl_mode);

        let connection = ConnectionSettings {
            server,
            database: environment.database(),
            role,
            admin_database: var("WAREHOUSE_ADMIN_DB"),
        };

        let generation = GenerationOptions {
            customers: parse_or(&var, "N_CUSTOMERS", DEFAULT_CUSTOMERS)?,
            avg_orders: parse_or(&var, "AVG_ORDERS", DEFAULT_AVG_ORDERS)?,
            seed: var("RNG_SEED").map(|raw| parse("RNG_SEED", &raw)).transpose()?,
        };

        let batch_size = parse_or(&var, "BATCH_SIZE", DEFAULT_CHUNK_SIZE)?;
        let widest = CUSTOMER_COLUMNS.len().max(ORDER_COLUMNS.len());
        validate_chunk_size(batch_size, widest)
            .map_err(|e| CoreError::Config(format!("BATCH_SIZE: {e}")))?;

        Ok(Self {
            environment,
            connection,
            generation,
            batch_size,
        })
    }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, CoreError> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::Config(format!("{key} must be a number, got '{raw}'")))
}

fn parse_or<T, V>(var: &V, key: &str, default: T) -> Result<T, CoreError>
where
    T: std::str::FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}
