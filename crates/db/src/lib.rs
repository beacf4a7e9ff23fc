use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection};

use rawseed_core::error::CoreError;

pub mod loader;
pub mod repositories;
pub mod schema;

pub use sqlx::postgres::{PgConnectOptions, PgSslMode};

pub type DbPool = sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Row count mismatch in {table}: generated {expected}, found {actual}")]
    CountMismatch {
        table: String,
        expected: u64,
        actual: u64,
    },
}

/// Where and as whom to connect.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Host, port, credentials and TLS mode. The database is chosen per
    /// connection.
    pub server: PgConnectOptions,
    /// Environment database, e.g. `dev_db`.
    pub database: String,
    /// Assumed with `SET ROLE` on every new connection, including the admin
    /// connection that creates `database`.
    pub role: Option<String>,
    /// Maintenance database used to create `database` when it is missing.
    pub admin_database: Option<String>,
}

impl ConnectionSettings {
    fn options_for(&self, database: &str) -> PgConnectOptions {
        self.server
            .clone()
            .database(database)
            .application_name("rawseed")
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        self.options_for(&self.database)
    }

    /// `SET ROLE` statement for the configured role, if any.
    pub fn set_role_sql(&self) -> Option<String> {
        self.role
            .as_deref()
            .map(|role| format!("SET ROLE {}", schema::quote_ident(role)))
    }
}

/// Create a single-connection pool against the environment database.
///
/// Statements run strictly one after another, so one connection is enough.
pub async fn create_pool(settings: &ConnectionSettings) -> Result<DbPool, sqlx::Error> {
    let set_role = settings.set_role_sql();

    PgPoolOptions::new()
        .max_connections(1)
        .after_connect(move |conn, _meta| {
            let set_role = set_role.clone();
            Box::pin(async move {
                if let Some(statement) = set_role {
                    sqlx::query(&statement).execute(&mut *conn).await?;
                }
                Ok(())
            })
        })
        .connect_with(settings.connect_options())
        .await
}

/// Create the environment database through the admin database if it does not
/// exist yet. Returns `true` when the database was created.
///
/// The configured role is assumed first, so it owns a newly created database.
/// A no-op returning `false` when no admin database is configured.
pub async fn ensure_database(settings: &ConnectionSettings) -> Result<bool, sqlx::Error> {
    let Some(admin_database) = settings.admin_database.as_deref() else {
        return Ok(false);
    };

    let mut conn = PgConnection::connect_with(&settings.options_for(admin_database)).await?;

    if let Some(statement) = settings.set_role_sql() {
        sqlx::query(&statement).execute(&mut conn).await?;
    }

    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&settings.database)
            .fetch_one(&mut conn)
            .await?;

    if !exists {
        let statement = format!("CREATE DATABASE {}", schema::quote_ident(&settings.database));
        sqlx::query(&statement).execute(&mut conn).await?;
        tracing::info!(database = %settings.database, "Created database");
    }

    conn.close().await?;
    Ok(!exists)
}

/// Verify the connection is usable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
