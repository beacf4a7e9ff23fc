//! Connection setup against a live Postgres-compatible server: role
//! assumption and on-demand database creation.
//!
//! Run with `DATABASE_URL` set and `--ignored`. The connecting user must be
//! allowed to create roles and databases.

use sqlx::PgPool;

use rawseed_db::{create_pool, ensure_database, ConnectionSettings};

/// Settings that reuse the test server and credentials.
fn settings_for(
    pool: &PgPool,
    database: &str,
    role: Option<&str>,
    admin_database: Option<&str>,
) -> ConnectionSettings {
    ConnectionSettings {
        server: (*pool.connect_options()).clone(),
        database: database.to_string(),
        role: role.map(str::to_string),
        admin_database: admin_database.map(str::to_string),
    }
}

fn test_database(pool: &PgPool) -> String {
    pool.connect_options()
        .get_database()
        .expect("sqlx::test pools name their database")
        .to_string()
}

async fn recreate_role(pool: &PgPool, role: &str, attributes: &str) {
    sqlx::query(&format!("DROP ROLE IF EXISTS \"{role}\""))
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(&format!("CREATE ROLE \"{role}\" {attributes}"))
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(&format!("GRANT \"{role}\" TO CURRENT_USER"))
        .execute(pool)
        .await
        .unwrap();
}

async fn drop_role(pool: &PgPool, role: &str) {
    sqlx::query(&format!("DROP ROLE IF EXISTS \"{role}\""))
        .execute(pool)
        .await
        .unwrap();
}

async fn drop_database(pool: &PgPool, database: &str) {
    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{database}\" WITH (FORCE)"))
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL"]
async fn pool_connections_assume_configured_role(pool: PgPool) {
    let role = "rawseed_pool_role";
    recreate_role(&pool, role, "").await;

    let settings = settings_for(&pool, &test_database(&pool), Some(role), None);
    let role_pool = create_pool(&settings).await.unwrap();
    rawseed_db::health_check(&role_pool).await.unwrap();

    let (current,): (String,) = sqlx::query_as("SELECT current_user::text")
        .fetch_one(&role_pool)
        .await
        .unwrap();
    assert_eq!(current, role);

    role_pool.close().await;
    drop_role(&pool, role).await;
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL"]
async fn pool_without_role_keeps_login_user(pool: PgPool) {
    let (login,): (String,) = sqlx::query_as("SELECT session_user::text")
        .fetch_one(&pool)
        .await
        .unwrap();

    let settings = settings_for(&pool, &test_database(&pool), None, None);
    let plain_pool = create_pool(&settings).await.unwrap();
    let (current,): (String,) = sqlx::query_as("SELECT current_user::text")
        .fetch_one(&plain_pool)
        .await
        .unwrap();
    assert_eq!(current, login);

    plain_pool.close().await;
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL"]
async fn ensure_database_creates_only_once(pool: PgPool) {
    let database = "rawseed_ensure_once";
    drop_database(&pool, database).await;

    let settings = settings_for(&pool, database, None, Some(&test_database(&pool)));
    assert!(ensure_database(&settings).await.unwrap());
    assert!(!ensure_database(&settings).await.unwrap());

    let created_pool = create_pool(&settings).await.unwrap();
    rawseed_db::health_check(&created_pool).await.unwrap();
    created_pool.close().await;

    drop_database(&pool, database).await;
}

#[sqlx::test(migrations = false)]
#[ignore = "needs DATABASE_URL"]
async fn created_database_is_owned_by_configured_role(pool: PgPool) {
    let role = "rawseed_owner_role";
    let database = "rawseed_owned_by_role";
    drop_database(&pool, database).await;
    recreate_role(&pool, role, "CREATEDB").await;

    let settings = settings_for(&pool, database, Some(role), Some(&test_database(&pool)));
    assert!(ensure_database(&settings).await.unwrap());

    let (owner,): (String,) = sqlx::query_as(
        "SELECT pg_get_userbyid(datdba)::text FROM pg_database WHERE datname = $1",
    )
    .bind(database)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(owner, role);

    drop_database(&pool, database).await;
    drop_role(&pool, role).await;
}

#[tokio::test]
async fn ensure_database_without_admin_database_does_nothing() {
    // Never connects, so the unreachable host is irrelevant.
    let settings = ConnectionSettings {
        server: sqlx::postgres::PgConnectOptions::new()
            .host("unreachable.invalid")
            .username("loader"),
        database: "dev_db".to_string(),
        role: None,
        admin_database: None,
    };
    assert!(!ensure_database(&settings).await.unwrap());
}
