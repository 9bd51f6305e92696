use std::str::FromStr;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::PgPool;
use sqlx::SqlitePool;

/// Connect to PostgreSQL and apply the embedded migrations.
pub async fn connect_postgres(url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .context("failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations/postgres")
        .run(&pool)
        .await
        .context("failed to run PostgreSQL migrations")?;

    tracing::info!(max_connections, database = "postgresql", "Database ready");
    Ok(pool)
}

/// Open (creating if needed) an SQLite database and apply the embedded
/// migrations.
///
/// `sqlite::memory:` databases live only as long as their connection, so
/// pooled connections are never recycled.
pub async fn connect_sqlite(url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid SQLite url {}", url))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to open SQLite database")?;

    sqlx::migrate!("./migrations/sqlite")
        .run(&pool)
        .await
        .context("failed to run SQLite migrations")?;

    tracing::info!(max_connections, database = "sqlite", "Database ready");
    Ok(pool)
}
