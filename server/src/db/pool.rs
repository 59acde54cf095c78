//! PostgreSQL connection setup.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Type alias for the database pool.
pub type Pool = PgPool;

/// One editing session reads and writes a single row, so a small pool is
/// plenty.
const MAX_CONNECTIONS: u32 = 2;

/// Connect to the database and bring the `form_schemas` table up to date.
pub async fn connect(database_url: &str) -> Result<Pool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
