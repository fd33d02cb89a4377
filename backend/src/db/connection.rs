use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Builds the process-wide connection pool. Created once at startup and
/// cloned into every handler; clones share the same underlying connections.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await?;
    Ok(pool)
}
