use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use super::store::StoreError;
use crate::config::DatabaseConfig;

/// Open the connection pool described by `cfg`.
pub async fn connect(cfg: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let url = cfg
        .url
        .as_deref()
        .ok_or_else(|| StoreError::Unavailable("DATABASE_URL is not set".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.connection_timeout))
        .connect(url)
        .await?;

    info!(max_connections = cfg.max_connections, "Created database pool");
    Ok(pool)
}

/// Apply the bundled SQL migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
