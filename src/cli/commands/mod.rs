pub mod migrate;
pub mod seed;
pub mod token;

use anyhow::Context;
use sqlx::PgPool;

use crate::config::config;
use crate::database::manager;

/// Pool for `DATABASE_URL`; the maintenance commands have no in-memory fallback.
pub(crate) async fn connect() -> anyhow::Result<PgPool> {
    let cfg = &config().database;
    if cfg.url.is_none() {
        anyhow::bail!("DATABASE_URL is not set");
    }
    manager::connect(cfg).await.context("failed to connect to the database")
}
