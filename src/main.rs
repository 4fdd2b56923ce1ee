use anyhow::{bail, Context};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use shop_api_rust::app::{self, AppState};
use shop_api_rust::auth::Argon2Hasher;
use shop_api_rust::config::AppConfig;
use shop_api_rust::database::{manager, MemoryStore, PgStore, ResourceStore};
use shop_api_rust::is_production;
use shop_api_rust::storage::DiskAttachmentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shop_api_rust=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = shop_api_rust::config::config();
    tracing::info!("Starting Shop API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        bail!("JWT_SECRET must be set outside development");
    }

    let store = open_store(config).await?;

    tokio::fs::create_dir_all(&config.storage.uploads_dir)
        .await
        .with_context(|| format!("failed to create {}", config.storage.uploads_dir.display()))?;
    let attachments = DiskAttachmentStore::new(&config.storage.uploads_dir, config.storage.public_prefix.as_str());

    let state = AppState::new(
        store,
        Arc::new(attachments),
        Arc::new(Argon2Hasher),
        config.security.jwt_secret.as_str(),
        config.storage.clone(),
    );

    let mut router = app::router(state);
    if let Some(cors) = app::cors_layer(&config.security) {
        router = router.layer(cors);
    }

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Shop API listening on http://{}", bind_addr);

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ResourceStore>> {
    if config.database.url.is_none() {
        if is_production!() {
            bail!("DATABASE_URL is required in production");
        }
        tracing::warn!("DATABASE_URL not set, using the in-memory store; data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = manager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    if config.database.run_migrations {
        manager::migrate(&pool).await.context("failed to run migrations")?;
    }

    Ok(Arc::new(PgStore::new(pool)))
}
