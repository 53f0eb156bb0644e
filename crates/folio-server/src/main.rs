//! Folio Server - Main entry point

use anyhow::Result;
use folio_common::logging::{init_logging, LogConfig};
use tracing::info;

use folio_server::{
    api,
    config::Config,
    db,
    features::FeatureState,
    storage::{config::StorageConfig, Storage},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults for development; environment variables take precedence
    let log_config = LogConfig::builder()
        .log_file_prefix("folio-server".to_string())
        .filter_directives("folio_server=debug,tower_http=debug,sqlx=info".to_string())
        .build();
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    let _log_guard = init_logging(&log_config)?;

    info!("Starting Folio Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let db = db::create_pool(&config.database).await?;
    info!("Database connection pool established");

    sqlx::migrate!("../../migrations")
        .run(&db)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    info!("Database migrations completed");

    let storage_config = StorageConfig::from_env()?;
    let storage = Storage::new(storage_config);
    info!("Storage client initialized");

    let state = FeatureState {
        db,
        storage,
        auth: config.auth.clone(),
    };

    api::serve(&config, state).await
}
