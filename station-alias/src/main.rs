use std::process::ExitCode;
use std::sync::Arc;

use station_alias::alias::AliasResolver;
use station_alias::auth::StaticCredentials;
use station_alias::config::{ConfigError, ServiceConfig};
use station_alias::store::{SqliteAliasStore, SqliteStoreConfig, StoreError};
use station_alias::web::{AppState, create_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Reasons the server fails to come up.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("alias store: {0}")]
    Store(#[from] StoreError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("failed to start: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServiceConfig::from_env()?;
    info!(?config, "loaded configuration");

    // Open the store and load the index (fail fast if unavailable)
    let store = SqliteAliasStore::open(&SqliteStoreConfig::new(&config.database_file))?;
    let resolver = AliasResolver::warm_start(Arc::new(store))?;
    info!("loaded {} station aliases", resolver.len());

    let gate = StaticCredentials::new(&config.username, &config.token);
    let state = AppState::new(resolver, gate, config.api_version.as_str());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Station alias server listening on http://{}", config.bind_addr);
    let v = &config.api_version;
    info!("  GET    /{v}/station-alias/{{pool_code}}/{{station_name}}");
    info!("  POST   /{v}/station-alias/{{pool_code}}/{{station_name}}/{{alias}}");
    info!("  PUT    /{v}/station-alias/{{pool_code}}/{{station_name}}/{{alias}}");
    info!("  DELETE /{v}/station-alias/{{pool_code}}/{{station_name}}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
