pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rest;
pub mod service;
pub mod state;
pub mod telemetry;

pub use rest::build_router;
pub use service::BucketService;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use jsonbuckets_core::{BucketStore, CredentialStore, JsonbucketsConfig};
use jsonbuckets_metadata::{
    create_sqlite_pool, run_migrations, SqliteBucketStore, SqliteCredentialStore,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

/// Startup failure before the server begins accepting requests.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Boots the jsonbuckets API stack: config, storage, router, listener.
pub async fn run_server() -> Result<(), BootError> {
    let config = JsonbucketsConfig::load()?;

    let pool = create_sqlite_pool(&config.database.url).await?;
    run_migrations(&pool).await?;
    info!(database = %config.database.url, "database ready");

    let credentials: Arc<dyn CredentialStore> = Arc::new(SqliteCredentialStore::new(pool.clone()));
    let buckets: Arc<dyn BucketStore> = Arc::new(SqliteBucketStore::new(pool));
    let state = AppState::new(credentials, buckets, config.rate_limits.clone());

    let app = rest::build_router(state);

    let addr: SocketAddr = config.api.bind_address.parse().map_err(|e| {
        BootError::Config(config::ConfigError::Message(format!(
            "invalid bind address `{}`: {e}",
            config.api.bind_address
        )))
    })?;

    info!("Starting jsonbuckets API server on {}", addr);
    let listener = TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("jsonbuckets API server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received CTRL+C signal, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        }
    }
}
