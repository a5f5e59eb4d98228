use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use deckwise::config::{self, CliArgs};
use deckwise::progress::ProgressTracker;
use deckwise::store::SqliteProgressStore;
use deckwise::{create_app, db, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    if std::fs::metadata(".env").is_ok() {
        dotenv::dotenv().ok();
    }

    let args = CliArgs::parse();
    let config = logging::with_startup_logging(|| config::get_config(args));
    let _log_guard = logging::init_tracing(&config)?;

    let pool = db::init_database(&config.database_url)
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    info!("Database ready at {}", config.database_url);

    let store = SqliteProgressStore::new(Arc::new(pool));
    let tracker = Arc::new(ProgressTracker::new(store).with_scope(config.fingerprint_scope));
    let app = create_app(tracker);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_address))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
