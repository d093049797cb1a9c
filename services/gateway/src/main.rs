mod error;
mod handlers;
mod models;
mod persist;
mod router;
mod settings;
mod state;

use rate_engine::QuoteEngine;
use rate_persistence::ledger::{LedgerConfig, NdjsonLedger};
use rate_persistence::snapshot::FsSnapshotStore;
use router::create_router;
use settings::AppConfig;
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting Rate Engine gateway");

    let config = AppConfig::load()?;
    tracing::info!(
        version = %config.pricing.version,
        base_rate = config.pricing.base_rate,
        km_factor = config.pricing.distance_coefficient,
        min_rate = config.pricing.min_rate,
        max_rate = config.pricing.max_rate,
        "Pricing parameters loaded"
    );

    // Storage collaborators
    let snapshots = Arc::new(FsSnapshotStore::new(&config.storage.snapshot_dir));
    let ledger = Arc::new(NdjsonLedger::new(LedgerConfig::new(&config.storage.ledger_path)));
    tracing::info!(
        snapshot_dir = %config.storage.snapshot_dir.display(),
        ledger = %config.storage.ledger_path.display(),
        "Audit storage configured"
    );

    let engine = QuoteEngine::new(snapshots, ledger);
    let state = AppState::new(engine, config.pricing);

    // Create router
    let app = create_router(state, config.server.body_timeout);

    // Bind and serve
    let addr = config.server.bind_addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
