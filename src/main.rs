//! Room Relay server binary.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use room_relay::adapters::http::{router, with_server_layers};
use room_relay::adapters::storage::build_store;
use room_relay::application::RoomHost;
use room_relay::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_tracing(&config);

    let store = build_store(&config.storage)
        .await
        .context("Failed to open durable store")?;
    let host = Arc::new(
        RoomHost::new(store, config.relay.mode())
            .with_hibernate_when_empty(config.relay.hibernate_when_empty),
    );

    let app = with_server_layers(router(host), &config.server);
    let addr = config.server.socket_addr()?;

    info!(
        %addr,
        backend = ?config.storage.backend,
        persist_messages = config.relay.persist_messages,
        envelope_mode = ?config.relay.envelope_mode,
        "Starting room relay"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error occurred")?;

    info!("Room relay stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolves when `signal` fires. A signal that cannot be installed never
/// resolves, so the server keeps running.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
