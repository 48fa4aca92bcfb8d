//! # knxbelld: knxbell daemon
//!
//! Composition root that wires all adapters together and starts the bridge.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Pick the history backend: `SQLite` (migrations, optional retention purge)
//!   or in-memory
//! - Build one doorbell per complete device entry and register them
//! - Spawn the dispatch task on a bus subscription
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use knxbell_adapter_http_axum::router;
use knxbell_adapter_http_axum::state::AppState;
use knxbell_adapter_storage_sqlite_sqlx::{Config as StorageConfig, SqliteHistoryLog};
use knxbell_adapter_virtual::{InMemoryHistoryLog, VirtualBus};
use knxbell_app::event_bus::InProcessEventBus;
use knxbell_app::ports::{BusTransport, HistoryLog};
use knxbell_app::services::DoorbellRegistry;
use knxbell_domain::accessory::Doorbell;
use knxbell_domain::time::{now, unix_seconds};

use crate::config::{Config, HistoryBackend};

const SECONDS_PER_DAY: i64 = 86_400;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let doorbells = config.doorbells()?;
    if doorbells.is_empty() {
        tracing::warn!("no doorbell configured");
    }

    let bus = Arc::new(VirtualBus::default());
    let event_bus = Arc::new(InProcessEventBus::new(256));

    match config.history_backend()? {
        HistoryBackend::Sqlite => {
            let db = StorageConfig {
                database_url: config.database_url().to_string(),
            }
            .build()
            .await?;
            let history = SqliteHistoryLog::new(db.pool().clone());
            if let Some(days) = config.history.retention_days {
                let cutoff = unix_seconds(now()) - i64::from(days) * SECONDS_PER_DAY;
                history.purge_before(cutoff).await?;
            }
            serve(&config, doorbells, history, bus, event_bus).await
        }
        HistoryBackend::Memory => {
            let history = Arc::new(InMemoryHistoryLog::new());
            serve(&config, doorbells, history, bus, event_bus).await
        }
    }
}

async fn serve<H>(
    config: &Config,
    doorbells: Vec<Doorbell>,
    history: H,
    bus: Arc<VirtualBus>,
    event_bus: Arc<InProcessEventBus>,
) -> Result<(), Box<dyn std::error::Error>>
where
    H: HistoryLog + Clone + Send + Sync + 'static,
{
    let registry = Arc::new(DoorbellRegistry::new(
        doorbells,
        history,
        Arc::clone(&event_bus),
    )?);
    tracing::info!(
        doorbells = registry.len(),
        addresses = registry.addresses().len(),
        "registry ready"
    );

    let dispatch = Arc::clone(&registry).spawn(bus.subscribe());

    let state = AppState::from_arcs(registry, Arc::clone(&bus), event_bus);
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "knxbelld listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    bus.shutdown();
    dispatch.abort();
    tracing::info!("knxbelld stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
