//! Shared application state for axum handlers.

use std::sync::Arc;

use knxbell_app::event_bus::InProcessEventBus;
use knxbell_app::ports::{BusTransport, HistoryLog};
use knxbell_app::services::DoorbellRegistry;

/// The registry as wired by the daemon: every doorbell publishes to the
/// in-process event bus.
pub type Registry<H> = DoorbellRegistry<H, Arc<InProcessEventBus>>;

/// Application state shared across all axum handlers.
///
/// Generic over the history log and bus transport to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<H, B> {
    /// Every configured doorbell.
    pub registry: Arc<Registry<H>>,
    /// Bus used for group writes.
    pub bus: Arc<B>,
    /// Event bus feeding the SSE stream.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<H, B> Clone for AppState<H, B> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            bus: Arc::clone(&self.bus),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<H, B> AppState<H, B>
where
    H: HistoryLog + Send + Sync + 'static,
    B: BusTransport + Send + Sync + 'static,
{
    /// Create a new application state from pre-wrapped `Arc`s.
    ///
    /// The registry is shared with the dispatch task, hence the `Arc`.
    pub fn from_arcs(
        registry: Arc<Registry<H>>,
        bus: Arc<B>,
        event_bus: Arc<InProcessEventBus>,
    ) -> Self {
        Self {
            registry,
            bus,
            event_bus,
        }
    }
}
