//! # knxbell-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Expose every doorbell accessory as JSON: identification, configured
//!   signals, live contact state and the four history-derived
//!   characteristics (`/api/accessories`, `/api/characteristics`, …)
//! - Accept contact overwrites and bus group writes
//! - Stream programmable-switch and contact events over SSE
//!   (`/api/events/stream`)
//!
//! ## Dependency rule
//! Depends on `knxbell-app` (for port traits and services) and `knxbell-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use knxbell_adapter_virtual::{InMemoryHistoryLog, VirtualBus};
    use knxbell_app::event_bus::InProcessEventBus;
    use knxbell_app::services::DoorbellRegistry;
    use knxbell_domain::accessory::Doorbell;

    use crate::state::AppState;

    pub(crate) type TestState = AppState<Arc<InMemoryHistoryLog>, VirtualBus>;

    pub(crate) fn front_door() -> Doorbell {
        Doorbell::builder()
            .name("Front Door")
            .single_press("1/0/1".parse().unwrap())
            .double_press("1/0/2".parse().unwrap())
            .build()
            .unwrap()
    }

    pub(crate) fn test_state(doorbells: Vec<Doorbell>) -> TestState {
        let event_bus = Arc::new(InProcessEventBus::new(16));
        let registry = DoorbellRegistry::new(
            doorbells,
            Arc::new(InMemoryHistoryLog::new()),
            Arc::clone(&event_bus),
        )
        .unwrap();
        AppState::from_arcs(
            Arc::new(registry),
            Arc::new(VirtualBus::default()),
            event_bus,
        )
    }
}
