//! # knxbell-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `BusTransport`: subscribe to datapoint changes, issue group writes
//!   - `HistoryLog`: append & snapshot contact samples
//!   - `EventPublisher`: publish accessory events
//! - Define **driving/inbound ports** as use-case structs:
//!   - `EventClassifier`: map channel edges to presses and contact writes
//!   - `DoorbellService`: live contact state, history, statistics
//!   - `DoorbellRegistry`: route bus changes to every listening doorbell
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `knxbell-domain` only (plus `tokio` for channels and the
//! dispatch task). Never imports adapter crates.

pub mod event_bus;
pub mod ports;
pub mod services;
