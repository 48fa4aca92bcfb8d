//! # knxbell-adapter-virtual
//!
//! In-process stand-ins for the outside world, used by tests and by the
//! daemon's demo mode.
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`VirtualBus`] | `BusTransport` | Tracks each group address, emits a change only when the value moves |
//! | [`InMemoryHistoryLog`] | `HistoryLog` | Per-accessory vectors, lost on restart |
//!
//! ## Dependency rule
//!
//! Depends on `knxbell-app` (port traits) and `knxbell-domain` only.

mod bus;
mod error;
mod history;

pub use bus::VirtualBus;
pub use error::BusError;
pub use history::InMemoryHistoryLog;
