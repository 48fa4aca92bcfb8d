//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod bus;
pub mod event_bus;
pub mod history_log;

pub use bus::{BusTransport, DatapointChange};
pub use event_bus::EventPublisher;
pub use history_log::HistoryLog;
