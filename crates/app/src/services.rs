//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod classifier;
pub mod doorbell_service;
pub mod registry;

pub use classifier::{Classification, EventClassifier};
pub use doorbell_service::DoorbellService;
pub use registry::DoorbellRegistry;
