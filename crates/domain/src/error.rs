//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! via `From` when crossing a port boundary.

/// Top-level error returned by every port and service.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The history log could not be read or written.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The bus transport failed.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("single-press address is required")]
    MissingSinglePress,

    #[error("group address must not be empty")]
    EmptyGroupAddress,

    #[error("invalid group address: {0}")]
    InvalidGroupAddress(String),

    #[error("invalid accessory id: {0}")]
    InvalidAccessoryId(String),

    #[error("duplicate accessory: {0}")]
    DuplicateAccessory(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
