use knxbell_domain::error::BridgeError;

/// Errors raised by the virtual bus.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("bus is shut down")]
    ShutDown,
}

impl From<BusError> for BridgeError {
    fn from(err: BusError) -> Self {
        BridgeError::Transport(Box::new(err))
    }
}
