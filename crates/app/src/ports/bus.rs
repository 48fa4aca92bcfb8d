//! Bus transport port: datapoint change notifications and group writes.

use std::future::Future;

use tokio::sync::broadcast;

use knxbell_domain::error::BridgeError;
use knxbell_domain::group_address::GroupAddress;

/// A binary datapoint changed value on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatapointChange {
    pub address: GroupAddress,
    /// `None` when the datapoint had no known value before.
    pub old_value: Option<bool>,
    pub new_value: bool,
}

/// Connection to the building-automation bus.
///
/// Framing, reconnection and datapoint decoding are the transport's
/// business; the core only sees decoded binary changes.
pub trait BusTransport {
    /// Subscribe to every binary change seen from now on.
    ///
    /// Dropping the receiver ends the subscription.
    fn subscribe(&self) -> broadcast::Receiver<DatapointChange>;

    /// Issue a group write of `value` to `address`.
    fn write(
        &self,
        address: GroupAddress,
        value: bool,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: BusTransport + Send + Sync> BusTransport for std::sync::Arc<T> {
    fn subscribe(&self) -> broadcast::Receiver<DatapointChange> {
        (**self).subscribe()
    }

    fn write(
        &self,
        address: GroupAddress,
        value: bool,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).write(address, value)
    }
}
