//! History log port: append-only contact samples per accessory.

use std::future::Future;

use knxbell_domain::error::BridgeError;
use knxbell_domain::history::{HistorySample, HistorySnapshot};
use knxbell_domain::id::AccessoryId;

/// Durable, append-only log of contact samples.
///
/// Retention and storage medium belong to the implementation. A failed
/// read must surface as an error, never as an empty snapshot.
pub trait HistoryLog {
    /// Append one sample to the accessory's log.
    fn record(
        &self,
        accessory_id: AccessoryId,
        sample: HistorySample,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// The full log of an accessory in recording order.
    fn snapshot(
        &self,
        accessory_id: AccessoryId,
    ) -> impl Future<Output = Result<HistorySnapshot, BridgeError>> + Send;
}

impl<T: HistoryLog + Send + Sync> HistoryLog for std::sync::Arc<T> {
    fn record(
        &self,
        accessory_id: AccessoryId,
        sample: HistorySample,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).record(accessory_id, sample)
    }

    fn snapshot(
        &self,
        accessory_id: AccessoryId,
    ) -> impl Future<Output = Result<HistorySnapshot, BridgeError>> + Send {
        (**self).snapshot(accessory_id)
    }
}
