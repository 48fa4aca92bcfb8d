//! Volatile history log keyed by accessory.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use knxbell_app::ports::HistoryLog;
use knxbell_domain::error::BridgeError;
use knxbell_domain::history::{HistorySample, HistorySnapshot};
use knxbell_domain::id::AccessoryId;

/// History log holding every sample in memory.
#[derive(Debug, Default)]
pub struct InMemoryHistoryLog {
    samples: Mutex<HashMap<AccessoryId, Vec<HistorySample>>>,
}

impl InMemoryHistoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of samples recorded for `accessory_id`.
    #[must_use]
    pub fn sample_count(&self, accessory_id: AccessoryId) -> usize {
        self.samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&accessory_id)
            .map_or(0, Vec::len)
    }
}

impl HistoryLog for InMemoryHistoryLog {
    fn record(
        &self,
        accessory_id: AccessoryId,
        sample: HistorySample,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        self.samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(accessory_id)
            .or_default()
            .push(sample);
        async { Ok(()) }
    }

    fn snapshot(
        &self,
        accessory_id: AccessoryId,
    ) -> impl Future<Output = Result<HistorySnapshot, BridgeError>> + Send {
        let samples = self
            .samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&accessory_id)
            .cloned()
            .unwrap_or_default();
        async move { Ok(HistorySnapshot::from_samples(samples)) }
    }
}
