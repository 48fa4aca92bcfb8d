//! `SQLite` implementation of [`HistoryLog`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use knxbell_app::ports::HistoryLog;
use knxbell_domain::error::BridgeError;
use knxbell_domain::history::{HistorySample, HistorySnapshot};
use knxbell_domain::id::AccessoryId;
use knxbell_domain::time::UnixSeconds;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(HistorySample);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let status: Option<bool> = row.try_get("status")?;
        let time: Option<i64> = row.try_get("time")?;
        Ok(Self(HistorySample { status, time }))
    }
}

const INSERT: &str = r"
    INSERT INTO history_samples (accessory_id, status, time)
    VALUES (?, ?, ?)
";

const SELECT_BY_ACCESSORY: &str = r"
    SELECT status, time FROM history_samples
    WHERE accessory_id = ?
    ORDER BY id ASC
";

const DELETE_BEFORE: &str = "DELETE FROM history_samples WHERE time < ?";

/// `SQLite`-backed history log.
#[derive(Clone)]
pub struct SqliteHistoryLog {
    pool: SqlitePool,
}

impl SqliteHistoryLog {
    /// Create a new log using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Delete every sample older than `before`, returning how many went.
    ///
    /// Samples without a time are kept.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Storage`] if the delete fails.
    pub async fn purge_before(&self, before: UnixSeconds) -> Result<u64, BridgeError> {
        let result = sqlx::query(DELETE_BEFORE)
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        tracing::info!(before, deleted = result.rows_affected(), "purged history");
        Ok(result.rows_affected())
    }
}

impl HistoryLog for SqliteHistoryLog {
    async fn record(
        &self,
        accessory_id: AccessoryId,
        sample: HistorySample,
    ) -> Result<(), BridgeError> {
        sqlx::query(INSERT)
            .bind(accessory_id.as_uuid())
            .bind(sample.status)
            .bind(sample.time)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn snapshot(&self, accessory_id: AccessoryId) -> Result<HistorySnapshot, BridgeError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ACCESSORY)
            .bind(accessory_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(HistorySnapshot::from_samples(
            rows.into_iter().map(|w| w.0).collect(),
        ))
    }
}
