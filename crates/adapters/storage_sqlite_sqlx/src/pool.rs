//! Opening the history database.
//!
//! The history log is append-heavy with occasional concurrent snapshot
//! reads from HTTP handlers, so file databases run in WAL mode and writers
//! wait on a busy lock instead of failing.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::error::StorageError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const MAX_CONNECTIONS: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the history database lives.
pub struct Config {
    /// `SQLite` connection URL, e.g. `sqlite:knxbell.db?mode=rwc` or
    /// `sqlite::memory:`.
    pub database_url: String,
}

impl Config {
    /// Open the pool and bring the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] for a malformed URL or a failed
    /// connection, and [`StorageError::Migration`] if the schema cannot be
    /// migrated.
    pub async fn build(self) -> Result<Database, StorageError> {
        let options = SqliteConnectOptions::from_str(&self.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;
        tracing::info!(
            database_url = %self.database_url,
            migrations = MIGRATOR.iter().count(),
            "history database ready"
        );

        Ok(Database { pool })
    }
}

/// An open history database.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> Database {
        Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn should_create_only_the_history_table() {
        let db = memory_db().await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(names, vec!["history_samples"]);
    }

    #[tokio::test]
    async fn should_share_memory_database_between_connections() {
        let db = memory_db().await;
        let mut writer = db.pool().acquire().await.unwrap();
        let mut reader = db.pool().acquire().await.unwrap();

        sqlx::query("INSERT INTO history_samples (accessory_id, status, time) VALUES (x'00', 1, 10)")
            .execute(&mut *writer)
            .await
            .unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM history_samples")
            .fetch_one(&mut *reader)
            .await
            .unwrap();

        assert_eq!(count, 1);
    }
}
