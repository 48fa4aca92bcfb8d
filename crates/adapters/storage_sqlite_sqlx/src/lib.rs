//! # knxbell-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `HistoryLog` port defined in `knxbell-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `knxbell-app` (for port traits) and `knxbell-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod history_log;
mod pool;

pub use error::StorageError;
pub use history_log::SqliteHistoryLog;
pub use pool::{Config, Database};
