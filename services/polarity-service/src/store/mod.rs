//! Record persistence.
//!
//! The service treats storage as an append-only collection with one read
//! path: "newest N records". [`RecordStore`] captures exactly that, so the
//! handlers can run against SQLite in production and a mock in tests.

mod sqlite;

pub use sqlite::SqliteRecordStore;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::record::SentimentRecord;

/// Record store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unsupported store URI '{0}': expected sqlite://<path> or sqlite::memory:")]
    UnsupportedUri(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: i64, reason: String },

    #[error("Store task failed: {0}")]
    Task(String),
}

/// Append-only store of sentiment records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Backend name (e.g., "sqlite")
    fn name(&self) -> &str;

    /// Durably append one record.
    async fn append(&self, record: &SentimentRecord) -> Result<(), StoreError>;

    /// The `limit` most recent records, newest first.
    async fn latest(&self, limit: usize) -> Result<Vec<SentimentRecord>, StoreError>;

    /// Connectivity probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Where a store URI points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Process-local database, gone at exit
    Memory,
    /// Database file on disk
    File(PathBuf),
}

impl StoreLocation {
    /// Parse a store URI.
    ///
    /// Accepts `sqlite::memory:`, `:memory:`, `sqlite://<path>`, `sqlite:<path>`
    /// and bare filesystem paths. Any other `scheme://` is rejected.
    pub fn parse(uri: &str) -> Result<Self, StoreError> {
        let trimmed = uri.trim();

        if matches!(trimmed, "sqlite::memory:" | ":memory:" | "sqlite://:memory:") {
            return Ok(Self::Memory);
        }

        let path = if let Some(rest) = trimmed.strip_prefix("sqlite://") {
            rest
        } else if let Some(rest) = trimmed.strip_prefix("sqlite:") {
            rest
        } else if trimmed.contains("://") {
            return Err(StoreError::UnsupportedUri(uri.to_string()));
        } else {
            trimmed
        };

        if path.is_empty() {
            return Err(StoreError::UnsupportedUri(uri.to_string()));
        }

        Ok(Self::File(PathBuf::from(path)))
    }
}

/// Build the store for a URI without touching it.
///
/// Connection happens on first use, so an unreachable store does not
/// prevent the service from starting.
pub fn connect_lazy(uri: &str) -> Arc<dyn RecordStore> {
    Arc::new(SqliteRecordStore::lazy(uri))
}
