//! SQLite-backed record store.
//!
//! One table, one descending index on `timestamp`. The connection is opened
//! lazily and retried on every call until it succeeds, then held for the
//! life of the store.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::{RecordStore, StoreError, StoreLocation};
use crate::record::{Sentiment, SentimentRecord};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sentiment_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    sentiment TEXT NOT NULL,
    polarity REAL NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sentiment_records_timestamp
    ON sentiment_records(timestamp DESC);
"#;

/// SQLite record store.
pub struct SqliteRecordStore {
    uri: String,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteRecordStore {
    /// Create a store that connects on first use.
    pub fn lazy(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Open a store, failing if it cannot be reached now.
    pub async fn open(uri: impl Into<String>) -> Result<Self, StoreError> {
        let store = Self::lazy(uri);
        store.ping().await?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    /// Run `op` against the connection on the blocking pool, connecting first if needed.
    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let uri = self.uri.clone();

        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("connection lock poisoned: {e}")))?;

            if guard.is_none() {
                *guard = Some(open_connection(&uri)?);
                info!(uri = %uri, "Record store connected");
            }

            match guard.as_ref() {
                Some(connection) => op(connection),
                None => Err(StoreError::Unavailable("connection not initialised".into())),
            }
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn open_connection(uri: &str) -> Result<Connection, StoreError> {
    let conn = match StoreLocation::parse(uri)? {
        StoreLocation::Memory => Connection::open_in_memory()?,
        StoreLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!("cannot create {}: {e}", parent.display()))
                })?;
            }
            Connection::open(&path)?
        }
    };

    conn.execute_batch(SCHEMA)?;
    debug!("Record store schema initialized");
    Ok(conn)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    // Fixed-width so lexical order matches chronological order
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn append(&self, record: &SentimentRecord) -> Result<(), StoreError> {
        let record = record.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO sentiment_records (text, sentiment, polarity, timestamp) VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.text,
                    record.sentiment.as_str(),
                    record.polarity,
                    format_timestamp(&record.timestamp),
                ],
            )?;
            debug!(id = conn.last_insert_rowid(), sentiment = %record.sentiment, "Record appended");
            Ok(())
        })
        .await
    }

    async fn latest(&self, limit: usize) -> Result<Vec<SentimentRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, text, sentiment, polarity, timestamp
                FROM sentiment_records
                ORDER BY timestamp DESC, id DESC
                LIMIT ?1
                "#,
            )?;

            let rows = stmt.query_map(params![limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?;

            let mut records = Vec::new();
            for row in rows {
                let (id, text, sentiment, polarity, timestamp) = row?;

                let sentiment = Sentiment::from_db_string(&sentiment).ok_or_else(|| {
                    StoreError::Corrupt {
                        id,
                        reason: format!("unknown sentiment '{sentiment}'"),
                    }
                })?;

                let timestamp = DateTime::parse_from_rfc3339(&timestamp)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| StoreError::Corrupt {
                        id,
                        reason: format!("bad timestamp '{timestamp}': {e}"),
                    })?;

                records.push(SentimentRecord {
                    text,
                    sentiment,
                    polarity,
                    timestamp,
                });
            }

            Ok(records)
        })
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record_at(text: &str, polarity: f64, offset_secs: i64) -> SentimentRecord {
        let base = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        SentimentRecord::at(text, polarity, base + Duration::seconds(offset_secs))
    }

    #[tokio::test]
    async fn test_empty_store_returns_nothing() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        assert!(store.latest(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latest_is_newest_first_and_limited() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        // Insert out of order to prove sorting is by timestamp, not insertion
        for offset in [3, 1, 4, 0, 2] {
            store
                .append(&record_at(&format!("r{offset}"), 0.1, offset))
                .await
                .unwrap();
        }

        let records = store.latest(3).await.unwrap();
        let texts: Vec<_> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["r4", "r3", "r2"]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_newest_insert_first() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        store.append(&record_at("first", 0.0, 5)).await.unwrap();
        store.append(&record_at("second", 0.0, 5)).await.unwrap();

        let records = store.latest(10).await.unwrap();
        assert_eq!(records[0].text, "second");
        assert_eq!(records[1].text, "first");
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let record = SentimentRecord::new("I hate this.", -0.8);
        store.append(&record).await.unwrap();

        let stored = store.latest(1).await.unwrap();
        assert_eq!(stored, vec![record]);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("sqlite://{}", dir.path().join("nested/records.db").display());

        {
            let store = SqliteRecordStore::open(uri.clone()).await.unwrap();
            store.append(&record_at("kept", 0.5, 0)).await.unwrap();
        }

        let reopened = SqliteRecordStore::open(uri).await.unwrap();
        let records = reopened.latest(10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "kept");
        assert_eq!(records[0].sentiment, Sentiment::Positive);
    }

    #[tokio::test]
    async fn test_unsupported_uri_fails_on_use() {
        let store = SqliteRecordStore::lazy("mongodb://127.0.0.1:27017/");
        let err = store.ping().await.unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedUri(_)));

        let err = store.append(&record_at("x", 0.0, 0)).await.unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedUri(_)));
    }

    #[tokio::test]
    async fn test_lazy_store_recovers_when_path_becomes_available() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let store = SqliteRecordStore::lazy(format!(
            "sqlite://{}",
            blocker.join("records.db").display()
        ));
        assert!(store.ping().await.is_err());

        std::fs::remove_file(&blocker).unwrap();
        store.ping().await.unwrap();
        store.append(&record_at("after", 0.2, 0)).await.unwrap();
        assert_eq!(store.latest(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO sentiment_records (text, sentiment, polarity, timestamp) VALUES ('x', 'mixed', 0.0, '2026-01-01T00:00:00Z')",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let err = store.latest(10).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
