//! SQLite-based query history storage.
//!
//! This module provides `SqliteHistoryStore`, the embedded implementation of
//! the `HistoryBackend` trait used in development.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use sureweather_core::{DatabaseError, RusqliteErrorExt};

use crate::history_backend::{
    HistoryBackend, HistoryBackendError, HistoryBackendResult, HistoryRecord, NewHistoryRecord,
    QueryType,
};

/// Current schema version, stored in `PRAGMA user_version`.
const SCHEMA_VERSION: i32 = 1;

fn storage(e: rusqlite::Error) -> HistoryBackendError {
    HistoryBackendError::Storage(e.into_database_error())
}

/// SQLite-based history storage.
pub struct SqliteHistoryStore {
    conn: Connection,
}

impl SqliteHistoryStore {
    /// Open (or create) a history database at the given path.
    ///
    /// Missing parent directories and the schema are created.
    pub fn new<P: AsRef<Path>>(path: P) -> HistoryBackendResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                HistoryBackendError::Storage(DatabaseError::ConnectionFailed(format!(
                    "cannot create {}: {e}",
                    parent.display()
                )))
            })?;
        }

        let conn = Connection::open(path).map_err(storage)?;
        let store = Self { conn };
        store.init_schema()?;
        tracing::info!("Opened SQLite history store at {}", path.display());
        Ok(store)
    }

    /// Create an in-memory store (tests and throwaway instances).
    pub fn in_memory() -> HistoryBackendResult<Self> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    ///
    /// Tables written by an older version are rebuilt. History is disposable.
    fn init_schema(&self) -> HistoryBackendResult<()> {
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(storage)?;

        if version != SCHEMA_VERSION {
            if version != 0 {
                tracing::warn!(
                    "History schema version {} differs from {}, rebuilding",
                    version,
                    SCHEMA_VERSION
                );
            }
            self.conn
                .execute_batch("DROP TABLE IF EXISTS query_history;")
                .map_err(|e| {
                    HistoryBackendError::Storage(DatabaseError::MigrationFailed(e.to_string()))
                })?;
        }

        self.conn
            .execute_batch(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS query_history (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    location TEXT NOT NULL,
                    latitude REAL NOT NULL,
                    longitude REAL NOT NULL,
                    query_type TEXT NOT NULL,
                    timestamp TEXT NOT NULL,
                    response_data TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_query_history_timestamp
                    ON query_history(timestamp DESC, id DESC);

                PRAGMA user_version = {SCHEMA_VERSION};
                "#
            ))
            .map_err(|e| {
                HistoryBackendError::Storage(DatabaseError::MigrationFailed(e.to_string()))
            })?;
        Ok(())
    }

    /// Read the raw columns of a history row.
    fn read_row(row: &rusqlite::Row) -> rusqlite::Result<RawRecord> {
        Ok(RawRecord {
            id: row.get(0)?,
            location: row.get(1)?,
            latitude: row.get(2)?,
            longitude: row.get(3)?,
            query_type: row.get(4)?,
            timestamp: row.get(5)?,
            response_data: row.get(6)?,
        })
    }
}

/// A history row before its text columns are decoded
struct RawRecord {
    id: i64,
    location: String,
    latitude: f64,
    longitude: f64,
    query_type: String,
    timestamp: String,
    response_data: String,
}

impl RawRecord {
    fn decode(self) -> HistoryBackendResult<HistoryRecord> {
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| HistoryBackendError::decode(format!("bad timestamp: {e}")))?;
        let response_data = serde_json::from_str(&self.response_data)
            .map_err(|e| HistoryBackendError::decode(format!("bad response data: {e}")))?;

        Ok(HistoryRecord {
            id: self.id,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            query_type: self.query_type.parse::<QueryType>()?,
            timestamp,
            response_data,
        })
    }
}

impl HistoryBackend for SqliteHistoryStore {
    fn record(&self, entry: &NewHistoryRecord) -> HistoryBackendResult<i64> {
        entry.validate()?;

        let response_data = serde_json::to_string(&entry.response_data)
            .map_err(|e| HistoryBackendError::decode(e.to_string()))?;
        // Fixed-width timestamps keep lexical and chronological order equal
        let timestamp = entry.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true);

        self.conn
            .execute(
                r#"
                INSERT INTO query_history (location, latitude, longitude, query_type, timestamp, response_data)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    entry.location,
                    entry.latitude,
                    entry.longitude,
                    entry.query_type.as_str(),
                    timestamp,
                    response_data,
                ],
            )
            .map_err(storage)?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!("Recorded {} query with ID: {}", entry.query_type, id);
        Ok(id)
    }

    fn recent(&self, limit: u32) -> HistoryBackendResult<Vec<HistoryRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, location, latitude, longitude, query_type, timestamp, response_data
                 FROM query_history
                 ORDER BY timestamp DESC, id DESC
                 LIMIT ?1",
            )
            .map_err(storage)?;

        let rows = stmt
            .query_map(params![limit], Self::read_row)
            .map_err(storage)?;

        rows.map(|row| row.map_err(storage).and_then(RawRecord::decode))
            .collect()
    }

    fn count(&self) -> HistoryBackendResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM query_history", [], |row| row.get(0))
            .map_err(storage)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::TimeDelta;
    use serde_json::json;

    fn create_test_store() -> SqliteHistoryStore {
        SqliteHistoryStore::in_memory().expect("Failed to create in-memory store")
    }

    fn entry(location: &str, offset_secs: i64) -> NewHistoryRecord {
        NewHistoryRecord {
            location: location.to_string(),
            latitude: 52.52,
            longitude: 13.40,
            query_type: QueryType::ShortTermForecast,
            timestamp: Utc::now() + TimeDelta::seconds(offset_secs),
            response_data: json!({"location": location, "source": "fallback"}),
        }
    }

    #[test]
    fn test_record_and_read_back() {
        let store = create_test_store();

        let id = store.record(&entry("Berlin", 0)).unwrap();
        assert!(id > 0);

        let records = store.recent(10).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].location, "Berlin");
        assert_eq!(records[0].query_type, QueryType::ShortTermForecast);
        assert_eq!(records[0].response_data["source"], "fallback");
    }

    #[test]
    fn test_recent_is_newest_first() {
        let store = create_test_store();

        store.record(&entry("first", -20)).unwrap();
        store.record(&entry("third", 0)).unwrap();
        store.record(&entry("second", -10)).unwrap();

        let names: Vec<_> = store
            .recent(10)
            .unwrap()
            .into_iter()
            .map(|r| r.location)
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_recent_honours_limit() {
        let store = create_test_store();
        for i in 0..5 {
            store.record(&entry(&format!("loc{i}"), i)).unwrap();
        }

        let records = store.recent(2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].location, "loc4");
        assert_eq!(store.count().unwrap(), 5);
    }

    #[test]
    fn test_invalid_record_rejected() {
        let store = create_test_store();
        let result = store.record(&entry("", 0));
        assert!(matches!(result, Err(HistoryBackendError::Validation(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.db");

        {
            let store = SqliteHistoryStore::new(&path).unwrap();
            store.record(&entry("Lisbon", 0)).unwrap();
        }

        let reopened = SqliteHistoryStore::new(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        assert_eq!(reopened.recent(1).unwrap()[0].location, "Lisbon");
    }
}
