//! Unified history client supporting multiple backends.
//!
//! This module provides `HistoryClient`, an enum that wraps both SQLite and
//! PostgreSQL backends with a consistent async interface.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::history_backend::{
    clamp_limit, HistoryBackend, HistoryBackendError, HistoryBackendResult, HistoryRecord,
    NewHistoryRecord,
};
use crate::history_pg::PgHistoryStore;
use crate::history_store::SqliteHistoryStore;

/// Unified history client supporting multiple storage backends.
///
/// Cheap to clone; every clone shares the same store.
#[derive(Clone)]
pub enum HistoryClient {
    /// Embedded SQLite storage (default).
    Sqlite(Arc<Mutex<SqliteHistoryStore>>),

    /// PostgreSQL connection pool.
    Postgres(Arc<PgHistoryStore>),
}

fn join_error(e: tokio::task::JoinError) -> HistoryBackendError {
    HistoryBackendError::Other(anyhow::anyhow!("history task failed: {e}"))
}

impl HistoryClient {
    /// Create a new SQLite-backed history client.
    pub fn sqlite(store: SqliteHistoryStore) -> Self {
        Self::Sqlite(Arc::new(Mutex::new(store)))
    }

    /// Create a new PostgreSQL-backed history client.
    pub fn postgres(store: PgHistoryStore) -> Self {
        Self::Postgres(Arc::new(store))
    }

    /// Check if this client uses SQLite storage.
    pub fn is_sqlite(&self) -> bool {
        matches!(self, Self::Sqlite(_))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Postgres(_) => "postgres",
        }
    }

    /// Store a query and return its id.
    pub async fn record(&self, entry: NewHistoryRecord) -> HistoryBackendResult<i64> {
        match self {
            Self::Sqlite(store) => {
                let store = store.clone();
                tokio::task::spawn_blocking(move || store.lock().record(&entry))
                    .await
                    .map_err(join_error)?
            }
            Self::Postgres(store) => store.record(&entry).await,
        }
    }

    /// Most recent queries, newest first.
    ///
    /// `limit` defaults to 50 and is clamped to [1, 500].
    pub async fn recent(&self, limit: Option<u32>) -> HistoryBackendResult<Vec<HistoryRecord>> {
        let limit = clamp_limit(limit);
        match self {
            Self::Sqlite(store) => {
                let store = store.clone();
                tokio::task::spawn_blocking(move || store.lock().recent(limit))
                    .await
                    .map_err(join_error)?
            }
            Self::Postgres(store) => store.recent(limit).await,
        }
    }

    pub async fn count(&self) -> HistoryBackendResult<u64> {
        match self {
            Self::Sqlite(store) => {
                let store = store.clone();
                tokio::task::spawn_blocking(move || store.lock().count())
                    .await
                    .map_err(join_error)?
            }
            Self::Postgres(store) => store.count().await,
        }
    }
}

impl std::fmt::Debug for HistoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(_) => f.debug_tuple("HistoryClient::Sqlite").finish(),
            Self::Postgres(_) => f.debug_tuple("HistoryClient::Postgres").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::history_backend::QueryType;
    use serde_json::json;

    fn create_test_client() -> HistoryClient {
        let store = SqliteHistoryStore::in_memory().expect("Failed to create store");
        HistoryClient::sqlite(store)
    }

    fn entry(location: &str) -> NewHistoryRecord {
        NewHistoryRecord::now(
            location,
            48.85,
            2.35,
            QueryType::ShortTermForecast,
            json!({"location": location}),
        )
    }

    #[tokio::test]
    async fn test_record_and_recent() {
        let client = create_test_client();
        assert!(client.is_sqlite());
        assert_eq!(client.backend_name(), "sqlite");

        let id = client.record(entry("Paris")).await.unwrap();
        let records = client.recent(None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(client.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_recent_clamps_zero_limit() {
        let client = create_test_client();
        client.record(entry("a")).await.unwrap();
        client.record(entry("b")).await.unwrap();

        assert_eq!(client.recent(Some(0)).await.unwrap().len(), 1);
        assert_eq!(client.recent(Some(10_000)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let client = create_test_client();
        let other = client.clone();
        client.record(entry("Rome")).await.unwrap();
        assert_eq!(other.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_validation_error_propagates() {
        let client = create_test_client();
        let result = client.record(entry("")).await;
        assert!(matches!(result, Err(HistoryBackendError::Validation(_))));
    }

    #[test]
    fn test_debug_hides_store() {
        assert_eq!(format!("{:?}", create_test_client()), "HistoryClient::Sqlite");
    }
}
