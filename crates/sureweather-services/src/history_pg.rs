//! PostgreSQL-based query history storage for production deployments.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sureweather_core::SqlxErrorExt;

use crate::history_backend::{
    HistoryBackendError, HistoryBackendResult, HistoryRecord, NewHistoryRecord, QueryType,
};

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS query_history (
    id BIGSERIAL PRIMARY KEY,
    location TEXT NOT NULL,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    query_type TEXT NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL,
    response_data JSONB NOT NULL
)"#;

const INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_query_history_timestamp
    ON query_history (timestamp DESC, id DESC)"#;

fn storage(e: sqlx::Error) -> HistoryBackendError {
    HistoryBackendError::Storage(SqlxErrorExt::into_database_error(e))
}

#[derive(Debug, sqlx::FromRow)]
struct PgHistoryRow {
    id: i64,
    location: String,
    latitude: f64,
    longitude: f64,
    query_type: String,
    timestamp: DateTime<Utc>,
    response_data: Json<serde_json::Value>,
}

impl TryFrom<PgHistoryRow> for HistoryRecord {
    type Error = HistoryBackendError;

    fn try_from(row: PgHistoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            location: row.location,
            latitude: row.latitude,
            longitude: row.longitude,
            query_type: row.query_type.parse::<QueryType>()?,
            timestamp: row.timestamp,
            response_data: row.response_data.0,
        })
    }
}

/// PostgreSQL history storage backed by a connection pool.
#[derive(Debug, Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    /// Connect to `database_url` and create the schema if needed.
    pub async fn connect(database_url: &str) -> HistoryBackendResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(storage)?;

        let store = Self { pool };
        store.init_schema().await?;
        tracing::info!("Connected to PostgreSQL history store");
        Ok(store)
    }

    pub async fn init_schema(&self) -> HistoryBackendResult<()> {
        for statement in [SCHEMA, INDEX] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(storage)?;
        }
        Ok(())
    }

    pub async fn record(&self, entry: &NewHistoryRecord) -> HistoryBackendResult<i64> {
        entry.validate()?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO query_history (location, latitude, longitude, query_type, timestamp, response_data)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&entry.location)
        .bind(entry.latitude)
        .bind(entry.longitude)
        .bind(entry.query_type.as_str())
        .bind(entry.timestamp)
        .bind(Json(&entry.response_data))
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;

        tracing::debug!("Recorded {} query with ID: {}", entry.query_type, id);
        Ok(id)
    }

    pub async fn recent(&self, limit: u32) -> HistoryBackendResult<Vec<HistoryRecord>> {
        let rows: Vec<PgHistoryRow> = sqlx::query_as(
            r#"
            SELECT id, location, latitude, longitude, query_type, timestamp, response_data
            FROM query_history
            ORDER BY timestamp DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.into_iter().map(HistoryRecord::try_from).collect()
    }

    pub async fn count(&self) -> HistoryBackendResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM query_history")
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_conversion() {
        let now = Utc::now();
        let row = PgHistoryRow {
            id: 7,
            location: "Cairo".into(),
            latitude: 30.04,
            longitude: 31.24,
            query_type: "long_term_forecast".into(),
            timestamp: now,
            response_data: Json(json!({"climate_zone": "subtropical"})),
        };

        let record = HistoryRecord::try_from(row).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.query_type, QueryType::LongTermForecast);
        assert_eq!(record.timestamp, now);
        assert_eq!(record.response_data["climate_zone"], "subtropical");
    }

    #[test]
    fn test_row_with_unknown_query_type_is_rejected() {
        let row = PgHistoryRow {
            id: 1,
            location: "x".into(),
            latitude: 0.0,
            longitude: 0.0,
            query_type: "hourly".into(),
            timestamp: Utc::now(),
            response_data: Json(json!(null)),
        };
        assert!(matches!(
            HistoryRecord::try_from(row),
            Err(HistoryBackendError::Decode(_))
        ));
    }

    /// Runs only when SUREWEATHER_DATABASE_URL points at a live server.
    #[tokio::test]
    async fn test_recent_on_live_database_is_newest_first_and_limited() {
        let Ok(url) = std::env::var(sureweather_core::config::DATABASE_URL_ENV) else {
            return;
        };
        let store = PgHistoryStore::connect(&url).await.unwrap();
        let before = store.count().await.unwrap();

        // Far-future timestamps keep these rows ahead of anything already stored.
        let base = Utc::now() + chrono::TimeDelta::days(365 * 500);
        let tag = Utc::now().timestamp_micros();
        for (i, city) in ["Reykjavik", "Santiago", "Kyoto"].into_iter().enumerate() {
            let mut entry = NewHistoryRecord::now(
                format!("{city}-{tag}"),
                10.0,
                20.0,
                QueryType::ShortTermForecast,
                json!({"location": city}),
            );
            entry.timestamp = base + chrono::TimeDelta::seconds(i as i64);
            store.record(&entry).await.unwrap();
        }

        let records = store.recent(2).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].location, format!("Kyoto-{tag}"));
        assert_eq!(records[1].location, format!("Santiago-{tag}"));
        assert!(records[0].timestamp > records[1].timestamp);
        assert_eq!(records[0].response_data["location"], "Kyoto");
        assert_eq!(store.count().await.unwrap(), before + 3);
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_server_fails() {
        let result = PgHistoryStore::connect("postgres://nobody@127.0.0.1:9/none").await;
        assert!(matches!(result, Err(HistoryBackendError::Storage(_))));
    }
}
