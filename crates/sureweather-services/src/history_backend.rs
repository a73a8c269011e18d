//! Query history types, errors and the storage backend trait.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sureweather_core::DatabaseError;
use thiserror::Error;

/// Default number of records returned by a history listing
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
/// Upper bound on a history listing
pub const MAX_HISTORY_LIMIT: u32 = 500;

/// Errors that can occur during history backend operations.
#[derive(Debug, Error)]
pub enum HistoryBackendError {
    /// Invalid record (e.g., non-finite coordinates).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database failure.
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),

    /// Stored data could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Generic error wrapper.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HistoryBackendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

/// Result type for history backend operations.
pub type HistoryBackendResult<T> = Result<T, HistoryBackendError>;

/// Kind of query that produced a history record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    ShortTermForecast,
    LongTermForecast,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortTermForecast => "short_term_forecast",
            Self::LongTermForecast => "long_term_forecast",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = HistoryBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short_term_forecast" => Ok(Self::ShortTermForecast),
            "long_term_forecast" => Ok(Self::LongTermForecast),
            other => Err(HistoryBackendError::decode(format!("unknown query type '{other}'"))),
        }
    }
}

/// A stored query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub query_type: QueryType,
    pub timestamp: DateTime<Utc>,
    /// Full JSON response returned to the client
    pub response_data: serde_json::Value,
}

/// A query about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryRecord {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub query_type: QueryType,
    pub timestamp: DateTime<Utc>,
    pub response_data: serde_json::Value,
}

impl NewHistoryRecord {
    /// Record a response now.
    pub fn now(
        location: impl Into<String>,
        latitude: f64,
        longitude: f64,
        query_type: QueryType,
        response_data: serde_json::Value,
    ) -> Self {
        Self {
            location: location.into(),
            latitude,
            longitude,
            query_type,
            timestamp: Utc::now(),
            response_data,
        }
    }

    /// # Errors
    /// Returns `HistoryBackendError::Validation` for a blank location or
    /// non-finite coordinates.
    pub fn validate(&self) -> HistoryBackendResult<()> {
        if self.location.trim().is_empty() {
            return Err(HistoryBackendError::validation("Location cannot be empty"));
        }
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(HistoryBackendError::validation("Coordinates must be finite"));
        }
        Ok(())
    }
}

/// Resolve a requested listing size: default 50, clamped to [1, 500].
pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

/// Trait for blocking history storage backends.
///
/// Implementations don't need to be Sync - the HistoryClient wrapper handles
/// thread-safe access via Mutex.
pub trait HistoryBackend: Send {
    /// Store a record and return its id.
    fn record(&self, entry: &NewHistoryRecord) -> HistoryBackendResult<i64>;

    /// Most recent records, newest first.
    fn recent(&self, limit: u32) -> HistoryBackendResult<Vec<HistoryRecord>>;

    /// Number of stored records.
    fn count(&self) -> HistoryBackendResult<u64>;
}
