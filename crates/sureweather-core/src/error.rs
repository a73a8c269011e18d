//! Error types shared by the SureWeather crates.
//!
//! Every variant carries a `user_message()` that is safe to put in an API
//! error body; the `Display` text keeps the detail for logs.

use thiserror::Error;

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to reach the upstream service."
            }
            NetworkError::Timeout => "The upstream request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The upstream service is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The upstream request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected upstream response. Please try again."
            }
        }
    }
}

/// Database/storage errors (SQLite, PostgreSQL).
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Data corruption detected: {0}")]
    Corruption(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

impl DatabaseError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed(_) => {
                "Query history storage is unavailable."
            }
            DatabaseError::QueryFailed(_) => "A history operation failed. Please try again.",
            DatabaseError::Corruption(_) => {
                "Stored history may be corrupted."
            }
            DatabaseError::MigrationFailed(_) => {
                "Failed to prepare history storage."
            }
        }
    }
}

/// Weather service errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Weather API error: {0}")]
    ApiError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::InvalidLocation(_) => "Location is invalid. Check latitude and longitude.",
            WeatherError::ApiError(_) => "Weather service error. Please try again.",
            WeatherError::InvalidApiKey => "Weather API key is invalid. Check settings.",
            WeatherError::Network(e) => e.user_message(),
            WeatherError::Parse(_) => "Weather data could not be read.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

/// Extension trait for converting rusqlite errors to our error types.
pub trait RusqliteErrorExt {
    fn into_database_error(self) -> DatabaseError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_database_error(self) -> DatabaseError {
        match &self {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("corrupt") => {
                DatabaseError::Corruption(self.to_string())
            }
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::CannotOpen =>
            {
                DatabaseError::ConnectionFailed(self.to_string())
            }
            _ => DatabaseError::QueryFailed(self.to_string()),
        }
    }
}

/// Extension trait for converting sqlx (PostgreSQL) errors to our error types.
pub trait SqlxErrorExt {
    fn into_database_error(self) -> DatabaseError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_database_error(self) -> DatabaseError {
        match &self {
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => DatabaseError::ConnectionFailed(self.to_string()),
            sqlx::Error::Configuration(_) => DatabaseError::ConnectionFailed(self.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DatabaseError::Corruption(self.to_string())
            }
            _ => DatabaseError::QueryFailed(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let messages = [
            NetworkError::Timeout.user_message(),
            NetworkError::InvalidResponse("test".into()).user_message(),
            DatabaseError::QueryFailed("test".into()).user_message(),
            DatabaseError::MigrationFailed("test".into()).user_message(),
            WeatherError::InvalidApiKey.user_message(),
            WeatherError::Parse("test".into()).user_message(),
        ];

        for message in messages {
            assert!(!message.is_empty());
        }
    }

    #[test]
    fn test_weather_network_error_uses_network_message() {
        let err = WeatherError::Network(NetworkError::ConnectionFailed("refused".into()));
        assert_eq!(err.user_message(), "Unable to reach the upstream service.");
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_server_error_message_depends_on_status() {
        let upstream = NetworkError::ServerError {
            status: 503,
            message: "busy".into(),
        };
        assert!(upstream.user_message().contains("later"));

        let client = NetworkError::ServerError {
            status: 404,
            message: "missing".into(),
        };
        assert!(!client.user_message().contains("later"));
    }

    #[test]
    fn test_rusqlite_corruption_detected() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(11),
            Some("database disk image is malformed: corrupt".into()),
        );
        assert!(matches!(err.into_database_error(), DatabaseError::Corruption(_)));
    }
}
