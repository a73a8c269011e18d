//! JSON error contract shared by every endpoint.

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use sureweather_core::WeatherError;
use sureweather_services::{HistoryBackendError, ScoringError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    InvalidQuery,
    EventNotFound,
    StorageUnavailable,
    Internal,
}

impl ApiErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidQuery => StatusCode::BAD_REQUEST,
            Self::EventNotFound => StatusCode::NOT_FOUND,
            Self::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error returned by a handler, rendered as `{"error": {"code", "message"}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidQuery, message)
    }

    pub fn event_not_found(event_id: &str) -> Self {
        Self::new(
            ApiErrorCode::EventNotFound,
            format!("Event '{event_id}' not found"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        });
        (self.code.status(), Json(body)).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_query(rejection.body_text())
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::InvalidLocation(message) => Self::invalid_query(message),
            other => {
                tracing::error!(error = %other, "Weather error reached the HTTP layer");
                Self::internal(other.user_message())
            }
        }
    }
}

impl From<ScoringError> for ApiError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::EventNotFound(id) => Self::event_not_found(&id),
        }
    }
}

impl From<HistoryBackendError> for ApiError {
    fn from(err: HistoryBackendError) -> Self {
        match err {
            HistoryBackendError::Validation(message) => Self::invalid_query(message),
            HistoryBackendError::Decode(message) => {
                tracing::error!(%message, "Stored history could not be decoded");
                Self::internal("Stored history is unreadable")
            }
            other => {
                tracing::error!(error = %other, "History storage failed");
                Self::new(
                    ApiErrorCode::StorageUnavailable,
                    "History storage is unavailable",
                )
            }
        }
    }
}
