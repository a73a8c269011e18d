//! HTTP surface of SureWeather.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use sureweather_services::{EventScorer, HistoryClient};
use sureweather_weather::WeatherService;

mod http;
mod middleware;

pub use http::response::{ApiError, ApiErrorCode};

use middleware::{cors_middleware, request_tracing_middleware};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<WeatherService>,
    pub scorer: Arc<EventScorer>,
    pub history: HistoryClient,
    cors_allowed_origins: Arc<Vec<String>>,
    request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(
        weather: WeatherService,
        scorer: EventScorer,
        history: HistoryClient,
        cors_allowed_origins: Vec<String>,
    ) -> Self {
        Self {
            weather: Arc::new(weather),
            scorer: Arc::new(scorer),
            history,
            cors_allowed_origins: Arc::new(cors_allowed_origins),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }

    pub(crate) fn origin_allowed(&self, origin: &str) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == origin)
    }

    pub(crate) fn next_request_id(&self) -> String {
        let seq = self.request_id_seed.fetch_add(1, Ordering::Relaxed);
        format!("req-{seq:08x}")
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("history", &self.history)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish_non_exhaustive()
    }
}

pub fn build_router(state: AppState) -> Router {
    use http::handlers;

    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/api/v1/health", get(handlers::health_handler))
        .route(
            "/api/v1/forecast/short-term",
            get(handlers::short_term_forecast_handler),
        )
        .route(
            "/api/v1/forecast/long-term",
            get(handlers::long_term_forecast_handler),
        )
        .route("/api/v1/events", get(handlers::events_handler))
        .route(
            "/api/v1/events/categories",
            get(handlers::event_categories_handler),
        )
        .route(
            "/api/v1/events/classify",
            get(handlers::classify_event_handler),
        )
        .route(
            "/api/v1/events/recommendations",
            get(handlers::event_recommendations_handler),
        )
        .route("/api/v1/score/event", get(handlers::score_event_handler))
        .route(
            "/api/v1/clothing/recommendations",
            get(handlers::clothing_handler),
        )
        .route("/api/v1/history", get(handlers::history_handler))
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(from_fn_with_state(state.clone(), request_tracing_middleware))
        .with_state(state)
}
