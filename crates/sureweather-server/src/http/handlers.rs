use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use sureweather_services::{
    all_profiles, classify, recommend_outfit, CategoryProfile, Event, EventCategory,
    EventSuitabilityScore, HistoryRecord, NewHistoryRecord, OutfitRecommendation, QueryType,
};
use sureweather_weather::{Location, LongTermForecast, ShortTermForecast};
use tracing::info;

use super::params::{
    ClassifyParams, ConditionsParams, ForecastParams, HistoryParams, RecommendationParams,
    ScoreParams,
};
use super::response::ApiError;
use crate::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub(crate) async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "SureWeather API is running!" }))
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "sureweather-api",
        "version": env!("CARGO_PKG_VERSION"),
        "history_backend": state.history.backend_name(),
    }))
}

/// Store a forecast response. Failures are logged and never surface to the client.
async fn remember<T: Serialize>(
    state: &AppState,
    location: &Location,
    label: &str,
    query_type: QueryType,
    response: &T,
) {
    let response_data = match serde_json::to_value(response) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Could not encode response for history");
            return;
        }
    };

    let entry = NewHistoryRecord::now(
        label,
        location.latitude,
        location.longitude,
        query_type,
        response_data,
    );
    if let Err(e) = state.history.record(entry).await {
        tracing::warn!(error = %e, %query_type, "Failed to record query history");
    }
}

pub(crate) async fn short_term_forecast_handler(
    State(state): State<AppState>,
    query: Result<Query<ForecastParams>, QueryRejection>,
) -> ApiResult<ShortTermForecast> {
    let Query(params) = query?;
    let location = params.location()?;

    let forecast = state.weather.short_term(&location).await;
    info!(location = %forecast.location, source = ?forecast.source, "short-term forecast served");
    remember(
        &state,
        &location,
        &forecast.location,
        QueryType::ShortTermForecast,
        &forecast,
    )
    .await;
    Ok(Json(forecast))
}

pub(crate) async fn long_term_forecast_handler(
    State(state): State<AppState>,
    query: Result<Query<ForecastParams>, QueryRejection>,
) -> ApiResult<LongTermForecast> {
    let Query(params) = query?;
    let location = params.location()?;

    let forecast = state.weather.long_term(&location);
    remember(
        &state,
        &location,
        &forecast.location,
        QueryType::LongTermForecast,
        &forecast,
    )
    .await;
    Ok(Json(forecast))
}

pub(crate) async fn events_handler(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.scorer.catalog().all().to_vec())
}

pub(crate) async fn event_categories_handler() -> Json<Vec<&'static CategoryProfile>> {
    Json(all_profiles())
}

#[derive(Debug, Serialize)]
pub(crate) struct Classification {
    name: String,
    category: EventCategory,
}

pub(crate) async fn classify_event_handler(
    query: Result<Query<ClassifyParams>, QueryRejection>,
) -> ApiResult<Classification> {
    let Query(params) = query?;
    let name = params.name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid_query("name must not be empty"));
    }

    Ok(Json(Classification {
        category: classify(name, &params.description),
        name: name.to_string(),
    }))
}

pub(crate) async fn event_recommendations_handler(
    State(state): State<AppState>,
    query: Result<Query<RecommendationParams>, QueryRejection>,
) -> ApiResult<Vec<EventSuitabilityScore>> {
    let Query(params) = query?;
    let (location, forecast_type, categories) = params.resolve()?;

    let (_, weather) = state.weather.conditions(&location, forecast_type).await;
    Ok(Json(state.scorer.recommend(&weather, &categories)))
}

pub(crate) async fn score_event_handler(
    State(state): State<AppState>,
    query: Result<Query<ScoreParams>, QueryRejection>,
) -> ApiResult<EventSuitabilityScore> {
    let Query(params) = query?;
    let (location, forecast_type) = params.resolve()?;
    if state.scorer.catalog().get(&params.event_id).is_none() {
        return Err(ApiError::event_not_found(&params.event_id));
    }

    let (_, weather) = state.weather.conditions(&location, forecast_type).await;
    Ok(Json(state.scorer.score_event(&params.event_id, &weather)?))
}

pub(crate) async fn clothing_handler(
    State(state): State<AppState>,
    query: Result<Query<ConditionsParams>, QueryRejection>,
) -> ApiResult<OutfitRecommendation> {
    let Query(params) = query?;
    let (location, forecast_type) = params.resolve()?;

    let (label, weather) = state.weather.conditions(&location, forecast_type).await;
    Ok(Json(recommend_outfit(&weather, forecast_type, label)))
}

pub(crate) async fn history_handler(
    State(state): State<AppState>,
    query: Result<Query<HistoryParams>, QueryRejection>,
) -> ApiResult<Vec<HistoryRecord>> {
    let Query(params) = query?;
    Ok(Json(state.history.recent(params.limit).await?))
}
