//! Query string parameters.

use serde::Deserialize;
use sureweather_services::{parse_categories, EventCategory};
use sureweather_weather::{ForecastType, Location};

use super::response::ApiError;

fn location(lat: f64, lon: f64, city_name: Option<String>) -> Result<Location, ApiError> {
    Ok(Location::new(lat, lon, city_name)?)
}

/// Absent or blank means short-term.
fn forecast_type(raw: Option<&str>) -> Result<ForecastType, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(ForecastType::default()),
        Some(s) => s.parse::<ForecastType>().map_err(ApiError::invalid_query),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastParams {
    lat: f64,
    lon: f64,
    city_name: Option<String>,
}

impl ForecastParams {
    pub(crate) fn location(self) -> Result<Location, ApiError> {
        location(self.lat, self.lon, self.city_name)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionsParams {
    lat: f64,
    lon: f64,
    forecast_type: Option<String>,
    city_name: Option<String>,
}

impl ConditionsParams {
    pub(crate) fn resolve(self) -> Result<(Location, ForecastType), ApiError> {
        let forecast_type = forecast_type(self.forecast_type.as_deref())?;
        Ok((location(self.lat, self.lon, self.city_name)?, forecast_type))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationParams {
    lat: f64,
    lon: f64,
    forecast_type: Option<String>,
    event_categories: Option<String>,
}

impl RecommendationParams {
    pub(crate) fn resolve(
        self,
    ) -> Result<(Location, ForecastType, Vec<EventCategory>), ApiError> {
        let forecast_type = forecast_type(self.forecast_type.as_deref())?;
        let categories = match self.event_categories.as_deref() {
            Some(list) => parse_categories(list).map_err(ApiError::invalid_query)?,
            None => Vec::new(),
        };
        Ok((location(self.lat, self.lon, None)?, forecast_type, categories))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreParams {
    pub(crate) event_id: String,
    lat: f64,
    lon: f64,
    forecast_type: Option<String>,
}

impl ScoreParams {
    pub(crate) fn resolve(&self) -> Result<(Location, ForecastType), ApiError> {
        let forecast_type = forecast_type(self.forecast_type.as_deref())?;
        Ok((location(self.lat, self.lon, None)?, forecast_type))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyParams {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryParams {
    pub(crate) limit: Option<u32>,
}
