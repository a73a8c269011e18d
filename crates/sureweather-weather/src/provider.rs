//! OpenWeather One Call 3.0 client.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use sureweather_core::{ReqwestErrorExt, WeatherConfig, WeatherError};
use tracing::instrument;

use crate::comfort::comfort_index;
use crate::retry::{send_with_backoff, Backoff};
use crate::types::{
    DailyForecast, ForecastSource, HourlyForecast, Location, ShortTermForecast, WeatherCondition,
    WeatherSnapshot,
};

/// Hours between the synthetic hourly entries of a daily forecast
pub const HOURLY_STEP: i64 = 3;
const HOURLY_ENTRIES: i64 = 24 / HOURLY_STEP;
const HOURLY_JITTER: f64 = 2.0;
const DEFAULT_VISIBILITY_M: f64 = 10_000.0;

/// Raw One Call payload. Only the fields we read are modelled.
#[derive(Debug, Deserialize)]
struct OneCallResponse {
    current: CurrentBlock,
    #[serde(default)]
    daily: Vec<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    dt: i64,
    temp: f64,
    humidity: f64,
    wind_speed: f64,
    #[serde(default)]
    wind_deg: f64,
    #[serde(default)]
    clouds: f64,
    #[serde(default)]
    visibility: Option<f64>,
    #[serde(default)]
    uvi: f64,
    #[serde(default)]
    rain: Option<HourlyVolume>,
    #[serde(default)]
    snow: Option<HourlyVolume>,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct HourlyVolume {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    dt: i64,
    temp: DailyTemp,
    humidity: f64,
    wind_speed: f64,
    #[serde(default)]
    wind_deg: f64,
    #[serde(default)]
    clouds: f64,
    #[serde(default)]
    uvi: f64,
    #[serde(default)]
    rain: Option<f64>,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct DailyTemp {
    day: f64,
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    main: String,
}

fn condition_of(blocks: &[ConditionBlock]) -> WeatherCondition {
    blocks
        .first()
        .map(|b| WeatherCondition::from_provider_group(&b.main))
        .unwrap_or_default()
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| WeatherError::Parse(format!("timestamp {secs} out of range")))
}

fn percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn degrees(value: f64) -> u16 {
    value.round().rem_euclid(360.0) as u16
}

/// OpenWeather forecast client
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    forecast_days: usize,
    backoff: Backoff,
}

impl OpenWeatherProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Network(e.into_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into(),
            api_key: api_key.into(),
            forecast_days: 16,
            backoff: Backoff::default(),
        })
    }

    /// Build a provider from configuration. `None` when no usable API key is set.
    pub fn from_config(config: &WeatherConfig) -> Result<Option<Self>, WeatherError> {
        let Some(api_key) = config.api_key.as_deref().filter(|_| config.has_api_key()) else {
            return Ok(None);
        };

        let provider = Self::new(
            config.base_url.clone(),
            api_key,
            Duration::from_secs(config.request_timeout_secs),
        )?
        .with_forecast_days(config.forecast_days)
        .with_backoff(Backoff::with_retries(config.max_retries));

        Ok(Some(provider))
    }

    pub fn with_forecast_days(mut self, days: usize) -> Self {
        self.forecast_days = days;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Fetch the current conditions and daily forecast for a location.
    #[instrument(skip(self), fields(location = %location.label()))]
    pub async fn fetch(&self, location: &Location) -> Result<ShortTermForecast, WeatherError> {
        let params = [
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
            ("exclude", "minutely,alerts".to_string()),
        ];

        let response = send_with_backoff(&self.backoff, || {
            self.client.get(&self.base_url).query(&params).send()
        })
        .await
        .map_err(|e| WeatherError::Network(e.into_network_error()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(WeatherError::InvalidApiKey);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::ApiError(format!("status {status}: {body}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Network(e.into_network_error()))?;
        let payload: OneCallResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        let forecast = self.convert(location, payload)?;
        tracing::debug!(days = forecast.daily_forecasts.len(), "Provider forecast parsed");
        Ok(forecast)
    }

    fn convert(
        &self,
        location: &Location,
        payload: OneCallResponse,
    ) -> Result<ShortTermForecast, WeatherError> {
        let current = convert_current(&payload.current)?;
        let mut rng = rand::rng();

        let daily_forecasts = payload
            .daily
            .iter()
            .take(self.forecast_days)
            .map(|day| convert_daily(day, &mut rng))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ShortTermForecast {
            location: location.label(),
            latitude: location.latitude,
            longitude: location.longitude,
            current,
            daily_forecasts,
            generated_at: Utc::now(),
            source: ForecastSource::Provider,
        })
    }
}

fn convert_current(block: &CurrentBlock) -> Result<WeatherSnapshot, WeatherError> {
    let rain = block.rain.as_ref().map_or(0.0, |v| v.one_hour);
    let snow = block.snow.as_ref().map_or(0.0, |v| v.one_hour);

    Ok(WeatherSnapshot {
        temperature: block.temp,
        humidity: percent(block.humidity),
        wind_speed: block.wind_speed,
        wind_direction: degrees(block.wind_deg),
        precipitation: rain + snow,
        cloud_cover: percent(block.clouds),
        visibility: block.visibility.unwrap_or(DEFAULT_VISIBILITY_M) / 1000.0,
        uv_index: block.uvi,
        condition: condition_of(&block.weather),
        timestamp: timestamp(block.dt)?,
    })
}

fn convert_daily<R: Rng>(block: &DailyBlock, rng: &mut R) -> Result<DailyForecast, WeatherError> {
    let date = timestamp(block.dt)?;
    let precipitation = block.rain.unwrap_or(0.0);
    let condition = condition_of(&block.weather);

    let snapshot = |temperature: f64, at: DateTime<Utc>| WeatherSnapshot {
        temperature,
        humidity: percent(block.humidity),
        wind_speed: block.wind_speed,
        wind_direction: degrees(block.wind_deg),
        precipitation,
        cloud_cover: percent(block.clouds),
        visibility: 10.0,
        uv_index: block.uvi,
        condition,
        timestamp: at,
    };

    let hourly_forecasts = (0..HOURLY_ENTRIES)
        .map(|i| {
            let time = date + TimeDelta::hours(i * HOURLY_STEP);
            let jitter = rng.random_range(-HOURLY_JITTER..=HOURLY_JITTER);
            let weather = snapshot(block.temp.day + jitter, time);
            HourlyForecast {
                time,
                comfort_index: comfort_index(&weather),
                weather,
            }
        })
        .collect();

    let mean = snapshot((block.temp.max + block.temp.min) / 2.0, date);

    Ok(DailyForecast {
        date,
        high_temp: block.temp.max,
        low_temp: block.temp.min,
        avg_humidity: percent(block.humidity),
        avg_wind_speed: block.wind_speed,
        total_precipitation: precipitation,
        condition,
        hourly_forecasts,
        comfort_index: comfort_index(&mean),
    })
}
