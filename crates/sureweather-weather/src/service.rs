use chrono::Utc;
use sureweather_core::{WeatherConfig, WeatherError};
use tracing::instrument;

use crate::cache::ForecastCache;
use crate::outlook::long_term_outlook;
use crate::provider::OpenWeatherProvider;
use crate::synthetic::FallbackGenerator;
use crate::types::{ForecastType, Location, LongTermForecast, ShortTermForecast, WeatherSnapshot};

/// Forecast orchestration: cache, then provider, then fallback.
#[derive(Debug)]
pub struct WeatherService {
    provider: Option<OpenWeatherProvider>,
    fallback: FallbackGenerator,
    cache: ForecastCache,
    forecast_days: usize,
}

impl WeatherService {
    pub fn new(
        provider: Option<OpenWeatherProvider>,
        fallback: FallbackGenerator,
        cache: ForecastCache,
        forecast_days: usize,
    ) -> Self {
        Self {
            provider,
            fallback,
            cache,
            forecast_days,
        }
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let provider = OpenWeatherProvider::from_config(config)?;
        if provider.is_none() {
            tracing::warn!("No OpenWeather API key configured, serving fallback forecasts");
        }

        Ok(Self::new(
            provider,
            FallbackGenerator::new(),
            ForecastCache::from_minutes(config.cache_minutes),
            config.forecast_days,
        ))
    }

    /// Service with no provider. Every short-term forecast is synthetic.
    pub fn offline(fallback: FallbackGenerator, forecast_days: usize) -> Self {
        Self::new(None, fallback, ForecastCache::from_minutes(0), forecast_days)
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Short-term forecast. Provider failures fall back to synthetic data.
    #[instrument(skip(self), fields(location = %location.label()))]
    pub async fn short_term(&self, location: &Location) -> ShortTermForecast {
        if let Some(cached) = self.cache.get(location) {
            tracing::debug!("Forecast cache hit");
            return cached;
        }

        if let Some(provider) = &self.provider {
            match provider.fetch(location).await {
                Ok(forecast) => {
                    self.cache.insert(location, &forecast);
                    return forecast;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Provider forecast failed, using fallback generator");
                }
            }
        }

        self.fallback.generate(location, self.forecast_days)
    }

    /// Seasonal outlook for the next six months
    pub fn long_term(&self, location: &Location) -> LongTermForecast {
        long_term_outlook(location, Utc::now())
    }

    /// Representative conditions for scoring and clothing advice.
    ///
    /// Returns the location label alongside the snapshot.
    pub async fn conditions(
        &self,
        location: &Location,
        forecast_type: ForecastType,
    ) -> (String, WeatherSnapshot) {
        match forecast_type {
            ForecastType::ShortTerm => {
                let forecast = self.short_term(location).await;
                (forecast.location, forecast.current)
            }
            ForecastType::LongTerm => {
                let forecast = self.long_term(location);
                let snapshot = forecast.representative_conditions();
                (forecast.location, snapshot)
            }
        }
    }
}
