use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sureweather_core::WeatherError;

/// Weather condition categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Windy,
    Foggy,
    Stormy,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 7] = [
        Self::Sunny,
        Self::Cloudy,
        Self::Rainy,
        Self::Snowy,
        Self::Windy,
        Self::Foggy,
        Self::Stormy,
    ];

    /// Convert an OpenWeather `weather[].main` group to a WeatherCondition
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_provider_group(group: &str) -> Self {
        match group {
            "Clear" => Self::Sunny,
            "Clouds" => Self::Cloudy,
            "Rain" | "Drizzle" => Self::Rainy,
            "Snow" => Self::Snowy,
            "Thunderstorm" => Self::Stormy,
            "Mist" | "Fog" | "Haze" => Self::Foggy,
            _ => Self::Cloudy, // Unknown groups default to cloudy
        }
    }

    /// Conditions that rule out open-air plans
    pub fn is_wet(&self) -> bool {
        matches!(self, Self::Rainy | Self::Snowy | Self::Stormy)
    }
}

/// Forecast horizon requested by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForecastType {
    #[default]
    ShortTerm,
    LongTerm,
}

impl ForecastType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortTerm => "short_term",
            Self::LongTerm => "long_term",
        }
    }
}

impl std::fmt::Display for ForecastType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ForecastType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "short_term" => Ok(Self::ShortTerm),
            "long_term" => Ok(Self::LongTerm),
            other => Err(format!(
                "unknown forecast_type '{other}', expected short_term or long_term"
            )),
        }
    }
}

/// Where a short-term forecast came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSource {
    Provider,
    Fallback,
}

/// Geographic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: Option<String>,
}

impl Location {
    /// Build a location, rejecting coordinates outside the globe.
    pub fn new(
        latitude: f64,
        longitude: f64,
        city_name: Option<String>,
    ) -> Result<Self, WeatherError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherError::InvalidLocation(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidLocation(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        let city_name = city_name
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(Self {
            latitude,
            longitude,
            city_name,
        })
    }

    /// City name if known, otherwise "lat,lon"
    pub fn label(&self) -> String {
        match &self.city_name {
            Some(city) => city.clone(),
            None => format!("{},{}", self.latitude, self.longitude),
        }
    }
}

/// Conditions at a single point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub wind_direction: u16,
    pub precipitation: f64,
    pub cloud_cover: u8,
    /// Kilometres
    pub visibility: f64,
    pub uv_index: f64,
    pub condition: WeatherCondition,
    pub timestamp: DateTime<Utc>,
}

/// Hourly forecast entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time: DateTime<Utc>,
    pub weather: WeatherSnapshot,
    pub comfort_index: f64,
}

/// Daily forecast entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: DateTime<Utc>,
    pub high_temp: f64,
    pub low_temp: f64,
    pub avg_humidity: u8,
    pub avg_wind_speed: f64,
    pub total_precipitation: f64,
    pub condition: WeatherCondition,
    pub hourly_forecasts: Vec<HourlyForecast>,
    pub comfort_index: f64,
}

/// Up to 16 days of forecast for one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortTermForecast {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub current: WeatherSnapshot,
    pub daily_forecasts: Vec<DailyForecast>,
    pub generated_at: DateTime<Utc>,
    pub source: ForecastSource,
}

/// Likelihood of extreme conditions in a month, each in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateProbability {
    /// > 35°C
    pub very_hot: f64,
    /// < 0°C
    pub very_cold: f64,
    /// > 10mm precipitation
    pub very_wet: f64,
    /// > 20 km/h
    pub very_windy: f64,
    pub uncomfortable: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyOutlook {
    pub month: u32,
    pub month_name: String,
    pub probabilities: ClimateProbability,
    pub avg_temperature: f64,
    pub avg_precipitation: f64,
}

/// Latitude band used by the seasonal model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateZone {
    Tropical,
    Subtropical,
    Temperate,
    Continental,
    Polar,
}

/// Six-month seasonal outlook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongTermForecast {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub climate_zone: ClimateZone,
    pub monthly_outlooks: Vec<MonthlyOutlook>,
    pub generated_at: DateTime<Utc>,
}

impl LongTermForecast {
    /// Representative conditions for the first outlook month.
    ///
    /// Fields the outlook does not model use fixed defaults.
    pub fn representative_conditions(&self) -> WeatherSnapshot {
        let (temperature, precipitation) = self
            .monthly_outlooks
            .first()
            .map(|m| (m.avg_temperature, m.avg_precipitation))
            .unwrap_or((20.0, 0.0));

        WeatherSnapshot {
            temperature,
            humidity: 60,
            wind_speed: 10.0,
            wind_direction: 0,
            precipitation,
            cloud_cover: 50,
            visibility: 10.0,
            uv_index: 5.0,
            condition: WeatherCondition::Sunny,
            timestamp: self.generated_at,
        }
    }
}
