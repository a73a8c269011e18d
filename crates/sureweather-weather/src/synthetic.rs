//! Synthetic forecasts used when the provider is unavailable.

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::comfort::comfort_index;
use crate::provider::HOURLY_STEP;
use crate::types::{
    DailyForecast, ForecastSource, HourlyForecast, Location, ShortTermForecast, WeatherCondition,
    WeatherSnapshot,
};

/// Random but plausible forecast generator.
///
/// Seed it with [`FallbackGenerator::seeded`] to get reproducible output.
#[derive(Debug)]
pub struct FallbackGenerator {
    rng: Mutex<StdRng>,
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Build a full forecast of `days` daily entries for a location.
    pub fn generate(&self, location: &Location, days: usize) -> ShortTermForecast {
        let now = Utc::now();
        let mut rng = self.rng.lock();

        let current = current_conditions(&mut *rng, now);
        let daily_forecasts = (0..days)
            .map(|offset| daily(&mut *rng, now, offset))
            .collect();

        tracing::debug!(location = %location.label(), days, "Generated fallback forecast");

        ShortTermForecast {
            location: location.label(),
            latitude: location.latitude,
            longitude: location.longitude,
            current,
            daily_forecasts,
            generated_at: now,
            source: ForecastSource::Fallback,
        }
    }
}

fn any_condition<R: Rng>(rng: &mut R) -> WeatherCondition {
    WeatherCondition::ALL[rng.random_range(0..WeatherCondition::ALL.len())]
}

fn current_conditions<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> WeatherSnapshot {
    WeatherSnapshot {
        temperature: rng.random_range(15.0..25.0),
        humidity: rng.random_range(30..=80),
        wind_speed: rng.random_range(2.0..15.0),
        wind_direction: rng.random_range(0..=360),
        precipitation: rng.random_range(0.0..5.0),
        cloud_cover: rng.random_range(10..=90),
        visibility: rng.random_range(5.0..15.0),
        uv_index: rng.random_range(0.0..10.0),
        condition: any_condition(rng),
        timestamp: now,
    }
}

fn daily<R: Rng>(rng: &mut R, now: DateTime<Utc>, offset: usize) -> DailyForecast {
    let date = now + TimeDelta::days(offset as i64);

    let base = rng.random_range(10.0..30.0);
    let high_temp = base + rng.random_range(2.0..8.0);
    let low_temp = base - rng.random_range(2.0..8.0);

    let hourly_forecasts = (0..24 / HOURLY_STEP)
        .map(|i| {
            let hour = i * HOURLY_STEP;
            let time = date + TimeDelta::hours(hour);
            // Ramp from the low towards the high over the day
            let ramp = (high_temp - low_temp) * (hour as f64 / 24.0);
            let weather = WeatherSnapshot {
                temperature: low_temp + ramp + rng.random_range(-2.0..2.0),
                humidity: rng.random_range(40..=90),
                wind_speed: rng.random_range(1.0..20.0),
                wind_direction: rng.random_range(0..=360),
                precipitation: rng.random_range(0.0..10.0),
                cloud_cover: rng.random_range(20..=100),
                visibility: rng.random_range(3.0..15.0),
                uv_index: rng.random_range(0.0..11.0),
                condition: any_condition(rng),
                timestamp: time,
            };
            HourlyForecast {
                time,
                comfort_index: comfort_index(&weather),
                weather,
            }
        })
        .collect();

    let average = WeatherSnapshot {
        temperature: (high_temp + low_temp) / 2.0,
        humidity: rng.random_range(40..=80),
        wind_speed: rng.random_range(3.0..15.0),
        wind_direction: rng.random_range(0..=360),
        precipitation: rng.random_range(0.0..8.0),
        cloud_cover: rng.random_range(30..=80),
        visibility: rng.random_range(5.0..15.0),
        uv_index: rng.random_range(1.0..8.0),
        condition: any_condition(rng),
        timestamp: date,
    };

    DailyForecast {
        date,
        high_temp,
        low_temp,
        avg_humidity: average.humidity,
        avg_wind_speed: average.wind_speed,
        total_precipitation: average.precipitation,
        condition: average.condition,
        hourly_forecasts,
        comfort_index: comfort_index(&average),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn location() -> Location {
        Location::new(48.85, 2.35, Some("Paris".into())).unwrap()
    }

    #[test]
    fn test_generate_shape() {
        let forecast = FallbackGenerator::seeded(7).generate(&location(), 16);

        assert_eq!(forecast.source, ForecastSource::Fallback);
        assert_eq!(forecast.location, "Paris");
        assert_eq!(forecast.daily_forecasts.len(), 16);
        for day in &forecast.daily_forecasts {
            assert_eq!(day.hourly_forecasts.len(), 8);
            assert!(day.high_temp > day.low_temp);
            assert!((0.0..=100.0).contains(&day.comfort_index));
        }
    }

    #[test]
    fn test_current_within_ranges() {
        let generator = FallbackGenerator::seeded(42);
        for _ in 0..50 {
            let current = generator.generate(&location(), 0).current;
            assert!((15.0..25.0).contains(&current.temperature));
            assert!((30..=80).contains(&current.humidity));
            assert!((2.0..15.0).contains(&current.wind_speed));
            assert!(current.wind_direction <= 360);
            assert!((10..=90).contains(&current.cloud_cover));
            assert!((5.0..15.0).contains(&current.visibility));
        }
    }

    #[test]
    fn test_seeded_generators_agree() {
        let a = FallbackGenerator::seeded(99).generate(&location(), 3);
        let b = FallbackGenerator::seeded(99).generate(&location(), 3);

        assert_eq!(a.current.temperature, b.current.temperature);
        assert_eq!(a.current.condition, b.current.condition);
        for (x, y) in a.daily_forecasts.iter().zip(&b.daily_forecasts) {
            assert_eq!(x.high_temp, y.high_temp);
            assert_eq!(x.total_precipitation, y.total_precipitation);
        }
    }
}
