//! Comfort index: how pleasant conditions are for people outdoors, 0-100.

use crate::types::WeatherSnapshot;

const IDEAL_TEMPERATURE: f64 = 22.5;
const IDEAL_HUMIDITY: f64 = 50.0;
const IDEAL_WIND: f64 = 8.0;

/// Score a snapshot. Always within [0, 100].
pub fn comfort_index(weather: &WeatherSnapshot) -> f64 {
    let temp_score = (100.0 - (weather.temperature - IDEAL_TEMPERATURE).abs() * 4.0).max(0.0);
    let humidity_score =
        (100.0 - (f64::from(weather.humidity) - IDEAL_HUMIDITY).abs() * 1.5).max(0.0);
    let wind_score = (100.0 - (weather.wind_speed - IDEAL_WIND).abs() * 5.0).max(0.0);

    let precip_penalty = (weather.precipitation * 10.0).min(50.0);
    let uv_penalty = ((weather.uv_index - 6.0).max(0.0) * 5.0).min(30.0);
    let visibility_penalty = ((10.0 - weather.visibility).max(0.0) * 2.0).min(20.0);

    let comfort = (temp_score + humidity_score + wind_score) / 3.0
        - precip_penalty
        - uv_penalty
        - visibility_penalty;

    if comfort.is_nan() {
        return 0.0;
    }
    comfort.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WeatherCondition;
    use chrono::Utc;

    fn snapshot(temperature: f64, humidity: u8, wind_speed: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature,
            humidity,
            wind_speed,
            wind_direction: 180,
            precipitation: 0.0,
            cloud_cover: 20,
            visibility: 10.0,
            uv_index: 3.0,
            condition: WeatherCondition::Sunny,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_ideal_conditions_score_full() {
        let weather = snapshot(22.5, 50, 8.0);
        assert!((comfort_index(&weather) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_penalties_reduce_score() {
        let mut weather = snapshot(22.5, 50, 8.0);
        weather.precipitation = 2.0; // -20
        weather.uv_index = 8.0; // -10
        weather.visibility = 7.0; // -6
        assert!((comfort_index(&weather) - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_penalties_are_capped() {
        let mut weather = snapshot(22.5, 50, 8.0);
        weather.precipitation = 100.0;
        weather.uv_index = 20.0;
        weather.visibility = 0.0;
        // 100 - 50 - 30 - 20
        assert_eq!(comfort_index(&weather), 0.0);
    }

    #[test]
    fn test_extremes_stay_in_range() {
        for (t, h, w) in [(-40.0, 0, 0.0), (55.0, 100, 120.0), (22.5, 50, 8.0)] {
            let score = comfort_index(&snapshot(t, h, w));
            assert!((0.0..=100.0).contains(&score), "score {score} out of range");
        }
    }
}
