//! Event suitability scoring.
//!
//! A score starts at 100 and loses points for every requirement the weather
//! misses. Category rules and general comfort then adjust it before it is
//! clamped to [0, 100].

use serde::{Deserialize, Serialize};
use sureweather_weather::{WeatherCondition, WeatherSnapshot};
use thiserror::Error;

use crate::events::{Event, EventCatalog, EventCategory};

/// Maximum number of events returned by [`EventScorer::recommend`]
pub const MAX_RECOMMENDATIONS: usize = 10;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Event not found: {0}")]
    EventNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSuitabilityScore {
    pub event_id: String,
    pub event_name: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Running tally for one event
#[derive(Default)]
struct Tally {
    score: f64,
    reasons: Vec<String>,
    recommendations: Vec<String>,
}

impl Tally {
    fn penalize(&mut self, points: f64, reason: String, recommendation: Option<&str>) {
        self.score -= points;
        self.reasons.push(reason);
        if let Some(r) = recommendation {
            self.recommendations.push(r.to_string());
        }
    }
}

fn verdict(score: f64) -> &'static str {
    if score >= 80.0 {
        "Excellent weather conditions for this event"
    } else if score >= 60.0 {
        "Good weather conditions for this event"
    } else if score >= 40.0 {
        "Moderate weather conditions - proceed with caution"
    } else {
        "Poor weather conditions for this event"
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventScorer {
    catalog: EventCatalog,
}

impl EventScorer {
    pub fn new(catalog: EventCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Score one catalog event by id.
    ///
    /// # Errors
    /// Returns `ScoringError::EventNotFound` for an unknown id.
    pub fn score_event(
        &self,
        event_id: &str,
        weather: &WeatherSnapshot,
    ) -> Result<EventSuitabilityScore, ScoringError> {
        let event = self
            .catalog
            .get(event_id)
            .ok_or_else(|| ScoringError::EventNotFound(event_id.to_string()))?;
        Ok(score(event, weather))
    }

    /// Events that clear their own minimum score, best first.
    pub fn recommend(
        &self,
        weather: &WeatherSnapshot,
        categories: &[EventCategory],
    ) -> Vec<EventSuitabilityScore> {
        let mut suitable: Vec<_> = self
            .catalog
            .filter(categories)
            .into_iter()
            .filter_map(|event| {
                let result = score(event, weather);
                (result.score >= event.min_comfort_score).then_some(result)
            })
            .collect();

        suitable.sort_by(|a, b| b.score.total_cmp(&a.score));
        suitable.truncate(MAX_RECOMMENDATIONS);
        suitable
    }
}

/// Score an event against a weather snapshot.
pub fn score(event: &Event, weather: &WeatherSnapshot) -> EventSuitabilityScore {
    let reqs = &event.weather_requirements;
    let temp = weather.temperature;
    let wind = weather.wind_speed;
    let precip = weather.precipitation;
    let visibility = weather.visibility;

    let mut t = Tally {
        score: 100.0,
        ..Tally::default()
    };

    if let Some(min) = reqs.min_temp.filter(|&min| temp < min) {
        t.penalize(
            (min - temp) * 5.0,
            format!("Temperature too low ({temp:.1}°C < {min}°C)"),
            Some("Consider indoor alternatives or wait for warmer weather"),
        );
    }
    if let Some(max) = reqs.max_temp.filter(|&max| temp > max) {
        t.penalize(
            (temp - max) * 3.0,
            format!("Temperature too high ({temp:.1}°C > {max}°C)"),
            Some("Consider early morning or evening timing"),
        );
    }

    if let Some(min) = reqs.min_wind.filter(|&min| wind < min) {
        t.penalize(
            (min - wind) * 2.0,
            format!("Wind too light ({wind:.1} km/h < {min} km/h)"),
            Some("Wait for windier conditions or consider alternative activities"),
        );
    }
    if let Some(max) = reqs.max_wind.filter(|&max| wind > max) {
        t.penalize(
            (wind - max) * 4.0,
            format!("Wind too strong ({wind:.1} km/h > {max} km/h)"),
            Some("Consider indoor alternatives or wait for calmer conditions"),
        );
    }

    if let Some(max) = reqs.max_precipitation.filter(|&max| precip > max) {
        t.penalize(
            (precip - max) * 8.0,
            format!("Too much precipitation ({precip:.1}mm > {max}mm)"),
            Some("Consider indoor alternatives or wait for drier conditions"),
        );
    }

    if let Some(min) = reqs.min_visibility.filter(|&min| visibility < min) {
        t.penalize(
            (min - visibility) * 3.0,
            format!("Poor visibility ({visibility:.1}km < {min}km)"),
            Some("Wait for clearer conditions"),
        );
    }

    // Only the first matching category rule applies
    match event.category {
        EventCategory::SunnyFriendly if weather.condition.is_wet() => t.penalize(
            30.0,
            "Weather not suitable for outdoor sunny activities".into(),
            Some("Consider indoor alternatives or wait for better weather"),
        ),
        EventCategory::RainCompatible
            if matches!(
                weather.condition,
                WeatherCondition::Sunny | WeatherCondition::Cloudy
            ) =>
        {
            t.penalize(-10.0, "Perfect weather for this indoor activity".into(), None)
        }
        EventCategory::WindBased if wind < 5.0 => t.penalize(
            20.0,
            "Insufficient wind for wind-based activities".into(),
            Some("Wait for windier conditions"),
        ),
        EventCategory::ColdWeather if temp > 10.0 => t.penalize(
            25.0,
            "Too warm for cold-weather activities".into(),
            Some("Consider winter alternatives or wait for colder weather"),
        ),
        _ => {}
    }

    if weather.humidity > 80 {
        t.penalize(
            10.0,
            "High humidity may cause discomfort".into(),
            Some("Stay hydrated and take breaks"),
        );
    }
    if wind > 20.0 {
        t.penalize(
            15.0,
            "Strong winds may cause discomfort".into(),
            Some("Dress appropriately and secure loose items"),
        );
    }

    let score = if t.score.is_nan() {
        0.0
    } else {
        t.score.clamp(0.0, 100.0)
    };
    t.reasons.push(verdict(score).to_string());

    EventSuitabilityScore {
        event_id: event.id.clone(),
        event_name: event.name.clone(),
        score,
        reasons: t.reasons,
        recommendations: t.recommendations,
    }
}
