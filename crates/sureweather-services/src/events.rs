//! Event catalog and event categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How an event relates to the weather
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    SunnyFriendly,
    RainCompatible,
    WindBased,
    ColdWeather,
    Uncomfortable,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        Self::SunnyFriendly,
        Self::RainCompatible,
        Self::WindBased,
        Self::ColdWeather,
        Self::Uncomfortable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SunnyFriendly => "sunny_friendly",
            Self::RainCompatible => "rain_compatible",
            Self::WindBased => "wind_based",
            Self::ColdWeather => "cold_weather",
            Self::Uncomfortable => "uncomfortable",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown event category '{s}'"))
    }
}

/// Parse a comma-separated category list. Blank entries are skipped.
pub fn parse_categories(list: &str) -> Result<Vec<EventCategory>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(EventCategory::from_str)
        .collect()
}

/// Weather limits an event cares about. Absent limits are not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_wind: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wind: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_precipitation: Option<f64>,
    /// Recorded for reference, not scored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_precipitation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_visibility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub category: EventCategory,
    pub description: String,
    pub weather_requirements: WeatherRequirements,
    pub min_comfort_score: f64,
}

/// Read-only set of known events
#[derive(Debug, Clone)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EventCatalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// The five events shipped with the service
    pub fn builtin() -> Self {
        let event = |id: &str,
                     name: &str,
                     category: EventCategory,
                     description: &str,
                     weather_requirements: WeatherRequirements,
                     min_comfort_score: f64| Event {
            id: id.to_string(),
            name: name.to_string(),
            category,
            description: description.to_string(),
            weather_requirements,
            min_comfort_score,
        };

        Self::new(vec![
            event(
                "concert",
                "Outdoor Concert",
                EventCategory::SunnyFriendly,
                "Music festival in open air",
                WeatherRequirements {
                    max_wind: Some(15.0),
                    min_temp: Some(15.0),
                    max_precipitation: Some(2.0),
                    ..Default::default()
                },
                70.0,
            ),
            event(
                "museum",
                "Museum Tour",
                EventCategory::RainCompatible,
                "Indoor cultural experience",
                WeatherRequirements {
                    max_wind: Some(30.0),
                    min_temp: Some(5.0),
                    max_precipitation: Some(50.0),
                    ..Default::default()
                },
                30.0,
            ),
            event(
                "kite_festival",
                "Kite Festival",
                EventCategory::WindBased,
                "Wind-powered kite flying",
                WeatherRequirements {
                    min_wind: Some(10.0),
                    max_wind: Some(25.0),
                    min_temp: Some(10.0),
                    max_precipitation: Some(5.0),
                    ..Default::default()
                },
                60.0,
            ),
            event(
                "skiing",
                "Skiing Adventure",
                EventCategory::ColdWeather,
                "Snow sports and winter activities",
                WeatherRequirements {
                    max_temp: Some(5.0),
                    min_precipitation: Some(5.0),
                    max_wind: Some(20.0),
                    ..Default::default()
                },
                50.0,
            ),
            event(
                "hiking",
                "Mountain Hiking",
                EventCategory::SunnyFriendly,
                "Outdoor nature exploration",
                WeatherRequirements {
                    max_wind: Some(20.0),
                    min_temp: Some(10.0),
                    max_precipitation: Some(5.0),
                    min_visibility: Some(5.0),
                    ..Default::default()
                },
                80.0,
            ),
        ])
    }

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events in any of `categories`; an empty list means every event.
    pub fn filter(&self, categories: &[EventCategory]) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| categories.is_empty() || categories.contains(&e.category))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = EventCatalog::builtin();
        assert_eq!(catalog.len(), 5);

        let hiking = catalog.get("hiking").unwrap();
        assert_eq!(hiking.name, "Mountain Hiking");
        assert_eq!(hiking.category, EventCategory::SunnyFriendly);
        assert_eq!(hiking.weather_requirements.min_visibility, Some(5.0));
        assert_eq!(hiking.min_comfort_score, 80.0);

        assert!(catalog.get("bowling").is_none());
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = EventCatalog::builtin();
        let sunny = catalog.filter(&[EventCategory::SunnyFriendly]);
        let ids: Vec<_> = sunny.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["concert", "hiking"]);

        assert_eq!(catalog.filter(&[]).len(), 5);
        assert!(catalog.filter(&[EventCategory::Uncomfortable]).is_empty());
    }

    #[test]
    fn test_parse_categories() {
        assert_eq!(
            parse_categories(" wind_based, ,cold_weather ").unwrap(),
            vec![EventCategory::WindBased, EventCategory::ColdWeather]
        );
        assert!(parse_categories("").unwrap().is_empty());
        assert!(parse_categories("sunny_friendly,beach").is_err());
    }

    #[test]
    fn test_requirements_serialize_only_present_limits() {
        let catalog = EventCatalog::builtin();
        let json = serde_json::to_value(catalog.get("skiing").unwrap()).unwrap();
        let reqs = json["weather_requirements"].as_object().unwrap();
        assert_eq!(reqs.len(), 3);
        assert_eq!(json["category"], "cold_weather");
    }
}
