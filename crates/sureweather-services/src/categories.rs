//! Category profiles and a keyword classifier for free-form events.

use serde::Serialize;
use sureweather_weather::WeatherSnapshot;

use crate::events::EventCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UvTolerance {
    Low,
    Medium,
    High,
}

/// Weather a category prefers
#[derive(Debug, Clone, Serialize)]
pub struct WeatherPreferences {
    pub optimal_conditions: &'static [&'static str],
    pub temperature_range: (f64, f64),
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_wind: Option<f64>,
    pub max_wind: f64,
    pub max_precipitation: f64,
    pub min_visibility: f64,
    pub uv_tolerance: UvTolerance,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryProfile {
    pub category: EventCategory,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub weather_preferences: WeatherPreferences,
    pub examples: &'static [&'static str],
    pub gear_recommendations: &'static [&'static str],
}

static SUNNY_FRIENDLY: CategoryProfile = CategoryProfile {
    category: EventCategory::SunnyFriendly,
    name: "Sunny-Friendly Events",
    description: "Events that thrive in clear, sunny weather",
    icon: "☀️",
    weather_preferences: WeatherPreferences {
        optimal_conditions: &["sunny", "partly_cloudy"],
        temperature_range: (15.0, 30.0),
        min_wind: None,
        max_wind: 20.0,
        max_precipitation: 2.0,
        min_visibility: 8.0,
        uv_tolerance: UvTolerance::High,
    },
    examples: &[
        "Outdoor concerts",
        "Festivals",
        "Hiking",
        "Beach activities",
        "Sports events",
        "Picnics",
        "Garden tours",
        "Outdoor markets",
    ],
    gear_recommendations: &["sunscreen", "sunglasses", "hat", "water"],
};

static RAIN_COMPATIBLE: CategoryProfile = CategoryProfile {
    category: EventCategory::RainCompatible,
    name: "Rain-Compatible Events",
    description: "Events that work well in wet weather or are indoor",
    icon: "🌧️",
    weather_preferences: WeatherPreferences {
        optimal_conditions: &["rainy", "cloudy", "sunny"],
        temperature_range: (5.0, 35.0),
        min_wind: None,
        max_wind: 30.0,
        max_precipitation: 50.0,
        min_visibility: 3.0,
        uv_tolerance: UvTolerance::Low,
    },
    examples: &[
        "Museum tours",
        "Indoor concerts",
        "Art galleries",
        "Shopping centers",
        "Theater shows",
        "Indoor sports",
        "Cooking classes",
        "Library events",
    ],
    gear_recommendations: &["umbrella", "raincoat", "waterproof_bag"],
};

static WIND_BASED: CategoryProfile = CategoryProfile {
    category: EventCategory::WindBased,
    name: "Wind-Based Events",
    description: "Events that require or benefit from wind",
    icon: "🌬️",
    weather_preferences: WeatherPreferences {
        optimal_conditions: &["windy", "partly_cloudy", "sunny"],
        temperature_range: (5.0, 30.0),
        min_wind: Some(10.0),
        max_wind: 25.0,
        max_precipitation: 5.0,
        min_visibility: 5.0,
        uv_tolerance: UvTolerance::Medium,
    },
    examples: &[
        "Kite festivals",
        "Sailing",
        "Paragliding",
        "Wind surfing",
        "Hot air ballooning",
        "Wind energy tours",
        "Flag ceremonies",
    ],
    gear_recommendations: &["windbreaker", "secure_hat", "goggles"],
};

static COLD_WEATHER: CategoryProfile = CategoryProfile {
    category: EventCategory::ColdWeather,
    name: "Cold-Weather Events",
    description: "Events designed for cold or winter conditions",
    icon: "❄️",
    weather_preferences: WeatherPreferences {
        optimal_conditions: &["snowy", "cold", "clear"],
        temperature_range: (-20.0, 10.0),
        min_wind: None,
        max_wind: 20.0,
        max_precipitation: 20.0,
        min_visibility: 5.0,
        uv_tolerance: UvTolerance::Low,
    },
    examples: &[
        "Skiing",
        "Ice skating",
        "Snowboarding",
        "Winter festivals",
        "Hot spring visits",
        "Winter hiking",
        "Ice fishing",
        "Christmas markets",
    ],
    gear_recommendations: &["warm_jacket", "gloves", "boots", "thermal_clothing"],
};

static UNCOMFORTABLE: CategoryProfile = CategoryProfile {
    category: EventCategory::Uncomfortable,
    name: "Weather-Sensitive Events",
    description: "Events that may be uncomfortable in certain weather",
    icon: "😓",
    weather_preferences: WeatherPreferences {
        optimal_conditions: &["mild", "calm"],
        temperature_range: (10.0, 25.0),
        min_wind: None,
        max_wind: 15.0,
        max_precipitation: 1.0,
        min_visibility: 10.0,
        uv_tolerance: UvTolerance::Low,
    },
    examples: &[
        "Outdoor dining",
        "Wedding ceremonies",
        "Outdoor photography",
        "Children's outdoor activities",
        "Elderly group activities",
    ],
    gear_recommendations: &["weather_protection", "comfort_items"],
};

impl EventCategory {
    pub fn profile(&self) -> &'static CategoryProfile {
        match self {
            Self::SunnyFriendly => &SUNNY_FRIENDLY,
            Self::RainCompatible => &RAIN_COMPATIBLE,
            Self::WindBased => &WIND_BASED,
            Self::ColdWeather => &COLD_WEATHER,
            Self::Uncomfortable => &UNCOMFORTABLE,
        }
    }
}

/// Profiles of every category, in declaration order
pub fn all_profiles() -> Vec<&'static CategoryProfile> {
    EventCategory::ALL.iter().map(EventCategory::profile).collect()
}

const KEYWORDS: [(EventCategory, &[&str]); 4] = [
    (
        EventCategory::SunnyFriendly,
        &[
            "outdoor", "beach", "park", "garden", "festival", "concert", "sports", "hiking",
            "picnic", "market", "fair", "carnival",
        ],
    ),
    (
        EventCategory::RainCompatible,
        &[
            "museum",
            "gallery",
            "theater",
            "indoor",
            "shopping",
            "library",
            "cooking",
            "class",
            "workshop",
            "exhibition",
            "show",
        ],
    ),
    (
        EventCategory::WindBased,
        &[
            "kite",
            "sailing",
            "paragliding",
            "wind",
            "balloon",
            "surfing",
            "flying",
            "flag",
            "energy",
        ],
    ),
    (
        EventCategory::ColdWeather,
        &[
            "ski",
            "snow",
            "ice",
            "winter",
            "cold",
            "hot spring",
            "thermal",
            "christmas",
            "holiday",
        ],
    ),
];

/// Guess the category of an event from its name and description.
///
/// Counts keyword hits per category; the first category with the most hits
/// wins. No hits at all means `Uncomfortable`.
pub fn classify(name: &str, description: &str) -> EventCategory {
    let text = format!("{name} {description}").to_lowercase();

    let mut best = (EventCategory::Uncomfortable, 0);
    for (category, keywords) in KEYWORDS {
        let hits = keywords.iter().filter(|k| text.contains(*k)).count();
        if hits > best.1 {
            best = (category, hits);
        }
    }
    best.0
}

/// How well the weather fits a category's preferences, 0-100.
pub fn category_suitability(category: EventCategory, weather: &WeatherSnapshot) -> f64 {
    let prefs = &category.profile().weather_preferences;
    let mut score: f64 = 100.0;

    let temp = weather.temperature;
    let (min_temp, max_temp) = prefs.temperature_range;
    if temp < min_temp {
        score -= (min_temp - temp) * 2.0;
    } else if temp > max_temp {
        score -= (temp - max_temp) * 1.5;
    }

    let wind = weather.wind_speed;
    if let Some(min_wind) = prefs.min_wind.filter(|&m| wind < m) {
        score -= (min_wind - wind) * 3.0;
    }
    if wind > prefs.max_wind {
        score -= (wind - prefs.max_wind) * 2.0;
    }

    if weather.precipitation > prefs.max_precipitation {
        score -= (weather.precipitation - prefs.max_precipitation) * 4.0;
    }

    if weather.visibility < prefs.min_visibility {
        score -= (prefs.min_visibility - weather.visibility) * 2.0;
    }

    let uv = weather.uv_index;
    match prefs.uv_tolerance {
        UvTolerance::Low if uv > 6.0 => score -= (uv - 6.0) * 3.0,
        UvTolerance::High if uv < 3.0 => score -= (3.0 - uv) * 2.0,
        _ => {}
    }

    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::Utc;
    use sureweather_weather::WeatherCondition;

    fn weather(temperature: f64, wind_speed: f64, uv_index: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature,
            humidity: 50,
            wind_speed,
            wind_direction: 0,
            precipitation: 0.0,
            cloud_cover: 10,
            visibility: 10.0,
            uv_index,
            condition: WeatherCondition::Sunny,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_classify_by_keywords() {
        assert_eq!(classify("Kite flying day", ""), EventCategory::WindBased);
        assert_eq!(classify("Art exhibition", "at the gallery"), EventCategory::RainCompatible);
        assert_eq!(classify("Winter ski trip", ""), EventCategory::ColdWeather);
        assert_eq!(classify("Beach picnic", "in the park"), EventCategory::SunnyFriendly);
    }

    #[test]
    fn test_classify_without_hits() {
        assert_eq!(classify("Board meeting", "quarterly review"), EventCategory::Uncomfortable);
    }

    #[test]
    fn test_classify_tie_prefers_declaration_order() {
        // one sunny hit ("outdoor"), one rain hit ("museum")
        assert_eq!(classify("outdoor museum", ""), EventCategory::SunnyFriendly);
    }

    #[test]
    fn test_profiles_cover_every_category() {
        let profiles = all_profiles();
        assert_eq!(profiles.len(), 5);
        for (profile, category) in profiles.iter().zip(EventCategory::ALL) {
            assert_eq!(profile.category, category);
        }
        assert_eq!(EventCategory::WindBased.profile().weather_preferences.min_wind, Some(10.0));
    }

    #[test]
    fn test_category_suitability() {
        assert_eq!(category_suitability(EventCategory::SunnyFriendly, &weather(22.0, 8.0, 5.0)), 100.0);
        // below 10 km/h by 6 -> -18
        assert_eq!(category_suitability(EventCategory::WindBased, &weather(20.0, 4.0, 5.0)), 82.0);
        // uv 9 with low tolerance -> -9
        assert_eq!(category_suitability(EventCategory::RainCompatible, &weather(20.0, 8.0, 9.0)), 91.0);
        // 30 degrees too warm for cold weather events -> -45
        assert_eq!(category_suitability(EventCategory::ColdWeather, &weather(40.0, 8.0, 5.0)), 55.0);
    }

    #[test]
    fn test_profile_serializes() {
        let json = serde_json::to_value(EventCategory::ColdWeather.profile()).unwrap();
        assert_eq!(json["category"], "cold_weather");
        assert_eq!(json["weather_preferences"]["uv_tolerance"], "low");
        assert!(json["weather_preferences"].get("min_wind").is_none());
    }
}
