//! Clothing and gear advice.

use serde::{Deserialize, Serialize};
use sureweather_weather::{ForecastType, WeatherSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClothingItem {
    Umbrella,
    Sunglasses,
    Jacket,
    Sunscreen,
    Boots,
    Hat,
    Gloves,
    Scarf,
}

impl ClothingItem {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Umbrella => "☔",
            Self::Sunglasses => "🕶️",
            Self::Jacket => "🧥",
            Self::Sunscreen => "🧴",
            Self::Boots => "👢",
            Self::Hat => "👒",
            Self::Gloves => "🧤",
            Self::Scarf => "🧣",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Necessity {
    Essential,
    Optional,
}

/// Priority at which an item counts as essential
pub const ESSENTIAL_PRIORITY: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingRecommendation {
    pub item: ClothingItem,
    /// 1 (nice to have) to 5 (must have)
    pub priority: u8,
    pub necessity: Necessity,
    pub reason: String,
    pub icon: String,
}

impl ClothingRecommendation {
    pub fn new(item: ClothingItem, priority: u8, reason: impl Into<String>) -> Self {
        let necessity = if priority >= ESSENTIAL_PRIORITY {
            Necessity::Essential
        } else {
            Necessity::Optional
        };
        Self {
            item,
            priority,
            necessity,
            reason: reason.into(),
            icon: item.icon().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitRecommendation {
    pub location: String,
    pub forecast_type: ForecastType,
    pub recommendations: Vec<ClothingRecommendation>,
    pub comfort_tips: Vec<String>,
}

#[derive(Default)]
struct Outfit {
    items: Vec<ClothingRecommendation>,
    tips: Vec<String>,
}

impl Outfit {
    fn add(&mut self, item: ClothingItem, priority: u8, reason: impl Into<String>) {
        self.items.push(ClothingRecommendation::new(item, priority, reason));
    }

    fn tip(&mut self, tip: &str) {
        self.tips.push(tip.to_string());
    }
}

/// Recommend what to wear and carry for the given conditions.
///
/// Items are ordered by priority, highest first. An item can appear more
/// than once when several rules ask for it.
pub fn recommend_outfit(
    weather: &WeatherSnapshot,
    forecast_type: ForecastType,
    location: impl Into<String>,
) -> OutfitRecommendation {
    use ClothingItem::*;

    let mut o = Outfit::default();
    let temp = weather.temperature;

    if temp < 0.0 {
        o.add(Jacket, 5, "Very cold weather - heavy winter jacket essential");
        o.add(Gloves, 5, "Protect hands from freezing temperatures");
        o.add(Scarf, 4, "Protect neck and face from cold");
        o.add(Boots, 4, "Warm, waterproof footwear essential");
        o.tip("Layer up with thermal clothing");
        o.tip("Keep extremities warm to prevent frostbite");
    } else if temp < 10.0 {
        o.add(Jacket, 4, "Cold weather - warm jacket recommended");
        o.add(Gloves, 3, "Protect hands from cold");
        o.add(Boots, 3, "Warm, comfortable footwear");
        o.tip("Wear layers for easy temperature adjustment");
    } else if temp < 20.0 {
        o.add(Jacket, 2, "Light jacket for cool weather");
        o.tip("Dress in layers for comfort");
    } else if temp > 30.0 {
        o.add(Sunglasses, 4, "Protect eyes from bright sun");
        o.add(Sunscreen, 5, "Essential protection from UV rays");
        o.add(Hat, 4, "Protect head from sun and heat");
        o.tip("Wear light, breathable fabrics");
        o.tip("Stay hydrated and take breaks in shade");
    } else if temp > 25.0 {
        o.add(Sunglasses, 3, "Protect eyes from sun");
        o.add(Sunscreen, 4, "Protect skin from UV rays");
        o.tip("Wear light, comfortable clothing");
    }

    let precip = weather.precipitation;
    if precip > 5.0 {
        o.add(Umbrella, 5, "Heavy rain expected - umbrella essential");
        o.add(Boots, 4, "Waterproof footwear for wet conditions");
        o.add(Jacket, 4, "Waterproof jacket recommended");
        o.tip("Avoid cotton clothing - it stays wet longer");
        o.tip("Consider waterproof bags for electronics");
    } else if precip > 1.0 {
        o.add(Umbrella, 3, "Light rain expected");
        o.add(Jacket, 2, "Light rain protection");
        o.tip("Quick-drying fabrics recommended");
    }

    let wind = weather.wind_speed;
    if wind > 20.0 {
        o.add(Jacket, 3, "Windy conditions - windproof jacket recommended");
        o.add(Hat, 3, "Secure hat to protect from wind");
        o.tip("Secure loose items and hair");
        o.tip("Consider windproof layers");
    } else if wind > 15.0 {
        o.add(Jacket, 2, "Moderate wind - light windbreaker");
        o.tip("Dress in layers for wind protection");
    }

    let uv = weather.uv_index;
    if uv > 7.0 {
        o.add(Sunscreen, 5, format!("Very high UV index ({uv:.1}) - sunscreen essential"));
        o.add(Sunglasses, 4, "Protect eyes from intense UV");
        o.add(Hat, 4, "Protect head from intense sun");
        o.tip("Seek shade during peak sun hours (10 AM - 4 PM)");
        o.tip("Reapply sunscreen every 2 hours");
    } else if uv > 5.0 {
        o.add(Sunscreen, 4, format!("High UV index ({uv:.1}) - sunscreen recommended"));
        o.add(Sunglasses, 3, "Protect eyes from UV");
        o.tip("Apply sunscreen before going outside");
    }

    if weather.humidity > 80 {
        o.tip("High humidity - wear breathable fabrics");
        o.tip("Stay hydrated and take frequent breaks");
    } else if weather.humidity < 30 {
        o.tip("Low humidity - use moisturizer and stay hydrated");
    }

    match forecast_type {
        ForecastType::LongTerm => {
            o.tip("Plan ahead for seasonal weather changes");
            o.tip("Consider versatile clothing options");
        }
        ForecastType::ShortTerm => o.tip("Check weather updates throughout the day"),
    }

    // Stable: equal priorities keep rule order
    o.items.sort_by(|a, b| b.priority.cmp(&a.priority));

    OutfitRecommendation {
        location: location.into(),
        forecast_type,
        recommendations: o.items,
        comfort_tips: o.tips,
    }
}
