//! Deterministic six-month seasonal outlook.
//!
//! Each month starts from a per-zone seasonal baseline, then gets nudged by
//! latitude (higher means more extreme seasons) and longitude (continental
//! versus maritime exposure).

use chrono::{DateTime, Datelike, Utc};

use crate::types::{ClimateProbability, ClimateZone, Location, LongTermForecast, MonthlyOutlook};

pub const OUTLOOK_MONTHS: u32 = 6;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Northern-hemisphere season of a calendar month
    fn of_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::Winter,
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            _ => Self::Fall,
        }
    }

    fn at(month: u32, latitude: f64) -> Self {
        if latitude < 0.0 {
            Self::of_month((month + 5) % 12 + 1)
        } else {
            Self::of_month(month)
        }
    }
}

impl ClimateZone {
    /// Zone of a latitude band, by absolute latitude
    pub fn from_latitude(latitude: f64) -> Self {
        match latitude.abs() {
            l if l <= 23.5 => Self::Tropical,
            l if l <= 35.0 => Self::Subtropical,
            l if l <= 50.0 => Self::Temperate,
            l if l <= 70.0 => Self::Continental,
            _ => Self::Polar,
        }
    }
}

/// Baseline for one zone and season
#[derive(Debug, Clone, Copy)]
struct Baseline {
    very_hot: f64,
    very_cold: f64,
    very_wet: f64,
    very_windy: f64,
    uncomfortable: f64,
    avg_temperature: f64,
    avg_precipitation: f64,
}

const fn baseline(p: [f64; 5], avg_temperature: f64, avg_precipitation: f64) -> Baseline {
    Baseline {
        very_hot: p[0],
        very_cold: p[1],
        very_wet: p[2],
        very_windy: p[3],
        uncomfortable: p[4],
        avg_temperature,
        avg_precipitation,
    }
}

fn baseline_for(zone: ClimateZone, season: Season) -> Baseline {
    use ClimateZone::*;
    use Season::*;

    match (zone, season) {
        (Tropical | Subtropical, Winter) => baseline([0.1, 0.0, 0.3, 0.2, 0.2], 25.0, 60.0),
        (Tropical | Subtropical, Summer) => baseline([0.4, 0.0, 0.4, 0.3, 0.3], 28.0, 80.0),
        (Tropical | Subtropical, _) => baseline([0.2, 0.0, 0.3, 0.2, 0.2], 26.0, 70.0),

        (Temperate, Winter) => baseline([0.0, 0.3, 0.4, 0.4, 0.3], 5.0, 80.0),
        (Temperate, Summer) => baseline([0.2, 0.0, 0.2, 0.3, 0.2], 22.0, 50.0),
        (Temperate, Spring) => baseline([0.1, 0.1, 0.3, 0.4, 0.2], 15.0, 70.0),
        (Temperate, Fall) => baseline([0.1, 0.2, 0.3, 0.3, 0.2], 12.0, 60.0),

        (Continental, Winter) => baseline([0.0, 0.6, 0.2, 0.5, 0.5], -10.0, 30.0),
        (Continental, Summer) => baseline([0.3, 0.0, 0.3, 0.2, 0.2], 20.0, 60.0),
        (Continental, _) => baseline([0.1, 0.3, 0.2, 0.4, 0.3], 5.0, 40.0),

        (Polar, Winter) => baseline([0.0, 0.8, 0.1, 0.6, 0.7], -25.0, 20.0),
        (Polar, Summer) => baseline([0.0, 0.2, 0.2, 0.4, 0.3], 5.0, 40.0),
        (Polar, _) => baseline([0.0, 0.5, 0.1, 0.5, 0.5], -10.0, 25.0),
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn probability(value: f64) -> f64 {
    round_to(value.clamp(0.0, 1.0), 2)
}

/// Outlook for a single calendar month
pub fn monthly_outlook(month: u32, latitude: f64, longitude: f64) -> MonthlyOutlook {
    let month = (month.clamp(1, 12)) as usize;
    let season = Season::at(month as u32, latitude);
    let mut b = baseline_for(ClimateZone::from_latitude(latitude), season);

    let abs_lat = latitude.abs();
    let (cold_winter, cold_else, hot_summer, hot_else) = if abs_lat > 60.0 {
        (0.2, -0.1, 0.1, -0.1)
    } else if abs_lat > 40.0 {
        (0.1, -0.05, 0.1, -0.05)
    } else {
        (0.0, 0.0, 0.0, 0.0)
    };
    b.very_cold += if season == Season::Winter { cold_winter } else { cold_else };
    b.very_hot += if season == Season::Summer { hot_summer } else { hot_else };

    if longitude > -100.0 && longitude < 100.0 {
        b.very_hot += 0.1;
        b.very_cold += 0.1;
        b.very_windy += 0.1;
    } else {
        b.very_hot -= 0.1;
        b.very_cold -= 0.1;
        b.very_wet += 0.1;
    }

    MonthlyOutlook {
        month: month as u32,
        month_name: MONTH_NAMES[month - 1].to_string(),
        probabilities: ClimateProbability {
            very_hot: probability(b.very_hot),
            very_cold: probability(b.very_cold),
            very_wet: probability(b.very_wet),
            very_windy: probability(b.very_windy),
            uncomfortable: probability(b.uncomfortable),
        },
        avg_temperature: round_to(b.avg_temperature, 1),
        avg_precipitation: round_to(b.avg_precipitation, 1),
    }
}

/// Six-month outlook starting with the month of `now`.
pub fn long_term_outlook(location: &Location, now: DateTime<Utc>) -> LongTermForecast {
    let start = now.month();
    let monthly_outlooks = (0..OUTLOOK_MONTHS)
        .map(|i| {
            let month = (start + i - 1) % 12 + 1;
            monthly_outlook(month, location.latitude, location.longitude)
        })
        .collect();

    LongTermForecast {
        location: location.label(),
        latitude: location.latitude,
        longitude: location.longitude,
        climate_zone: ClimateZone::from_latitude(location.latitude),
        monthly_outlooks,
        generated_at: now,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_climate_zone_bands() {
        assert_eq!(ClimateZone::from_latitude(0.0), ClimateZone::Tropical);
        assert_eq!(ClimateZone::from_latitude(-23.5), ClimateZone::Tropical);
        assert_eq!(ClimateZone::from_latitude(30.0), ClimateZone::Subtropical);
        assert_eq!(ClimateZone::from_latitude(45.0), ClimateZone::Temperate);
        assert_eq!(ClimateZone::from_latitude(-60.0), ClimateZone::Continental);
        assert_eq!(ClimateZone::from_latitude(85.0), ClimateZone::Polar);
    }

    #[test]
    fn test_outlook_starts_at_current_month_and_wraps() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let location = Location::new(40.7, -74.0, Some("New York".into())).unwrap();
        let forecast = long_term_outlook(&location, now);

        let months: Vec<u32> = forecast.monthly_outlooks.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![10, 11, 12, 1, 2, 3]);
        assert_eq!(forecast.monthly_outlooks[0].month_name, "October");
        assert_eq!(forecast.climate_zone, ClimateZone::Temperate);
    }

    #[test]
    fn test_outlook_is_deterministic() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let location = Location::new(-33.9, 151.2, None).unwrap();
        let a = long_term_outlook(&location, now);
        let b = long_term_outlook(&location, now);

        for (x, y) in a.monthly_outlooks.iter().zip(&b.monthly_outlooks) {
            assert_eq!(x.probabilities, y.probabilities);
            assert_eq!(x.avg_temperature, y.avg_temperature);
        }
    }

    #[test]
    fn test_probabilities_stay_in_unit_range() {
        for lat in [-89.0, -65.0, -45.0, -30.0, 0.0, 30.0, 45.0, 65.0, 89.0] {
            for lon in [-170.0, -50.0, 0.0, 50.0, 170.0] {
                for month in 1..=12 {
                    let p = monthly_outlook(month, lat, lon).probabilities;
                    for v in [p.very_hot, p.very_cold, p.very_wet, p.very_windy, p.uncomfortable] {
                        assert!((0.0..=1.0).contains(&v), "{v} out of range");
                    }
                }
            }
        }
    }

    #[test]
    fn test_southern_hemisphere_seasons_are_shifted() {
        // January is summer in the south
        let north = monthly_outlook(1, 45.0, 0.0);
        let south = monthly_outlook(1, -45.0, 0.0);
        assert_eq!(north.avg_temperature, 5.0);
        assert_eq!(south.avg_temperature, 22.0);
        assert!(north.probabilities.very_cold > south.probabilities.very_cold);
    }

    #[test]
    fn test_adjustments_applied() {
        // Temperate winter, continental longitude: cold 0.3 + 0.1 + 0.1
        let p = monthly_outlook(1, 45.0, 10.0).probabilities;
        assert_eq!(p.very_cold, 0.5);
        assert_eq!(p.very_windy, 0.5);

        // Same month over the ocean: cold 0.3 + 0.1 - 0.1, wet 0.4 + 0.1
        let p = monthly_outlook(1, 45.0, -150.0).probabilities;
        assert_eq!(p.very_cold, 0.3);
        assert_eq!(p.very_wet, 0.5);
    }
}
