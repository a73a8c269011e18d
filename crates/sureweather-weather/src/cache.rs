//! Short-lived in-memory cache of provider forecasts.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::types::{ForecastSource, Location, ShortTermForecast};

/// Cache key: coordinates rounded to two decimals plus the city name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat_centi: i64,
    lon_centi: i64,
    city: Option<String>,
}

impl CacheKey {
    pub fn for_location(location: &Location) -> Self {
        Self {
            lat_centi: (location.latitude * 100.0).round() as i64,
            lon_centi: (location.longitude * 100.0).round() as i64,
            city: location.city_name.clone(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    forecast: ShortTermForecast,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct ForecastCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl ForecastCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self::new(Duration::from_secs(u64::from(minutes) * 60))
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Fresh forecast for a location, if any. Expired entries are evicted.
    pub fn get(&self, location: &Location) -> Option<ShortTermForecast> {
        if !self.is_enabled() {
            return None;
        }

        let key = CacheKey::for_location(location);
        let mut entries = self.entries.lock();
        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.forecast.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store a provider forecast. Fallback forecasts are ignored.
    pub fn insert(&self, location: &Location, forecast: &ShortTermForecast) {
        if !self.is_enabled() || forecast.source == ForecastSource::Fallback {
            return;
        }

        let mut entries = self.entries.lock();
        entries.retain(|_, e| e.stored_at.elapsed() < self.ttl);
        entries.insert(
            CacheKey::for_location(location),
            Entry {
                forecast: forecast.clone(),
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::synthetic::FallbackGenerator;

    fn provider_forecast(location: &Location) -> ShortTermForecast {
        let mut forecast = FallbackGenerator::seeded(1).generate(location, 2);
        forecast.source = ForecastSource::Provider;
        forecast
    }

    #[test]
    fn test_hit_for_nearby_coordinates() {
        let cache = ForecastCache::from_minutes(15);
        let location = Location::new(51.5074, -0.1278, None).unwrap();
        cache.insert(&location, &provider_forecast(&location));

        let nearby = Location::new(51.5061, -0.1251, None).unwrap();
        assert!(cache.get(&nearby).is_some());

        let elsewhere = Location::new(51.52, -0.1278, None).unwrap();
        assert!(cache.get(&elsewhere).is_none());
    }

    #[test]
    fn test_city_name_is_part_of_key() {
        let cache = ForecastCache::from_minutes(15);
        let named = Location::new(10.0, 10.0, Some("Town".into())).unwrap();
        cache.insert(&named, &provider_forecast(&named));

        let unnamed = Location::new(10.0, 10.0, None).unwrap();
        assert!(cache.get(&unnamed).is_none());
        assert!(cache.get(&named).is_some());
    }

    #[test]
    fn test_fallback_forecasts_not_cached() {
        let cache = ForecastCache::from_minutes(15);
        let location = Location::new(0.0, 0.0, None).unwrap();
        let forecast = FallbackGenerator::seeded(1).generate(&location, 1);
        cache.insert(&location, &forecast);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = ForecastCache::from_minutes(0);
        let location = Location::new(0.0, 0.0, None).unwrap();
        cache.insert(&location, &provider_forecast(&location));
        assert!(!cache.is_enabled());
        assert!(cache.get(&location).is_none());
    }

    #[test]
    fn test_expired_entries_are_evicted() {
        let cache = ForecastCache::new(Duration::from_millis(10));
        let location = Location::new(0.0, 0.0, None).unwrap();
        cache.insert(&location, &provider_forecast(&location));
        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get(&location).is_none());
        assert!(cache.is_empty());
    }
}
