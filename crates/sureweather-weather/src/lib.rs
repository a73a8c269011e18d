//! Weather data for SureWeather
//!
//! Short-term forecasts come from OpenWeather One Call 3.0 with a synthetic
//! fallback; long-term outlooks come from a seasonal climate-zone model.

pub mod cache;
pub mod comfort;
pub mod outlook;
pub mod provider;
pub mod retry;
pub mod service;
pub mod synthetic;
pub mod types;

pub use cache::ForecastCache;
pub use comfort::comfort_index;
pub use outlook::{long_term_outlook, monthly_outlook};
pub use provider::OpenWeatherProvider;
pub use retry::Backoff;
pub use service::WeatherService;
pub use synthetic::FallbackGenerator;
pub use types::*;
