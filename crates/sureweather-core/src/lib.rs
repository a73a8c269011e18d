pub mod config;
pub mod error;

pub use config::{
    ClientConfig, Config, LoggingConfig, ServerConfig, StorageBackend, StorageConfig,
    ValidationResult, WeatherConfig,
};
pub use error::{
    DatabaseError, NetworkError, ReqwestErrorExt, RusqliteErrorExt, SqlxErrorExt, WeatherError,
};

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging.
///
/// `RUST_LOG` wins over the configured filter.
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }

    tracing::info!("SureWeather core initialized");
    Ok(())
}
