use std::time::Duration;

use anyhow::{Context, Result};
use sureweather_core::{Config, StorageBackend, StorageConfig};
use sureweather_server::{build_router, AppState};
use sureweather_services::{EventScorer, HistoryClient, PgHistoryStore, SqliteHistoryStore};
use sureweather_weather::WeatherService;

async fn open_history(storage: &StorageConfig) -> Result<HistoryClient> {
    match storage.backend {
        StorageBackend::Sqlite => {
            let store = SqliteHistoryStore::new(&storage.sqlite_path).with_context(|| {
                format!(
                    "Failed to open history database {}",
                    storage.sqlite_path.display()
                )
            })?;
            Ok(HistoryClient::sqlite(store))
        }
        StorageBackend::Postgres => {
            let url = storage
                .postgres_url
                .as_deref()
                .context("storage.postgres_url is required for the postgres backend")?;
            let store = PgHistoryStore::connect(url)
                .await
                .context("Failed to connect to PostgreSQL history store")?;
            Ok(HistoryClient::postgres(store))
        }
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
                return;
            }
            _ => tracing::warn!("Could not register signal handlers, waiting for ctrl-c"),
        }
    }
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, validation) = Config::load_validated()?;
    sureweather_core::init(&config.logging)?;
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    let history = open_history(&config.storage).await?;
    let weather = WeatherService::from_config(&config.weather)
        .context("Failed to set up weather service")?;
    let state = AppState::new(
        weather,
        EventScorer::default(),
        history,
        config.server.cors_allowed_origins.clone(),
    );
    tracing::debug!(?state, "Application state ready");
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    tracing::info!("SureWeather API listening on {}", config.server.bind_addr);

    let drain = Duration::from_millis(config.server.shutdown_drain_ms);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            tracing::info!("Shutdown requested, draining for {}ms", drain.as_millis());
            tokio::time::sleep(drain).await;
        })
        .await
        .context("Server failed")?;

    tracing::info!("SureWeather API stopped");
    Ok(())
}
