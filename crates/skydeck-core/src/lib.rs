//! Core types for the Skydeck weather dashboard.
//!
//! Holds the error taxonomy, configuration, and logging setup shared by
//! the storage, weather, auth, and dashboard crates.

pub mod config;
pub mod error;

pub use config::{Config, DashboardConfig, GoogleConfig, TemperatureUnit, WeatherConfig};
pub use error::{AppError, AuthError, StorageError, WeatherError};

use anyhow::Result;

/// Initialize tracing for the dashboard core.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Skydeck core initialized");
    Ok(())
}
