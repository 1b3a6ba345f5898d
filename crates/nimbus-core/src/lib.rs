pub mod config;
pub mod error;

pub use config::{ClockFormat, Config, UiConfig, UpdateInterval, ValidationResult, WeatherConfig};
pub use error::{AppError, PermissionError, StorageError, WeatherError};

use anyhow::Result;

/// Initialize the core: tracing/logging.
///
/// Safe to call more than once; only the first call installs the subscriber.
pub fn init() -> Result<()> {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Nimbus core initialized");
    }
    Ok(())
}
