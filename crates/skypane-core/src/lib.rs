pub mod config;
pub mod error;

pub use config::{Config, LocationConfig, UiConfig, ValidationResult, WeatherConfig};
pub use error::{AppError, NetworkError, ReqwestErrorExt, WeatherError};

use anyhow::Result;

/// Initialize logging for the application.
///
/// Filter comes from `RUST_LOG` (default `info`). Output goes to stderr so it
/// never mixes with the rendered page on stdout.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("SkyPane core initialized");
    Ok(())
}
