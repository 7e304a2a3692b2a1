//! Structured logging for Slipstream.
//!
//! Installs a `tracing` subscriber. `RUST_LOG` wins over the configured level.

use crate::config::{LogFormat, LoggingConfig};
use crate::core::{Error, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build the filter for a logging configuration.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| Error::InvalidConfig(format!("log level {:?}: {}", config.level, e))),
    }
}

/// Install the global subscriber.
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    installed.map_err(|e| Error::InvalidConfig(format!("tracing subscriber: {}", e)))
}
