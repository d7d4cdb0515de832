//! Tracing subscriber setup for hosts and tools.

use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::loader::error::ConfigLoadError;
use crate::models::LoggingConfig;

/// Install the global subscriber: `RUST_LOG` if set, else the configured
/// filter, plus a fmt layer. Returns `Ok(false)` when a global subscriber
/// was already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, ConfigLoadError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|err| {
            ConfigLoadError::InvalidFilter {
                filter: config.filter.clone(),
                message: err.to_string(),
            }
        })?,
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_ansi(config.ansi))
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(target: "mediasel::config", filter = %config.filter, "tracing initialised");
    }
    Ok(installed)
}
