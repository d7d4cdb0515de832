use anyhow::Context;
use mediasel_core::PresentationOptions;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::loader::{ConfigLoader, ConfigSource, error::ConfigLoadError};
use crate::util::{non_empty_var, parse_bool_var};

use super::logging::LoggingConfig;

const LOADER: ConfigLoader = ConfigLoader {
    path_var: "MEDIASEL_CONFIG_PATH",
    json_var: "MEDIASEL_CONFIG_JSON",
    candidates: &[
        "mediasel.toml",
        "mediasel.json",
        "config/mediasel.toml",
        "config/mediasel.json",
    ],
};

/// Top-level settings for hosts embedding the source picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub logging: LoggingConfig,
    /// Passed through to every presentation built by a session.
    pub presentation: PresentationOptions,
}

impl SelectorConfig {
    /// Load configuration, then apply single-value env overrides:
    /// `MEDIASEL_LOG` replaces `logging.filter`, `MEDIASEL_TRACE_TRANSITIONS`
    /// replaces `presentation.trace_transitions`.
    pub fn load_from_env() -> anyhow::Result<(Self, ConfigSource)> {
        let (mut config, source) = LOADER
            .load::<Self>()
            .context("failed to load mediasel configuration")?;
        config.apply_env_overrides();
        config
            .validate()
            .with_context(|| format!("invalid configuration from {source:?}"))?;
        Ok((config, source))
    }

    pub fn load_from_file(path: &std::path::Path) -> Result<Self, ConfigLoadError> {
        let config: Self = crate::loader::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> Result<Self, ConfigLoadError> {
        let config: Self = crate::loader::parse_from_str(contents, origin)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(filter) = non_empty_var("MEDIASEL_LOG") {
            self.logging.filter = filter;
        }
        if let Some(trace) = parse_bool_var("MEDIASEL_TRACE_TRANSITIONS") {
            self.presentation.trace_transitions = trace;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let filter = self.logging.filter.trim();
        if filter.is_empty() {
            return Err(ConfigLoadError::InvalidFilter {
                filter: self.logging.filter.clone(),
                message: "filter must not be empty".to_string(),
            });
        }
        EnvFilter::try_new(filter).map_err(|err| {
            ConfigLoadError::InvalidFilter {
                filter: self.logging.filter.clone(),
                message: err.to_string(),
            }
        })?;
        Ok(())
    }
}
