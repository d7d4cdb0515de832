//! Shared configuration library for mediasel.
//!
//! Loads [`SelectorConfig`] from a file, inline JSON or defaults, applies
//! environment overrides and installs the tracing subscriber hosts use.

pub mod loader;
pub mod models;
pub mod telemetry;
pub mod util;

pub use loader::{ConfigLoader, ConfigSource, error::ConfigLoadError};
pub use models::{LoggingConfig, SelectorConfig};
pub use telemetry::init_tracing;
