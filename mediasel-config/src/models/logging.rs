use serde::{Deserialize, Serialize};

fn default_filter() -> String {
    "mediasel=info".to_string()
}

fn default_ansi() -> bool {
    true
}

/// Tracing output settings. `RUST_LOG`, when set, wins over `filter`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is absent.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Colourise terminal output.
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            ansi: default_ansi(),
        }
    }
}
