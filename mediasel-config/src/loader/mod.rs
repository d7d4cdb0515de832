//! Locating and parsing configuration files.

pub mod error;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;

use self::error::ConfigLoadError;

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Resolves a config document through the usual chain:
/// 1) `$<path_var>` (TOML or JSON file),
/// 2) `$<json_var>` (inline JSON),
/// 3) the first existing file in `candidates`,
/// 4) `T::default()`.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    pub path_var: &'static str,
    pub json_var: &'static str,
    pub candidates: &'static [&'static str],
}

impl ConfigLoader {
    pub fn load<T>(&self) -> Result<(T, ConfigSource), ConfigLoadError>
    where
        T: DeserializeOwned + Default,
    {
        if let Ok(path_str) = env::var(self.path_var)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var(self.json_var)
            && !raw.trim().is_empty()
        {
            let parsed = parse_json(&raw, self.json_var)?;
            return Ok((parsed, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((T::default(), ConfigSource::Default))
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        self.candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }
}

pub fn load_from_file<T: DeserializeOwned>(
    path: &Path,
) -> Result<T, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let origin = path.display().to_string();

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&contents, &origin),
        Some("toml") | Some("tml") => {
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                origin,
                message: err.to_string(),
            })
        }
        _ => parse_from_str(&contents, &origin),
    }
}

/// Try TOML first, then JSON.
pub fn parse_from_str<T: DeserializeOwned>(
    contents: &str,
    origin: &str,
) -> Result<T, ConfigLoadError> {
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            ConfigLoadError::Parse {
                origin: origin.to_string(),
                message: format!(
                    "toml error: {toml_err}; json error: {json_err}"
                ),
            }
        })
    })
}

pub fn parse_json<T: DeserializeOwned>(
    raw: &str,
    origin: &str,
) -> Result<T, ConfigLoadError> {
    serde_json::from_str(raw).map_err(|err| ConfigLoadError::Parse {
        origin: origin.to_string(),
        message: err.to_string(),
    })
}
