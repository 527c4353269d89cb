use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const API_KEY_ENV: &str = "TWELVEDATA_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no API key found; set {API_KEY_ENV} or add [api] key to {0}")]
    MissingApiKey(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Resolved runtime settings for the API client.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    api: ApiSection,
}

// Unknown sections (e.g. a [cache] block) are accepted and ignored.
#[derive(Debug, Default, Deserialize)]
struct ApiSection {
    key: Option<String>,
    base_url: Option<String>,
    timeout: Option<u64>,
}

/// Location of the optional config file: `~/.stock-cli/config.toml`.
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stock-cli")
        .join("config.toml")
}

impl Settings {
    /// Load settings from the environment and the optional config file.
    ///
    /// The `TWELVEDATA_API_KEY` environment variable takes precedence over
    /// the config file; base URL and timeout fall back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path())
    }

    fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let file = if path.is_file() {
            let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            debug!("Loaded config file {}", path.display());
            toml::from_str::<FileConfig>(&raw).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            FileConfig::default()
        };

        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or(file.api.key)
            .ok_or_else(|| ConfigError::MissingApiKey(path.display().to_string()))?;

        Ok(Settings {
            api_key,
            base_url: file
                .api
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(file.api.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_parses_api_section() {
        let cfg: FileConfig = toml::from_str(
            r#"
            [api]
            key = "demo"
            timeout = 10
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.key.as_deref(), Some("demo"));
        assert_eq!(cfg.api.timeout, Some(10));
        assert!(cfg.api.base_url.is_none());
    }

    #[test]
    fn file_config_ignores_cache_section() {
        let cfg: FileConfig = toml::from_str(
            r#"
            [api]
            key = "demo"

            [cache]
            ttl = 300
            enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.key.as_deref(), Some("demo"));
    }
}
