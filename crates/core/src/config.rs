//! # Configuration
//!
//! Catalog connection settings. Layered as defaults, then an optional JSON
//! file (`.whiskers/config.json` or `$WHISKERS_CONFIG`), then environment
//! variables. CLI flags are applied on top by the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api.thecatapi.com/v1";
pub const DEFAULT_IMAGE_LIMIT: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables read by `WhiskersConfig::load`
pub const ENV_KEYS: [&str; 4] = [
    "CAT_API_BASE_URL",
    "CAT_API_KEY",
    "WHISKERS_IMAGE_LIMIT",
    "WHISKERS_TIMEOUT_SECS",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WhiskersConfig {
    /// Catalog base url, e.g. `https://api.thecatapi.com/v1`
    pub base_url: String,
    /// Sent as the `x-api-key` header when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Images requested per breed view
    pub image_limit: usize,
    pub timeout_secs: u64,
}

impl Default for WhiskersConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            image_limit: DEFAULT_IMAGE_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Our keys only; the rest of the environment may hold non-UTF-8 values
fn env_overrides() -> Vec<(String, String)> {
    ENV_KEYS
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)))
        .collect()
}

/// Path of the optional config file
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("WHISKERS_CONFIG") {
        return PathBuf::from(path);
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".whiskers")
        .join("config.json")
}

impl WhiskersConfig {
    /// Defaults, then the config file if it exists, then the process environment
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            Self::from_json(&content)
                .with_context(|| format!("Invalid config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env(env_overrides())?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Apply overrides from `(name, value)` pairs
    pub fn apply_env<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            match name.as_str() {
                "CAT_API_BASE_URL" if !value.is_empty() => self.base_url = value,
                "CAT_API_KEY" if !value.is_empty() => self.api_key = Some(value),
                "WHISKERS_IMAGE_LIMIT" => {
                    self.image_limit = value
                        .parse()
                        .with_context(|| format!("WHISKERS_IMAGE_LIMIT is not a number: {}", value))?;
                }
                "WHISKERS_TIMEOUT_SECS" => {
                    self.timeout_secs = value
                        .parse()
                        .with_context(|| format!("WHISKERS_TIMEOUT_SECS is not a number: {}", value))?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_image_limit(mut self, limit: usize) -> Self {
        self.image_limit = limit;
        self
    }
}
