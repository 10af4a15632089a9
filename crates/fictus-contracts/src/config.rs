//! Remote API configuration.
//!
//! The endpoint URL, bearer credential, and request timeout are an explicit
//! object handed to the API client at construction — never globals, never
//! hardcoded. The credential is sourced from a TOML file or the
//! environment; an empty credential fails fast with a config error.

use std::path::Path;

use serde::Deserialize;

use crate::error::{FictusError, FictusResult};

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "FICTUS_API_URL";
/// Environment variable supplying the bearer credential.
pub const ENV_CREDENTIAL: &str = "FICTUS_API_TOKEN";
/// Environment variable overriding the request timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "FICTUS_API_TIMEOUT_MS";

const DEFAULT_BASE_URL: &str = "http://localhost:1337/api";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Connection settings for the remote CMS API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. `http://localhost:1337/api`.
    pub base_url: String,
    /// Bearer credential sent in the `Authorization` header.
    #[serde(default)]
    pub credential: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ApiConfig {
    /// A config pointing at a local CMS instance, with no credential yet.
    pub fn default_local() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credential: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Parse `s` as a TOML config document.
    pub fn from_toml_str(s: &str) -> FictusResult<Self> {
        toml::from_str(s).map_err(|e| FictusError::Config {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }

    /// Read and parse the TOML config file at `path`.
    pub fn from_file(path: &Path) -> FictusResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| FictusError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load the effective configuration.
    ///
    /// Starts from the TOML file at `path` if it exists (local defaults
    /// otherwise), then applies environment overrides, then validates. The
    /// environment always wins so secrets can stay out of files entirely.
    pub fn load(path: Option<&Path>) -> FictusResult<Self> {
        let mut config = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            _ => Self::default_local(),
        };

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Ok(token) = std::env::var(ENV_CREDENTIAL) {
            config.credential = token;
        }
        if let Ok(ms) = std::env::var(ENV_TIMEOUT_MS) {
            config.timeout_ms = ms.parse().map_err(|_| FictusError::Config {
                reason: format!("{} must be an integer, got '{}'", ENV_TIMEOUT_MS, ms),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the config is usable before any request is made.
    pub fn validate(&self) -> FictusResult<()> {
        if self.base_url.is_empty() {
            return Err(FictusError::Config {
                reason: "base_url is empty".to_string(),
            });
        }
        if self.credential.is_empty() {
            return Err(FictusError::Config {
                reason: format!(
                    "no API credential configured: set {} or the 'credential' key",
                    ENV_CREDENTIAL
                ),
            });
        }
        Ok(())
    }
}
