//! Runtime configuration.
//!
//! Configuration is layered:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. `<config dir>/titanwiki/config.toml`, when it exists
//! 3. Environment variables:
//!    `TITANWIKI_API_BASE`, `TITANWIKI_TIMEOUT_SECS`, `TITANWIKI_MIN_INTERVAL_MS`
//!
//! Every key in the file is optional.
//!
//! ```toml
//! api_base = "https://api.attackontitanapi.com"
//! timeout_secs = 15
//! min_request_interval_ms = 250
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.attackontitanapi.com";

pub const ENV_API_BASE: &str = "TITANWIKI_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "TITANWIKI_TIMEOUT_SECS";
pub const ENV_MIN_INTERVAL_MS: &str = "TITANWIKI_MIN_INTERVAL_MS";

/// Settings for the HTTP client and the browser.
///
/// # Examples
///
/// ```rust
/// use titanwiki::config::Config;
///
/// let config = Config::from_toml_str("timeout_secs = 5").unwrap();
/// assert_eq!(config.timeout_secs, 5);
/// assert_eq!(config.api_base, titanwiki::config::DEFAULT_API_BASE);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the wiki API, without a trailing slash
    pub api_base: String,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Minimum delay between two requests; 0 disables throttling
    pub min_request_interval_ms: u64,

    pub user_agent: String,

    /// Shown instead of an image that is missing or fails to load
    pub placeholder_image: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 30,
            min_request_interval_ms: 0,
            user_agent: format!("titanwiki/{}", env!("CARGO_PKG_VERSION")),
            placeholder_image: "assets/placeholder.png".to_string(),
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("titanwiki").join("config.toml"))
    }

    /// Loads defaults, then the default config file, then the environment.
    ///
    /// A missing config file is not an error; an unreadable or invalid one is.
    pub fn load() -> Result<Self> {
        let config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_path(&path)?,
            _ => Self::default(),
        };

        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Parses a config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).map_err(|e| Error::config(e.to_string()))?;
        config.validated()
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// Taking the lookup as a function keeps this testable without touching
    /// the process environment.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_API_BASE) {
            self.api_base = base;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                Error::config(format!("{} must be a whole number, got {:?}", ENV_TIMEOUT_SECS, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_MIN_INTERVAL_MS) {
            self.min_request_interval_ms = raw.trim().parse().map_err(|_| {
                Error::config(format!(
                    "{} must be a whole number, got {:?}",
                    ENV_MIN_INTERVAL_MS, raw
                ))
            })?;
        }

        self.validated()
    }

    fn validated(mut self) -> Result<Self> {
        let trimmed = self.api_base.trim().trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&trimmed)
            .map_err(|e| Error::config(format!("api_base {:?} is not a URL: {}", self.api_base, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "api_base must be http or https, got {}",
                parsed.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be at least 1"));
        }

        self.api_base = trimmed;
        Ok(self)
    }
}
