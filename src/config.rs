//! Connection settings: API key, base URL and request timeout.
//!
//! Values are merged from, in order of precedence:
//! 1. command-line flags and process environment (clap reads both; `.env`
//!    is loaded into the environment by `main` before parsing)
//! 2. the TOML config file
//! 3. built-in defaults (base URL only; the API key has none)

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{OwebError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

pub const API_KEY_ENV: &str = "OPEN_WEBUI_API_KEY";
pub const BASE_URL_ENV: &str = "BASE_URL";
pub const CONFIG_ENV: &str = "OWEB_CONFIG";
pub const TIMEOUT_ENV: &str = "OWEB_TIMEOUT";

/// Contents of the optional `config.toml`.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => OwebError::ConfigNotFound(path.to_path_buf()),
            _ => OwebError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        toml::from_str(&raw).map_err(|source| OwebError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicitly requested file, or the default one if it exists.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file just yields an empty config.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config file");
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading default config file");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `<config dir>/oweb/config.toml`, e.g. `~/.config/oweb/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("oweb").join("config.toml"))
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved settings, immutable for the life of the process.
#[derive(Clone)]
pub struct Config {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl Config {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Config {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Self> {
        let api_key = overrides
            .api_key
            .filter(|k| !k.trim().is_empty())
            .or(file.api_key.filter(|k| !k.trim().is_empty()))
            .ok_or(OwebError::MissingConfig("API key", "api-key", API_KEY_ENV))?;

        let base_url = overrides
            .base_url
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(OwebError::MissingConfig("base URL", "base-url", BASE_URL_ENV));
        }

        let timeout = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .map(Duration::from_secs);

        Ok(Config::new(api_key.trim(), base_url).with_timeout(timeout))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

// Keep the key out of logs and panics.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
