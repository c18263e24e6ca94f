//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `PDF2BIBTEX_` (nested keys separated by
//! `__`). Command-line flags are applied on top by the binary.
//!
//! # Configuration File Format
//!
//! ```toml
//! [provider]
//! kind = "dblp"                 # or "google_scholar"
//! dblp_url = "https://dblp.org/search/publ/api"
//! scholar_url = "https://scholar.google.com/scholar"
//! max_hits = 30
//! timeout_secs = 30
//! retries = 0
//!
//! [keys]
//! policy = "second_token"       # "last_token" | "provider_key"
//!
//! [proxy]
//! url = "socks5h://127.0.0.1:9050"
//!
//! [logging]
//! level = "warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bibtex::KeyPolicy;
use crate::sources::SourceKind;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PDF2BIBTEX";

const CONFIG_DIR_NAME: &str = "pdf2bibtex";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Metadata provider settings
    pub provider: ProviderConfig,

    /// Citation key settings
    pub keys: KeysConfig,

    /// Proxy settings
    pub proxy: ProxyConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Metadata provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Which provider to query
    pub kind: SourceKind,

    /// DBLP publication search endpoint
    pub dblp_url: String,

    /// Google Scholar search endpoint
    pub scholar_url: String,

    /// Maximum hits to request; provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hits: Option<usize>,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Retries of transient failures
    pub retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            dblp_url: default_dblp_url(),
            scholar_url: default_scholar_url(),
            max_hits: None,
            timeout_secs: 30,
            retries: 0,
        }
    }
}

fn default_dblp_url() -> String {
    "https://dblp.org/search/publ/api".to_string()
}

fn default_scholar_url() -> String {
    "https://scholar.google.com/scholar".to_string()
}

/// Citation key configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    pub policy: KeyPolicy,
}

/// Proxy configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Proxy URL applied to every provider request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when neither `-l` nor `RUST_LOG` is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Default location of the configuration file, if it exists
pub fn find_config_file() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
