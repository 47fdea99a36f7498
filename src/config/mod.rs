//! Configuration management.
//!
//! Settings come from an optional TOML file layered under environment
//! variables prefixed with `RESEARCH_ROSTER`, using `__` between section and
//! key (for example `RESEARCH_ROSTER__DISPLAY__PAGE_SIZE=25`).

mod file_config;

pub use file_config::{render_default_config, write_default_config, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::{PageError, Pagination, UrlPreference, DEFAULT_PAGE_SIZE};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "RESEARCH_ROSTER";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "research-roster.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Pager for the configured page size
    pub fn pagination(&self) -> Result<Pagination, PageError> {
        Pagination::new(self.display.page_size)
    }
}

/// Database location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./roster.db")
}

/// How result lists are shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Show publication titles in lower case
    #[serde(default)]
    pub lowercase_titles: bool,

    /// Which linked duplicate survives ranking
    #[serde(default)]
    pub url_preference: UrlPreference,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            lowercase_titles: false,
            url_preference: UrlPreference::default(),
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` for structured output; anything else is human-readable
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.as_deref() == Some("json")
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// First config file found in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    user_config_path().filter(|p| p.is_file())
}

/// `<config dir>/research-roster/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("research-roster").join("config.toml"))
}
