//! Writing a starter configuration file.
//!
//! # Configuration File Format
//!
//! ```toml
//! [database]
//! path = "./roster.db"
//!
//! [display]
//! page_size = 10
//! lowercase_titles = false
//! url_preference = "last-with-url"
//!
//! [logging]
//! level = "info"
//! ```

use std::path::Path;

use super::Config;

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Config file already exists: {0}")]
    AlreadyExists(String),
}

/// The default configuration as TOML text
pub fn render_default_config() -> Result<String, ConfigFileError> {
    toml::to_string_pretty(&Config::default()).map_err(|e| ConfigFileError::Serialize(e.to_string()))
}

/// Write the default configuration to `path`, creating parent directories.
///
/// An existing file is only replaced when `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigFileError> {
    if path.exists() && !force {
        return Err(ConfigFileError::AlreadyExists(path.display().to_string()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }

    let content = render_default_config()?;
    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    tracing::info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
