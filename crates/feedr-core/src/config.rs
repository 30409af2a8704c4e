//! Configuration management for feedr.
//!
//! Loads configuration from ${FEEDR_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

pub mod paths {
    //! Path resolution for feedr configuration and data directories.
    //!
    //! FEEDR_HOME resolution order:
    //! 1. FEEDR_HOME environment variable (if set)
    //! 2. ~/.config/feedr (default)

    use std::path::PathBuf;

    /// Returns the feedr home directory.
    ///
    /// Checks FEEDR_HOME env var first, falls back to ~/.config/feedr
    pub fn feedr_home() -> PathBuf {
        if let Ok(home) = std::env::var("FEEDR_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("feedr"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        feedr_home().join("config.toml")
    }

    /// Returns the path to the persisted session state file.
    pub fn state_path() -> PathBuf {
        feedr_home().join("state.json")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the feed-reading API.
    pub api_url: String,

    /// Default page size for post and feed listings.
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    const DEFAULT_API_URL: &str = "http://localhost:8888/";
    const DEFAULT_PAGE_SIZE: u32 = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the configured API base URL, parsed.
    ///
    /// A trailing slash is required for relative joins, so one is appended
    /// when missing.
    pub fn base_url(&self) -> Result<Url> {
        let raw = if self.api_url.ends_with('/') {
            self.api_url.clone()
        } else {
            format!("{}/", self.api_url)
        };
        Url::parse(&raw).with_context(|| format!("Invalid api_url in config: {}", self.api_url))
    }

    /// Saves only the api_url field to the config file.
    ///
    /// Creates the file if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_api_url(api_url: &str) -> Result<()> {
        Self::save_api_url_to(&paths::config_path(), api_url)
    }

    /// Saves only the api_url field to a specific config file path.
    pub fn save_api_url_to(path: &Path, api_url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["api_url"] = value(api_url);

        Self::write_config(path, &doc.to_string())
    }

    /// Writes config contents to the given path, creating parent directories.
    pub fn write_config(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

/// Returns the default config.toml template with commented defaults.
pub fn default_config_template() -> &'static str {
    r#"# feedr configuration

# Base URL of the feed-reading API.
api_url = "http://localhost:8888/"

# Default page size for post and feed listings.
# page_size = 30
"#
}
