//! Configuration file handling.
//!
//! The file is TOML with one table per concern:
//!
//! ```toml
//! [typesense]
//! url = "http://localhost:8108"
//! api_key = "..."
//!
//! [search]
//! per_page_single = 12
//! index_prefix = ""
//!
//! [search.routes]
//! books = "books"
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::{Path, PathBuf};

use maktaba_core::{Error, Result};
use maktaba_search::{SearchConfig, TypesenseConfig};
use serde::{Deserialize, Serialize};

/// Name used for the config directory and in user-facing hints.
pub const PROJECT_NAME: &str = "maktaba";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaktabaConfig {
    /// Index connection.
    #[serde(default)]
    pub typesense: TypesenseConfig,

    /// Search defaults.
    #[serde(default)]
    pub search: SearchConfig,
}

impl MaktabaConfig {
    /// `<config dir>/maktaba/config.toml` for this platform.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join("config.toml"))
    }

    /// Explicit path if given, otherwise the platform default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::default_config_path(),
        }
    }

    /// Load the configuration.
    ///
    /// A missing file at the default location yields defaults; a missing
    /// file at an explicit path is an error.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit) else {
            log::debug!("No config directory on this platform, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            if explicit.is_some() {
                return Err(Error::config(format!(
                    "Config file does not exist at {}",
                    path.display()
                )));
            }
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Apply command-line overrides for the index connection.
    pub fn with_overrides(mut self, url: Option<&str>, api_key: Option<&str>) -> Self {
        if let Some(url) = url {
            self.typesense.url = url.to_string();
        }
        if let Some(key) = api_key {
            self.typesense.api_key = key.to_string();
        }
        self
    }
}
