//! Registry configuration via `basedb.toml`
//!
//! The host either builds a `RegistryConfig` in code or points at a config
//! file. A default file can be written on first start; edit it and restart
//! (or call `reload_all`) to pick up new data locations.

use basedb_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name placed next to the data directory.
pub const CONFIG_FILE_NAME: &str = "basedb.toml";

/// Registry configuration loaded from `basedb.toml`.
///
/// # Example
///
/// ```toml
/// location = "res_db"
/// record_scope = "game.**.basedb.model"
/// reload_on_refresh = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryConfig {
    /// Base storage location handed to every record loader.
    #[serde(default = "default_location")]
    pub location: PathBuf,
    /// Namespace scope handed to type discovery (`*` = one segment, `**` = any).
    #[serde(default = "default_record_scope")]
    pub record_scope: String,
    /// Let `initialize` run again on every host refresh signal.
    #[serde(default)]
    pub reload_on_refresh: bool,
}

fn default_location() -> PathBuf {
    PathBuf::from("res_db")
}

fn default_record_scope() -> String {
    "**".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            record_scope: default_record_scope(),
            reload_on_refresh: false,
        }
    }
}

impl RegistryConfig {
    /// Check the configuration for values the registry cannot use.
    ///
    /// # Errors
    ///
    /// Returns an error if the location is empty.
    pub fn validate(&self) -> Result<()> {
        if self.location.as_os_str().is_empty() {
            return Err(Error::config("location must not be empty"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# basedb registry configuration
#
# Base directory handed to record loaders
location = "res_db"

# Namespace scope for type discovery
#   "*"  matches one namespace segment
#   "**" matches any number of segments
record_scope = "**"

# Re-run initialization on every host refresh signal (default: false).
# When false, only the first signal loads data; use reload_all() afterwards.
reload_on_refresh = false
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RegistryConfig = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(reason) => {
                Error::config(format!("{} (in '{}')", reason, path.display()))
            }
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
