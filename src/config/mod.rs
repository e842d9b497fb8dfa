//! config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$WAITROOM_CONFIG` if set
//! 2. `~/.waitroom/config.toml`
//!
//! Missing config files are not an error; defaults are used (file backend
//! at `~/.waitroom/waitlist.json`).
//!
//! # Example
//!
//! ```no_run
//! use waitroom::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("backend: {}", config.backend());
//! ```

pub mod schema;

pub use schema::{FileConfig, FirestoreConfig, KvConfig, SheetsConfig, WaitroomConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration with accessors that apply defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// The parsed schema
    raw: WaitroomConfig,
    /// Path the config was loaded from (if any)
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read,
    /// parsed, or validated. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        // 1. Check $WAITROOM_CONFIG
        if let Ok(path) = std::env::var("WAITROOM_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let raw = Self::read_config(&path)?;
                return Ok(Self {
                    raw,
                    loaded_from: Some(path),
                });
            }
        }

        // 2. Check ~/.waitroom/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".waitroom/config.toml");
            if path.exists() {
                let raw = Self::read_config(&path)?;
                return Ok(Self {
                    raw,
                    loaded_from: Some(path),
                });
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = Self::read_config(path)?;
        Ok(Self {
            raw,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already-parsed schema (used by tests and the store factory).
    pub fn from_schema(raw: WaitroomConfig) -> Self {
        Self {
            raw,
            loaded_from: None,
        }
    }

    /// Read, parse, and validate a config file.
    fn read_config(path: &Path) -> Result<WaitroomConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let raw: WaitroomConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        raw.validate()?;
        Ok(raw)
    }

    // =========================================================================
    // Accessors with defaults
    // =========================================================================

    /// The selected storage backend.
    ///
    /// Defaults to "file" if not configured.
    pub fn backend(&self) -> &str {
        self.raw
            .backend
            .as_deref()
            .unwrap_or(crate::store::DEFAULT_PROVIDER)
    }

    /// Firestore backend settings, if configured.
    pub fn firestore(&self) -> Option<&FirestoreConfig> {
        self.raw.firestore.as_ref()
    }

    /// Sheets backend settings, if configured.
    pub fn sheets(&self) -> Option<&SheetsConfig> {
        self.raw.sheets.as_ref()
    }

    /// Key-value backend settings, if configured.
    pub fn kv(&self) -> Option<&KvConfig> {
        self.raw.kv.as_ref()
    }

    /// Path for the file backend.
    ///
    /// Defaults to `~/.waitroom/waitlist.json` if not configured.
    pub fn file_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = self.raw.file.as_ref().and_then(|f| f.path.clone()) {
            return Ok(path);
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".waitroom/waitlist.json"))
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_select_file_backend() {
        let config = Config::default();
        assert_eq!(config.backend(), "file");
        assert!(config.firestore().is_none());
    }

    #[test]
    fn load_from_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            backend = "kv"

            [kv]
            url = "https://example.upstash.io"
            token = "tok"
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend(), "kv");
        assert_eq!(config.kv().unwrap().url, "https://example.upstash.io");
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn invalid_config_rejected_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "backend = \"dynamo\"").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "backend = [unclosed").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn file_path_prefers_configured_value() {
        let config = Config::from_schema(WaitroomConfig {
            file: Some(FileConfig {
                path: Some(PathBuf::from("/data/waitlist.json")),
            }),
            ..Default::default()
        });
        assert_eq!(
            config.file_path().unwrap(),
            PathBuf::from("/data/waitlist.json")
        );
    }
}
