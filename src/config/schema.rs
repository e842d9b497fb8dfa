//! config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: the backend name must be one
//! of the known providers, and the section for the selected remote backend
//! must be present with non-empty connection parameters.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Top-level configuration.
///
/// # Example
///
/// ```toml
/// backend = "firestore"
///
/// [firestore]
/// project_id = "my-project"
/// token = "ya29...."
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WaitroomConfig {
    /// Storage backend ("firestore", "sheets", "kv", "file"; default "file")
    pub backend: Option<String>,

    /// Local file backend settings
    pub file: Option<FileConfig>,

    /// Firestore backend settings
    pub firestore: Option<FirestoreConfig>,

    /// Google Sheets backend settings
    pub sheets: Option<SheetsConfig>,

    /// Key-value backend settings
    pub kv: Option<KvConfig>,
}

impl WaitroomConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(backend) = &self.backend {
            let valid = crate::store::valid_provider_names();
            if !valid.contains(&backend.to_lowercase().as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid backend '{}', must be one of: {}",
                    backend,
                    valid.join(", ")
                )));
            }
        }

        if let Some(firestore) = &self.firestore {
            firestore.validate()?;
        }
        if let Some(sheets) = &self.sheets {
            sheets.validate()?;
        }
        if let Some(kv) = &self.kv {
            kv.validate()?;
        }

        Ok(())
    }
}

/// Local file backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Path to the JSON record file (default: `~/.waitroom/waitlist.json`)
    pub path: Option<PathBuf>,
}

/// Firestore backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FirestoreConfig {
    /// Google Cloud project id
    pub project_id: String,

    /// OAuth2 bearer token for the service account
    pub token: String,

    /// API base URL override (for emulators and tests)
    pub api_base: Option<String>,
}

impl FirestoreConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.is_empty() {
            return Err(ConfigError::InvalidValue(
                "firestore.project_id cannot be empty".to_string(),
            ));
        }
        if self.token.is_empty() {
            return Err(ConfigError::InvalidValue(
                "firestore.token cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Google Sheets backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SheetsConfig {
    /// Spreadsheet id
    pub spreadsheet_id: String,

    /// OAuth2 bearer token for the service account
    pub token: String,

    /// API base URL override (for tests)
    pub api_base: Option<String>,
}

impl SheetsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.spreadsheet_id.is_empty() {
            return Err(ConfigError::InvalidValue(
                "sheets.spreadsheet_id cannot be empty".to_string(),
            ));
        }
        if self.token.is_empty() {
            return Err(ConfigError::InvalidValue(
                "sheets.token cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Key-value backend settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct KvConfig {
    /// REST endpoint base URL
    pub url: String,

    /// Bearer token
    pub token: String,
}

impl KvConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::InvalidValue(
                "kv.url cannot be empty".to_string(),
            ));
        }
        if self.token.is_empty() {
            return Err(ConfigError::InvalidValue(
                "kv.token cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
