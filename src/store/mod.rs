//! store
//!
//! The storage port: one load/save contract, four backends.
//!
//! # Architecture
//!
//! The `WaitlistStore` trait defines the whole-record load/save contract.
//! The registrar uses the [`create_store`] factory rather than importing
//! specific backends directly; the backend is selected once at startup
//! from configuration, never via conditional branching inside business
//! logic.
//!
//! # Modules
//!
//! - `traits`: Core `WaitlistStore` trait and `StoreError`
//! - [`firestore`]: Document-database backend (Firestore REST)
//! - [`sheets`]: Spreadsheet backend (Google Sheets values REST)
//! - [`kv`]: Managed key-value backend (Redis-compatible REST)
//! - [`file`]: Local JSON file backend
//! - [`memory`]: In-memory store for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use waitroom::config::Config;
//! use waitroom::store::create_store;
//!
//! let config = Config::load()?;
//! let store = create_store(&config)?;
//! println!("using {} backend", store.name());
//! ```

pub mod file;
pub mod firestore;
pub mod kv;
pub mod memory;
pub mod sheets;
mod traits;

use std::sync::Arc;

pub use traits::{StoreError, WaitlistStore};

use crate::config::Config;

/// Supported storage providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreProvider {
    /// Document database (Firestore REST)
    Firestore,
    /// Spreadsheet (Google Sheets values REST)
    Sheets,
    /// Managed key-value store (Redis-compatible REST)
    Kv,
    /// Local JSON file
    File,
}

impl StoreProvider {
    /// Get all available providers.
    pub fn all() -> &'static [StoreProvider] {
        &[
            StoreProvider::Firestore,
            StoreProvider::Sheets,
            StoreProvider::Kv,
            StoreProvider::File,
        ]
    }

    /// Get the provider name as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            StoreProvider::Firestore => "firestore",
            StoreProvider::Sheets => "sheets",
            StoreProvider::Kv => "kv",
            StoreProvider::File => "file",
        }
    }

    /// Parse a provider from a string.
    ///
    /// # Example
    ///
    /// ```
    /// use waitroom::store::StoreProvider;
    ///
    /// assert_eq!(StoreProvider::parse("file"), Some(StoreProvider::File));
    /// assert_eq!(StoreProvider::parse("unknown"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "firestore" => Some(StoreProvider::Firestore),
            "sheets" => Some(StoreProvider::Sheets),
            "kv" => Some(StoreProvider::Kv),
            "file" => Some(StoreProvider::File),
            _ => None,
        }
    }
}

impl std::fmt::Display for StoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Valid provider names for configuration validation.
pub fn valid_provider_names() -> &'static [&'static str] {
    &["firestore", "sheets", "kv", "file"]
}

/// The default storage provider name.
pub const DEFAULT_PROVIDER: &str = "file";

/// Create a waitlist store from configuration.
///
/// This is the single entry point for backend construction. The provider
/// comes from `config.backend()`; connection parameters come from the
/// matching config section.
///
/// # Errors
///
/// - `ProviderNotAvailable` if the provider name is unknown or its config
///   section is missing required parameters
pub fn create_store(config: &Config) -> Result<Arc<dyn WaitlistStore>, StoreError> {
    let provider = StoreProvider::parse(config.backend()).ok_or_else(|| {
        StoreError::ProviderNotAvailable(format!(
            "unknown storage backend '{}' (valid: {})",
            config.backend(),
            valid_provider_names().join(", ")
        ))
    })?;

    match provider {
        StoreProvider::Firestore => {
            let settings = config.firestore().ok_or_else(|| {
                StoreError::ProviderNotAvailable(
                    "firestore backend selected but [firestore] section is missing".into(),
                )
            })?;
            Ok(Arc::new(match &settings.api_base {
                Some(base) => firestore::FirestoreStore::with_api_base(
                    &settings.project_id,
                    &settings.token,
                    base,
                ),
                None => firestore::FirestoreStore::new(&settings.project_id, &settings.token),
            }))
        }
        StoreProvider::Sheets => {
            let settings = config.sheets().ok_or_else(|| {
                StoreError::ProviderNotAvailable(
                    "sheets backend selected but [sheets] section is missing".into(),
                )
            })?;
            Ok(Arc::new(match &settings.api_base {
                Some(base) => sheets::SheetsStore::with_api_base(
                    &settings.spreadsheet_id,
                    &settings.token,
                    base,
                ),
                None => sheets::SheetsStore::new(&settings.spreadsheet_id, &settings.token),
            }))
        }
        StoreProvider::Kv => {
            let settings = config.kv().ok_or_else(|| {
                StoreError::ProviderNotAvailable(
                    "kv backend selected but [kv] section is missing".into(),
                )
            })?;
            Ok(Arc::new(kv::KvStore::new(&settings.url, &settings.token)))
        }
        StoreProvider::File => {
            let path = config.file_path().map_err(|e| {
                StoreError::ProviderNotAvailable(format!("cannot resolve file path: {}", e))
            })?;
            Ok(Arc::new(file::FileStore::new(path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod store_provider {
        use super::*;

        #[test]
        fn all_contains_four_backends() {
            assert_eq!(StoreProvider::all().len(), 4);
        }

        #[test]
        fn parse_is_case_insensitive() {
            assert_eq!(
                StoreProvider::parse("Firestore"),
                Some(StoreProvider::Firestore)
            );
            assert_eq!(StoreProvider::parse("KV"), Some(StoreProvider::Kv));
        }

        #[test]
        fn parse_unknown() {
            assert_eq!(StoreProvider::parse("dynamo"), None);
            assert_eq!(StoreProvider::parse(""), None);
        }

        #[test]
        fn display_matches_config_names() {
            for provider in StoreProvider::all() {
                assert!(valid_provider_names().contains(&provider.name()));
                assert_eq!(format!("{}", provider), provider.name());
            }
        }
    }

    mod create_store {
        use super::*;
        use crate::config::schema::{FileConfig, KvConfig, WaitroomConfig};

        fn config_with(raw: WaitroomConfig) -> Config {
            Config::from_schema(raw)
        }

        #[test]
        fn default_config_builds_file_store() {
            let config = config_with(WaitroomConfig::default());
            let store = create_store(&config).expect("create default store");
            assert_eq!(store.name(), "file");
        }

        #[test]
        fn unknown_backend_is_rejected() {
            let config = config_with(WaitroomConfig {
                backend: Some("dynamo".to_string()),
                ..Default::default()
            });
            let result = create_store(&config);
            assert!(matches!(
                result,
                Err(StoreError::ProviderNotAvailable(_))
            ));
        }

        #[test]
        fn remote_backend_without_section_is_rejected() {
            let config = config_with(WaitroomConfig {
                backend: Some("firestore".to_string()),
                ..Default::default()
            });
            let result = create_store(&config);
            assert!(matches!(
                result,
                Err(StoreError::ProviderNotAvailable(_))
            ));
        }

        #[test]
        fn kv_backend_builds_from_section() {
            let config = config_with(WaitroomConfig {
                backend: Some("kv".to_string()),
                kv: Some(KvConfig {
                    url: "https://example.upstash.io".to_string(),
                    token: "tok".to_string(),
                }),
                ..Default::default()
            });
            let store = create_store(&config).expect("create kv store");
            assert_eq!(store.name(), "kv");
        }

        #[test]
        fn file_backend_honors_configured_path() {
            let config = config_with(WaitroomConfig {
                backend: Some("file".to_string()),
                file: Some(FileConfig {
                    path: Some("/tmp/waitroom-test/waitlist.json".into()),
                }),
                ..Default::default()
            });
            let store = create_store(&config).expect("create file store");
            assert_eq!(store.name(), "file");
        }
    }
}
