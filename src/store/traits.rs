//! store::traits
//!
//! Waitlist storage trait definition.
//!
//! # Design
//!
//! The `WaitlistStore` trait is async because every real backend involves
//! I/O. The contract is deliberately whole-record: `load` returns the full
//! waitlist, `save` replaces it. Per-field operations would make it
//! impossible to check the dedup/quota invariants against a consistent
//! view of the record.
//!
//! # Absence vs. failure
//!
//! A missing record is NOT an error: `load` returns the default seeded
//! state (`{emails: [], count: 2}`) when nothing has been persisted yet.
//! Transport or parse failures DO return an error; the registrar decides
//! what to do with them (tolerate on read, surface on write).
//!
//! # Example
//!
//! ```ignore
//! use waitroom::store::{WaitlistStore, StoreError};
//!
//! async fn show_count(store: &dyn WaitlistStore) -> Result<(), StoreError> {
//!     let state = store.load().await?;
//!     println!("{} registered", state.count);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::WaitlistState;

/// Errors from storage operations.
///
/// Cloneable so tests can inject a specific error into a mock store and
/// later assert on the value the registrar observed.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Authentication with the backend failed.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The backend API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },

    /// Network or connection error (including timeouts).
    #[error("network error: {0}")]
    NetworkError(String),

    /// The persisted record could not be decoded.
    #[error("failed to parse stored record: {0}")]
    ParseError(String),

    /// Failed to read from local storage.
    #[error("failed to read record: {0}")]
    ReadError(String),

    /// Failed to write to local storage.
    #[error("failed to write record: {0}")]
    WriteError(String),

    /// The requested backend is unknown or not configured.
    #[error("storage provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// The storage port for the waitlist record.
///
/// One implementation per backend (document store, spreadsheet, key-value
/// store, local file). Each implementation owns its serialization and is
/// responsible for returning the default state when no record exists.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the registrar is shared across
/// async tasks.
///
/// # Concurrency
///
/// Stores do not serialize read-modify-write cycles themselves. The
/// registrar holds a single mutex across the load/check/save cycle, and no
/// other writer may touch the record while a registration is in flight.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Get the backend name (e.g., "firestore", "file").
    fn name(&self) -> &'static str;

    /// Load the current waitlist state.
    ///
    /// Returns the default seeded state if no record has been persisted
    /// yet. A missing record is not an error.
    ///
    /// # Errors
    ///
    /// - `NetworkError` if the backend is unreachable or times out
    /// - `AuthFailed` if credentials are rejected
    /// - `ParseError` / `ReadError` if the record exists but cannot be
    ///   decoded
    async fn load(&self) -> Result<WaitlistState, StoreError>;

    /// Persist the waitlist state, replacing the whole record.
    ///
    /// The write is atomic from the caller's perspective: either the full
    /// record is replaced or an error is returned. Never a half-applied
    /// list.
    ///
    /// # Errors
    ///
    /// Any failure here must surface to the caller; a registration must
    /// not be reported successful if persistence failed.
    async fn save(&self, state: &WaitlistState) -> Result<(), StoreError>;
}
