//! core::registrar
//!
//! Registration and query logic for the waitlist.
//!
//! # Design
//!
//! The registrar owns the check-then-act cycle: load the record, apply the
//! quota and dedup gates, append, persist. The whole cycle runs under a
//! single async mutex so that at most one registration executes its
//! read-modify-write at a time. The backends themselves perform plain
//! load/save with no conditional-write token, so without this serialization
//! two concurrent registrations could both validate against stale state and
//! both save, losing an update or admitting a duplicate.
//!
//! # Failure semantics
//!
//! Load failures degrade to the default seeded state (availability over
//! strictness on the read path); the cause is logged, never surfaced.
//! Save failures always surface as `RegisterError::Internal`; a
//! registration is never reported successful if persistence failed.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::core::types::{EmailAddress, EmailError, WaitlistState, QUOTA};
use crate::store::{StoreError, WaitlistStore};

/// Errors from a registration attempt.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// The submitted address is malformed (empty or missing '@').
    #[error("invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The address is already on the waitlist.
    #[error("email is already registered")]
    DuplicateEmail,

    /// The waitlist has reached its quota.
    #[error("waitlist quota of {0} reached")]
    QuotaExceeded(u32),

    /// Persistence failed; the registration was not recorded.
    #[error("storage error: {0}")]
    Internal(#[from] StoreError),
}

/// The waitlist registrar.
///
/// Validates incoming addresses, enforces the quota and dedup invariants,
/// and persists accepted registrations through the injected store.
///
/// # Construction
///
/// The store is built once at startup (from configuration) and injected
/// here. The registrar never constructs backend clients itself, which
/// keeps the storage port trivially substitutable with a test double.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use waitroom::core::registrar::Registrar;
/// use waitroom::store::memory::MemoryStore;
///
/// # tokio_test::block_on(async {
/// let registrar = Registrar::new(Arc::new(MemoryStore::new()));
///
/// let count = registrar.register("x@y.com").await.unwrap();
/// assert_eq!(count, 3); // seeded baseline of 2, plus one
///
/// let state = registrar.query().await;
/// assert_eq!(state.emails, vec!["x@y.com".to_string()]);
/// # });
/// ```
pub struct Registrar {
    /// The storage backend, selected at startup.
    store: Arc<dyn WaitlistStore>,
    /// Serializes the load/check/save cycle across tasks.
    write_lock: Mutex<()>,
    /// Maximum number of accepted registrations.
    quota: u32,
}

impl Registrar {
    /// Create a registrar over the given store with the standard quota.
    pub fn new(store: Arc<dyn WaitlistStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            quota: QUOTA,
        }
    }

    /// The backend name of the underlying store.
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Register an email address on the waitlist.
    ///
    /// Normalizes the input (trim + lowercase), then runs the serialized
    /// cycle: load, quota gate, dedup gate, append, save.
    ///
    /// # Returns
    ///
    /// The new count after a successful registration.
    ///
    /// # Errors
    ///
    /// - `InvalidEmail`: malformed input; no store I/O is performed
    /// - `QuotaExceeded`: the count has reached the quota; no save
    /// - `DuplicateEmail`: the address is already registered; no save
    /// - `Internal`: the save failed; the registration was not recorded
    pub async fn register(&self, raw_email: &str) -> Result<u32, RegisterError> {
        // Validate before touching storage.
        let email = EmailAddress::parse(raw_email)?;

        // Hold the lock across the whole read-modify-write.
        let _guard = self.write_lock.lock().await;

        let mut state = self.load_tolerant().await;

        // Quota gate first: at quota, every submission is rejected,
        // duplicate or not.
        if state.at_quota(self.quota) {
            return Err(RegisterError::QuotaExceeded(self.quota));
        }

        if state.contains(&email) {
            return Err(RegisterError::DuplicateEmail);
        }

        state.emails.push(email.into_string());
        state.count += 1;

        self.store.save(&state).await?;

        Ok(state.count)
    }

    /// Return the current waitlist state without mutation.
    ///
    /// Read failures degrade to the default seeded state, so this never
    /// fails; the display paths prefer availability.
    pub async fn query(&self) -> WaitlistState {
        self.load_tolerant().await
    }

    /// Load the current state, substituting the default on failure.
    async fn load_tolerant(&self) -> WaitlistState {
        match self.store.load().await {
            Ok(state) => state,
            Err(err) => {
                log::warn!(
                    "load from {} store failed, using default state: {}",
                    self.store.name(),
                    err
                );
                WaitlistState::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SEED_COUNT;
    use crate::store::memory::{FailOn, MemoryStore, StoreOperation};

    fn registrar_over(store: MemoryStore) -> Registrar {
        Registrar::new(Arc::new(store))
    }

    #[tokio::test]
    async fn first_registration_increments_seed() {
        let store = MemoryStore::new();
        let registrar = registrar_over(store.clone());

        let count = registrar.register("x@y.com").await.unwrap();

        assert_eq!(count, SEED_COUNT + 1);
        let state = registrar.query().await;
        assert_eq!(state.emails, vec!["x@y.com".to_string()]);
        assert_eq!(state.count, 3);
    }

    #[tokio::test]
    async fn duplicate_is_rejected_after_one_success() {
        let store = MemoryStore::new();
        let registrar = registrar_over(store.clone());

        registrar.register("x@y.com").await.unwrap();
        let err = registrar.register("x@y.com").await.unwrap_err();

        assert!(matches!(err, RegisterError::DuplicateEmail));
        // Exactly one save across both attempts.
        assert_eq!(store.save_count(), 1);
        assert_eq!(registrar.query().await.count, 3);
    }

    #[tokio::test]
    async fn dedup_is_case_insensitive() {
        let registrar = registrar_over(MemoryStore::new());

        registrar.register("A@B.com").await.unwrap();
        let err = registrar.register("a@b.com").await.unwrap_err();

        assert!(matches!(err, RegisterError::DuplicateEmail));
    }

    #[tokio::test]
    async fn invalid_email_performs_no_store_io() {
        let store = MemoryStore::new();
        let registrar = registrar_over(store.clone());

        assert!(matches!(
            registrar.register("").await.unwrap_err(),
            RegisterError::InvalidEmail(_)
        ));
        assert!(matches!(
            registrar.register("no-at-sign").await.unwrap_err(),
            RegisterError::InvalidEmail(_)
        ));

        assert!(store.operations().is_empty());
    }

    #[tokio::test]
    async fn quota_boundary_last_slot_accepted() {
        let store = MemoryStore::with_state(WaitlistState {
            emails: vec![],
            count: QUOTA - 1,
        });
        let registrar = registrar_over(store);

        let count = registrar.register("last@x.com").await.unwrap();
        assert_eq!(count, QUOTA);
    }

    #[tokio::test]
    async fn quota_reached_rejects_everything_unchanged() {
        let full = WaitlistState {
            emails: vec!["a@b.com".to_string()],
            count: QUOTA,
        };
        let store = MemoryStore::with_state(full.clone());
        let registrar = registrar_over(store.clone());

        // Unique address: rejected.
        let err = registrar.register("new@x.com").await.unwrap_err();
        assert!(matches!(err, RegisterError::QuotaExceeded(q) if q == QUOTA));

        // Duplicate address: still QuotaExceeded, not DuplicateEmail.
        let err = registrar.register("a@b.com").await.unwrap_err();
        assert!(matches!(err, RegisterError::QuotaExceeded(_)));

        assert_eq!(store.save_count(), 0);
        assert_eq!(registrar.query().await, full);
    }

    #[tokio::test]
    async fn input_is_normalized_before_storage() {
        let registrar = registrar_over(MemoryStore::new());

        registrar.register("  User@Example.COM ").await.unwrap();

        let state = registrar.query().await;
        assert_eq!(state.emails, vec!["user@example.com".to_string()]);
    }

    #[tokio::test]
    async fn load_failure_degrades_to_default() {
        let store = MemoryStore::with_state(WaitlistState {
            emails: vec!["hidden@x.com".to_string()],
            count: 10,
        });
        store.fail_on(FailOn::Load(StoreError::NetworkError(
            "connection refused".into(),
        )));
        let registrar = registrar_over(store.clone());

        // Query tolerates the failure and reports the seeded default.
        let state = registrar.query().await;
        assert_eq!(state, WaitlistState::default());
    }

    #[tokio::test]
    async fn save_failure_surfaces_as_internal() {
        let store = MemoryStore::new();
        store.fail_on(FailOn::Save(StoreError::WriteError("disk full".into())));
        let registrar = registrar_over(store.clone());

        let err = registrar.register("x@y.com").await.unwrap_err();
        assert!(matches!(err, RegisterError::Internal(_)));

        // The stored record was not mutated.
        store.clear_failures();
        assert_eq!(registrar.query().await, WaitlistState::default());
    }

    #[tokio::test]
    async fn register_load_failure_starts_from_default() {
        // If the backend is unreachable on load, registration proceeds
        // against the default state rather than failing the request.
        let store = MemoryStore::new();
        store.fail_on(FailOn::Load(StoreError::NetworkError("timeout".into())));
        let registrar = registrar_over(store.clone());

        let count = registrar.register("x@y.com").await.unwrap();
        assert_eq!(count, SEED_COUNT + 1);
    }

    #[tokio::test]
    async fn concurrent_registrations_near_quota_all_land() {
        const N: u32 = 8;
        let store = MemoryStore::with_state(WaitlistState {
            emails: vec![],
            count: QUOTA - N,
        });
        let registrar = Arc::new(registrar_over(store.clone()));

        let mut handles = Vec::new();
        for i in 0..N {
            let registrar = Arc::clone(&registrar);
            handles.push(tokio::spawn(async move {
                registrar.register(&format!("user{}@x.com", i)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let state = registrar.query().await;
        assert_eq!(state.count, QUOTA);
        assert_eq!(state.emails.len(), N as usize);
        // Every address landed exactly once.
        for i in 0..N {
            let email = format!("user{}@x.com", i);
            assert_eq!(state.emails.iter().filter(|e| **e == email).count(), 1);
        }
        assert_eq!(store.save_count(), N as usize);
    }

    #[tokio::test]
    async fn query_records_a_load_not_a_save() {
        let store = MemoryStore::new();
        let registrar = registrar_over(store.clone());

        registrar.query().await;

        let ops = store.operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], StoreOperation::Load));
    }
}
