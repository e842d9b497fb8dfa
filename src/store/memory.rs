//! store::memory
//!
//! In-memory store for deterministic testing.
//!
//! # Design
//!
//! The memory store keeps the waitlist record behind a shared mutex and
//! allows configuring failure scenarios, so registrar behavior on storage
//! errors can be exercised without a real backend. Operations are recorded
//! for test verification.
//!
//! # Example
//!
//! ```
//! use waitroom::store::memory::MemoryStore;
//! use waitroom::store::WaitlistStore;
//! use waitroom::core::types::WaitlistState;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new();
//!
//! // Nothing persisted yet: the default seeded state.
//! let state = store.load().await.unwrap();
//! assert_eq!(state, WaitlistState::default());
//!
//! let next = WaitlistState { emails: vec!["x@y.com".into()], count: 3 };
//! store.save(&next).await.unwrap();
//! assert_eq!(store.load().await.unwrap(), next);
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{StoreError, WaitlistStore};
use crate::core::types::WaitlistState;

/// In-memory waitlist store for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MemoryStoreInner {
    /// The persisted record, if any save has happened (or a seed was given).
    state: Option<WaitlistState>,
    /// Operation to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<StoreOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail `load` with the given error.
    Load(StoreError),
    /// Fail `save` with the given error.
    Save(StoreError),
    /// Fail both operations with the given error.
    Both(StoreError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone)]
pub enum StoreOperation {
    Load,
    Save(WaitlistState),
}

impl MemoryStore {
    /// Create an empty store (loads return the default seeded state).
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStoreInner {
                state: None,
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Create a store pre-seeded with the given state.
    pub fn with_state(state: WaitlistState) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().state = Some(state);
        store
    }

    /// Configure a failure scenario.
    pub fn fail_on(&self, fail: FailOn) {
        self.inner.lock().unwrap().fail_on = Some(fail);
    }

    /// Clear any configured failure scenario.
    pub fn clear_failures(&self) {
        self.inner.lock().unwrap().fail_on = None;
    }

    /// Recorded operations, in order.
    pub fn operations(&self) -> Vec<StoreOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Number of save calls recorded.
    pub fn save_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .operations
            .iter()
            .filter(|op| matches!(op, StoreOperation::Save(_)))
            .count()
    }

    /// The currently persisted record, if any.
    pub fn stored(&self) -> Option<WaitlistState> {
        self.inner.lock().unwrap().state.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WaitlistStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self) -> Result<WaitlistState, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(StoreOperation::Load);

        if let Some(FailOn::Load(err) | FailOn::Both(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        Ok(inner.state.clone().unwrap_or_default())
    }

    async fn save(&self, state: &WaitlistState) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(StoreOperation::Save(state.clone()));

        if let Some(FailOn::Save(err) | FailOn::Both(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        inner.state = Some(state.clone());
        Ok(())
    }
}
