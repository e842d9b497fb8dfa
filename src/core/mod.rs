//! core
//!
//! Domain types and the waitlist registrar.
//!
//! # Architecture
//!
//! This layer holds the only genuine correctness contract in the crate:
//! no duplicate emails, never more than the quota of accepted
//! registrations, and count and list kept consistent regardless of
//! which storage backend is plugged in, under concurrent requests.
//!
//! It performs no I/O of its own; all persistence flows through the
//! [`crate::store`] port injected at construction.

pub mod registrar;
pub mod types;

pub use registrar::{RegisterError, Registrar};
pub use types::{EmailAddress, EmailError, WaitlistState, QUOTA, RECORD_KEY, SEED_COUNT};
