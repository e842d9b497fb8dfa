//! core::types
//!
//! Domain types for the waitlist.
//!
//! # Design
//!
//! `EmailAddress` is a validated newtype: construction is the only place
//! where normalization (trim + lowercase) happens, so every address that
//! reaches the registrar or a store is already in canonical form.
//!
//! `WaitlistState` is the sole persisted entity. Its `count` field is a
//! display counter seeded independently of the email list (the baseline
//! starts at 2 with an empty list) and increments by one per accepted
//! registration. It is deliberately NOT derived from `emails.len()`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of accepted registrations.
pub const QUOTA: u32 = 50;

/// Initial value of the display counter when no state exists yet.
///
/// The waitlist starts with a pre-seeded baseline of 2 even though the
/// email list starts empty. The counter is decoupled from the list.
pub const SEED_COUNT: u32 = 2;

/// Fixed identifier for the persisted record.
///
/// Every backend stores the whole waitlist as a single record under this
/// key (one document / one key / one row-range / one file).
pub const RECORD_KEY: &str = "email-data";

/// Errors from email address validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    /// The address is empty after trimming.
    #[error("email address is empty")]
    Empty,

    /// The address does not contain an '@'.
    #[error("email address is missing '@'")]
    MissingAtSign,
}

/// A validated, normalized email address.
///
/// Normalization is trim + lowercase. Two raw inputs that differ only in
/// surrounding whitespace or letter case produce equal `EmailAddress`
/// values, which is what makes dedup case-insensitive.
///
/// # Example
///
/// ```
/// use waitroom::core::types::EmailAddress;
///
/// let a = EmailAddress::parse("  A@B.com ").unwrap();
/// let b = EmailAddress::parse("a@b.com").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "a@b.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and normalize a raw email address.
    ///
    /// # Errors
    ///
    /// - `EmailError::Empty` if the input is empty after trimming
    /// - `EmailError::MissingAtSign` if the input contains no '@'
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if !trimmed.contains('@') {
            return Err(EmailError::MissingAtSign);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// The normalized address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the address, returning the normalized string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The persisted waitlist record.
///
/// Invariants (enforced by the registrar, preserved by every store):
///
/// - entries in `emails` are normalized and unique (case-insensitive)
/// - `emails` preserves registration order
/// - `count` never decreases; it increases by exactly 1 per acceptance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistState {
    /// Accepted registrations in registration order.
    pub emails: Vec<String>,
    /// Display counter (seeded baseline + accepted registrations).
    pub count: u32,
}

impl Default for WaitlistState {
    /// The state returned when no record exists yet: `{emails: [], count: 2}`.
    fn default() -> Self {
        Self {
            emails: Vec::new(),
            count: SEED_COUNT,
        }
    }
}

impl WaitlistState {
    /// Check whether a normalized address is already registered.
    ///
    /// Stored entries are normalized at registration time, so a plain
    /// equality scan is a case-insensitive comparison.
    pub fn contains(&self, email: &EmailAddress) -> bool {
        self.emails.iter().any(|e| e == email.as_str())
    }

    /// Whether the quota gate is closed for new registrations.
    pub fn at_quota(&self, quota: u32) -> bool {
        self.count >= quota
    }
}
