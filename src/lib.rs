//! Waitroom - a capacity-bounded waitlist registrar
//!
//! Waitroom accepts email registrations, rejects duplicates, and stops
//! accepting once a fixed quota (50) is reached, exposing the current
//! count for a polling display. Four interchangeable persistence backends
//! (document database, spreadsheet API, managed key-value store, local
//! file) sit behind one load/save contract.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line front end (parses args, delegates to the api layer)
//! - [`api`] - Framework-agnostic HTTP mapping (wire shapes, status table)
//! - [`core`] - Domain types and the registrar
//! - [`store`] - Storage port: one trait, four backends, a factory
//! - [`config`] - TOML configuration and backend selection
//!
//! # Correctness Invariants
//!
//! The registrar maintains the following invariants regardless of backend,
//! under concurrent requests:
//!
//! 1. No two registered emails are equal under case-insensitive comparison
//! 2. The count never exceeds the quota and never decreases
//! 3. Every accepted registration increments the count by exactly one
//! 4. The read-modify-write cycle is serialized: at most one registration
//!    touches the record at a time

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod store;
