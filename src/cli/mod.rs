//! cli
//!
//! Command-line front end for the registrar.
//!
//! # Responsibilities
//!
//! - Parse arguments and load configuration
//! - Construct the storage backend once and inject it into the registrar
//! - Print the same JSON bodies the HTTP surface defines
//!
//! The `--watch` flag on the read commands reproduces the polling display:
//! a client-driven periodic read every 2 seconds, no push channel.

pub mod args;

pub use args::{Cli, Command};

use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::api;
use crate::config::Config;
use crate::core::registrar::Registrar;
use crate::store::create_store;

/// Polling interval for `--watch`, matching the original front end.
const WATCH_INTERVAL: Duration = Duration::from_secs(2);

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("cannot load config from {}", path.display()))?,
        None => Config::load().context("cannot load config")?,
    };

    let store = create_store(&config).context("cannot construct storage backend")?;
    log::info!("using {} backend", store.name());
    let registrar = Registrar::new(store);

    dispatch(cli.command, &registrar).await
}

/// Dispatch a parsed command against the registrar.
async fn dispatch(command: Command, registrar: &Registrar) -> Result<()> {
    match command {
        Command::Register { email } => {
            let reply = api::register(registrar, &api::RegisterRequest { email }).await;
            println!("{}", reply.body);
            if reply.status != 200 {
                bail!("registration failed ({})", reply.status);
            }
            Ok(())
        }
        Command::Count { watch } => {
            loop {
                let reply = api::get_count(registrar).await;
                println!("{}", reply.body);
                if !watch {
                    return Ok(());
                }
                tokio::time::sleep(WATCH_INTERVAL).await;
            }
        }
        Command::Emails { watch } => {
            loop {
                let reply = api::get_emails(registrar).await;
                println!("{}", reply.body);
                if !watch {
                    return Ok(());
                }
                tokio::time::sleep(WATCH_INTERVAL).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::WaitlistState;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn register_command_succeeds_against_memory_store() {
        let registrar = Registrar::new(Arc::new(MemoryStore::new()));
        let result = dispatch(
            Command::Register {
                email: "x@y.com".to_string(),
            },
            &registrar,
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn register_command_fails_on_duplicate() {
        let registrar = Registrar::new(Arc::new(MemoryStore::with_state(WaitlistState {
            emails: vec!["x@y.com".to_string()],
            count: 3,
        })));
        let result = dispatch(
            Command::Register {
                email: "x@y.com".to_string(),
            },
            &registrar,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn count_command_without_watch_returns() {
        let registrar = Registrar::new(Arc::new(MemoryStore::new()));
        let result = dispatch(Command::Count { watch: false }, &registrar).await;
        assert!(result.is_ok());
    }
}
