//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Load configuration from an explicit path

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Waitroom - a capacity-bounded waitlist registrar
#[derive(Parser, Debug)]
#[command(name = "waitroom")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Load configuration from this path instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register an email address on the waitlist
    #[command(name = "register")]
    Register {
        /// The email address to register
        email: String,
    },

    /// Show the current registration count
    #[command(name = "count")]
    Count {
        /// Keep polling, printing the count every 2 seconds
        #[arg(long)]
        watch: bool,
    },

    /// Show the registered emails and the count
    #[command(name = "emails")]
    Emails {
        /// Keep polling, printing the state every 2 seconds
        #[arg(long)]
        watch: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_register() {
        let cli = Cli::try_parse_from(["waitroom", "register", "x@y.com"]).unwrap();
        assert!(matches!(cli.command, Command::Register { email } if email == "x@y.com"));
    }

    #[test]
    fn parses_count_with_watch() {
        let cli = Cli::try_parse_from(["waitroom", "count", "--watch"]).unwrap();
        assert!(matches!(cli.command, Command::Count { watch: true }));
    }

    #[test]
    fn parses_global_config_flag() {
        let cli = Cli::try_parse_from(["waitroom", "--config", "/tmp/c.toml", "count"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn register_requires_an_email_argument() {
        assert!(Cli::try_parse_from(["waitroom", "register"]).is_err());
    }
}
