//! Command-line token desk for Solana devnet.
//!
//! Wraps the `tokendesk-svm` workflows in a `clap` interface. The wallet is a
//! Solana CLI keypair file; token metadata is kept in a JSON file next to the
//! configuration.
//!
//! # Modules
//!
//! - [`cli`] - Command-line arguments
//! - [`config`] - TOML configuration with environment variable expansion
//! - [`console`] - Terminal hooks and result rendering
//! - [`error`] - Command errors

pub mod cli;
pub mod config;
pub mod console;
pub mod error;

pub use cli::{Cli, Command};
pub use config::DeskConfig;
pub use console::ConsoleHooks;
pub use error::CliError;
