//! Error types of the command-line desk.

use tokendesk_svm::session::SessionError;
use tokendesk_svm::token::TokenOpError;
use tokendesk_svm::wallet::WalletError;

use crate::config::ConfigError;

/// Errors that end a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The keypair file could not be loaded.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// The wallet did not connect.
    #[error("wallet connection failed: {0}")]
    Session(#[from] SessionError),

    /// A portfolio query failed.
    #[error(transparent)]
    Operation(#[from] TokenOpError),

    /// A token operation failed after notifying the console hooks.
    #[error(transparent)]
    Reported(TokenOpError),
}

impl CliError {
    /// Whether the user has already seen this error through the hooks.
    #[must_use]
    pub const fn already_reported(&self) -> bool {
        matches!(self, Self::Reported(_))
    }
}
