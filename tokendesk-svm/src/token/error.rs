//! Errors of the token workflows.

use solana_signature::Signature;
use tokendesk::{OperationBusy, Severity, ValidationError};

use crate::chain::ChainClientError;
use crate::session::SessionError;

/// Failure of a token operation or a portfolio query.
#[derive(Debug, thiserror::Error)]
pub enum TokenOpError {
    /// The form input was rejected; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// An operation of the same kind is still running.
    #[error(transparent)]
    Busy(#[from] OperationBusy),
    /// The session is not connected, or the wallet refused.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The cluster rejected a request.
    #[error(transparent)]
    Chain(#[from] ChainClientError),
    /// An address field is not a valid base58 public key.
    #[error("Invalid {field} address {value:?}: {reason}")]
    InvalidAddress {
        /// Which input held the address.
        field: &'static str,
        /// The input as given.
        value: String,
        /// Why parsing failed.
        reason: String,
    },
    /// A token program instruction could not be built.
    #[error("Failed to build instruction: {0}")]
    Instruction(String),
    /// The main transaction failed after the recipient's associated token
    /// account had already been created on-chain.
    #[error("{source} (associated token account was created in transaction {prerequisite})")]
    AfterPrerequisite {
        /// Signature of the confirmed account-creation transaction.
        prerequisite: Signature,
        /// The failure of the main transaction.
        source: Box<TokenOpError>,
    },
}

impl TokenOpError {
    /// How the error should be presented to the user.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Validation(_)
            | Self::Busy(_)
            | Self::Session(
                SessionError::NotConnected
                | SessionError::AlreadyConnected
                | SessionError::Transitioning,
            ) => Severity::Warning,
            Self::Session(SessionError::Wallet(_))
            | Self::Chain(_)
            | Self::InvalidAddress { .. }
            | Self::Instruction(_)
            | Self::AfterPrerequisite { .. } => Severity::Error,
        }
    }

    /// Wraps the error when a prerequisite transaction already landed.
    #[must_use]
    pub fn after_prerequisite(self, prerequisite: Option<Signature>) -> Self {
        match prerequisite {
            Some(prerequisite) => Self::AfterPrerequisite {
                prerequisite,
                source: Box::new(self),
            },
            None => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokendesk::OperationKind;

    #[test]
    fn test_input_problems_are_warnings() {
        assert_eq!(
            TokenOpError::from(ValidationError::MissingMint).severity(),
            Severity::Warning
        );
        assert_eq!(
            TokenOpError::from(SessionError::NotConnected).severity(),
            Severity::Warning
        );
        assert_eq!(
            TokenOpError::from(OperationBusy(OperationKind::Transfer)).severity(),
            Severity::Warning
        );
    }

    #[test]
    fn test_chain_failures_are_errors() {
        let error = TokenOpError::from(ChainClientError::ConfirmationTimeout(Signature::default()));
        assert_eq!(error.severity(), Severity::Error);
    }

    #[test]
    fn test_after_prerequisite_keeps_signature() {
        let prerequisite = Signature::from([7u8; 64]);
        let error = TokenOpError::Instruction("boom".to_owned()).after_prerequisite(Some(prerequisite));
        match &error {
            TokenOpError::AfterPrerequisite {
                prerequisite: signature,
                source,
            } => {
                assert_eq!(*signature, prerequisite);
                assert!(matches!(**source, TokenOpError::Instruction(_)));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(error.to_string().contains(&prerequisite.to_string()));

        let error = TokenOpError::Instruction("boom".to_owned()).after_prerequisite(None);
        assert!(matches!(error, TokenOpError::Instruction(_)));
    }
}
