//! Errors raised by [`ChainClient`](super::ChainClient) implementations.

use solana_pubkey::Pubkey;
use solana_signature::Signature;

/// Failure talking to the cluster.
#[derive(Debug, thiserror::Error)]
pub enum ChainClientError {
    /// The RPC request failed or returned an error.
    #[error("{method} failed: {message}")]
    Rpc {
        /// JSON-RPC method name.
        method: &'static str,
        /// Error reported by the transport or the node.
        message: String,
    },
    /// The account exists but is not a mint of a known token program.
    #[error("account {address} is not a token mint: {reason}")]
    NotAMint {
        /// The account that was read.
        address: Pubkey,
        /// Why it was rejected.
        reason: String,
    },
    /// A token account in a listing could not be decoded.
    #[error("token account {address} could not be parsed: {reason}")]
    UnparsableTokenAccount {
        /// The account address as reported.
        address: String,
        /// Why decoding failed.
        reason: String,
    },
    /// The transaction landed but executed with an error.
    #[error("transaction {signature} failed: {reason}")]
    TransactionFailed {
        /// Signature of the failed transaction.
        signature: Signature,
        /// Error reported by the cluster.
        reason: String,
    },
    /// The transaction was not confirmed before the deadline.
    #[error("transaction {0} was not confirmed in time")]
    ConfirmationTimeout(Signature),
}

impl ChainClientError {
    pub(crate) fn rpc(method: &'static str, error: impl std::fmt::Display) -> Self {
        Self::Rpc {
            method,
            message: error.to_string(),
        }
    }
}
