//! Solana chain access for the token desk.
//!
//! Workflows talk to the cluster only through [`ChainClient`], which returns
//! typed results instead of raw RPC responses. [`RpcChainClient`] is the
//! JSON-RPC implementation; tests substitute an in-memory client.
//!
//! # Key Types
//!
//! - [`ChainClient`] - The operations a token workflow needs from a cluster
//! - [`AccountState`] - Whether an account exists, separated from lookup failure
//! - [`MintInfo`] - Decimals and owning program of a mint
//! - [`TokenProgram`] - SPL Token or Token-2022

use async_trait::async_trait;
use solana_message::Hash;
use solana_pubkey::{Pubkey, pubkey};
use solana_signature::Signature;
use solana_transaction::Transaction;

pub mod error;
pub use error::*;

pub mod rpc;
pub use rpc::*;

/// Associated Token Account program.
pub const ATA_PROGRAM_PUBKEY: Pubkey = pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// The token program that owns a mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenProgram {
    /// Classic SPL Token program.
    #[default]
    Token,
    /// SPL Token-2022 program.
    Token2022,
}

impl TokenProgram {
    /// Program ID.
    #[must_use]
    pub fn id(self) -> Pubkey {
        match self {
            Self::Token => spl_token::id(),
            Self::Token2022 => spl_token_2022::id(),
        }
    }

    /// Maps an account owner to the token program, if it is one.
    #[must_use]
    pub fn from_owner(owner: &Pubkey) -> Option<Self> {
        if *owner == spl_token::id() {
            Some(Self::Token)
        } else if *owner == spl_token_2022::id() {
            Some(Self::Token2022)
        } else {
            None
        }
    }
}

/// On-chain facts about a mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintInfo {
    /// Decimal places declared by the mint.
    pub decimals: u8,
    /// Program that owns the mint.
    pub program: TokenProgram,
}

/// Result of an account existence lookup.
///
/// A failed lookup is an `Err` of the calling method, never `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    /// The account is allocated.
    Exists,
    /// The cluster answered that the account does not exist.
    NotFound,
}

/// A token account owned by a wallet, as reported by the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccountBalance {
    /// Address of the token account.
    pub address: String,
    /// Mint the account holds.
    pub mint: String,
    /// Balance in base units.
    pub amount: u64,
    /// Decimals of the mint.
    pub decimals: u8,
    /// Balance in display units, as formatted by the cluster.
    pub ui_amount: String,
}

/// One entry of an address's signature history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInfo {
    /// Transaction signature.
    pub signature: String,
    /// Block time in seconds since the epoch, when known.
    pub block_time: Option<i64>,
    /// Whether the transaction reached finalized commitment.
    pub finalized: bool,
    /// Whether the transaction failed on-chain.
    pub failed: bool,
}

/// Cluster operations used by the token workflows and the portfolio views.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// SOL balance of `address` in lamports.
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ChainClientError>;

    /// Minimum lamports for a rent-exempt account of `space` bytes.
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        space: usize,
    ) -> Result<u64, ChainClientError>;

    /// A recent blockhash for signing.
    async fn get_latest_blockhash(&self) -> Result<Hash, ChainClientError>;

    /// Submits a fully signed transaction.
    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, ChainClientError>;

    /// Waits until `signature` reaches the client's commitment.
    ///
    /// Fails with [`ChainClientError::TransactionFailed`] if the transaction
    /// executed with an error, and [`ChainClientError::ConfirmationTimeout`]
    /// if it was not seen in time.
    async fn confirm_transaction(&self, signature: &Signature) -> Result<(), ChainClientError>;

    /// All token accounts of the classic token program owned by `owner`.
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Vec<TokenAccountBalance>, ChainClientError>;

    /// Most recent signatures involving `address`, newest first.
    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, ChainClientError>;

    /// Reads decimals and owning program of `mint`.
    async fn get_mint(&self, mint: &Pubkey) -> Result<MintInfo, ChainClientError>;

    /// Checks whether `address` is allocated.
    async fn get_account_state(&self, address: &Pubkey) -> Result<AccountState, ChainClientError>;
}

/// Derives the associated token account of `owner` for `mint`.
#[must_use]
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey, program: TokenProgram) -> Pubkey {
    let (address, _) = Pubkey::find_program_address(
        &[owner.as_ref(), program.id().as_ref(), mint.as_ref()],
        &ATA_PROGRAM_PUBKEY,
    );
    address
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_program_from_owner() {
        assert_eq!(
            TokenProgram::from_owner(&spl_token::id()),
            Some(TokenProgram::Token)
        );
        assert_eq!(
            TokenProgram::from_owner(&spl_token_2022::id()),
            Some(TokenProgram::Token2022)
        );
        assert_eq!(TokenProgram::from_owner(&Pubkey::new_unique()), None);
    }

    #[test]
    fn test_associated_address_depends_on_program() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let classic = associated_token_address(&owner, &mint, TokenProgram::Token);
        assert_eq!(
            classic,
            associated_token_address(&owner, &mint, TokenProgram::Token)
        );
        assert_ne!(
            classic,
            associated_token_address(&owner, &mint, TokenProgram::Token2022)
        );
    }
}
