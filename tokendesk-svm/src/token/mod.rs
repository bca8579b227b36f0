//! SPL token workflows.
//!
//! [`TokenDesk`] runs the three operations of the desk against a
//! [`ChainClient`] on behalf of a connected [`Session`]:
//!
//! - [`TokenDesk::create_mint`] - allocate and initialize a new mint
//! - [`TokenDesk::mint_to`] - mint supply to a wallet's associated token account
//! - [`TokenDesk::transfer`] - send tokens from the owner's associated token account
//!
//! Every operation follows the same shape: check the session, validate the
//! form, claim the operation slot, then build, sign, submit and confirm one
//! or two transactions. The outcome is reported through
//! [`OperationHooks`] and returned as a typed result. A successful operation
//! clears the fields of its form that it consumed.

use std::future::Future;
use std::sync::Arc;

use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction::Transaction;
use tokendesk::{
    KeyValueStore, NoopHooks, Notification, OperationGuard, OperationHooks, OperationKind,
    Severity, TokenMetadataCache,
};

use crate::chain::ChainClient;
use crate::networks::{DEVNET, SolanaNetwork};
use crate::session::Session;
use crate::wallet::WalletProvider;

pub mod error;
pub use error::*;

pub mod forms;
pub use forms::*;

pub mod instructions;

pub mod resolver;
pub use resolver::*;

mod create_mint;
pub use create_mint::CreatedMint;

mod mint_to;
mod transfer;

/// Outcome of a successful mint-to or transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReceipt {
    /// Signature of the main transaction.
    pub signature: Signature,
    /// Amount in display units.
    pub amount: tokendesk::TokenAmount,
    /// Amount in base units.
    pub raw_amount: u64,
    /// Decimals used for scaling.
    pub decimals: u8,
    /// Where the decimals came from.
    pub decimals_source: DecimalsSource,
    /// Associated token account that received the tokens.
    pub destination: Pubkey,
    /// Signature of the transaction that created `destination`, if it had to
    /// be created.
    pub account_created: Option<Signature>,
}

/// A transaction about to be signed and submitted.
#[derive(Debug, Clone)]
pub struct PendingOperation {
    /// The operation the transaction belongs to.
    pub kind: OperationKind,
    /// Decimals of the mint involved, when relevant.
    pub decimals: Option<u8>,
    /// Instructions in execution order.
    pub instructions: Vec<Instruction>,
}

impl PendingOperation {
    /// Creates a pending operation.
    #[must_use]
    pub const fn new(kind: OperationKind, instructions: Vec<Instruction>) -> Self {
        Self {
            kind,
            decimals: None,
            instructions,
        }
    }

    /// Records the decimals of the mint involved.
    #[must_use]
    pub const fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }
}

/// Runs token operations and portfolio queries.
pub struct TokenDesk<C, S> {
    chain: C,
    cache: TokenMetadataCache<S>,
    hooks: Arc<dyn OperationHooks>,
    guard: OperationGuard,
    network: SolanaNetwork,
}

impl<C, S> std::fmt::Debug for TokenDesk<C, S>
where
    C: std::fmt::Debug,
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDesk")
            .field("chain", &self.chain)
            .field("cache", &self.cache)
            .field("guard", &self.guard)
            .field("network", &self.network.name)
            .finish_non_exhaustive()
    }
}

impl<C: ChainClient, S: KeyValueStore> TokenDesk<C, S> {
    /// Creates a desk on devnet that reports nothing.
    pub fn new(chain: C, store: S) -> Self {
        Self {
            chain,
            cache: TokenMetadataCache::new(store),
            hooks: Arc::new(NoopHooks),
            guard: OperationGuard::new(),
            network: DEVNET,
        }
    }

    /// Sets the hooks that receive progress and notifications.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn OperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Sets the cluster used for explorer links.
    #[must_use]
    pub const fn with_network(mut self, network: SolanaNetwork) -> Self {
        self.network = network;
        self
    }

    /// The chain client.
    pub const fn chain(&self) -> &C {
        &self.chain
    }

    /// The token metadata cache.
    pub const fn cache(&self) -> &TokenMetadataCache<S> {
        &self.cache
    }

    /// The in-flight operation guard.
    pub const fn guard(&self) -> &OperationGuard {
        &self.guard
    }

    /// The cluster used for explorer links.
    pub const fn network(&self) -> &SolanaNetwork {
        &self.network
    }

    /// Brackets `operation` with the progress hooks.
    async fn track<T, F>(&self, kind: OperationKind, operation: F) -> Result<T, TokenOpError>
    where
        F: Future<Output = Result<T, TokenOpError>>,
    {
        self.hooks.on_progress(kind, kind.progress_message());
        let result = operation.await;
        self.hooks.on_finished(kind);
        result
    }

    /// Emits the notification for a finished operation.
    fn report<T>(
        &self,
        kind: OperationKind,
        result: &Result<T, TokenOpError>,
        success: impl FnOnce(&T) -> String,
    ) {
        let notification = match result {
            Ok(value) => Notification::success(success(value)),
            Err(e) => match e.severity() {
                Severity::Error => Notification::error(format!("{}: {e}", kind.failure_prefix())),
                severity => Notification::new(severity, e.to_string()),
            },
        };
        #[cfg(feature = "telemetry")]
        if let Err(e) = result {
            tracing::debug!(operation = %kind, error = ?e, "Operation failed");
        }
        self.hooks.on_notify(&notification);
    }

    /// Builds a transaction from `operation`, has the session's wallet and any
    /// `co_signers` sign it, submits it and waits for confirmation.
    async fn submit<W: WalletProvider>(
        &self,
        session: &Session<W>,
        payer: Pubkey,
        operation: PendingOperation,
        co_signers: &[&Keypair],
    ) -> Result<Signature, TokenOpError> {
        #[cfg(feature = "telemetry")]
        tracing::debug!(
            operation = %operation.kind,
            decimals = ?operation.decimals,
            instructions = operation.instructions.len(),
            "Submitting transaction"
        );
        let blockhash = self.chain.get_latest_blockhash().await?;
        let mut transaction = Transaction::new_with_payer(&operation.instructions, Some(&payer));
        transaction.message.recent_blockhash = blockhash;
        if !co_signers.is_empty() {
            transaction
                .try_partial_sign(co_signers, blockhash)
                .map_err(|e| TokenOpError::Instruction(e.to_string()))?;
        }
        let transaction = session.sign_transaction(transaction).await?;
        let signature = self.chain.send_transaction(&transaction).await?;
        self.chain.confirm_transaction(&signature).await?;
        #[cfg(feature = "telemetry")]
        tracing::info!(operation = %operation.kind, %signature, "Transaction confirmed");
        Ok(signature)
    }
}

/// Parses a base58 address typed into `field`.
pub(crate) fn parse_address(field: &'static str, value: &str) -> Result<Pubkey, TokenOpError> {
    value
        .parse::<Pubkey>()
        .map_err(|e| TokenOpError::InvalidAddress {
            field,
            value: value.to_owned(),
            reason: e.to_string(),
        })
}
