//! Mint decimals resolution and associated token account provisioning.

use solana_pubkey::Pubkey;
use solana_signature::Signature;
use tokendesk::{KeyValueStore, MAX_DECIMALS, OperationKind, TokenAmount, ValidationError};

use super::{PendingOperation, TokenDesk, TokenOpError, instructions};
use crate::chain::{AccountState, ChainClient, TokenProgram, associated_token_address};
use crate::session::Session;
use crate::wallet::WalletProvider;

/// Decimals assumed when neither the cache nor the cluster knows the mint.
pub const DEFAULT_DECIMALS: u8 = 9;

/// Where the decimals of a mint were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalsSource {
    /// The local metadata cache.
    Cached,
    /// The mint account on the cluster.
    Network,
    /// Neither; [`DEFAULT_DECIMALS`] was assumed.
    Fallback,
}

/// Decimals and program of a mint, as resolved for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMint {
    /// Decimals to scale amounts with.
    pub decimals: u8,
    /// Program that owns the mint.
    pub program: TokenProgram,
    /// Where the decimals came from.
    pub source: DecimalsSource,
}

impl ResolvedMint {
    /// Scales `amount` to base units of this mint.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDecimals`] if the mint declares more
    /// than nine decimals, and the scaling errors of
    /// [`TokenAmount::to_base_units`].
    pub fn scale(&self, amount: &TokenAmount) -> Result<u64, ValidationError> {
        if self.decimals > MAX_DECIMALS {
            return Err(ValidationError::InvalidDecimals(self.decimals.to_string()));
        }
        amount.to_base_units(self.decimals)
    }
}

/// The associated token account an operation delivers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociatedAccount {
    /// Account address.
    pub address: Pubkey,
    /// Signature of the confirmed transaction that created it, if it did not
    /// exist before.
    pub created_in: Option<Signature>,
}

impl<C: ChainClient, S: KeyValueStore> TokenDesk<C, S> {
    /// Determines the decimals of `mint`.
    ///
    /// The cache is consulted first, then the mint account. If both fail,
    /// [`DEFAULT_DECIMALS`] is assumed with the classic token program.
    pub async fn resolve_decimals(&self, mint: &Pubkey) -> ResolvedMint {
        if let Some(record) = self.cache.get(&mint.to_string()) {
            return ResolvedMint {
                decimals: record.decimals,
                program: TokenProgram::Token,
                source: DecimalsSource::Cached,
            };
        }
        match self.chain.get_mint(mint).await {
            Ok(info) => ResolvedMint {
                decimals: info.decimals,
                program: info.program,
                source: DecimalsSource::Network,
            },
            #[allow(unused_variables)] // e is needed for tracing only
            Err(e) => {
                #[cfg(feature = "telemetry")]
                tracing::warn!(%mint, error = %e, "Could not read mint, assuming {DEFAULT_DECIMALS} decimals");
                ResolvedMint {
                    decimals: DEFAULT_DECIMALS,
                    program: TokenProgram::Token,
                    source: DecimalsSource::Fallback,
                }
            }
        }
    }

    /// Returns the associated token account of `owner` for `mint`, creating
    /// it in its own confirmed transaction if the cluster reports it missing.
    ///
    /// # Errors
    ///
    /// A failed existence lookup is returned as is and nothing is created.
    pub(crate) async fn ensure_associated_account<W: WalletProvider>(
        &self,
        session: &Session<W>,
        payer: Pubkey,
        owner: &Pubkey,
        mint: &Pubkey,
        resolved: &ResolvedMint,
        kind: OperationKind,
    ) -> Result<AssociatedAccount, TokenOpError> {
        let address = associated_token_address(owner, mint, resolved.program);
        match self.chain.get_account_state(&address).await? {
            AccountState::Exists => Ok(AssociatedAccount {
                address,
                created_in: None,
            }),
            AccountState::NotFound => {
                #[cfg(feature = "telemetry")]
                tracing::info!(%owner, %mint, %address, "Creating associated token account");
                let instruction = instructions::create_associated_token_account(
                    &payer,
                    owner,
                    mint,
                    resolved.program,
                );
                let operation =
                    PendingOperation::new(kind, vec![instruction]).with_decimals(resolved.decimals);
                let signature = self.submit(session, payer, operation, &[]).await?;
                Ok(AssociatedAccount {
                    address,
                    created_in: Some(signature),
                })
            }
        }
    }
}
