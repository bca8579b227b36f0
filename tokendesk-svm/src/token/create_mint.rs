//! Create-mint workflow.

use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use spl_token::solana_program::program_pack::Pack;
use tokendesk::{KeyValueStore, OperationKind, TokenMetadataRecord};

use super::{CreateMintForm, CreateMintInput, PendingOperation, TokenDesk, TokenOpError};
use crate::chain::ChainClient;
use crate::session::Session;
use crate::wallet::WalletProvider;

/// Outcome of a successful create-mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedMint {
    /// Address of the new mint.
    pub mint: Pubkey,
    /// Signature of the creating transaction.
    pub signature: Signature,
    /// Metadata recorded for the mint.
    pub record: TokenMetadataRecord,
}

impl<C: ChainClient, S: KeyValueStore> TokenDesk<C, S> {
    /// Creates a new SPL mint with the session owner as mint and freeze
    /// authority, and records its metadata in the cache.
    ///
    /// The form is cleared on success.
    ///
    /// # Errors
    ///
    /// Returns [`TokenOpError`] if the session is not connected, the form is
    /// invalid, a create-mint is already running, or the wallet or the
    /// cluster rejects the transaction.
    pub async fn create_mint<W: WalletProvider>(
        &self,
        session: &Session<W>,
        form: &mut CreateMintForm,
    ) -> Result<CreatedMint, TokenOpError> {
        let kind = OperationKind::CreateMint;
        let result = self.try_create_mint(session, form, kind).await;
        self.report(kind, &result, |created| {
            format!("Token \"{}\" created successfully!", created.record.name)
        });
        if result.is_ok() {
            form.clear();
        }
        result
    }

    async fn try_create_mint<W: WalletProvider>(
        &self,
        session: &Session<W>,
        form: &CreateMintForm,
        kind: OperationKind,
    ) -> Result<CreatedMint, TokenOpError> {
        let payer = session.require_connected().await?;
        let input = form.validate()?;
        let _permit = self.guard.try_begin(kind)?;
        self.track(kind, self.execute_create_mint(session, payer, input))
            .await
    }

    async fn execute_create_mint<W: WalletProvider>(
        &self,
        session: &Session<W>,
        payer: Pubkey,
        input: CreateMintInput,
    ) -> Result<CreatedMint, TokenOpError> {
        let mint = Keypair::new();
        let mint_pubkey = mint.pubkey();
        let token_program = spl_token::id();
        let space = spl_token::state::Mint::LEN;
        let lamports = self
            .chain
            .get_minimum_balance_for_rent_exemption(space)
            .await?;
        let instructions = vec![
            solana_system_interface::instruction::create_account(
                &payer,
                &mint_pubkey,
                lamports,
                space as u64,
                &token_program,
            ),
            spl_token::instruction::initialize_mint2(
                &token_program,
                &mint_pubkey,
                &payer,
                Some(&payer),
                input.decimals,
            )
            .map_err(|e| TokenOpError::Instruction(e.to_string()))?,
        ];
        let operation = PendingOperation::new(OperationKind::CreateMint, instructions)
            .with_decimals(input.decimals);
        let signature = self.submit(session, payer, operation, &[&mint]).await?;

        let record = TokenMetadataRecord {
            mint_address: mint_pubkey.to_string(),
            name: input.name,
            symbol: input.symbol,
            decimals: input.decimals,
        };
        #[allow(unused_variables)] // e is needed for tracing only
        if let Err(e) = self.cache.put(record.clone()) {
            #[cfg(feature = "telemetry")]
            tracing::warn!(mint = %mint_pubkey, error = %e, "Failed to record token metadata");
        }
        Ok(CreatedMint {
            mint: mint_pubkey,
            signature,
            record,
        })
    }
}
