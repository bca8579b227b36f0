//! Mint-to workflow.

use solana_pubkey::Pubkey;
use tokendesk::{KeyValueStore, OperationKind};

use super::{
    MintToForm, MintToInput, PendingOperation, TokenDesk, TokenOpError, TokenReceipt, instructions,
    parse_address,
};
use crate::chain::ChainClient;
use crate::session::Session;
use crate::wallet::WalletProvider;

impl<C: ChainClient, S: KeyValueStore> TokenDesk<C, S> {
    /// Mints tokens to the recipient's associated token account, creating
    /// the account first if it does not exist. An empty recipient mints to
    /// the session owner.
    ///
    /// Amount and recipient are cleared from the form on success.
    ///
    /// # Errors
    ///
    /// Returns [`TokenOpError`] if the session is not connected, the form is
    /// invalid, a mint-to is already running, or the wallet or the cluster
    /// rejects a transaction. If the account was created but minting failed,
    /// the error is [`TokenOpError::AfterPrerequisite`].
    pub async fn mint_to<W: WalletProvider>(
        &self,
        session: &Session<W>,
        form: &mut MintToForm,
    ) -> Result<TokenReceipt, TokenOpError> {
        let kind = OperationKind::MintTo;
        let result = self.try_mint_to(session, form, kind).await;
        self.report(kind, &result, |receipt| {
            format!("Successfully minted {} tokens", receipt.amount)
        });
        if result.is_ok() {
            form.clear();
        }
        result
    }

    async fn try_mint_to<W: WalletProvider>(
        &self,
        session: &Session<W>,
        form: &MintToForm,
        kind: OperationKind,
    ) -> Result<TokenReceipt, TokenOpError> {
        let payer = session.require_connected().await?;
        let input = form.validate()?;
        let _permit = self.guard.try_begin(kind)?;
        self.track(kind, self.execute_mint_to(session, payer, input))
            .await
    }

    async fn execute_mint_to<W: WalletProvider>(
        &self,
        session: &Session<W>,
        payer: Pubkey,
        input: MintToInput,
    ) -> Result<TokenReceipt, TokenOpError> {
        let kind = OperationKind::MintTo;
        let mint = parse_address("mint", &input.mint)?;
        let recipient = match &input.recipient {
            Some(recipient) => parse_address("recipient", recipient)?,
            None => payer,
        };
        let resolved = self.resolve_decimals(&mint).await;
        let raw_amount = resolved.scale(&input.amount)?;
        let account = self
            .ensure_associated_account(session, payer, &recipient, &mint, &resolved, kind)
            .await?;

        let main = async {
            let instruction =
                instructions::mint_to(resolved.program, &mint, &account.address, &payer, raw_amount)?;
            let operation =
                PendingOperation::new(kind, vec![instruction]).with_decimals(resolved.decimals);
            self.submit(session, payer, operation, &[]).await
        };
        let signature = main
            .await
            .map_err(|e| e.after_prerequisite(account.created_in))?;

        Ok(TokenReceipt {
            signature,
            amount: input.amount,
            raw_amount,
            decimals: resolved.decimals,
            decimals_source: resolved.source,
            destination: account.address,
            account_created: account.created_in,
        })
    }
}
