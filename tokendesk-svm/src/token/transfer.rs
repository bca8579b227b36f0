//! Transfer workflow.

use solana_pubkey::Pubkey;
use tokendesk::{KeyValueStore, OperationKind};

use super::{
    PendingOperation, TokenDesk, TokenOpError, TokenReceipt, TransferForm, TransferInput,
    instructions, parse_address,
};
use crate::chain::{ChainClient, associated_token_address};
use crate::session::Session;
use crate::wallet::WalletProvider;

impl<C: ChainClient, S: KeyValueStore> TokenDesk<C, S> {
    /// Sends tokens from the session owner's associated token account to the
    /// recipient's, creating the recipient's account first if it does not
    /// exist.
    ///
    /// Amount and recipient are cleared from the form on success.
    ///
    /// # Errors
    ///
    /// Returns [`TokenOpError`] if the session is not connected, the form is
    /// invalid, a transfer is already running, or the wallet or the cluster
    /// rejects a transaction. If the recipient's account was created but the
    /// transfer failed, the error is [`TokenOpError::AfterPrerequisite`].
    pub async fn transfer<W: WalletProvider>(
        &self,
        session: &Session<W>,
        form: &mut TransferForm,
    ) -> Result<TokenReceipt, TokenOpError> {
        let kind = OperationKind::Transfer;
        let result = self.try_transfer(session, form, kind).await;
        self.report(kind, &result, |receipt| {
            format!("Successfully sent {} tokens", receipt.amount)
        });
        if result.is_ok() {
            form.clear();
        }
        result
    }

    async fn try_transfer<W: WalletProvider>(
        &self,
        session: &Session<W>,
        form: &TransferForm,
        kind: OperationKind,
    ) -> Result<TokenReceipt, TokenOpError> {
        let owner = session.require_connected().await?;
        let input = form.validate()?;
        let _permit = self.guard.try_begin(kind)?;
        self.track(kind, self.execute_transfer(session, owner, input))
            .await
    }

    async fn execute_transfer<W: WalletProvider>(
        &self,
        session: &Session<W>,
        owner: Pubkey,
        input: TransferInput,
    ) -> Result<TokenReceipt, TokenOpError> {
        let kind = OperationKind::Transfer;
        let mint = parse_address("token", &input.mint)?;
        let recipient = parse_address("recipient", &input.recipient)?;
        let resolved = self.resolve_decimals(&mint).await;
        let raw_amount = resolved.scale(&input.amount)?;
        let source = associated_token_address(&owner, &mint, resolved.program);
        let destination = self
            .ensure_associated_account(session, owner, &recipient, &mint, &resolved, kind)
            .await?;

        let main = async {
            let instruction = instructions::transfer(
                resolved.program,
                &source,
                &destination.address,
                &owner,
                raw_amount,
            )?;
            let operation =
                PendingOperation::new(kind, vec![instruction]).with_decimals(resolved.decimals);
            self.submit(session, owner, operation, &[]).await
        };
        let signature = main
            .await
            .map_err(|e| e.after_prerequisite(destination.created_in))?;

        Ok(TokenReceipt {
            signature,
            amount: input.amount,
            raw_amount,
            decimals: resolved.decimals,
            decimals_source: resolved.source,
            destination: destination.address,
            account_created: destination.created_in,
        })
    }
}
