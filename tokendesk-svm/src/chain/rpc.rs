//! JSON-RPC implementation of [`ChainClient`].

use std::fmt::{Debug, Formatter};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_client::rpc_response::RpcKeyedAccount;
use solana_commitment_config::CommitmentConfig;
use solana_message::Hash;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_transaction::Transaction;
use solana_transaction_status_client_types::TransactionConfirmationStatus;
use spl_token::solana_program::program_pack::Pack;
use spl_token_2022::extension::StateWithExtensions;
use tokio::time::Instant;

use super::{
    AccountState, ChainClient, ChainClientError, MintInfo, SignatureInfo, TokenAccountBalance,
    TokenProgram,
};

/// Default time to wait for a transaction to reach the client's commitment.
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

/// Default interval between signature status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// [`ChainClient`] backed by a Solana JSON-RPC endpoint.
pub struct RpcChainClient {
    rpc: RpcClient,
    confirm_timeout: Duration,
    poll_interval: Duration,
}

impl RpcChainClient {
    /// Connects to `url` with the given commitment.
    pub fn new(url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(url.into(), commitment),
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets the confirmation deadline and poll interval.
    #[must_use]
    pub const fn with_confirmation(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.confirm_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    /// RPC endpoint URL.
    #[must_use]
    pub fn url(&self) -> String {
        self.rpc.url()
    }

    /// Commitment used for reads and confirmation.
    #[must_use]
    pub fn commitment(&self) -> CommitmentConfig {
        self.rpc.commitment()
    }
}

impl Debug for RpcChainClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("url", &self.rpc.url())
            .field("commitment", &self.rpc.commitment().commitment)
            .field("confirm_timeout", &self.confirm_timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ChainClientError> {
        self.rpc
            .get_balance(address)
            .await
            .map_err(|e| ChainClientError::rpc("getBalance", e))
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        space: usize,
    ) -> Result<u64, ChainClientError> {
        self.rpc
            .get_minimum_balance_for_rent_exemption(space)
            .await
            .map_err(|e| ChainClientError::rpc("getMinimumBalanceForRentExemption", e))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, ChainClientError> {
        self.rpc
            .get_latest_blockhash()
            .await
            .map_err(|e| ChainClientError::rpc("getLatestBlockhash", e))
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, ChainClientError> {
        #[cfg(feature = "telemetry")]
        tracing::debug!(
            instructions = transaction.message.instructions.len(),
            signatures = transaction.signatures.len(),
            "Sending transaction"
        );
        self.rpc
            .send_transaction(transaction)
            .await
            .map_err(|e| ChainClientError::rpc("sendTransaction", e))
    }

    async fn confirm_transaction(&self, signature: &Signature) -> Result<(), ChainClientError> {
        let deadline = Instant::now() + self.confirm_timeout;
        loop {
            let status = self
                .rpc
                .get_signature_status_with_commitment(signature, self.rpc.commitment())
                .await
                .map_err(|e| ChainClientError::rpc("getSignatureStatuses", e))?;
            match status {
                Some(Ok(())) => return Ok(()),
                Some(Err(e)) => {
                    return Err(ChainClientError::TransactionFailed {
                        signature: *signature,
                        reason: e.to_string(),
                    });
                }
                None => {}
            }
            if Instant::now() >= deadline {
                return Err(ChainClientError::ConfirmationTimeout(*signature));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<Vec<TokenAccountBalance>, ChainClientError> {
        let accounts = self
            .rpc
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(spl_token::id()))
            .await
            .map_err(|e| ChainClientError::rpc("getTokenAccountsByOwner", e))?;
        accounts.iter().map(parse_token_account).collect()
    }

    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, ChainClientError> {
        let config = GetConfirmedSignaturesForAddress2Config {
            limit: Some(limit),
            ..Default::default()
        };
        let statuses = self
            .rpc
            .get_signatures_for_address_with_config(address, config)
            .await
            .map_err(|e| ChainClientError::rpc("getSignaturesForAddress", e))?;
        Ok(statuses
            .into_iter()
            .map(|status| SignatureInfo {
                signature: status.signature,
                block_time: status.block_time,
                finalized: matches!(
                    status.confirmation_status,
                    Some(TransactionConfirmationStatus::Finalized)
                ),
                failed: status.err.is_some(),
            })
            .collect())
    }

    async fn get_mint(&self, mint: &Pubkey) -> Result<MintInfo, ChainClientError> {
        let account = self
            .rpc
            .get_account(mint)
            .await
            .map_err(|e| ChainClientError::rpc("getAccountInfo", e))?;
        let not_a_mint = |reason: String| ChainClientError::NotAMint {
            address: *mint,
            reason,
        };
        match TokenProgram::from_owner(&account.owner) {
            Some(TokenProgram::Token) => {
                let state = spl_token::state::Mint::unpack(&account.data)
                    .map_err(|e| not_a_mint(e.to_string()))?;
                Ok(MintInfo {
                    decimals: state.decimals,
                    program: TokenProgram::Token,
                })
            }
            Some(TokenProgram::Token2022) => {
                let state = StateWithExtensions::<spl_token_2022::state::Mint>::unpack(
                    &account.data,
                )
                .map_err(|e| not_a_mint(e.to_string()))?;
                Ok(MintInfo {
                    decimals: state.base.decimals,
                    program: TokenProgram::Token2022,
                })
            }
            None => Err(not_a_mint(format!("owned by {}", account.owner))),
        }
    }

    async fn get_account_state(&self, address: &Pubkey) -> Result<AccountState, ChainClientError> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await
            .map_err(|e| ChainClientError::rpc("getAccountInfo", e))?;
        Ok(if response.value.is_some() {
            AccountState::Exists
        } else {
            AccountState::NotFound
        })
    }
}

#[derive(Deserialize)]
struct ParsedAccountData {
    parsed: ParsedTokenAccount,
}

#[derive(Deserialize)]
struct ParsedTokenAccount {
    info: TokenAccountInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenAccountInfo {
    mint: String,
    token_amount: RawTokenAmount,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTokenAmount {
    amount: String,
    decimals: u8,
    ui_amount_string: String,
}

fn parse_token_account(keyed: &RpcKeyedAccount) -> Result<TokenAccountBalance, ChainClientError> {
    let unparsable = |reason: String| ChainClientError::UnparsableTokenAccount {
        address: keyed.pubkey.clone(),
        reason,
    };
    let value = serde_json::to_value(&keyed.account.data).map_err(|e| unparsable(e.to_string()))?;
    let data: ParsedAccountData =
        serde_json::from_value(value).map_err(|e| unparsable(e.to_string()))?;
    let info = data.parsed.info;
    let amount = info
        .token_amount
        .amount
        .parse::<u64>()
        .map_err(|e| unparsable(e.to_string()))?;
    Ok(TokenAccountBalance {
        address: keyed.pubkey.clone(),
        mint: info.mint,
        amount,
        decimals: info.token_amount.decimals,
        ui_amount: info.token_amount.ui_amount_string,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rpc_result(result: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": result,
            "id": 1,
        }))
    }

    async fn mock_method(server: &MockServer, name: &str, result: serde_json::Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": name })))
            .respond_with(rpc_result(result))
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> RpcChainClient {
        RpcChainClient::new(server.uri(), CommitmentConfig::confirmed())
            .with_confirmation(Duration::from_millis(50), Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_get_balance() {
        let server = MockServer::start().await;
        mock_method(
            &server,
            "getBalance",
            json!({ "context": { "slot": 1 }, "value": 1_500_000_000u64 }),
        )
        .await;
        let balance = client(&server)
            .get_balance(&Pubkey::new_unique())
            .await
            .unwrap();
        assert_eq!(balance, 1_500_000_000);
    }

    #[tokio::test]
    async fn test_rent_exemption() {
        let server = MockServer::start().await;
        mock_method(&server, "getMinimumBalanceForRentExemption", json!(1_461_600)).await;
        let lamports = client(&server)
            .get_minimum_balance_for_rent_exemption(spl_token::state::Mint::LEN)
            .await
            .unwrap();
        assert_eq!(lamports, 1_461_600);
    }

    #[tokio::test]
    async fn test_missing_account_is_not_found() {
        let server = MockServer::start().await;
        mock_method(
            &server,
            "getAccountInfo",
            json!({ "context": { "slot": 1 }, "value": null }),
        )
        .await;
        let state = client(&server)
            .get_account_state(&Pubkey::new_unique())
            .await
            .unwrap();
        assert_eq!(state, AccountState::NotFound);
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error_not_a_missing_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let result = client(&server)
            .get_account_state(&Pubkey::new_unique())
            .await;
        assert!(matches!(
            result,
            Err(ChainClientError::Rpc {
                method: "getAccountInfo",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_confirm_transaction_succeeds() {
        let server = MockServer::start().await;
        mock_method(
            &server,
            "getSignatureStatuses",
            json!({
                "context": { "slot": 1 },
                "value": [{
                    "slot": 1,
                    "confirmations": 1,
                    "err": null,
                    "status": { "Ok": null },
                    "confirmationStatus": "confirmed",
                }],
            }),
        )
        .await;
        client(&server)
            .confirm_transaction(&Signature::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_confirm_transaction_reports_failure() {
        let server = MockServer::start().await;
        mock_method(
            &server,
            "getSignatureStatuses",
            json!({
                "context": { "slot": 1 },
                "value": [{
                    "slot": 1,
                    "confirmations": 1,
                    "err": "AccountInUse",
                    "status": { "Err": "AccountInUse" },
                    "confirmationStatus": "confirmed",
                }],
            }),
        )
        .await;
        let result = client(&server)
            .confirm_transaction(&Signature::default())
            .await;
        assert!(matches!(
            result,
            Err(ChainClientError::TransactionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_confirm_transaction_times_out() {
        let server = MockServer::start().await;
        mock_method(
            &server,
            "getSignatureStatuses",
            json!({ "context": { "slot": 1 }, "value": [null] }),
        )
        .await;
        let result = client(&server)
            .confirm_transaction(&Signature::default())
            .await;
        assert!(matches!(
            result,
            Err(ChainClientError::ConfirmationTimeout(_))
        ));
    }

    #[tokio::test]
    async fn test_token_accounts_are_parsed() {
        let server = MockServer::start().await;
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let account = Pubkey::new_unique();
        mock_method(
            &server,
            "getTokenAccountsByOwner",
            json!({
                "context": { "slot": 1 },
                "value": [{
                    "pubkey": account.to_string(),
                    "account": {
                        "lamports": 2_039_280,
                        "owner": spl_token::id().to_string(),
                        "executable": false,
                        "rentEpoch": 0,
                        "space": 165,
                        "data": {
                            "program": "spl-token",
                            "space": 165,
                            "parsed": {
                                "type": "account",
                                "info": {
                                    "isNative": false,
                                    "mint": mint.to_string(),
                                    "owner": owner.to_string(),
                                    "state": "initialized",
                                    "tokenAmount": {
                                        "amount": "1500000",
                                        "decimals": 6,
                                        "uiAmount": 1.5,
                                        "uiAmountString": "1.5",
                                    },
                                },
                            },
                        },
                    },
                }],
            }),
        )
        .await;
        let balances = client(&server)
            .get_token_accounts_by_owner(&owner)
            .await
            .unwrap();
        assert_eq!(
            balances,
            vec![TokenAccountBalance {
                address: account.to_string(),
                mint: mint.to_string(),
                amount: 1_500_000,
                decimals: 6,
                ui_amount: "1.5".to_owned(),
            }]
        );
    }
}
