//! Read-only views of the connected wallet: SOL balance, token holdings and
//! recent transaction history.

use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use tokendesk::{KeyValueStore, from_base_units};

use crate::chain::ChainClient;
use crate::session::Session;
use crate::token::{TokenDesk, TokenOpError};
use crate::wallet::WalletProvider;

const SOL_DECIMALS: u8 = 9;
const SOL_DISPLAY_DECIMALS: u32 = 4;

/// Name shown for a held mint that is not in the metadata cache.
pub const UNKNOWN_TOKEN_NAME: &str = "Unknown Token";

/// Symbol shown for a held mint that is not in the metadata cache.
pub const UNKNOWN_TOKEN_SYMBOL: &str = "UNKNOWN";

/// Default number of history entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// SOL balance of a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolBalance {
    /// Balance in lamports.
    pub lamports: u64,
}

impl SolBalance {
    /// Balance in SOL.
    #[must_use]
    pub fn sol(&self) -> Decimal {
        from_base_units(self.lamports, SOL_DECIMALS)
    }
}

impl Display for SolBalance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut sol = self.sol().round_dp(SOL_DISPLAY_DECIMALS);
        sol.rescale(SOL_DISPLAY_DECIMALS);
        write!(f, "{sol} SOL")
    }
}

/// A non-zero token balance of the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHolding {
    /// Address of the token account.
    pub token_account: String,
    /// Mint address.
    pub mint: String,
    /// Name from the metadata cache, or [`UNKNOWN_TOKEN_NAME`].
    pub name: String,
    /// Symbol from the metadata cache, or [`UNKNOWN_TOKEN_SYMBOL`].
    pub symbol: String,
    /// Balance in display units, as formatted by the cluster.
    pub balance: String,
    /// Balance in base units.
    pub raw_amount: u64,
    /// Decimals of the mint.
    pub decimals: u8,
}

/// One recent transaction of the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Full signature.
    pub signature: String,
    /// Signature shortened for display.
    pub short_signature: String,
    /// Block time in seconds since the epoch, when known.
    pub block_time: Option<i64>,
    /// Whether the transaction is finalized.
    pub finalized: bool,
    /// Whether the transaction failed on-chain.
    pub failed: bool,
    /// Explorer page of the transaction.
    pub explorer_url: String,
}

impl HistoryEntry {
    /// Status label: `Confirmed` once finalized, `Pending` before, `Failed`
    /// on error.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        if self.failed {
            "Failed"
        } else if self.finalized {
            "Confirmed"
        } else {
            "Pending"
        }
    }
}

impl<C: ChainClient, S: KeyValueStore> TokenDesk<C, S> {
    /// SOL balance of the session owner.
    ///
    /// # Errors
    ///
    /// Returns [`TokenOpError`] if the session is not connected or the
    /// balance cannot be read.
    pub async fn sol_balance<W: WalletProvider>(
        &self,
        session: &Session<W>,
    ) -> Result<SolBalance, TokenOpError> {
        let owner = session.require_connected().await?;
        let lamports = self.chain().get_balance(&owner).await?;
        Ok(SolBalance { lamports })
    }

    /// Non-zero token balances of the session owner, labelled from the
    /// metadata cache.
    ///
    /// # Errors
    ///
    /// Returns [`TokenOpError`] if the session is not connected or the token
    /// accounts cannot be read.
    pub async fn token_holdings<W: WalletProvider>(
        &self,
        session: &Session<W>,
    ) -> Result<Vec<TokenHolding>, TokenOpError> {
        let owner = session.require_connected().await?;
        let accounts = self.chain().get_token_accounts_by_owner(&owner).await?;
        let known = self.cache().all();
        Ok(accounts
            .into_iter()
            .filter(|account| account.amount > 0)
            .map(|account| {
                let record = known.iter().find(|r| r.mint_address == account.mint);
                TokenHolding {
                    name: record.map_or_else(|| UNKNOWN_TOKEN_NAME.to_owned(), |r| r.name.clone()),
                    symbol: record
                        .map_or_else(|| UNKNOWN_TOKEN_SYMBOL.to_owned(), |r| r.symbol.clone()),
                    token_account: account.address,
                    mint: account.mint,
                    balance: account.ui_amount,
                    raw_amount: account.amount,
                    decimals: account.decimals,
                }
            })
            .collect())
    }

    /// The `limit` most recent transactions of the session owner, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`TokenOpError`] if the session is not connected or the
    /// signatures cannot be read.
    pub async fn transaction_history<W: WalletProvider>(
        &self,
        session: &Session<W>,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, TokenOpError> {
        let owner = session.require_connected().await?;
        let signatures = self
            .chain()
            .get_signatures_for_address(&owner, limit)
            .await?;
        Ok(signatures
            .into_iter()
            .map(|info| HistoryEntry {
                short_signature: shorten_address(&info.signature),
                explorer_url: self.network().explorer_tx_url(&info.signature),
                signature: info.signature,
                block_time: info.block_time,
                finalized: info.finalized,
                failed: info.failed,
            })
            .collect())
    }
}

/// Shortens an address or signature to its first six and last four
/// characters.
///
/// Strings of ten characters or fewer are returned unchanged.
#[must_use]
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_owned();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_address() {
        assert_eq!(
            shorten_address("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU"),
            "7xKXtg...gAsU"
        );
        assert_eq!(shorten_address("short"), "short");
    }

    #[test]
    fn test_sol_balance_display() {
        let balance = SolBalance {
            lamports: 1_500_000_000,
        };
        assert_eq!(balance.to_string(), "1.5000 SOL");
        let balance = SolBalance {
            lamports: 123_456_789,
        };
        assert_eq!(balance.to_string(), "0.1235 SOL");
        assert_eq!(SolBalance { lamports: 0 }.to_string(), "0.0000 SOL");
    }

    #[test]
    fn test_history_status() {
        let mut entry = HistoryEntry {
            signature: "sig".to_owned(),
            short_signature: "sig".to_owned(),
            block_time: None,
            finalized: false,
            failed: false,
            explorer_url: String::new(),
        };
        assert_eq!(entry.status(), "Pending");
        entry.finalized = true;
        assert_eq!(entry.status(), "Confirmed");
        entry.failed = true;
        assert_eq!(entry.status(), "Failed");
    }
}
