//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::config::DeskConfig;

/// Create, mint and send SPL tokens on Solana devnet.
#[derive(Debug, Parser)]
#[command(name = "tokendesk", version, about)]
pub struct Cli {
    /// Configuration file.
    #[arg(long, global = true, env = "TOKENDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Solana CLI keypair file of the wallet.
    #[arg(long, global = true)]
    pub keypair: Option<PathBuf>,

    /// JSON-RPC endpoint.
    #[arg(long, global = true, env = "RPC_URL")]
    pub rpc_url: Option<Url>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Desk commands. Each one connects the wallet first.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the wallet address.
    Address,
    /// Print the SOL balance.
    Balance,
    /// List non-zero token balances.
    Holdings,
    /// List recent transactions.
    History {
        /// Number of transactions to show.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Create a new token mint.
    CreateMint(CreateMintArgs),
    /// Mint tokens to a wallet.
    Mint(MintArgs),
    /// Send tokens to a wallet.
    Transfer(TransferArgs),
}

/// Arguments of `create-mint`.
#[derive(Debug, Args)]
pub struct CreateMintArgs {
    /// Token name.
    #[arg(long)]
    pub name: String,
    /// Token symbol.
    #[arg(long)]
    pub symbol: String,
    /// Decimal places, 0 to 9.
    #[arg(long, default_value = "9")]
    pub decimals: String,
}

/// Arguments of `mint`.
#[derive(Debug, Args)]
pub struct MintArgs {
    /// Mint address.
    #[arg(long)]
    pub mint: String,
    /// Amount in display units, e.g. `1.5`.
    #[arg(long)]
    pub amount: String,
    /// Recipient wallet; defaults to your own.
    #[arg(long, default_value = "")]
    pub recipient: String,
}

/// Arguments of `transfer`.
#[derive(Debug, Args)]
pub struct TransferArgs {
    /// Mint address of the token to send.
    #[arg(long)]
    pub mint: String,
    /// Recipient wallet.
    #[arg(long)]
    pub recipient: String,
    /// Amount in display units.
    #[arg(long)]
    pub amount: String,
}

impl Cli {
    /// Applies command-line overrides to `config`.
    pub fn apply_overrides(&self, config: &mut DeskConfig) {
        if let Some(keypair) = &self.keypair {
            config.keypair_path.clone_from(keypair);
        }
        if let Some(rpc_url) = &self.rpc_url {
            config.rpc_url.clone_from(rpc_url);
        }
    }
}
