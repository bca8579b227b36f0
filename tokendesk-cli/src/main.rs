//! Token desk command-line binary.
//!
//! # Usage
//!
//! ```bash
//! # Show the SOL balance of ~/.config/solana/id.json on devnet
//! tokendesk balance
//!
//! # Create a mint and mint supply to yourself
//! tokendesk create-mint --name "Test Token" --symbol TST --decimals 6
//! tokendesk mint --mint <MINT> --amount 1000
//!
//! # Send tokens
//! tokendesk transfer --mint <MINT> --recipient <WALLET> --amount 12.5
//!
//! # Configure logging level
//! RUST_LOG=debug tokendesk holdings
//! ```
//!
//! # Environment Variables
//!
//! - `TOKENDESK_CONFIG` - Path to the TOML configuration (default: `tokendesk.toml`)
//! - `RPC_URL` - Override the RPC endpoint
//! - `RUST_LOG` - Log level filter (default: `warn`)

use std::sync::Arc;

use clap::Parser;
use tokendesk::FileStore;
use tokendesk_svm::token::{CreateMintForm, MintToForm, TokenDesk, TransferForm};
use tokendesk_svm::{
    ConnectOptions, DEVNET, KeypairWallet, RpcChainClient, Session, SolanaNetwork,
};
use tracing_subscriber::EnvFilter;

use tokendesk_cli::{Cli, CliError, Command, ConsoleHooks, DeskConfig};

type Desk = TokenDesk<RpcChainClient, FileStore>;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        if !e.already_reported() {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = DeskConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    tracing::debug!(
        rpc_url = %config.rpc_url,
        network = %config.network,
        keypair = %config.keypair_path.display(),
        "Loaded configuration"
    );

    let network = SolanaNetwork::by_name(&config.network).copied().unwrap_or_else(|| {
        tracing::warn!(network = %config.network, "Unknown network, using devnet explorer links");
        DEVNET
    });
    let chain = RpcChainClient::new(config.rpc_url.as_str(), config.commitment.into())
        .with_confirmation(config.confirm_timeout(), config.confirm_poll_interval());
    let desk = TokenDesk::new(chain, FileStore::new(&config.metadata_path))
        .with_hooks(Arc::new(ConsoleHooks::stderr()))
        .with_network(network);

    let session = Session::new(KeypairWallet::from_file(&config.keypair_path)?);
    session.connect(ConnectOptions::trusted_only()).await?;

    let result = dispatch(&desk, &session, &config, cli.command).await;
    if let Err(e) = session.disconnect().await {
        tracing::warn!("Wallet did not disconnect cleanly: {e}");
    }
    result
}

#[allow(clippy::print_stdout)]
async fn dispatch(
    desk: &Desk,
    session: &Session<KeypairWallet>,
    config: &DeskConfig,
    command: Command,
) -> Result<(), CliError> {
    let network = desk.network();
    match command {
        Command::Address => {
            let owner = session.require_connected().await?;
            println!("{owner}");
        }
        Command::Balance => {
            let balance = desk.sol_balance(session).await?;
            println!("{}", tokendesk_cli::console::render_balance(&balance));
        }
        Command::Holdings => {
            let holdings = desk.token_holdings(session).await?;
            println!("{}", tokendesk_cli::console::render_holdings(&holdings));
        }
        Command::History { limit } => {
            let limit = limit.unwrap_or(config.history_limit);
            let entries = desk.transaction_history(session, limit).await?;
            println!("{}", tokendesk_cli::console::render_history(&entries));
        }
        Command::CreateMint(args) => {
            let mut form = CreateMintForm::new(args.name, args.symbol, args.decimals);
            let created = desk
                .create_mint(session, &mut form)
                .await
                .map_err(CliError::Reported)?;
            println!("Mint: {}", created.mint);
            println!("{}", network.explorer_tx_url(&created.signature.to_string()));
        }
        Command::Mint(args) => {
            let mut form = MintToForm::new(args.mint, args.amount, args.recipient);
            let receipt = desk
                .mint_to(session, &mut form)
                .await
                .map_err(CliError::Reported)?;
            if let Some(created) = receipt.account_created {
                println!("Created token account {}", receipt.destination);
                println!("{}", network.explorer_tx_url(&created.to_string()));
            }
            println!("{}", network.explorer_tx_url(&receipt.signature.to_string()));
        }
        Command::Transfer(args) => {
            let mut form = TransferForm::new(args.mint, args.recipient, args.amount);
            let receipt = desk
                .transfer(session, &mut form)
                .await
                .map_err(CliError::Reported)?;
            if let Some(created) = receipt.account_created {
                println!("Created token account {}", receipt.destination);
                println!("{}", network.explorer_tx_url(&created.to_string()));
            }
            println!("{}", network.explorer_tx_url(&receipt.signature.to_string()));
        }
    }
    Ok(())
}
