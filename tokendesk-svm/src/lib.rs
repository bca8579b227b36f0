#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Solana adapters and SPL token workflows for the token desk.
//!
//! This crate connects the chain-agnostic pieces of `tokendesk` to a Solana
//! cluster. It builds, signs, submits and confirms the transactions of the
//! three token operations and reads the balances and history shown to the
//! user.
//!
//! # Features
//!
//! - **Create mint**: allocate a rent-exempt mint account and initialize it
//!   with the session owner as mint and freeze authority
//! - **Mint to**: mint supply to any wallet, creating its associated token
//!   account on demand
//! - **Transfer**: send tokens between associated token accounts
//! - **SPL Token and Token-2022**: instructions target the program that owns
//!   the mint
//! - **Portfolio**: SOL balance, non-zero token holdings and recent
//!   transactions
//!
//! # Architecture
//!
//! - [`chain`] - [`ChainClient`](chain::ChainClient) trait and its JSON-RPC implementation
//! - [`wallet`] - [`WalletProvider`](wallet::WalletProvider) trait and a keypair-backed wallet
//! - [`session`] - Connection state of the user's wallet
//! - [`token`] - The [`TokenDesk`](token::TokenDesk) and its three workflows
//! - [`portfolio`] - Balance, holdings and history queries
//!
//! # Feature Flags
//!
//! - `telemetry` - `tracing` instrumentation (on by default)
//!
//! # Usage
//!
//! ```ignore
//! use solana_commitment_config::CommitmentConfig;
//! use tokendesk::FileStore;
//! use tokendesk_svm::chain::RpcChainClient;
//! use tokendesk_svm::session::Session;
//! use tokendesk_svm::token::{MintToForm, TokenDesk};
//! use tokendesk_svm::wallet::{ConnectOptions, KeypairWallet};
//!
//! let chain = RpcChainClient::new(DEVNET.rpc_url, CommitmentConfig::confirmed());
//! let desk = TokenDesk::new(chain, FileStore::new("tokendesk-tokens.json"));
//! let session = Session::new(KeypairWallet::from_file("id.json")?);
//! session.connect(ConnectOptions::default()).await?;
//!
//! let mut form = MintToForm::new("7xKX...", "1.5", "");
//! let receipt = desk.mint_to(&session, &mut form).await?;
//! ```

pub mod chain;
pub mod portfolio;
pub mod session;
pub mod token;
pub mod wallet;

mod networks;
pub use networks::*;

pub use chain::{ChainClient, RpcChainClient};
pub use session::{Session, SessionState};
pub use token::{TokenDesk, TokenOpError};
pub use wallet::{ConnectOptions, KeypairWallet, WalletProvider};
