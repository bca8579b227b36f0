//! Wallet providers that hold the signing key of a session.
//!
//! The token desk never touches a private key directly. It asks a
//! [`WalletProvider`] to connect, which yields the public key, and to sign
//! transactions it has built. [`KeypairWallet`] is the local implementation
//! backed by a Solana CLI keypair file.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;
use solana_transaction::Transaction;

/// Options for [`WalletProvider::connect`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Connect only if the wallet approved this application before, without
    /// prompting. Used for silent reconnection at start-up.
    pub only_if_trusted: bool,
}

impl ConnectOptions {
    /// Options for a silent reconnection attempt.
    #[must_use]
    pub const fn trusted_only() -> Self {
        Self {
            only_if_trusted: true,
        }
    }
}

/// Errors raised by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// No wallet could be found or loaded.
    #[error("No Solana wallet found: {0}")]
    Unavailable(String),
    /// The wallet refused the request.
    #[error("Wallet request rejected: {0}")]
    Rejected(String),
    /// The wallet could not sign the transaction.
    #[error("Wallet failed to sign: {0}")]
    Signing(String),
}

/// A wallet that can connect and sign transactions.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Connects and returns the wallet's public key.
    async fn connect(&self, options: ConnectOptions) -> Result<Pubkey, WalletError>;

    /// Disconnects the wallet.
    async fn disconnect(&self) -> Result<(), WalletError>;

    /// Adds the wallet's signature to `transaction`.
    ///
    /// The transaction must already carry its fee payer and recent blockhash.
    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, WalletError>;
}

/// Wallet backed by an in-process [`Keypair`].
#[derive(Debug)]
pub struct KeypairWallet {
    keypair: Keypair,
    trusted: AtomicBool,
    connected: AtomicBool,
}

impl KeypairWallet {
    /// Wraps a keypair that is trusted for silent reconnection.
    #[must_use]
    pub fn new(keypair: Keypair) -> Self {
        Self {
            keypair,
            trusted: AtomicBool::new(true),
            connected: AtomicBool::new(false),
        }
    }

    /// Wraps a keypair that must be connected explicitly once before
    /// [`ConnectOptions::only_if_trusted`] succeeds.
    #[must_use]
    pub fn untrusted(keypair: Keypair) -> Self {
        Self {
            keypair,
            trusted: AtomicBool::new(false),
            connected: AtomicBool::new(false),
        }
    }

    /// Loads a keypair file in the Solana CLI format: a JSON array of the
    /// 64 secret key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::Unavailable`] if the file cannot be read or does
    /// not hold a valid keypair.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            WalletError::Unavailable(format!("cannot read keypair {}: {e}", path.display()))
        })?;
        let bytes: Vec<u8> = serde_json::from_str(&content).map_err(|e| {
            WalletError::Unavailable(format!("invalid keypair file {}: {e}", path.display()))
        })?;
        let keypair = Keypair::try_from(bytes.as_slice()).map_err(|e| {
            WalletError::Unavailable(format!("invalid keypair in {}: {e}", path.display()))
        })?;
        Ok(Self::new(keypair))
    }

    /// Public key of the wrapped keypair.
    #[must_use]
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

#[async_trait]
impl WalletProvider for KeypairWallet {
    async fn connect(&self, options: ConnectOptions) -> Result<Pubkey, WalletError> {
        if options.only_if_trusted && !self.trusted.load(Ordering::Acquire) {
            return Err(WalletError::Rejected(
                "wallet has not approved this application".to_owned(),
            ));
        }
        self.trusted.store(true, Ordering::Release);
        self.connected.store(true, Ordering::Release);
        Ok(self.keypair.pubkey())
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        self.connected.store(false, Ordering::Release);
        Ok(())
    }

    async fn sign_transaction(
        &self,
        mut transaction: Transaction,
    ) -> Result<Transaction, WalletError> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(WalletError::Rejected("wallet is not connected".to_owned()));
        }
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_message::Hash;

    fn transfer_like(payer: &Pubkey) -> Transaction {
        let ix = solana_system_interface::instruction::transfer(payer, &Pubkey::new_unique(), 1);
        let mut tx = Transaction::new_with_payer(&[ix], Some(payer));
        tx.message.recent_blockhash = Hash::new_unique();
        tx
    }

    #[tokio::test]
    async fn test_trusted_only_requires_prior_approval() {
        let wallet = KeypairWallet::untrusted(Keypair::new());
        assert!(matches!(
            wallet.connect(ConnectOptions::trusted_only()).await,
            Err(WalletError::Rejected(_))
        ));
        let pubkey = wallet.connect(ConnectOptions::default()).await.unwrap();
        wallet.disconnect().await.unwrap();
        assert_eq!(
            wallet.connect(ConnectOptions::trusted_only()).await.unwrap(),
            pubkey
        );
    }

    #[tokio::test]
    async fn test_signs_when_connected() {
        let wallet = KeypairWallet::new(Keypair::new());
        let payer = wallet.connect(ConnectOptions::default()).await.unwrap();
        let signed = wallet.sign_transaction(transfer_like(&payer)).await.unwrap();
        assert!(signed.is_signed());
    }

    #[tokio::test]
    async fn test_refuses_to_sign_when_disconnected() {
        let wallet = KeypairWallet::new(Keypair::new());
        let tx = transfer_like(&wallet.pubkey());
        assert!(matches!(
            wallet.sign_transaction(tx).await,
            Err(WalletError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_refuses_foreign_transaction() {
        let wallet = KeypairWallet::new(Keypair::new());
        wallet.connect(ConnectOptions::default()).await.unwrap();
        let tx = transfer_like(&Pubkey::new_unique());
        assert!(matches!(
            wallet.sign_transaction(tx).await,
            Err(WalletError::Signing(_))
        ));
    }

    #[test]
    fn test_from_file_reads_cli_keypair() {
        let keypair = Keypair::new();
        let path = std::env::temp_dir().join(format!(
            "tokendesk-keypair-{}-{}.json",
            std::process::id(),
            keypair.pubkey()
        ));
        let bytes = keypair.to_bytes().to_vec();
        std::fs::write(&path, serde_json::to_string(&bytes).unwrap()).unwrap();
        let wallet = KeypairWallet::from_file(&path).unwrap();
        assert_eq!(wallet.pubkey(), keypair.pubkey());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            KeypairWallet::from_file("/nonexistent/tokendesk/id.json"),
            Err(WalletError::Unavailable(_))
        ));
    }
}
