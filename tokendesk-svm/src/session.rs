//! Wallet session state.
//!
//! A [`Session`] owns the wallet of one user and tracks whether it is
//! connected. The public key is only exposed while the session is
//! [`SessionState::Connected`]; operations read it through
//! [`Session::require_connected`] rather than keeping their own copy.

use solana_pubkey::Pubkey;
use solana_transaction::Transaction;
use tokio::sync::Mutex;

use crate::wallet::{ConnectOptions, WalletError, WalletProvider};

/// Connection state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No wallet connected.
    Disconnected,
    /// A connect request is pending with the wallet.
    Connecting,
    /// Connected as the given public key.
    Connected(Pubkey),
    /// A disconnect request is pending with the wallet.
    Disconnecting,
}

/// Errors raised by session transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No wallet is connected.
    #[error("Please connect your wallet first")]
    NotConnected,
    /// A wallet is already connected.
    #[error("Wallet is already connected")]
    AlreadyConnected,
    /// A connect or disconnect request is still pending.
    #[error("A wallet request is already in progress")]
    Transitioning,
    /// The wallet refused or failed the request.
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

/// The wallet session of one user.
#[derive(Debug)]
pub struct Session<W> {
    wallet: W,
    state: Mutex<SessionState>,
}

impl<W: WalletProvider> Session<W> {
    /// Creates a disconnected session over `wallet`.
    pub fn new(wallet: W) -> Self {
        Self {
            wallet,
            state: Mutex::new(SessionState::Disconnected),
        }
    }

    /// The wrapped wallet.
    pub const fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Current state.
    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }

    /// Public key of the connected wallet, if any.
    pub async fn public_key(&self) -> Option<Pubkey> {
        match *self.state.lock().await {
            SessionState::Connected(pubkey) => Some(pubkey),
            _ => None,
        }
    }

    /// Public key of the connected wallet.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] unless the session is connected.
    pub async fn require_connected(&self) -> Result<Pubkey, SessionError> {
        self.public_key().await.ok_or(SessionError::NotConnected)
    }

    /// Connects the wallet.
    ///
    /// On failure the session returns to [`SessionState::Disconnected`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyConnected`] or
    /// [`SessionError::Transitioning`] if the session is not disconnected, and
    /// [`SessionError::Wallet`] if the wallet refuses.
    pub async fn connect(&self, options: ConnectOptions) -> Result<Pubkey, SessionError> {
        {
            let mut state = self.state.lock().await;
            match *state {
                SessionState::Disconnected => *state = SessionState::Connecting,
                SessionState::Connected(_) => return Err(SessionError::AlreadyConnected),
                SessionState::Connecting | SessionState::Disconnecting => {
                    return Err(SessionError::Transitioning);
                }
            }
        }
        let result = self.wallet.connect(options).await;
        let mut state = self.state.lock().await;
        match result {
            Ok(pubkey) => {
                *state = SessionState::Connected(pubkey);
                #[cfg(feature = "telemetry")]
                tracing::info!(%pubkey, "Wallet connected");
                Ok(pubkey)
            }
            Err(e) => {
                *state = SessionState::Disconnected;
                Err(e.into())
            }
        }
    }

    /// Disconnects the wallet.
    ///
    /// On failure the session stays connected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] or [`SessionError::Transitioning`]
    /// if the session is not connected, and [`SessionError::Wallet`] if the
    /// wallet refuses.
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        let pubkey = {
            let mut state = self.state.lock().await;
            match *state {
                SessionState::Connected(pubkey) => {
                    *state = SessionState::Disconnecting;
                    pubkey
                }
                SessionState::Disconnected => return Err(SessionError::NotConnected),
                SessionState::Connecting | SessionState::Disconnecting => {
                    return Err(SessionError::Transitioning);
                }
            }
        };
        let result = self.wallet.disconnect().await;
        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                *state = SessionState::Disconnected;
                #[cfg(feature = "telemetry")]
                tracing::info!(%pubkey, "Wallet disconnected");
                Ok(())
            }
            Err(e) => {
                *state = SessionState::Connected(pubkey);
                Err(e.into())
            }
        }
    }

    /// Has the connected wallet sign `transaction`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] unless the session is connected,
    /// and [`SessionError::Wallet`] if the wallet refuses to sign.
    pub async fn sign_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, SessionError> {
        self.require_connected().await?;
        Ok(self.wallet.sign_transaction(transaction).await?)
    }
}
