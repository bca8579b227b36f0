//! Desk configuration.
//!
//! Loads configuration from a TOML file. String values may reference
//! environment variables with `$VAR` or `${VAR}`; unresolved references are
//! kept verbatim. Every field has a default, so a missing file is the same as
//! an empty one.
//!
//! # Example Configuration
//!
//! ```toml
//! network = "devnet"
//! rpc_url = "https://api.devnet.solana.com"
//! commitment = "confirmed"
//! keypair_path = "$HOME/.config/solana/id.json"
//! metadata_path = "tokendesk-tokens.json"
//! confirm_timeout_secs = 60
//! confirm_poll_millis = 500
//! history_limit = 10
//! ```
//!
//! # Environment Variables
//!
//! - `TOKENDESK_CONFIG` - Path to the configuration file (default: `tokendesk.toml`)
//! - `RPC_URL` - Override the RPC endpoint
//! - Anything referenced by `$VAR` in the file

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_commitment_config::CommitmentConfig;
use url::Url;

/// Configuration file read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "tokendesk.toml";

/// Errors raised while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but cannot be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        /// The file that was read.
        path: PathBuf,
        /// The I/O failure.
        source: std::io::Error,
    },
    /// The configuration is not valid TOML of the expected shape.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Commitment level used for reads and confirmation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Processed by the connected node.
    Processed,
    /// Voted on by a supermajority.
    #[default]
    Confirmed,
    /// Rooted.
    Finalized,
}

impl From<Commitment> for CommitmentConfig {
    fn from(commitment: Commitment) -> Self {
        match commitment {
            Commitment::Processed => Self::processed(),
            Commitment::Confirmed => Self::confirmed(),
            Commitment::Finalized => Self::finalized(),
        }
    }
}

/// Top-level desk configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Cluster name used for explorer links (default: `devnet`).
    #[serde(default = "default_network")]
    pub network: String,

    /// JSON-RPC endpoint (default: Solana devnet).
    #[serde(default = "default_rpc_url")]
    pub rpc_url: Url,

    /// Commitment for reads and confirmation (default: `confirmed`).
    #[serde(default)]
    pub commitment: Commitment,

    /// Solana CLI keypair file of the wallet
    /// (default: `$HOME/.config/solana/id.json`).
    #[serde(default = "default_keypair_path")]
    pub keypair_path: PathBuf,

    /// File holding the token metadata cache (default: `tokendesk-tokens.json`).
    #[serde(default = "default_metadata_path")]
    pub metadata_path: PathBuf,

    /// Seconds to wait for a transaction to confirm (default: `60`).
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,

    /// Milliseconds between confirmation polls (default: `500`).
    #[serde(default = "default_confirm_poll_millis")]
    pub confirm_poll_millis: u64,

    /// Number of transactions shown by `history` (default: `10`).
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_network() -> String {
    tokendesk_svm::DEVNET.name.to_owned()
}

fn default_rpc_url() -> Url {
    Url::parse(tokendesk_svm::DEVNET.rpc_url).expect("devnet RPC URL is valid")
}

fn default_keypair_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".config/solana/id.json")
}

fn default_metadata_path() -> PathBuf {
    PathBuf::from("tokendesk-tokens.json")
}

const fn default_confirm_timeout_secs() -> u64 {
    60
}

const fn default_confirm_poll_millis() -> u64 {
    500
}

const fn default_history_limit() -> usize {
    tokendesk_svm::portfolio::DEFAULT_HISTORY_LIMIT
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            rpc_url: default_rpc_url(),
            commitment: Commitment::default(),
            keypair_path: default_keypair_path(),
            metadata_path: default_metadata_path(),
            confirm_timeout_secs: default_confirm_timeout_secs(),
            confirm_poll_millis: default_confirm_poll_millis(),
            history_limit: default_history_limit(),
        }
    }
}

impl DeskConfig {
    /// Loads configuration from `path`, or from [`DEFAULT_CONFIG_PATH`] when
    /// no path is given.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                String::new()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        Self::from_toml(&content, |name| std::env::var(name).ok())
    }

    /// Parses configuration from TOML, resolving `$VAR` references through
    /// `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the expanded text is not a valid
    /// configuration.
    pub fn from_toml(
        content: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(toml::from_str(&expand_vars(content, lookup))?)
    }

    /// Confirmation deadline.
    #[must_use]
    pub const fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    /// Interval between confirmation polls.
    #[must_use]
    pub const fn confirm_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_poll_millis)
    }
}

/// Replaces `$VAR` and `${VAR}` with the value returned by `lookup`.
///
/// References that `lookup` does not resolve, and a `$` not followed by a
/// name, are copied unchanged.
fn expand_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .unwrap_or(after.len());
            (&after[..end], end)
        };
        let reference = &rest[start..=start + consumed];
        match lookup(name) {
            Some(value) if !name.is_empty() => out.push_str(&value),
            _ => out.push_str(reference),
        }
        rest = &rest[start + 1 + consumed..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_expand_plain_and_braced() {
        let lookup = env(&[("HOME", "/home/alice"), ("NET", "devnet")]);
        assert_eq!(
            expand_vars("$HOME/.config/${NET}.json", &lookup),
            "/home/alice/.config/devnet.json"
        );
    }

    #[test]
    fn test_expand_keeps_unresolved() {
        let lookup = env(&[]);
        assert_eq!(expand_vars("a $MISSING b", &lookup), "a $MISSING b");
        assert_eq!(expand_vars("${MISSING}", &lookup), "${MISSING}");
        assert_eq!(expand_vars("cost: $5", &lookup), "cost: $5");
        assert_eq!(expand_vars("tail $", &lookup), "tail $");
        assert_eq!(expand_vars("open ${NAME", &lookup), "open ${NAME");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DeskConfig::from_toml("", env(&[])).unwrap();
        assert_eq!(config.network, "devnet");
        assert_eq!(config.rpc_url.as_str(), "https://api.devnet.solana.com/");
        assert_eq!(config.commitment, Commitment::Confirmed);
        assert_eq!(config.metadata_path, PathBuf::from("tokendesk-tokens.json"));
        assert_eq!(config.confirm_timeout(), Duration::from_secs(60));
        assert_eq!(config.confirm_poll_interval(), Duration::from_millis(500));
        assert_eq!(config.history_limit, 10);
    }

    #[test]
    fn test_file_values_with_expansion() {
        let toml = r#"
            rpc_url = "http://${RPC_HOST}:8899"
            commitment = "finalized"
            keypair_path = "$WALLET_DIR/id.json"
            history_limit = 25
        "#;
        let config = DeskConfig::from_toml(
            toml,
            env(&[("RPC_HOST", "127.0.0.1"), ("WALLET_DIR", "/keys")]),
        )
        .unwrap();
        assert_eq!(config.rpc_url.as_str(), "http://127.0.0.1:8899/");
        assert_eq!(config.commitment, Commitment::Finalized);
        assert_eq!(config.keypair_path, PathBuf::from("/keys/id.json"));
        assert_eq!(config.history_limit, 25);
    }

    #[test]
    fn test_invalid_commitment_is_rejected() {
        let result = DeskConfig::from_toml(r#"commitment = "eventually""#, env(&[]));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config =
            DeskConfig::load(Some(Path::new("/nonexistent/tokendesk/config.toml"))).unwrap();
        assert_eq!(config.commitment, Commitment::Confirmed);
    }
}
