//! Well-known Solana clusters and their explorer links.

/// A public Solana cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolanaNetwork {
    /// Cluster name as used by the Solana CLI.
    pub name: &'static str,
    /// Public JSON-RPC endpoint.
    pub rpc_url: &'static str,
    /// `cluster` query parameter of the Solana explorer, `None` for mainnet.
    pub explorer_cluster: Option<&'static str>,
}

/// Solana devnet, the default cluster of the desk.
pub const DEVNET: SolanaNetwork = SolanaNetwork {
    name: "devnet",
    rpc_url: "https://api.devnet.solana.com",
    explorer_cluster: Some("devnet"),
};

/// Solana testnet.
pub const TESTNET: SolanaNetwork = SolanaNetwork {
    name: "testnet",
    rpc_url: "https://api.testnet.solana.com",
    explorer_cluster: Some("testnet"),
};

/// Solana mainnet-beta.
pub const MAINNET: SolanaNetwork = SolanaNetwork {
    name: "mainnet-beta",
    rpc_url: "https://api.mainnet-beta.solana.com",
    explorer_cluster: None,
};

/// All known clusters.
pub static SOLANA_NETWORKS: &[SolanaNetwork] = &[DEVNET, TESTNET, MAINNET];

const EXPLORER_BASE: &str = "https://explorer.solana.com";

impl SolanaNetwork {
    /// Looks up a cluster by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<&'static Self> {
        SOLANA_NETWORKS.iter().find(|n| n.name == name)
    }

    /// Explorer page of a transaction.
    #[must_use]
    pub fn explorer_tx_url(&self, signature: &str) -> String {
        self.explorer_url("tx", signature)
    }

    /// Explorer page of an account.
    #[must_use]
    pub fn explorer_address_url(&self, address: &str) -> String {
        self.explorer_url("address", address)
    }

    fn explorer_url(&self, kind: &str, id: &str) -> String {
        match self.explorer_cluster {
            Some(cluster) => format!("{EXPLORER_BASE}/{kind}/{id}?cluster={cluster}"),
            None => format!("{EXPLORER_BASE}/{kind}/{id}"),
        }
    }
}
