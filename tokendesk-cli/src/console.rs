//! Terminal rendering of operation progress and results.

use std::io::{self, Write};
use std::sync::Mutex;

use tokendesk::{Notification, OperationHooks, OperationKind, Severity};
use tokendesk_svm::portfolio::{HistoryEntry, SolBalance, TokenHolding};

/// Hooks that write progress and notifications to a terminal stream.
///
/// Progress lines go to the stream; notifications are prefixed with their
/// severity. Tracing still receives everything logged by the desk itself.
#[derive(Debug)]
pub struct ConsoleHooks<W> {
    out: Mutex<W>,
}

impl ConsoleHooks<io::Stderr> {
    /// Hooks writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ConsoleHooks<W> {
    /// Hooks writing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn line(&self, text: &str) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // A closed terminal is not worth failing the operation over.
        let _ = writeln!(out, "{text}");
    }
}

impl<W: Write + Send> OperationHooks for ConsoleHooks<W> {
    fn on_progress(&self, _kind: OperationKind, status: &str) {
        self.line(&format!("... {status}"));
    }

    fn on_notify(&self, notification: &Notification) {
        let tag = match notification.severity {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        self.line(&format!("[{tag}] {}", notification.message));
    }
}

/// Renders the SOL balance line.
#[must_use]
pub fn render_balance(balance: &SolBalance) -> String {
    format!("Balance: {balance}")
}

/// Renders token holdings, one per line.
#[must_use]
pub fn render_holdings(holdings: &[TokenHolding]) -> String {
    if holdings.is_empty() {
        return "No tokens found".to_owned();
    }
    holdings
        .iter()
        .map(|h| format!("{} ({})  {}  {}", h.name, h.symbol, h.balance, h.mint))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders history entries, one per line.
#[must_use]
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No transactions found".to_owned();
    }
    entries
        .iter()
        .map(|e| {
            let time = e
                .block_time
                .map_or_else(|| "-".to_owned(), |t| t.to_string());
            format!(
                "{}  {:<9}  {time}  {}",
                e.short_signature,
                e.status(),
                e.explorer_url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_hooks_format() {
        let hooks = ConsoleHooks::new(Vec::new());
        hooks.on_progress(OperationKind::MintTo, "Minting tokens...");
        hooks.on_notify(&Notification::warning("Please connect your wallet first"));
        hooks.on_notify(&Notification::success("Successfully minted 1.5 tokens"));
        let text = String::from_utf8(hooks.into_inner()).unwrap();
        assert_eq!(
            text,
            "... Minting tokens...\n\
             [warning] Please connect your wallet first\n\
             [ok] Successfully minted 1.5 tokens\n"
        );
    }

    #[test]
    fn test_render_empty_lists() {
        assert_eq!(render_holdings(&[]), "No tokens found");
        assert_eq!(render_history(&[]), "No transactions found");
    }

    #[test]
    fn test_render_holding() {
        let holding = TokenHolding {
            token_account: "Acc".to_owned(),
            mint: "Mint".to_owned(),
            name: "Test".to_owned(),
            symbol: "TST".to_owned(),
            balance: "1.5".to_owned(),
            raw_amount: 150,
            decimals: 2,
        };
        assert_eq!(render_holdings(&[holding]), "Test (TST)  1.5  Mint");
    }

    #[test]
    fn test_render_balance() {
        let balance = SolBalance {
            lamports: 2_500_000_000,
        };
        assert_eq!(render_balance(&balance), "Balance: 2.5000 SOL");
    }
}
