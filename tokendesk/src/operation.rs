//! Token operation kinds and the in-flight guard.
//!
//! A front-end that re-enables its button too early, or a user who
//! double-clicks, would otherwise build and submit two transactions against
//! the same account state. [`OperationGuard`] allows at most one operation of
//! each [`OperationKind`] to run at a time; the slot is released when the
//! [`OperationPermit`] is dropped.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use dashmap::DashSet;

/// The three token operations the desk performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Create a new SPL mint.
    CreateMint,
    /// Mint supply of an existing mint to a recipient.
    MintTo,
    /// Transfer tokens from the session owner to a recipient.
    Transfer,
}

impl OperationKind {
    /// Status line shown while the operation runs.
    #[must_use]
    pub const fn progress_message(self) -> &'static str {
        match self {
            Self::CreateMint => "Creating token...",
            Self::MintTo => "Minting token...",
            Self::Transfer => "Sending token...",
        }
    }

    /// Prefix for failure notifications.
    #[must_use]
    pub const fn failure_prefix(self) -> &'static str {
        match self {
            Self::CreateMint => "Error creating token",
            Self::MintTo => "Error minting token",
            Self::Transfer => "Error sending token",
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CreateMint => "create-mint",
            Self::MintTo => "mint-to",
            Self::Transfer => "transfer",
        };
        f.write_str(name)
    }
}

/// Error returned when an operation of the same kind is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("A {0} operation is already in progress")]
pub struct OperationBusy(pub OperationKind);

/// Tracks which operation kinds are currently in flight.
#[derive(Debug, Clone, Default)]
pub struct OperationGuard {
    in_flight: Arc<DashSet<OperationKind>>,
}

impl OperationGuard {
    /// Creates an empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationBusy`] if an operation of the same kind holds the slot.
    pub fn try_begin(&self, kind: OperationKind) -> Result<OperationPermit, OperationBusy> {
        if self.in_flight.insert(kind) {
            Ok(OperationPermit {
                kind,
                in_flight: Arc::clone(&self.in_flight),
            })
        } else {
            Err(OperationBusy(kind))
        }
    }

    /// Returns whether an operation of `kind` is running.
    #[must_use]
    pub fn is_busy(&self, kind: OperationKind) -> bool {
        self.in_flight.contains(&kind)
    }
}

/// Slot held by a running operation.
#[derive(Debug)]
pub struct OperationPermit {
    kind: OperationKind,
    in_flight: Arc<DashSet<OperationKind>>,
}

impl OperationPermit {
    /// The kind this permit was issued for.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }
}

impl Drop for OperationPermit {
    fn drop(&mut self) {
        self.in_flight.remove(&self.kind);
    }
}
