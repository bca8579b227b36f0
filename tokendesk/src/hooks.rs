//! Notifications and lifecycle hooks for token operations.
//!
//! The token desk does not render anything itself. A front-end implements
//! [`OperationHooks`] to show a loading indicator while an operation runs and
//! to display the resulting [`Notification`]. All methods have default no-op
//! implementations, so an implementation only overrides what it renders.
//!
//! The lifecycle of one operation is:
//!
//! 1. **`on_progress`** - The operation passed validation and is about to talk
//!    to the wallet or the chain. A front-end shows a blocking indicator.
//! 2. **`on_finished`** - The operation returned, successfully or not.
//! 3. **`on_notify`** - The outcome, as a notification with a [`Severity`].
//!
//! Validation failures skip steps 1 and 2 and only produce a warning.

use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::operation::OperationKind;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Neutral information.
    Info,
    /// The operation completed.
    Success,
    /// The input was rejected before anything was sent.
    Warning,
    /// The wallet or the chain rejected the operation.
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// How the message should be presented.
    pub severity: Severity,
    /// Human-readable text.
    pub message: String,
}

impl Notification {
    /// How long a front-end keeps a notification on screen.
    pub const DISMISS_AFTER: Duration = Duration::from_secs(5);

    /// Creates a notification.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Creates a success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// Creates a warning notification.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

/// Lifecycle hooks for token operations.
///
/// This trait is dyn-compatible so that the desk can hold an
/// `Arc<dyn OperationHooks>` chosen at start-up.
pub trait OperationHooks: Send + Sync {
    /// Called once validation passed, before the first wallet or chain call.
    fn on_progress(&self, _kind: OperationKind, _status: &str) {}

    /// Called when the operation returned, before its notification.
    fn on_finished(&self, _kind: OperationKind) {}

    /// Called with the outcome of an operation.
    fn on_notify(&self, _notification: &Notification) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl OperationHooks for NoopHooks {}

/// Hooks that forward everything to `tracing`.
#[cfg(feature = "telemetry")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHooks;

#[cfg(feature = "telemetry")]
impl OperationHooks for TracingHooks {
    fn on_progress(&self, kind: OperationKind, status: &str) {
        tracing::info!(operation = %kind, "{status}");
    }

    fn on_notify(&self, notification: &Notification) {
        match notification.severity {
            Severity::Info | Severity::Success => {
                tracing::info!(severity = %notification.severity, "{}", notification.message);
            }
            Severity::Warning => tracing::warn!("{}", notification.message),
            Severity::Error => tracing::error!("{}", notification.message),
        }
    }
}
