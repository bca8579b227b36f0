#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the tokendesk SPL token client.
//!
//! This crate holds the pieces of the token desk that do not depend on a
//! particular chain client: parsing of user-entered amounts, the local token
//! metadata cache, the operation guard that keeps a second click from
//! launching a duplicate transaction, and the notification hooks that a
//! front-end uses to render progress and results.
//!
//! Chain-specific adapters and the token-operation workflows live in
//! `tokendesk-svm`.
//!
//! # Modules
//!
//! - [`amount`] - Fixed-point parsing and scaling of user-entered token amounts
//! - [`error`] - Input validation errors
//! - [`hooks`] - Notification severities and operation lifecycle hooks
//! - [`metadata`] - Flat key-value store and the token metadata cache on top of it
//! - [`operation`] - Operation kinds and the in-flight guard
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation

pub mod amount;
pub mod error;
pub mod hooks;
pub mod metadata;
pub mod operation;

pub use amount::{TokenAmount, from_base_units};
pub use error::{MAX_DECIMALS, ValidationError, parse_decimals};
#[cfg(feature = "telemetry")]
pub use hooks::TracingHooks;
pub use hooks::{NoopHooks, Notification, OperationHooks, Severity};
pub use metadata::{
    FileStore, KeyValueStore, MemoryStore, StoreError, TOKENS_KEY, TokenMetadataCache,
    TokenMetadataRecord,
};
pub use operation::{OperationBusy, OperationGuard, OperationKind, OperationPermit};
