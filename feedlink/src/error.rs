//! Classified errors carried on the canonical streams.

use crate::taxonomy::{ServerErrorKind, SubscriptionErrorKind};
use thiserror::Error;

/// Terminal session failure reported by the native layer.
///
/// `kind` is the classification of `code` when one exists; the raw code and
/// message are always preserved for diagnostics. These errors are cloneable
/// so they can traverse multicast channels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session error (code {code}): {message}")]
pub struct ConnectionError {
    pub kind: Option<ServerErrorKind>,
    pub code: i32,
    pub message: String,
}

impl ConnectionError {
    /// Builds the error and classifies the code in one step.
    pub fn classified(code: i32, message: impl Into<String>) -> Self {
        Self {
            kind: ServerErrorKind::classify(code),
            code,
            message: message.into(),
        }
    }
}

/// Terminal subscription failure reported by the native layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("subscription error (code {code}): {message}")]
pub struct SubscriptionError {
    pub kind: Option<SubscriptionErrorKind>,
    pub code: i32,
    pub message: String,
}

impl SubscriptionError {
    /// Builds the error and classifies the code in one step.
    pub fn classified(code: i32, message: impl Into<String>) -> Self {
        Self {
            kind: SubscriptionErrorKind::classify(code),
            code,
            message: message.into(),
        }
    }
}

/// Single-field decode failure. Logged by the decode helpers, never
/// propagated: the record keeps the field's previous value and the update
/// as a whole is still delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field {field:?} of item {item:?} carried unparseable value {raw:?}")]
pub struct FieldParseWarning {
    pub item: String,
    pub field: String,
    pub raw: String,
}
