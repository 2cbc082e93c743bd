//! Error types for md-livesync.
//!
//! Every failure in the sync loop is local: callers log the error and keep
//! going. Nothing here is fatal to the listener.

use thiserror::Error;

use crate::algo::EditKind;

/// Errors that can occur while decoding or applying sync messages.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A message was missing fields or had fields of the wrong shape
    #[error("malformed {kind} message: {reason}")]
    MalformedMessage {
        /// Message type tag (or `"unknown"` when it could not be read)
        kind: String,
        /// What was wrong
        reason: String,
    },

    /// A message carried a `type` tag this crate does not know
    #[error("unknown message type `{0}`")]
    UnknownMessageType(String),

    /// Payload was not valid JSON at all
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// A patch operation addressed a block the live view does not have
    #[error("{operation} at index {index} (adjusted {adjusted}) is out of bounds for {len} blocks")]
    OutOfBounds {
        /// Operation kind
        operation: EditKind,
        /// Index as computed by the diff
        index: usize,
        /// Index after applying the running offset
        adjusted: isize,
        /// Live view length when the operation was attempted
        len: usize,
    },
}

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    /// Create a malformed-message error.
    pub fn malformed(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Check whether this error means the view drifted away from the script.
    pub fn is_desync(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}
