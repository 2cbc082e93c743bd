//! Wire messages exchanged between the source side and the preview.
//!
//! A tagged union discriminated by a `type` field:
//!
//! ```text
//! {"type":"reload"}
//! {"type":"edit","editScripts":[...],"dataLineArray":[3,null,7]}
//! {"type":"editor-scroll","line":12.5}
//! {"type":"preview-scroll","line":40}
//! {"type":"cursor","lineNumber":8,"relativeCharNumber":3}
//! ```
//!
//! Decoding distinguishes invalid JSON, unknown tags and malformed payloads
//! so the client loop can log something useful before dropping the message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::algo::EditScript;
use crate::error::{SyncError, SyncResult};

/// Message tags this crate understands.
const KNOWN_TYPES: [&str; 5] = ["reload", "edit", "editor-scroll", "preview-scroll", "cursor"];

/// One sync message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SyncMessage {
    /// Discard the view; content follows as a fresh script
    Reload,
    /// Incremental patch
    Edit(EditScript),
    /// Source → view scroll
    EditorScroll { line: f64 },
    /// View → source scroll
    PreviewScroll { line: f64 },
    /// Source cursor moved
    #[serde(rename_all = "camelCase")]
    Cursor {
        line_number: usize,
        relative_char_number: usize,
    },
}

impl SyncMessage {
    /// The `type` tag of this message
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::Edit(_) => "edit",
            Self::EditorScroll { .. } => "editor-scroll",
            Self::PreviewScroll { .. } => "preview-scroll",
            Self::Cursor { .. } => "cursor",
        }
    }

    pub fn is_reload(&self) -> bool {
        matches!(self, Self::Reload)
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit(_))
    }

    /// Decode a message from JSON.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decode a message from an already-parsed JSON value.
    pub fn from_value(value: Value) -> SyncResult<Self> {
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(_) => return Err(SyncError::malformed("unknown", "`type` is not a string")),
            None => return Err(SyncError::malformed("unknown", "missing `type` field")),
        };
        if !KNOWN_TYPES.contains(&kind.as_str()) {
            return Err(SyncError::UnknownMessageType(kind));
        }
        serde_json::from_value(value).map_err(|e| SyncError::malformed(kind, e.to_string()))
    }

    /// Encode a message as JSON.
    pub fn to_json(&self) -> SyncResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
