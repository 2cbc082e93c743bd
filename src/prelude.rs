//! Prelude module for common imports.
//!
//! ```ignore
//! use md_livesync::prelude::*;
//! ```

// Node types
pub use crate::node::{Children, Document, Element, Node, Text, TextKind};

// Attributes
pub use crate::attr::{Attrs, AttrsExt};

// Indexing
pub use crate::transform::{BlockSnapshot, IndexConfig, IndexStats, Indexer};

// Identity
pub use crate::id::ContentHash;

// Algorithms
pub use crate::algo::{
    DiffConfig, DiffResult, DiffStats, EditKind, EditOperation, EditScript, HashAlgorithm,
    diff, diff_with_config, edit_distance, edit_script,
};

// Patching
pub use crate::patch::{ApplyReport, EmbedMarker, LiveView, NoRefresh, PatchApplier, PatchConfig, RefreshHook};

// Position sync
pub use crate::cursor::{CursorConfig, CursorCorrelator, RenderedSpan, SpanLookup, SpanPath};
pub use crate::scroll::{
    EchoSuppressor, ScrollAnchor, ScrollConfig, ScrollSurface, ScrollSync, ScrollVerdict,
    SuppressState, line_to_offset, offset_to_line,
};
pub use crate::span::{CharRange, SourcePosition};

// View
pub use crate::view::{BlockKey, BlockView};

// Messages and sessions
pub use crate::message::SyncMessage;
pub use crate::session::{DrainReport, PreviewClient, PreviewHost, SyncConfig, SyncSession};

// Error
pub use crate::error::{SyncError, SyncResult};

// Cache
pub use crate::cache::{DocumentKey, SharedSnapshotCache};

// Render
pub use crate::render::{render_document, serialize_block};
