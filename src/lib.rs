//! md-livesync - Differential sync between a Markdown source and its live preview
//!
//! ## Core Concepts
//!
//! **Blocks**: the top-level children of a rendered document are the unit of
//! identity. Each block is serialized canonically (line metadata stripped)
//! and hashed; the preview is patched block by block instead of re-mounted.
//!
//! **Edit scripts**: unit-cost edit distance over block hashes, with an
//! update > insert > delete tie-break, applied on the preview side with a
//! running index offset.
//!
//! **Position sync**: source lines map to rendered offsets by interpolating
//! between line-tagged blocks, in both directions, with echo suppression so
//! programmatic scrolls are not reported back.
//!
//! ## Modules
//! - `node`: Document/Element/Node/Text block trees
//! - `render`: canonical HTML serialization
//! - `transform`: Indexer (Document → BlockSnapshot)
//! - `algo`: hashing, edit-distance DP, snapshot diff
//! - `patch`: PatchApplier over a `LiveView`
//! - `scroll`: line ↔ offset mapping, echo suppression
//! - `cursor`: cursor → span highlighting
//! - `message`: wire messages
//! - `session`: SyncSession (source side), PreviewClient (view side)
//! - `cache`: shared per-document baselines
//!
//! ## Usage
//!
//! ```ignore
//! use md_livesync::prelude::*;
//!
//! let config = SyncConfig::default();
//! let mut session = SyncSession::new(&config);
//! let mut client: PreviewClient<BlockView> = PreviewClient::new(&config);
//! let mut view = BlockView::new();
//!
//! for message in session.update(&rendered_doc) {
//!     client.receive(&message.to_json()?);
//! }
//! client.drain(&mut view, &mut NoRefresh, Instant::now());
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// Node types: Document, Element, Node, Text
pub mod node;

/// Attribute helpers
pub mod attr;

/// Content hashes
pub mod id;

/// Source positions and character ranges
pub mod span;

/// Canonical HTML serialization
pub mod render;

/// Block indexing: Indexer, BlockSnapshot
pub mod transform;

/// Algorithms: hash, edit, diff
pub mod algo;

/// Patch application
pub mod patch;

/// Scroll position mapping
pub mod scroll;

/// Cursor correlation
pub mod cursor;

/// Headless live view
pub mod view;

/// Wire messages
pub mod message;

/// Producer and preview sessions
pub mod session;

/// Shared baseline cache
pub mod cache;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Document, Element, Node, Text, TextKind};

// Indexing
pub use transform::{BlockSnapshot, IndexConfig, IndexStats, Indexer};

// Identity
pub use id::ContentHash;

// Algorithms
pub use algo::{
    DiffConfig, DiffResult, DiffStats, EditKind, EditOperation, EditScript, HashAlgorithm,
    StableHasher, diff, diff_with_config,
};

// Patching
pub use patch::{ApplyReport, EmbedMarker, LiveView, NoRefresh, PatchApplier, PatchConfig, RefreshHook};

// Position sync
pub use cursor::{CursorConfig, CursorCorrelator, SpanLookup};
pub use scroll::{EchoSuppressor, ScrollAnchor, ScrollConfig, ScrollSurface, ScrollSync};
pub use span::{CharRange, SourcePosition};

// Messages and sessions
pub use message::SyncMessage;
pub use session::{DrainReport, PreviewClient, PreviewHost, SyncConfig, SyncSession};

// Error types
pub use error::{SyncError, SyncResult};

// Cache types
pub use cache::{CacheEntry, DocumentKey, SharedSnapshotCache, SnapshotCache};
