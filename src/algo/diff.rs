//! Block Diff
//!
//! Compiles the edit script between two [`BlockSnapshot`]s.
//! This is a **pure algorithm module**: no view, no I/O.
//!
//! # Architecture
//!
//! ```text
//! Indexer::index(doc) -> BlockSnapshot       // hashes + content + lines
//!       |
//!       v
//! diff(old, new) -> DiffResult               // EditScript, stats, reload flag
//!       |
//!       v
//! PatchApplier::apply(view, &script)         // client side
//! ```
//!
//! # Algorithm
//!
//! 1. Run unit-cost edit distance over the two hash sequences
//!    ([`edit_script`](super::edit_script))
//! 2. Resolve each insert/update hash to its serialized block in the new
//!    snapshot
//! 3. Attach the new snapshot's line array so the client can re-stamp lines
//!
//! When the script grows past [`DiffConfig::max_ops`] the result asks for a
//! full reload instead.

use serde::{Deserialize, Serialize};

use crate::id::ContentHash;
use crate::transform::BlockSnapshot;

use super::edit::{EditKind, edit_script};

/// Default maximum number of operations before fallback to full reload.
const DEFAULT_MAX_OPS: usize = 2000;

// =============================================================================
// Public Types
// =============================================================================

/// Configuration for diff limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Maximum number of edit operations before fallback to full reload.
    /// Default: 2000
    pub max_ops: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_ops: DEFAULT_MAX_OPS,
        }
    }
}

impl DiffConfig {
    /// Create config with a custom limit.
    pub fn new(max_ops: usize) -> Self {
        Self { max_ops }
    }

    /// Create config for large documents (higher limit).
    pub fn large() -> Self {
        Self { max_ops: 5000 }
    }

    /// Create config for small documents (lower limit, faster fallback).
    pub fn small() -> Self {
        Self { max_ops: 500 }
    }
}

/// Statistics from a diff
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DiffStats {
    /// Blocks left in place
    pub kept: usize,
    /// Insert operations
    pub inserted: usize,
    /// Delete operations
    pub deleted: usize,
    /// Update operations
    pub updated: usize,
}

impl DiffStats {
    /// Total number of operations
    pub fn total_ops(&self) -> usize {
        self.inserted + self.deleted + self.updated
    }
}

/// One operation of an edit script, in wire form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOperation {
    /// Source index for delete/update, target index for insert
    pub index: usize,
    pub operation: EditKind,
    /// Target block hash (insert/update) or removed block hash (delete)
    pub content_hash: ContentHash,
    /// Serialized block; empty for delete
    pub content: String,
}

impl EditOperation {
    /// Create an insert operation
    pub fn insert(index: usize, content_hash: ContentHash, content: impl Into<String>) -> Self {
        Self {
            index,
            operation: EditKind::Insert,
            content_hash,
            content: content.into(),
        }
    }

    /// Create an update operation
    pub fn update(index: usize, content_hash: ContentHash, content: impl Into<String>) -> Self {
        Self {
            index,
            operation: EditKind::Update,
            content_hash,
            content: content.into(),
        }
    }

    /// Create a delete operation
    pub fn delete(index: usize, content_hash: ContentHash) -> Self {
        Self {
            index,
            operation: EditKind::Delete,
            content_hash,
            content: String::new(),
        }
    }
}

/// Ordered operations plus the target's per-block line array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript {
    #[serde(rename = "editScripts")]
    pub ops: Vec<EditOperation>,
    /// One entry per target block, in target order
    #[serde(rename = "dataLineArray")]
    pub data_line_array: Vec<Option<usize>>,
}

impl EditScript {
    /// Script that mounts every block of `snapshot` into an empty view
    pub fn insert_all(snapshot: &BlockSnapshot) -> Self {
        let ops = snapshot
            .hashes
            .iter()
            .enumerate()
            .map(|(index, &hash)| EditOperation::insert(index, hash, resolve_content(snapshot, hash)))
            .collect();
        Self {
            ops,
            data_line_array: snapshot.lines.clone(),
        }
    }

    /// Check if the script has no operations
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

/// Result of a block diff
#[derive(Debug, Clone)]
#[must_use]
pub struct DiffResult {
    /// Compiled script (empty when `should_reload`)
    pub script: EditScript,
    /// Whether the diff exceeded limits and should fallback to reload
    pub should_reload: bool,
    /// Reason for reload (if should_reload is true)
    pub reload_reason: Option<String>,
    /// Statistics about the diff
    pub stats: DiffStats,
}

impl DiffResult {
    /// Create a result that triggers reload
    pub fn reload(reason: impl Into<String>) -> Self {
        Self {
            script: EditScript::default(),
            should_reload: true,
            reload_reason: Some(reason.into()),
            stats: DiffStats::default(),
        }
    }

    /// Check if any changes were detected
    pub fn has_changes(&self) -> bool {
        !self.script.is_empty() || self.should_reload
    }
}

// =============================================================================
// Main API
// =============================================================================

/// Diff two snapshots with default limits.
pub fn diff(old: &BlockSnapshot, new: &BlockSnapshot) -> DiffResult {
    diff_with_config(old, new, DiffConfig::default())
}

/// Diff two snapshots.
pub fn diff_with_config(old: &BlockSnapshot, new: &BlockSnapshot, config: DiffConfig) -> DiffResult {
    // The length difference is a lower bound on the script length
    let length_gap = old.len().abs_diff(new.len());
    if length_gap > config.max_ops {
        tracing::debug!(old = old.len(), new = new.len(), max_ops = config.max_ops, "falling back to reload");
        return DiffResult::reload(format!(
            "block count changed by {length_gap}, over limit of {}",
            config.max_ops
        ));
    }

    let edits = edit_script(&old.hashes, &new.hashes);

    let mut stats = DiffStats::default();
    let mut ops = Vec::with_capacity(edits.len());
    for edit in edits {
        let op = match edit.kind {
            EditKind::Delete => {
                stats.deleted += 1;
                EditOperation::delete(edit.index, edit.item)
            }
            kind => {
                if kind == EditKind::Insert {
                    stats.inserted += 1;
                } else {
                    stats.updated += 1;
                }
                let content = resolve_content(new, edit.item);
                EditOperation {
                    index: edit.index,
                    operation: kind,
                    content_hash: edit.item,
                    content,
                }
            }
        };
        ops.push(op);
    }
    stats.kept = new.len() - stats.inserted - stats.updated;

    if ops.len() > config.max_ops {
        let reason = format!("{} edit operations exceed limit of {}", ops.len(), config.max_ops);
        tracing::debug!(ops = ops.len(), max_ops = config.max_ops, "falling back to reload");
        return DiffResult { stats, ..DiffResult::reload(reason) };
    }

    DiffResult {
        script: EditScript {
            ops,
            data_line_array: new.lines.clone(),
        },
        should_reload: false,
        reload_reason: None,
        stats,
    }
}

/// Look up serialized content for a target hash.
fn resolve_content(snapshot: &BlockSnapshot, hash: ContentHash) -> String {
    match snapshot.content(hash) {
        Some(content) => content.to_string(),
        None => {
            // Only reachable with a hand-built snapshot
            tracing::warn!(hash = %hash, "no content for target hash");
            String::new()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
