//! Patch applier
//!
//! Applies an [`EditScript`] to a live, already-mounted view.
//!
//! # Index drift
//!
//! Scripts are computed against fixed source/target snapshots, but ops are
//! applied one at a time to a single mutable container. A running offset
//! (starting at 0) is added to every update/delete index:
//!
//! | op     | position               | offset after |
//! |--------|------------------------|--------------|
//! | insert | `index` (target index) | `+1`         |
//! | delete | `index + offset`       | `-1`         |
//! | update | `index + offset`       | unchanged    |
//!
//! Inserts at or past the current length append. Updates and deletes that
//! land out of bounds are skipped with a warning; the rest of the batch still
//! applies.
//!
//! # Highlights
//!
//! Inserted and updated blocks are flagged "recently changed" until
//! `highlight_duration` has passed. The applier holds the deadlines; callers
//! drive expiry with [`PatchApplier::tick`].

use std::fmt;
use std::time::{Duration, Instant};

use crate::algo::{EditKind, EditScript};
use crate::error::SyncError;

// =============================================================================
// Host Interfaces
// =============================================================================

/// Index-addressable mount surface the applier mutates
pub trait LiveView {
    /// Handle to one mounted block, stable while the block stays mounted
    type Key: Copy + Eq + fmt::Debug;

    /// Number of mounted blocks
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mount `content` at `index` (`index <= len`)
    fn insert_block(&mut self, index: usize, content: &str) -> Self::Key;

    /// Unmount the block at `index` (`index < len`)
    fn remove_block(&mut self, index: usize);

    /// Replace the block at `index` (`index < len`)
    fn replace_block(&mut self, index: usize, content: &str) -> Self::Key;

    /// Tag the block at `index` with its source line
    fn set_block_line(&mut self, index: usize, line: Option<usize>);

    /// Toggle the "recently changed" marker. Unknown keys are ignored.
    fn set_changed(&mut self, key: Self::Key, changed: bool);

    /// Unmount everything
    fn clear(&mut self) {
        while !self.is_empty() {
            self.remove_block(self.len() - 1);
        }
    }
}

/// Re-render signal for embedded content the applier cannot render itself
pub trait RefreshHook {
    /// Called once per affected kind after a script is applied
    fn refresh(&mut self, kind: &str);
}

impl<F: FnMut(&str)> RefreshHook for F {
    fn refresh(&mut self, kind: &str) {
        self(kind)
    }
}

/// Hook that ignores refresh signals
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRefresh;

impl RefreshHook for NoRefresh {
    fn refresh(&mut self, _kind: &str) {}
}

// =============================================================================
// Configuration
// =============================================================================

/// Content marker identifying one kind of embedded block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedMarker {
    /// Kind passed to [`RefreshHook::refresh`]
    pub kind: String,
    /// Substring searched for in inserted/updated content
    pub needle: String,
}

impl EmbedMarker {
    pub fn new(kind: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            needle: needle.into(),
        }
    }
}

/// Configuration for patch application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConfig {
    /// How long inserted/updated blocks stay marked. Default: 1000ms
    pub highlight_duration: Duration,
    /// Embedded content kinds to refresh after patching
    pub embed_markers: Vec<EmbedMarker>,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            highlight_duration: Duration::from_millis(1000),
            embed_markers: vec![
                EmbedMarker::new("notation", "abcjs"),
                EmbedMarker::new("diagram", "mermaid"),
            ],
        }
    }
}

impl PatchConfig {
    /// Config without highlights or embed refresh
    pub fn plain() -> Self {
        Self {
            highlight_duration: Duration::ZERO,
            embed_markers: Vec::new(),
        }
    }
}

// =============================================================================
// Apply Report
// =============================================================================

/// Outcome of applying one script
#[derive(Debug, Default)]
#[must_use]
pub struct ApplyReport {
    /// Operations performed
    pub applied: usize,
    /// Operations skipped because the view did not match the script
    pub skipped: Vec<SyncError>,
    /// Embedded content kinds that were refreshed
    pub refreshed: Vec<String>,
}

impl ApplyReport {
    /// Check whether every operation applied
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

// =============================================================================
// PatchApplier
// =============================================================================

/// Applies edit scripts to a [`LiveView`] and tracks change highlights
#[derive(Debug)]
pub struct PatchApplier<K> {
    config: PatchConfig,
    highlights: Vec<(K, Instant)>,
}

impl<K: Copy + Eq + fmt::Debug> PatchApplier<K> {
    pub fn new(config: PatchConfig) -> Self {
        Self {
            config,
            highlights: Vec::new(),
        }
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Number of blocks currently marked as changed
    pub fn pending_highlights(&self) -> usize {
        self.highlights.len()
    }

    /// Apply `script` to `view` in order.
    pub fn apply<V, H>(&mut self, view: &mut V, script: &EditScript, hook: &mut H, now: Instant) -> ApplyReport
    where
        V: LiveView<Key = K> + ?Sized,
        H: RefreshHook + ?Sized,
    {
        let mut report = ApplyReport::default();
        let mut offset: isize = 0;

        for op in &script.ops {
            let len = view.len();
            match op.operation {
                EditKind::Insert => {
                    let at = op.index.min(len);
                    let key = view.insert_block(at, &op.content);
                    self.mark_changed(view, key, now);
                    offset += 1;
                    tracing::trace!(index = op.index, at, "insert");
                }
                kind @ (EditKind::Update | EditKind::Delete) => {
                    let adjusted = op.index as isize + offset;
                    if adjusted < 0 || adjusted as usize >= len {
                        let err = SyncError::OutOfBounds {
                            operation: kind,
                            index: op.index,
                            adjusted,
                            len,
                        };
                        tracing::warn!(error = %err, "skipping patch operation");
                        report.skipped.push(err);
                        continue;
                    }
                    let at = adjusted as usize;
                    if kind == EditKind::Update {
                        let key = view.replace_block(at, &op.content);
                        self.mark_changed(view, key, now);
                    } else {
                        view.remove_block(at);
                        offset -= 1;
                    }
                    tracing::trace!(operation = %kind, index = op.index, at, "applied");
                }
            }
            report.applied += 1;
        }

        self.stamp_lines(view, &script.data_line_array);
        report.refreshed = self.refresh_embeds(script, hook);
        report
    }

    /// Clear highlights whose deadline has passed.
    pub fn tick<V>(&mut self, view: &mut V, now: Instant)
    where
        V: LiveView<Key = K> + ?Sized,
    {
        self.highlights.retain(|&(key, deadline)| {
            if now >= deadline {
                view.set_changed(key, false);
                false
            } else {
                true
            }
        });
    }

    /// Forget all highlights without touching the view (used on reload).
    pub fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    fn mark_changed<V>(&mut self, view: &mut V, key: K, now: Instant)
    where
        V: LiveView<Key = K> + ?Sized,
    {
        if self.config.highlight_duration.is_zero() {
            return;
        }
        view.set_changed(key, true);
        let deadline = now + self.config.highlight_duration;
        match self.highlights.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = deadline,
            None => self.highlights.push((key, deadline)),
        }
    }

    /// Content carries no line attribute; restore lines from the script.
    fn stamp_lines<V>(&self, view: &mut V, lines: &[Option<usize>])
    where
        V: LiveView<Key = K> + ?Sized,
    {
        let len = view.len();
        if lines.len() != len {
            tracing::warn!(expected = lines.len(), actual = len, "line array does not match view length");
        }
        for (index, line) in lines.iter().take(len).enumerate() {
            view.set_block_line(index, *line);
        }
    }

    fn refresh_embeds<H>(&self, script: &EditScript, hook: &mut H) -> Vec<String>
    where
        H: RefreshHook + ?Sized,
    {
        let mut refreshed = Vec::new();
        for marker in &self.config.embed_markers {
            let present = script
                .ops
                .iter()
                .filter(|op| op.operation != EditKind::Delete)
                .any(|op| op.content.contains(marker.needle.as_str()));
            if present {
                tracing::debug!(kind = %marker.kind, "refreshing embedded content");
                hook.refresh(&marker.kind);
                refreshed.push(marker.kind.clone());
            }
        }
        refreshed
    }
}

impl<K: Copy + Eq + fmt::Debug> Default for PatchApplier<K> {
    fn default() -> Self {
        Self::new(PatchConfig::default())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::EditOperation;
    use crate::id::ContentHash;
    use crate::view::{BlockKey, BlockView};

    fn hash(n: u32) -> ContentHash {
        ContentHash::from_raw(n)
    }

    fn view_of(blocks: &[&str]) -> BlockView {
        let mut view = BlockView::new();
        for (i, b) in blocks.iter().enumerate() {
            view.insert_block(i, b);
        }
        view
    }

    fn script(ops: Vec<EditOperation>, lines: Vec<Option<usize>>) -> EditScript {
        EditScript { ops, data_line_array: lines }
    }

    #[test]
    fn test_apply_mixed_with_offset() {
        // [a, b, c, d] -> [x, a, c, y]
        let mut view = view_of(&["a", "b", "c", "d"]);
        let s = script(
            vec![
                EditOperation::insert(0, hash(1), "x"),
                EditOperation::delete(1, hash(2)),
                EditOperation::update(3, hash(3), "y"),
            ],
            vec![Some(1), Some(2), Some(3), Some(4)],
        );
        let mut applier = PatchApplier::new(PatchConfig::plain());
        let report = applier.apply(&mut view, &s, &mut NoRefresh, Instant::now());

        assert!(report.is_clean());
        assert_eq!(report.applied, 3);
        assert_eq!(view.contents(), vec!["x", "a", "c", "y"]);
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut view = view_of(&["a"]);
        let s = script(vec![EditOperation::insert(9, hash(1), "z")], vec![]);
        let report = PatchApplier::new(PatchConfig::plain()).apply(&mut view, &s, &mut NoRefresh, Instant::now());

        assert_eq!(report.applied, 1);
        assert_eq!(view.contents(), vec!["a", "z"]);
    }

    #[test]
    fn test_out_of_bounds_skipped_rest_applied() {
        let mut view = view_of(&["a", "b"]);
        let s = script(
            vec![
                EditOperation::update(5, hash(1), "nope"),
                EditOperation::delete(7, hash(2)),
                EditOperation::update(0, hash(3), "A"),
            ],
            vec![Some(1), Some(2)],
        );
        let report = PatchApplier::new(PatchConfig::plain()).apply(&mut view, &s, &mut NoRefresh, Instant::now());

        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(report.skipped.iter().all(SyncError::is_desync));
        assert_eq!(view.contents(), vec!["A", "b"]);
    }

    #[test]
    fn test_skipped_delete_does_not_shift_offset() {
        let mut view = view_of(&["a", "b", "c"]);
        let s = script(
            vec![EditOperation::delete(10, hash(1)), EditOperation::delete(1, hash(2))],
            vec![],
        );
        let report = PatchApplier::new(PatchConfig::plain()).apply(&mut view, &s, &mut NoRefresh, Instant::now());

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(view.contents(), vec!["a", "c"]);
    }

    #[test]
    fn test_lines_restamped() {
        let mut view = view_of(&["a", "b"]);
        let s = script(vec![EditOperation::update(1, hash(1), "B")], vec![Some(1), Some(9)]);
        let _ = PatchApplier::new(PatchConfig::plain()).apply(&mut view, &s, &mut NoRefresh, Instant::now());

        assert_eq!(view.blocks()[0].line, Some(1));
        assert_eq!(view.blocks()[1].line, Some(9));
    }

    #[test]
    fn test_highlight_expires_on_tick() {
        let mut view = view_of(&["a"]);
        let s = script(vec![EditOperation::update(0, hash(1), "b")], vec![Some(1)]);
        let mut applier: PatchApplier<BlockKey> = PatchApplier::default();
        let start = Instant::now();

        let _ = applier.apply(&mut view, &s, &mut NoRefresh, start);
        assert!(view.blocks()[0].changed);
        assert_eq!(applier.pending_highlights(), 1);

        applier.tick(&mut view, start + Duration::from_millis(999));
        assert!(view.blocks()[0].changed);

        applier.tick(&mut view, start + Duration::from_millis(1000));
        assert!(!view.blocks()[0].changed);
        assert_eq!(applier.pending_highlights(), 0);
    }

    #[test]
    fn test_embed_refresh_once_per_kind() {
        let mut view = view_of(&[]);
        let s = script(
            vec![
                EditOperation::insert(0, hash(1), "<div class=\"mermaid\">a</div>"),
                EditOperation::insert(1, hash(2), "<div class=\"mermaid\">b</div>"),
                EditOperation::insert(2, hash(3), "<p>plain</p>"),
            ],
            vec![None, None, None],
        );
        let mut calls = Vec::new();
        let mut hook = |kind: &str| calls.push(kind.to_string());
        let report = PatchApplier::default().apply(&mut view, &s, &mut hook, Instant::now());

        assert_eq!(report.refreshed, vec!["diagram".to_string()]);
        assert_eq!(calls, vec!["diagram".to_string()]);
    }

    #[test]
    fn test_delete_content_not_scanned_for_embeds() {
        let mut view = view_of(&["x"]);
        let mut op = EditOperation::delete(0, hash(1));
        op.content = "abcjs".to_string();
        let s = script(vec![op], vec![]);
        let report = PatchApplier::default().apply(&mut view, &s, &mut NoRefresh, Instant::now());
        assert!(report.refreshed.is_empty());
    }
}
