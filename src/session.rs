//! Sync sessions: the producer and the preview ends of one document.
//!
//! ```text
//!  SyncSession (source side)                 PreviewClient (view side)
//!  ─────────────────────────                 ─────────────────────────
//!  update(doc) ──── edit / reload ─────────> enqueue ─> drain ─> PatchApplier
//!  on_editor_scroll ── editor-scroll ──────> drain ─> ScrollSync::push_line
//!  cursor ─────────── cursor ──────────────> drain ─> CursorCorrelator
//!  on_message <────── preview-scroll ─────── on_view_scrolled
//! ```
//!
//! Transport is the caller's business; it must deliver in order, at most
//! once. Each end owns its state: the producer its last-applied snapshot,
//! the client its queue, highlights and scroll state.

use std::collections::VecDeque;
use std::time::Instant;

use crate::algo::{DiffConfig, EditScript, diff_with_config};
use crate::cache::{DocumentKey, SharedSnapshotCache};
use crate::cursor::{CursorConfig, CursorCorrelator, SpanLookup};
use crate::error::SyncError;
use crate::message::SyncMessage;
use crate::node::Document;
use crate::patch::{LiveView, PatchApplier, PatchConfig, RefreshHook};
use crate::scroll::{EchoSuppressor, ScrollConfig, ScrollSurface, ScrollSync, ScrollVerdict};
use crate::span::SourcePosition;
use crate::transform::{BlockSnapshot, IndexConfig, Indexer};

// =============================================================================
// Configuration
// =============================================================================

/// All sync settings in one place
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    pub index: IndexConfig,
    pub diff: DiffConfig,
    pub patch: PatchConfig,
    pub scroll: ScrollConfig,
    pub cursor: CursorConfig,
}

impl SyncConfig {
    /// Use one line attribute for indexing and cursor lookup
    pub fn with_line_attr(mut self, attr: impl Into<String>) -> Self {
        let attr = attr.into();
        self.cursor.line_attr = attr.clone();
        self.index.line_attr = attr;
        self
    }
}

// =============================================================================
// SyncSession (producer)
// =============================================================================

/// Source side of one document
#[derive(Debug)]
pub struct SyncSession {
    indexer: Indexer,
    diff_config: DiffConfig,
    /// `None` until the first update: the preview's content is unknown
    baseline: Option<BlockSnapshot>,
    cache: Option<(SharedSnapshotCache, DocumentKey)>,
    editor_scroll: EchoSuppressor,
    /// Last editor line seen or revealed
    last_line: Option<f64>,
}

impl SyncSession {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            indexer: Indexer::new(config.index.clone()),
            diff_config: config.diff,
            baseline: None,
            cache: None,
            editor_scroll: EchoSuppressor::new(config.scroll),
            last_line: None,
        }
    }

    /// Share baselines through `cache` under `key`.
    ///
    /// A baseline already cached for `key` is adopted.
    pub fn with_cache(mut self, cache: SharedSnapshotCache, key: DocumentKey) -> Self {
        if let Some(entry) = cache.get(&key) {
            self.baseline = Some(entry.snapshot);
        }
        self.cache = Some((cache, key));
        self
    }

    /// Last-applied snapshot, if any
    pub fn baseline(&self) -> Option<&BlockSnapshot> {
        self.baseline.as_ref()
    }

    /// Last known source line of the editor viewport
    pub fn last_line(&self) -> Option<f64> {
        self.last_line
    }

    /// Diff `doc` against the baseline and return the messages to send.
    ///
    /// - nothing changed: no messages
    /// - normal edit: `[edit]`
    /// - no baseline or too many operations: `[reload, edit(insert all)]`
    pub fn update(&mut self, doc: &Document) -> Vec<SyncMessage> {
        let snapshot = self.indexer.index(doc);

        let messages = match &self.baseline {
            None => {
                tracing::debug!(blocks = snapshot.len(), "no baseline, sending reload");
                full_reload(&snapshot)
            }
            Some(old) => {
                let result = diff_with_config(old, &snapshot, self.diff_config);
                if result.should_reload {
                    tracing::debug!(
                        reason = result.reload_reason.as_deref().unwrap_or_default(),
                        "diff fell back to reload"
                    );
                    full_reload(&snapshot)
                } else if result.script.is_empty() && old.lines == snapshot.lines {
                    Vec::new()
                } else {
                    tracing::trace!(
                        inserted = result.stats.inserted,
                        deleted = result.stats.deleted,
                        updated = result.stats.updated,
                        kept = result.stats.kept,
                        "edit"
                    );
                    vec![SyncMessage::Edit(result.script)]
                }
            }
        };

        if let Some((cache, key)) = &self.cache {
            cache.store(key.clone(), snapshot.clone());
        }
        self.baseline = Some(snapshot);
        messages
    }

    /// Supersede everything in flight: reset the baseline to empty.
    ///
    /// The next [`update`](Self::update) inserts every block.
    pub fn reload(&mut self) -> SyncMessage {
        self.baseline = Some(BlockSnapshot::empty());
        if let Some((cache, key)) = &self.cache {
            cache.store(key.clone(), BlockSnapshot::empty());
        }
        self.editor_scroll.reset();
        self.last_line = None;
        SyncMessage::Reload
    }

    /// Editor viewport moved to `line`.
    ///
    /// Returns `None` when the move echoes a `preview-scroll` we just applied.
    pub fn on_editor_scroll(&mut self, line: f64, now: Instant) -> Option<SyncMessage> {
        self.last_line = Some(line);
        match self.editor_scroll.observe(now) {
            ScrollVerdict::Echo => None,
            ScrollVerdict::User => Some(SyncMessage::EditorScroll { line }),
        }
    }

    /// Editor cursor moved.
    pub fn cursor(&self, pos: SourcePosition) -> SyncMessage {
        SyncMessage::Cursor {
            line_number: pos.line,
            relative_char_number: pos.character,
        }
    }

    /// Handle a message from the preview.
    ///
    /// For `preview-scroll`, returns the line the editor should reveal and
    /// starts suppressing the resulting editor scroll events.
    pub fn on_message(&mut self, message: &SyncMessage, now: Instant) -> Option<f64> {
        match message {
            SyncMessage::PreviewScroll { line } => {
                self.editor_scroll.arm(now);
                self.last_line = Some(*line);
                Some(*line)
            }
            other => {
                tracing::warn!(kind = other.kind(), "unexpected message on source side");
                None
            }
        }
    }

    /// Timer transition for editor-side suppression.
    pub fn tick(&mut self, now: Instant) {
        self.editor_scroll.poll(now);
    }
}

fn full_reload(snapshot: &BlockSnapshot) -> Vec<SyncMessage> {
    vec![SyncMessage::Reload, SyncMessage::Edit(EditScript::insert_all(snapshot))]
}

// =============================================================================
// PreviewClient (consumer)
// =============================================================================

/// Everything the preview side needs from its rendering host
pub trait PreviewHost: LiveView + ScrollSurface + SpanLookup {}

impl<T: LiveView + ScrollSurface + SpanLookup + ?Sized> PreviewHost for T {}

/// Outcome of one [`PreviewClient::drain`]
#[derive(Debug, Default)]
#[must_use]
pub struct DrainReport {
    /// Messages handled
    pub handled: usize,
    /// Edit operations applied
    pub applied: usize,
    /// Edit operations skipped (view out of sync)
    pub skipped: Vec<SyncError>,
    /// Embedded content kinds refreshed
    pub refreshed: Vec<String>,
    /// Spans highlighted by cursor messages
    pub highlighted: usize,
}

/// View side of one document
#[derive(Debug)]
pub struct PreviewClient<H: PreviewHost + ?Sized> {
    applier: PatchApplier<H::Key>,
    scroll: ScrollSync,
    correlator: CursorCorrelator<H::SpanId>,
    inbox: VecDeque<SyncMessage>,
}

impl<H: PreviewHost + ?Sized> PreviewClient<H> {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            applier: PatchApplier::new(config.patch.clone()),
            scroll: ScrollSync::new(config.scroll),
            correlator: CursorCorrelator::new(config.cursor.clone()),
            inbox: VecDeque::new(),
        }
    }

    /// Messages waiting for [`drain`](Self::drain)
    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    pub fn scroll(&self) -> &ScrollSync {
        &self.scroll
    }

    /// Queue a message.
    ///
    /// A reload drops every queued edit.
    pub fn enqueue(&mut self, message: SyncMessage) {
        if message.is_reload() {
            let before = self.inbox.len();
            self.inbox.retain(|m| !m.is_edit());
            let dropped = before - self.inbox.len();
            if dropped > 0 {
                tracing::debug!(dropped, "reload superseded queued edits");
            }
        }
        self.inbox.push_back(message);
    }

    /// Decode and queue a JSON message. Bad input is logged and dropped.
    ///
    /// Returns whether the message was queued.
    pub fn receive(&mut self, json: &str) -> bool {
        match SyncMessage::from_json(json) {
            Ok(message) => {
                self.enqueue(message);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping sync message");
                false
            }
        }
    }

    /// Handle every queued message in order.
    pub fn drain<R>(&mut self, host: &mut H, hook: &mut R, now: Instant) -> DrainReport
    where
        R: RefreshHook + ?Sized,
    {
        let mut report = DrainReport::default();
        while let Some(message) = self.inbox.pop_front() {
            report.handled += 1;
            match message {
                SyncMessage::Reload => {
                    host.clear();
                    self.applier.clear_highlights();
                    self.correlator.forget();
                    self.scroll.reset();
                }
                SyncMessage::Edit(script) => {
                    let applied = self.applier.apply(host, &script, hook, now);
                    report.applied += applied.applied;
                    report.skipped.extend(applied.skipped);
                    for kind in applied.refreshed {
                        if !report.refreshed.contains(&kind) {
                            report.refreshed.push(kind);
                        }
                    }
                }
                SyncMessage::EditorScroll { line } => {
                    self.scroll.push_line(host, line, now);
                }
                SyncMessage::Cursor { line_number, relative_char_number } => {
                    let pos = SourcePosition::new(line_number, relative_char_number);
                    report.highlighted += self.correlator.highlight(host, pos, now);
                }
                SyncMessage::PreviewScroll { .. } => {
                    tracing::warn!(kind = message.kind(), "unexpected message on preview side");
                }
            }
        }
        report
    }

    /// The view scrolled; returns the `preview-scroll` to send, if any.
    pub fn on_view_scrolled(&mut self, host: &H, now: Instant) -> Option<SyncMessage> {
        self.scroll
            .observe_scroll(host, now)
            .map(|line| SyncMessage::PreviewScroll { line })
    }

    /// Expire highlights and suppression windows.
    pub fn tick(&mut self, host: &mut H, now: Instant) {
        self.applier.tick(host, now);
        self.correlator.tick(host, now);
        self.scroll.poll(now);
    }
}

// =============================================================================
// Tests
// =============================================================================
