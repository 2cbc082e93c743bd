//! In-memory live view.
//!
//! [`BlockView`] is a headless mount surface: an ordered list of serialized
//! blocks with heights, a scroll offset and registered cursor spans. It backs
//! the tests and any host that renders from a mirrored block list.

use crate::cursor::{CursorConfig, RenderedSpan, SpanLookup};
use crate::patch::LiveView;
use crate::scroll::{ScrollAnchor, ScrollSurface};
use crate::span::CharRange;
use crate::transform::BlockSnapshot;

/// Height assigned to newly mounted blocks
pub const DEFAULT_BLOCK_HEIGHT: f64 = 20.0;

/// Handle of a mounted block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKey(u64);

impl BlockKey {
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

/// A character-range span inside a mounted block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSpan {
    pub range: CharRange,
    /// Highlight class currently applied, if any
    pub highlight: Option<String>,
}

/// One mounted block
#[derive(Debug, Clone, PartialEq)]
pub struct ViewBlock {
    pub key: BlockKey,
    pub content: String,
    pub line: Option<usize>,
    pub height: f64,
    /// Recently inserted or updated
    pub changed: bool,
    pub spans: Vec<ViewSpan>,
}

/// Headless [`LiveView`] + [`ScrollSurface`] + [`SpanLookup`]
#[derive(Debug, Clone, Default)]
pub struct BlockView {
    blocks: Vec<ViewBlock>,
    scroll_top: f64,
    next_key: u64,
}

impl BlockView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount every block of a snapshot, lines included
    pub fn from_snapshot(snapshot: &BlockSnapshot) -> Self {
        let mut view = Self::new();
        for (index, content) in snapshot.contents().enumerate() {
            view.insert_block(index, content);
        }
        for (index, line) in snapshot.lines.iter().enumerate() {
            view.set_block_line(index, *line);
        }
        view
    }

    pub fn blocks(&self) -> &[ViewBlock] {
        &self.blocks
    }

    /// Mounted content in order
    pub fn contents(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.content.as_str()).collect()
    }

    /// Change a block's rendered height
    pub fn set_height(&mut self, index: usize, height: f64) {
        if let Some(block) = self.blocks.get_mut(index) {
            block.height = height.max(0.0);
        }
    }

    /// Register the cursor spans rendered inside a block
    pub fn set_spans(&mut self, index: usize, ranges: impl IntoIterator<Item = CharRange>) {
        if let Some(block) = self.blocks.get_mut(index) {
            block.spans = ranges
                .into_iter()
                .map(|range| ViewSpan { range, highlight: None })
                .collect();
        }
    }

    /// Top offset of the block at `index` (total height when past the end)
    pub fn top_of(&self, index: usize) -> f64 {
        self.blocks.iter().take(index).map(|b| b.height).sum()
    }

    /// Sum of all block heights
    pub fn total_height(&self) -> f64 {
        self.top_of(self.blocks.len())
    }

    fn mint_key(&mut self) -> BlockKey {
        let key = BlockKey(self.next_key);
        self.next_key += 1;
        key
    }
}

impl LiveView for BlockView {
    type Key = BlockKey;

    fn len(&self) -> usize {
        self.blocks.len()
    }

    fn insert_block(&mut self, index: usize, content: &str) -> BlockKey {
        let key = self.mint_key();
        let block = ViewBlock {
            key,
            content: content.to_string(),
            line: None,
            height: DEFAULT_BLOCK_HEIGHT,
            changed: false,
            spans: Vec::new(),
        };
        let at = index.min(self.blocks.len());
        self.blocks.insert(at, block);
        key
    }

    fn remove_block(&mut self, index: usize) {
        if index < self.blocks.len() {
            self.blocks.remove(index);
        }
    }

    fn replace_block(&mut self, index: usize, content: &str) -> BlockKey {
        let key = self.mint_key();
        if let Some(block) = self.blocks.get_mut(index) {
            // New element: fresh key, no spans until the host registers them
            block.key = key;
            block.content = content.to_string();
            block.spans.clear();
        }
        key
    }

    fn set_block_line(&mut self, index: usize, line: Option<usize>) {
        if let Some(block) = self.blocks.get_mut(index) {
            block.line = line;
        }
    }

    fn set_changed(&mut self, key: BlockKey, changed: bool) {
        if let Some(block) = self.blocks.iter_mut().find(|b| b.key == key) {
            block.changed = changed;
        }
    }

    fn clear(&mut self) {
        self.blocks.clear();
        self.scroll_top = 0.0;
    }
}

impl ScrollSurface for BlockView {
    fn anchors(&self) -> Vec<ScrollAnchor> {
        let mut top = 0.0;
        let mut anchors = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if let Some(line) = block.line {
                anchors.push(ScrollAnchor::new(line, top));
            }
            top += block.height;
        }
        anchors
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn scroll_to(&mut self, top: f64) -> bool {
        let clamped = top.clamp(0.0, self.total_height());
        let moved = clamped != self.scroll_top;
        self.scroll_top = clamped;
        moved
    }
}

impl SpanLookup for BlockView {
    type SpanId = (BlockKey, usize);

    fn spans_on_line(&self, line: usize, _config: &CursorConfig) -> Vec<RenderedSpan<Self::SpanId>> {
        self.blocks
            .iter()
            .filter(|b| b.line == Some(line))
            .flat_map(|b| {
                b.spans.iter().enumerate().map(move |(i, span)| RenderedSpan {
                    id: (b.key, i),
                    range: span.range,
                })
            })
            .collect()
    }

    fn set_highlight(&mut self, id: &Self::SpanId, class: &str, on: bool) {
        let (key, index) = *id;
        let span = self
            .blocks
            .iter_mut()
            .find(|b| b.key == key)
            .and_then(|b| b.spans.get_mut(index));
        if let Some(span) = span {
            span.highlight = on.then(|| class.to_string());
        }
    }
}
