//! Cursor correlation
//!
//! Maps a source cursor `(line, character)` to the rendered spans that cover
//! it and highlights them briefly. Fine-grained notation (one source line
//! rendering to many notes) tags each leaf span with the `[start, end)`
//! character range it came from; the block root carries the line.
//!
//! No matching span is not an error: nothing gets highlighted.

use std::fmt;
use std::time::{Duration, Instant};

use smallvec::SmallVec;

use crate::attr::AttrsExt;
use crate::node::{Document, Element};
use crate::span::{CharRange, SourcePosition};

// =============================================================================
// Configuration
// =============================================================================

/// Attribute and class names used for cursor highlighting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorConfig {
    /// Line attribute on block roots
    pub line_attr: String,
    /// Inclusive start offset attribute on spans
    pub start_attr: String,
    /// Exclusive end offset attribute on spans
    pub end_attr: String,
    /// Class added to highlighted spans
    pub highlight_class: String,
    /// How long a highlight stays. Default: 1000ms
    pub highlight_duration: Duration,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            line_attr: "data-line".to_string(),
            start_attr: "data-char-start".to_string(),
            end_attr: "data-char-end".to_string(),
            highlight_class: "cursor-highlight".to_string(),
            highlight_duration: Duration::from_millis(1000),
        }
    }
}

impl CursorConfig {
    /// Read a span's character range from its attributes
    pub fn range_of(&self, elem: &Element) -> Option<CharRange> {
        let start = elem.attrs.get_attr_usize(&self.start_attr)?;
        let end = elem.attrs.get_attr_usize(&self.end_attr)?;
        CharRange::new(start, end)
    }
}

// =============================================================================
// Host Interface
// =============================================================================

/// A rendered span with its character range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSpan<Id> {
    pub id: Id,
    pub range: CharRange,
}

/// Span lookup and highlighting on the rendered side
pub trait SpanLookup {
    /// Handle to one span
    type SpanId: Clone + PartialEq + fmt::Debug;

    /// Leaf range-tagged spans inside blocks tagged with `line`
    fn spans_on_line(&self, line: usize, config: &CursorConfig) -> Vec<RenderedSpan<Self::SpanId>>;

    /// Add or remove the highlight class. Stale ids are ignored.
    fn set_highlight(&mut self, id: &Self::SpanId, class: &str, on: bool);
}

// =============================================================================
// Document as SpanLookup
// =============================================================================

/// Child-index path from the document root to an element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpanPath(pub SmallVec<[usize; 8]>);

impl SpanLookup for Document {
    type SpanId = SpanPath;

    fn spans_on_line(&self, line: usize, config: &CursorConfig) -> Vec<RenderedSpan<SpanPath>> {
        let mut spans = Vec::new();
        for (index, node) in self.blocks().iter().enumerate() {
            let Some(block) = node.as_element() else {
                continue;
            };
            if block.attrs.get_attr_usize(&config.line_attr) != Some(line) {
                continue;
            }

            collect_leaf_spans(block, SmallVec::from_elem(index, 1), config, &mut spans);
        }
        spans
    }

    fn set_highlight(&mut self, id: &SpanPath, class: &str, on: bool) {
        let Some(elem) = self.element_at_mut(&id.0) else {
            return;
        };
        if on {
            elem.attrs.add_class(class);
        } else {
            elem.attrs.remove_class(class);
        }
    }
}

/// Push the innermost range-tagged elements under `elem`, in document order.
///
/// Returns whether any element in the subtree carries a range.
fn collect_leaf_spans(
    elem: &Element,
    path: SmallVec<[usize; 8]>,
    config: &CursorConfig,
    spans: &mut Vec<RenderedSpan<SpanPath>>,
) -> bool {
    let mut nested = false;
    for (i, child) in elem.children.iter().enumerate() {
        if let Some(child) = child.as_element() {
            let mut child_path = path.clone();
            child_path.push(i);
            nested |= collect_leaf_spans(child, child_path, config, spans);
        }
    }
    if nested {
        return true;
    }
    match config.range_of(elem) {
        Some(range) => {
            spans.push(RenderedSpan { id: SpanPath(path), range });
            true
        }
        None => false,
    }
}

// =============================================================================
// CursorCorrelator
// =============================================================================

/// Highlights spans under the source cursor and expires them
#[derive(Debug)]
pub struct CursorCorrelator<Id> {
    config: CursorConfig,
    active: Vec<(Id, Instant)>,
}

impl<Id: Clone + PartialEq + fmt::Debug> CursorCorrelator<Id> {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            config,
            active: Vec::new(),
        }
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Number of spans currently highlighted
    pub fn active(&self) -> usize {
        self.active.len()
    }

    /// Highlight every span on `pos.line` whose range contains
    /// `pos.character`. Returns the number of matches.
    pub fn highlight<H>(&mut self, host: &mut H, pos: SourcePosition, now: Instant) -> usize
    where
        H: SpanLookup<SpanId = Id> + ?Sized,
    {
        let matches: Vec<Id> = host
            .spans_on_line(pos.line, &self.config)
            .into_iter()
            .filter(|span| span.range.contains(pos.character))
            .map(|span| span.id)
            .collect();

        let deadline = now + self.config.highlight_duration;
        for id in &matches {
            host.set_highlight(id, &self.config.highlight_class, true);
            match self.active.iter_mut().find(|(active, _)| active == id) {
                Some(entry) => entry.1 = deadline,
                None => self.active.push((id.clone(), deadline)),
            }
        }

        tracing::trace!(line = pos.line, character = pos.character, matched = matches.len(), "cursor");
        matches.len()
    }

    /// Remove highlights whose deadline has passed.
    pub fn tick<H>(&mut self, host: &mut H, now: Instant)
    where
        H: SpanLookup<SpanId = Id> + ?Sized,
    {
        let class = self.config.highlight_class.as_str();
        self.active.retain(|(id, deadline)| {
            if now >= *deadline {
                host.set_highlight(id, class, false);
                false
            } else {
                true
            }
        });
    }

    /// Remove every highlight now.
    pub fn clear<H>(&mut self, host: &mut H)
    where
        H: SpanLookup<SpanId = Id> + ?Sized,
    {
        for (id, _) in self.active.drain(..) {
            host.set_highlight(&id, &self.config.highlight_class, false);
        }
    }

    /// Forget highlights without touching the host (its spans are gone).
    pub fn forget(&mut self) {
        self.active.clear();
    }
}

impl<Id: Clone + PartialEq + fmt::Debug> Default for CursorCorrelator<Id> {
    fn default() -> Self {
        Self::new(CursorConfig::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
