//! Text node type
//!
//! Text content nodes in the block tree.

// =============================================================================
// Text
// =============================================================================

/// How text content is emitted by the serializer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextKind {
    /// Escaped on output
    #[default]
    Normal,
    /// Pre-rendered markup (math, highlighted code), emitted verbatim
    Raw,
}

/// Text content node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    /// Text content
    pub content: String,
    /// Output kind
    pub kind: TextKind,
}

impl Text {
    /// Create a new escaped text node
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: TextKind::Normal,
        }
    }

    /// Create a raw text node
    pub fn raw(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: TextKind::Raw,
        }
    }

    /// Check if this node is emitted verbatim
    pub fn is_raw(&self) -> bool {
        self.kind == TextKind::Raw
    }

    /// Check if text content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Check if text is only whitespace (including newlines)
    pub fn is_whitespace(&self) -> bool {
        self.content.trim().is_empty()
    }
}
