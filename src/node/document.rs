//! Document type and related utilities
//!
//! The root container for rendered block trees, with block access and
//! traversal APIs.

use super::{Element, Node};

// =============================================================================
// Document
// =============================================================================

/// Root document container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Root element (the render pipeline's wrapper, e.g. `<body>`)
    pub root: Element,
}

impl Document {
    /// Create a new document with a root element
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Create a document from top-level blocks under a `<div>` root
    pub fn from_blocks(blocks: impl IntoIterator<Item = Node>) -> Self {
        let mut root = Element::new("div");
        root.children.extend(blocks);
        Self { root }
    }

    /// Top-level blocks, including whitespace text between them
    pub fn blocks(&self) -> &[Node] {
        &self.root.children
    }

    /// Mutable top-level blocks
    pub fn blocks_mut(&mut self) -> &mut [Node] {
        &mut self.root.children
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Find first element matching predicate (depth-first search)
    pub fn find_element<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.iter_elements().find(|e| predicate(e))
    }

    /// Find all elements matching predicate
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.iter_elements().filter(|e| predicate(e)).collect()
    }

    /// Count total elements in document
    pub fn element_count(&self) -> usize {
        self.iter_elements().count()
    }

    /// Iterate over all elements (depth-first, root first)
    pub fn iter_elements(&self) -> ElementIterator<'_> {
        ElementIterator::new(&self.root)
    }

    /// Follow a path of child indices from the root
    pub fn element_at(&self, path: &[usize]) -> Option<&Element> {
        let mut current = &self.root;
        for &idx in path {
            current = current.children.get(idx)?.as_element()?;
        }
        Some(current)
    }

    /// Follow a path of child indices from the root (mutable)
    pub fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = &mut self.root;
        for &idx in path {
            current = current.children.get_mut(idx)?.as_element_mut()?;
        }
        Some(current)
    }
}

// =============================================================================
// ElementIterator - depth-first element traversal
// =============================================================================

/// Depth-first iterator over elements
pub struct ElementIterator<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> ElementIterator<'a> {
    /// Start a traversal at `root` (inclusive)
    pub fn new(root: &'a Element) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for ElementIterator<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        for child in elem.children.iter().rev() {
            if let Some(child_elem) = child.as_element() {
                self.stack.push(child_elem);
            }
        }
        Some(elem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Text;

    fn sample() -> Document {
        Document::new(
            Element::new("div")
                .child(Element::new("span").with_class("highlight"))
                .text("\n")
                .child(Element::new("p").child(Element::new("em"))),
        )
    }

    #[test]
    fn test_document_find() {
        let doc = sample();

        let span = doc.find_element(|e| e.tag == "span").unwrap();
        assert!(span.has_class("highlight"));
        assert!(doc.find_element(|e| e.tag == "missing").is_none());
        assert_eq!(doc.find_all(|e| e.tag != "div").len(), 3);
    }

    #[test]
    fn test_document_elements_iterator() {
        let doc = sample();
        let tags: Vec<_> = doc.iter_elements().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["div", "span", "p", "em"]);
        assert_eq!(doc.element_count(), 4);
    }

    #[test]
    fn test_element_at_path() {
        let mut doc = sample();
        assert_eq!(doc.element_at(&[2, 0]).map(|e| e.tag.as_str()), Some("em"));
        // Index 1 is the newline text node
        assert!(doc.element_at(&[1]).is_none());
        assert!(doc.element_at(&[9]).is_none());

        doc.element_at_mut(&[2, 0]).unwrap().set_attr("data-x", "1");
        assert_eq!(doc.element_at(&[2, 0]).unwrap().get_attr("data-x"), Some("1"));
    }

    #[test]
    fn test_from_blocks() {
        let doc = Document::from_blocks([
            Element::new("h1").text("T").into(),
            Text::new("\n").into(),
        ]);
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.root.tag, "div");
    }
}
