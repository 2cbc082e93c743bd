//! Canonical HTML serialization
//!
//! The serialized form of a block is both its hash input and the content the
//! live view mounts, so the output must be deterministic:
//!
//! - attributes in insertion order, values always double-quoted
//! - no whitespace added or removed
//! - void elements self-close as ` />`

use crate::attr::Attrs;
use crate::node::{Document, Element, Node};

// =============================================================================
// Document Rendering
// =============================================================================

/// Render a whole document (root element included) to HTML.
pub fn render_document(doc: &Document) -> String {
    let mut output = String::new();
    render_element(&doc.root, None, &mut output);
    output
}

/// Serialize one top-level block.
///
/// When `strip_attr` is set, that attribute is omitted from the block's own
/// root element (descendants are serialized unchanged).
pub fn serialize_block(node: &Node, strip_attr: Option<&str>) -> String {
    let mut output = String::new();
    match node {
        Node::Element(elem) => render_element(elem, strip_attr, &mut output),
        Node::Text(_) => render_node(node, &mut output),
    }
    output
}

/// Render an element to HTML.
fn render_element(elem: &Element, strip_attr: Option<&str>, output: &mut String) {
    open_tag(elem, strip_attr, output);
    if is_void_element(&elem.tag) {
        return;
    }

    for child in &elem.children {
        render_node(child, output);
    }

    close_tag(elem, output);
}

/// Render a node subtree to HTML.
///
/// Walks with an explicit stack so deeply nested blocks (long lists,
/// nested quotes) cannot overflow the call stack.
fn render_node(node: &Node, output: &mut String) {
    enum Step<'a> {
        Enter(&'a Node),
        Close(&'a Element),
    }

    let mut stack = vec![Step::Enter(node)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(Node::Text(text)) => {
                if text.is_raw() {
                    output.push_str(&text.content);
                } else {
                    output.push_str(&escape_html(&text.content));
                }
            }
            Step::Enter(Node::Element(elem)) => {
                open_tag(elem, None, output);
                if is_void_element(&elem.tag) {
                    continue;
                }
                stack.push(Step::Close(elem.as_ref()));
                for child in elem.children.iter().rev() {
                    stack.push(Step::Enter(child));
                }
            }
            Step::Close(elem) => close_tag(elem, output),
        }
    }
}

fn open_tag(elem: &Element, strip_attr: Option<&str>, output: &mut String) {
    output.push('<');
    output.push_str(&elem.tag);
    render_attrs(&elem.attrs, strip_attr, output);
    if is_void_element(&elem.tag) {
        output.push_str(" />");
    } else {
        output.push('>');
    }
}

fn close_tag(elem: &Element, output: &mut String) {
    output.push_str("</");
    output.push_str(&elem.tag);
    output.push('>');
}

/// Render attributes to HTML.
fn render_attrs(attrs: &Attrs, strip_attr: Option<&str>, output: &mut String) {
    for (name, value) in attrs.iter() {
        if strip_attr == Some(name.as_str()) {
            continue;
        }
        output.push(' ');
        output.push_str(name);
        output.push_str("=\"");
        output.push_str(&escape_attr(value));
        output.push('"');
    }
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute value special characters.
fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Check if element is a void element (self-closing).
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// =============================================================================
// Tests
// =============================================================================
