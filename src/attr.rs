//! Attribute system for rendered blocks
//!
//! Attributes are kept as an ordered `Vec<(String, String)>`. Order matters:
//! the canonical serialization (and therefore the content hash) emits them
//! in insertion order.

/// Element attributes as ordered key-value pairs
pub type Attrs = Vec<(String, String)>;

/// Extension trait for attribute operations on Attrs
pub trait AttrsExt {
    /// Get an attribute value by name
    fn get_attr(&self, name: &str) -> Option<&str>;

    /// Check if an attribute exists
    fn has_attr(&self, name: &str) -> bool;

    /// Set an attribute value (insert or update)
    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>);

    /// Remove an attribute by name, returning the old value if present
    fn remove_attr(&mut self, name: &str) -> Option<String>;

    /// Parse an attribute as an unsigned integer.
    ///
    /// Returns `None` when the attribute is missing or not a number.
    fn get_attr_usize(&self, name: &str) -> Option<usize>;

    /// Check whether a whitespace-separated `class` list contains `class`.
    fn has_class(&self, class: &str) -> bool;

    /// Add `class` to the class list. Returns false if already present.
    fn add_class(&mut self, class: &str) -> bool;

    /// Remove `class` from the class list. Returns false if absent.
    ///
    /// The `class` attribute itself is dropped when the list ends up empty.
    fn remove_class(&mut self, class: &str) -> bool;
}

impl AttrsExt for Attrs {
    fn get_attr(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_attr(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(attr) = self.iter_mut().find(|(k, _)| k == &name) {
            attr.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }

    fn get_attr_usize(&self, name: &str) -> Option<usize> {
        self.get_attr(name).and_then(|v| v.trim().parse().ok())
    }

    fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        let list = match self.get_attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr("class", list);
        true
    }

    fn remove_class(&mut self, class: &str) -> bool {
        if !self.has_class(class) {
            return false;
        }
        let remaining: Vec<String> = self
            .get_attr("class")
            .map(|list| {
                list.split_ascii_whitespace()
                    .filter(|c| *c != class)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        if remaining.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", remaining.join(" "));
        }
        true
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrs_operations() {
        let mut attrs: Attrs = Vec::new();

        attrs.set_attr("id", "main");
        attrs.set_attr("class", "container");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get_attr("id"), Some("main"));

        // Update keeps position
        attrs.set_attr("id", "other");
        assert_eq!(attrs[0], ("id".to_string(), "other".to_string()));

        assert_eq!(attrs.remove_attr("id"), Some("other".to_string()));
        assert!(!attrs.has_attr("id"));
        assert_eq!(attrs.remove_attr("id"), None);
    }

    #[test]
    fn test_attr_usize() {
        let mut attrs: Attrs = Vec::new();
        attrs.set_attr("data-line", "12");
        attrs.set_attr("data-bad", "twelve");

        assert_eq!(attrs.get_attr_usize("data-line"), Some(12));
        assert_eq!(attrs.get_attr_usize("data-bad"), None);
        assert_eq!(attrs.get_attr_usize("missing"), None);
    }

    #[test]
    fn test_has_class() {
        let mut attrs: Attrs = Vec::new();
        attrs.set_attr("class", "abcjs-note  abcjs-v0");

        assert!(attrs.has_class("abcjs-note"));
        assert!(attrs.has_class("abcjs-v0"));
        assert!(!attrs.has_class("abcjs"));
    }

    #[test]
    fn test_add_remove_class() {
        let mut attrs: Attrs = Vec::new();
        assert!(attrs.add_class("note"));
        assert!(!attrs.add_class("note"));
        assert!(attrs.add_class("cursor-highlight"));
        assert_eq!(attrs.get_attr("class"), Some("note cursor-highlight"));

        assert!(attrs.remove_class("note"));
        assert_eq!(attrs.get_attr("class"), Some("cursor-highlight"));
        assert!(attrs.remove_class("cursor-highlight"));
        assert!(!attrs.has_attr("class"));
        assert!(!attrs.remove_class("cursor-highlight"));
    }
}
