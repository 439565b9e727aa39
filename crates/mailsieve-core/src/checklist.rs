//! In-memory checklist for the current session.

use std::fmt;

/// One checklist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    /// Item text, trimmed.
    pub text: String,
    /// Whether the item has been checked off.
    pub done: bool,
}

impl fmt::Display for ChecklistItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.done {
            write!(f, "✔ {}", self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// Ordered list of checklist items. Indices are zero-based.
#[derive(Debug, Clone, Default)]
pub struct Checklist {
    items: Vec<ChecklistItem>,
}

impl Checklist {
    /// Creates an empty checklist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item and returns its index.
    ///
    /// Blank text is ignored and returns `None`.
    pub fn add(&mut self, text: &str) -> Option<usize> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.items.push(ChecklistItem {
            text: text.to_string(),
            done: false,
        });
        Some(self.items.len() - 1)
    }

    /// Flips the done state of an item and returns the new state.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let item = self.items.get_mut(index)?;
        item.done = !item.done;
        Some(item.done)
    }

    /// Removes an item.
    pub fn remove(&mut self, index: usize) -> Option<ChecklistItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// All items in order.
    #[must_use]
    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_ignores_blank() {
        let mut list = Checklist::new();
        assert_eq!(list.add("  Reply to Jane "), Some(0));
        assert_eq!(list.add("   "), None);
        assert_eq!(list.add("Book room"), Some(1));
        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[0].text, "Reply to Jane");
    }

    #[test]
    fn test_toggle_and_display() {
        let mut list = Checklist::new();
        list.add("Pay invoice");

        assert_eq!(list.toggle(0), Some(true));
        assert_eq!(list.items()[0].to_string(), "✔ Pay invoice");
        assert_eq!(list.toggle(0), Some(false));
        assert_eq!(list.items()[0].to_string(), "Pay invoice");
        assert_eq!(list.toggle(5), None);
    }

    #[test]
    fn test_remove() {
        let mut list = Checklist::new();
        list.add("a1");
        list.add("b2");

        let removed = list.remove(0).unwrap();
        assert_eq!(removed.text, "a1");
        assert_eq!(list.items()[0].text, "b2");
        assert!(list.remove(3).is_none());
        assert!(list.remove(0).is_some());
        assert!(list.is_empty());
    }
}
