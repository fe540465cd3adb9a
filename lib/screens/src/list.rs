//! Rendered list state shared by every screen.

use std::fmt::Display;

/// The rows a screen currently shows.
///
/// A successful load replaces every row; there is no incremental merge.
/// Before the first load the list is empty and not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<T> {
    items: Vec<T>,
    loaded: bool,
}

impl<T> ListView<T> {
    /// Creates an empty, not yet loaded list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
        }
    }

    /// Replaces all rows.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.loaded = true;
    }

    /// Drops all rows and forgets that a load happened.
    pub fn clear(&mut self) {
        self.items.clear();
        self.loaded = false;
    }

    /// Returns the rows.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns true once a load has succeeded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Display> ListView<T> {
    /// Returns one text line per row.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.items.iter().map(ToString::to_string).collect()
    }
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_swaps_all_rows() {
        let mut list = ListView::new();
        assert!(!list.is_loaded());

        list.replace(vec![1, 2, 3]);
        list.replace(vec![4]);

        assert!(list.is_loaded());
        assert_eq!(list.items(), &[4]);
        assert_eq!(list.lines(), vec!["4".to_string()]);
    }

    #[test]
    fn empty_load_is_still_loaded() {
        let mut list: ListView<u8> = ListView::default();
        list.replace(Vec::new());
        assert!(list.is_loaded());
        assert!(list.is_empty());

        list.clear();
        assert!(!list.is_loaded());
    }
}
