//! Page history
//!
//! The backend only hands out forward cursors, so the way back is remembered
//! here: every page a view has shown, keyed by page number, in the order it
//! was first seen.

use super::cursor::Cursor;

/// Ordered log of visited pages and the cursors that produced them
///
/// A page number appears at most once and entries are never reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageHistory {
    entries: Vec<(u64, Cursor)>,
}

impl PageHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the cursor of a visited page unless its page number is known
    ///
    /// The stored cursor always carries an explicit `page_number`. Returns
    /// whether a new entry was appended.
    pub fn record(&mut self, cursor: &Cursor) -> bool {
        let page_number = cursor.page_number();
        if self.contains(page_number) {
            return false;
        }

        self.entries
            .push((page_number, cursor.with_page_number(page_number)));
        true
    }

    /// Cursor recorded for a page number
    pub fn get(&self, page_number: u64) -> Option<&Cursor> {
        self.entries
            .iter()
            .find(|(n, _)| *n == page_number)
            .map(|(_, cursor)| cursor)
    }

    /// Check if a page number has been recorded
    pub fn contains(&self, page_number: u64) -> bool {
        self.get(page_number).is_some()
    }

    /// Recorded page numbers in insertion order
    pub fn page_numbers(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    /// Number of recorded pages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
