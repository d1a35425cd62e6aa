use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::Pod;

/// A (title, content) pair rendered as one row of the result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    pub title: String,
    pub content: String,
}

impl DisplayEntry {
    /// Creates a new entry.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Builds the entry for a pod from its title and plain text.
    pub fn from_pod(pod: &Pod) -> Self {
        Self::new(pod.title(), pod.plain_text())
    }

    /// Returns the entry title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the entry content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered, most-recent-first list of display entries.
///
/// Owned by the presentation layer and only mutated through the methods
/// below. Entries accumulate across submissions until `clear` is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayList {
    entries: VecDeque<DisplayEntry>,
}

impl DisplayList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry at the front.
    pub fn prepend(&mut self, entry: DisplayEntry) {
        self.entries.push_front(entry);
    }

    /// Inserts each entry at the front in turn, so the last one ends up first.
    ///
    /// # Examples
    ///
    /// ```
    /// use voiceassist::{DisplayEntry, DisplayList};
    ///
    /// let mut list = DisplayList::new();
    /// list.prepend_all(vec![
    ///     DisplayEntry::new("A", "a"),
    ///     DisplayEntry::new("B", "b"),
    ///     DisplayEntry::new("C", "c"),
    /// ]);
    ///
    /// let titles: Vec<&str> = list.iter().map(|e| e.title()).collect();
    /// assert_eq!(titles, vec!["C", "B", "A"]);
    /// ```
    pub fn prepend_all(&mut self, entries: impl IntoIterator<Item = DisplayEntry>) {
        for entry in entries {
            self.prepend(entry);
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the entry at `index`, counting from the front.
    pub fn get(&self, index: usize) -> Option<&DisplayEntry> {
        self.entries.get(index)
    }

    /// Iterates entries front to back.
    pub fn iter(&self) -> impl Iterator<Item = &DisplayEntry> {
        self.entries.iter()
    }

    /// Returns a snapshot of the entries front to back.
    pub fn entries(&self) -> Vec<DisplayEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
