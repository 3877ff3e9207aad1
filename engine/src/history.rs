//! Newest-first activity history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::HistoryEntry;

/// Append-only activity log, newest entry first
///
/// Prepending is the display-order invariant: the front of the log is
/// what the history screen shows first. Entries are never removed
/// automatically.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog(VecDeque<HistoryEntry>);

impl HistoryLog {
    /// Creates an empty log
    #[must_use]
    pub const fn new() -> Self {
        Self(VecDeque::new())
    }

    /// Insert `entry` at the front, keeping all prior entries.
    pub fn prepend(&mut self, entry: HistoryEntry) {
        self.0.push_front(entry);
    }

    /// The newest entry, if any
    #[must_use]
    pub fn front(&self) -> Option<&HistoryEntry> {
        self.0.front()
    }

    /// Borrowing view of the newest `limit` entries (fewer if the log is
    /// shorter). Does not mutate the log.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.0.iter().take(limit)
    }

    /// Iterate all entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.0.iter()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no entries have been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistoryEntry;
    type IntoIter = std::collections::vec_deque::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
