//! Bounded, deduplicating, most-recent-first clipboard history.

use std::ops::Deref;
use std::sync::Arc;

use clipkeep_types::ClipboardItem;

/// Result of [`HistoryStore::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// New content was added at the front; `evicted` entries fell off the end.
    Inserted { evicted: usize },
    /// Content already in the history moved from index `from` to the front.
    Promoted { from: usize },
}

/// Ordered history of distinct clipboard items, newest at index 0.
///
/// Invariants: `len() <= capacity()`, no two entries are equal, and order
/// is recency of observation.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    items: Vec<ClipboardItem>,
    capacity: usize,
}

impl HistoryStore {
    /// Create an empty store. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record `candidate` as the most recent entry.
    ///
    /// An equal entry already present is removed first, so re-copying old
    /// content promotes it instead of duplicating it.
    pub fn insert(&mut self, candidate: ClipboardItem) -> InsertOutcome {
        let existing = self.items.iter().position(|item| *item == candidate);
        if let Some(index) = existing {
            self.items.remove(index);
        }

        self.items.insert(0, candidate);

        let evicted = self.items.len().saturating_sub(self.capacity);
        self.items.truncate(self.capacity);

        match existing {
            Some(from) => InsertOutcome::Promoted { from },
            None => InsertOutcome::Inserted { evicted },
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Point-in-time copy of the history for read-only consumers.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot(self.items.iter().cloned().collect())
    }

    pub fn get(&self, index: usize) -> Option<&ClipboardItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Text to hand to a drag session for the entry at `index`.
    ///
    /// Only text entries can be dragged out; images and files return `None`.
    pub fn drag_payload(&self, index: usize) -> Option<&str> {
        self.items.get(index)?.kind.as_text()
    }
}

/// Immutable, cheaply clonable view of the history at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySnapshot(Arc<[ClipboardItem]>);

impl HistorySnapshot {
    /// Display labels in history order.
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(ClipboardItem::display_label).collect()
    }
}

impl Deref for HistorySnapshot {
    type Target = [ClipboardItem];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
