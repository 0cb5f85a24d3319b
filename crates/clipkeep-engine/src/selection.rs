//! Writing a chosen history entry back to the clipboard.

use std::sync::Arc;

use clipkeep_clipboard::{ClipboardError, ClipboardProvider};
use clipkeep_types::ClipboardItem;
use tracing::{debug, info, warn};

use crate::history::HistoryStore;

/// What a [`SelectionController::select`] call did.
#[derive(Debug)]
pub enum SelectionOutcome {
    /// The item is now on the clipboard.
    Committed { index: usize, item: ClipboardItem },
    /// The clipboard write failed; nothing changed.
    Failed { index: usize, error: ClipboardError },
    /// The index no longer exists, usually because the list changed under
    /// the user. Nothing was written.
    OutOfRange { index: usize, len: usize },
}

/// Restores history entries onto the clipboard.
///
/// Selection never reorders or removes history entries. The watcher will
/// see the write as a clipboard change and promote the entry on its own.
pub struct SelectionController {
    provider: Arc<dyn ClipboardProvider>,
}

impl SelectionController {
    pub fn new(provider: Arc<dyn ClipboardProvider>) -> Self {
        Self { provider }
    }

    /// Write the entry at `index` back to the clipboard.
    pub async fn select(&self, history: &HistoryStore, index: usize) -> SelectionOutcome {
        let Some(item) = history.get(index).cloned() else {
            debug!(index, len = history.len(), "selection out of range, ignoring");
            return SelectionOutcome::OutOfRange {
                index,
                len: history.len(),
            };
        };

        match self.provider.write(&item.kind).await {
            Ok(()) => {
                info!(index, kind = item.kind.kind_name(), "restored history entry to clipboard");
                SelectionOutcome::Committed { index, item }
            }
            Err(error) => {
                warn!(index, error = %error, "failed to restore history entry");
                SelectionOutcome::Failed { index, error }
            }
        }
    }
}
