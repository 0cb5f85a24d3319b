//! Clipboard change detection.
//!
//! The watcher compares the provider's change token against the last one
//! it saw. Only when the token moves does it read the full snapshot,
//! classify it, and feed the result into the history.

use std::sync::Arc;

use clipkeep_clipboard::{ClipboardProvider, ContentClassifier};
use clipkeep_types::{ChangeToken, ClipboardItem};
use tracing::{debug, trace, warn};

use crate::history::{HistoryStore, InsertOutcome};

/// What a single [`ClipboardWatcher::poll`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The watcher is stopped; nothing was read.
    Stopped,
    /// The change token has not moved since the last poll.
    Unchanged,
    /// The clipboard could not be read this cycle.
    ReadFailed,
    /// The clipboard changed but held nothing worth recording.
    Unclassifiable,
    /// A new item was recorded in the history.
    Recorded(InsertOutcome),
}

impl PollOutcome {
    /// Whether the history was mutated.
    pub fn changed_history(self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}

/// Polls the clipboard for changes and records them.
pub struct ClipboardWatcher {
    provider: Arc<dyn ClipboardProvider>,
    classifier: ContentClassifier,
    last_seen: Option<ChangeToken>,
    running: bool,
}

impl ClipboardWatcher {
    pub fn new(provider: Arc<dyn ClipboardProvider>) -> Self {
        Self {
            provider,
            classifier: ContentClassifier::new(),
            last_seen: None,
            running: false,
        }
    }

    /// Begin watching.
    ///
    /// Unless `record_existing` is set, the current token is taken as
    /// already seen, so content copied before start is not recorded.
    pub async fn start(&mut self, record_existing: bool) {
        self.running = true;
        self.last_seen = None;
        if record_existing {
            debug!("watcher started, recording existing clipboard contents");
            return;
        }
        match self.provider.change_token().await {
            Ok(token) => {
                self.last_seen = Some(token);
                debug!("watcher started");
            }
            Err(e) => {
                debug!(error = %e, "could not prime change token, existing contents may be recorded");
            }
        }
    }

    /// Stop watching. Subsequent polls are no-ops until `start` is called.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            debug!("watcher stopped");
        }
    }

    /// Let the contents currently on the clipboard be recorded again.
    ///
    /// Called after the history is cleared, so that copying the same
    /// thing again is not mistaken for "no change" by content-derived
    /// tokens.
    pub fn rearm(&self) {
        self.provider.rearm();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Check the clipboard once and record any change into `history`.
    ///
    /// Never fails: read errors are logged and leave history untouched.
    pub async fn poll(&mut self, history: &mut HistoryStore) -> PollOutcome {
        if !self.running {
            return PollOutcome::Stopped;
        }

        let token = match self.provider.change_token().await {
            Ok(token) => token,
            Err(e) => {
                debug!(error = %e, "clipboard change token unavailable");
                return PollOutcome::ReadFailed;
            }
        };

        if self.last_seen == Some(token) {
            return PollOutcome::Unchanged;
        }
        // Record the token before reading, so a failed read is not retried forever.
        self.last_seen = Some(token);

        let snapshot = match self.provider.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "failed to read clipboard contents");
                return PollOutcome::ReadFailed;
            }
        };

        let Some(kind) = self.classifier.classify(&snapshot) else {
            trace!("clipboard changed but nothing to record");
            return PollOutcome::Unclassifiable;
        };

        let kind_name = kind.kind_name();
        let outcome = history.insert(ClipboardItem::new(kind));
        debug!(kind = kind_name, ?outcome, len = history.len(), "clipboard change recorded");
        PollOutcome::Recorded(outcome)
    }
}

#[cfg(test)]
mod tests {
    use clipkeep_clipboard::mock::{MockClipboard, MockClipboardHandle};
    use clipkeep_types::{ClipboardSnapshot, ItemKind};

    use super::*;

    async fn started(record_existing: bool) -> (ClipboardWatcher, MockClipboardHandle) {
        let clipboard = MockClipboard::new();
        let handle = clipboard.handle();
        let mut watcher = ClipboardWatcher::new(Arc::new(clipboard));
        watcher.start(record_existing).await;
        (watcher, handle)
    }

    #[tokio::test]
    async fn unchanged_token_skips_snapshot_read() {
        let (mut watcher, handle) = started(false).await;
        let mut history = HistoryStore::new(10);

        assert_eq!(watcher.poll(&mut history).await, PollOutcome::Unchanged);
        assert_eq!(watcher.poll(&mut history).await, PollOutcome::Unchanged);
        assert_eq!(handle.snapshot_reads(), 0);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn change_is_recorded_once() {
        let (mut watcher, handle) = started(false).await;
        let mut history = HistoryStore::new(10);

        handle.copy_text("hello");
        assert_eq!(
            watcher.poll(&mut history).await,
            PollOutcome::Recorded(InsertOutcome::Inserted { evicted: 0 })
        );
        assert_eq!(watcher.poll(&mut history).await, PollOutcome::Unchanged);
        assert_eq!(history.len(), 1);
        assert_eq!(handle.snapshot_reads(), 1);
    }

    #[tokio::test]
    async fn existing_contents_ignored_by_default() {
        let clipboard = MockClipboard::new();
        let handle = clipboard.handle();
        handle.copy_text("before start");

        let mut watcher = ClipboardWatcher::new(Arc::new(clipboard));
        watcher.start(false).await;
        let mut history = HistoryStore::new(10);

        assert_eq!(watcher.poll(&mut history).await, PollOutcome::Unchanged);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn existing_contents_recorded_on_request() {
        let clipboard = MockClipboard::new();
        clipboard.handle().copy_text("before start");

        let mut watcher = ClipboardWatcher::new(Arc::new(clipboard));
        watcher.start(true).await;
        let mut history = HistoryStore::new(10);

        assert!(watcher.poll(&mut history).await.changed_history());
        assert_eq!(history.get(0).unwrap().kind.as_text(), Some("before start"));
    }

    #[tokio::test]
    async fn read_failure_does_not_reprocess_change() {
        let (mut watcher, handle) = started(false).await;
        let mut history = HistoryStore::new(10);

        handle.copy_text("unreadable");
        handle.set_fail_reads(true);
        assert_eq!(watcher.poll(&mut history).await, PollOutcome::ReadFailed);

        handle.set_fail_reads(false);
        assert_eq!(watcher.poll(&mut history).await, PollOutcome::Unchanged);
        assert!(history.is_empty());
        assert_eq!(handle.snapshot_reads(), 1);

        handle.copy_text("readable");
        assert!(watcher.poll(&mut history).await.changed_history());
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn recopy_after_clear_is_recorded() {
        let (mut watcher, handle) = started(false).await;
        let mut history = HistoryStore::new(10);

        handle.copy_text("x");
        assert!(watcher.poll(&mut history).await.changed_history());
        history.clear();
        watcher.rearm();
        handle.copy_text("x");

        assert!(watcher.poll(&mut history).await.changed_history());
        assert_eq!(history.get(0).unwrap().kind.as_text(), Some("x"));
    }

    #[tokio::test]
    async fn recopy_after_clear_is_recorded_with_content_tokens() {
        let clipboard = MockClipboard::content_hashed();
        let handle = clipboard.handle();
        let mut watcher = ClipboardWatcher::new(Arc::new(clipboard));
        watcher.start(false).await;
        let mut history = HistoryStore::new(10);

        handle.copy_text("x");
        assert!(watcher.poll(&mut history).await.changed_history());
        history.clear();
        watcher.rearm();
        handle.copy_text("x");

        assert!(watcher.poll(&mut history).await.changed_history());
        assert_eq!(history.len(), 1);
        assert_eq!(handle.rearms(), 1);
    }

    #[tokio::test]
    async fn identical_copy_invisible_to_content_tokens_without_rearm() {
        let clipboard = MockClipboard::content_hashed();
        let handle = clipboard.handle();
        let mut watcher = ClipboardWatcher::new(Arc::new(clipboard));
        watcher.start(false).await;
        let mut history = HistoryStore::new(10);

        handle.copy_text("x");
        assert!(watcher.poll(&mut history).await.changed_history());
        handle.copy_text("x");

        assert_eq!(watcher.poll(&mut history).await, PollOutcome::Unchanged);
    }

    #[tokio::test]
    async fn whitespace_change_is_unclassifiable() {
        let (mut watcher, handle) = started(false).await;
        let mut history = HistoryStore::new(10);

        handle.copy_text("   \n  ");
        assert_eq!(watcher.poll(&mut history).await, PollOutcome::Unclassifiable);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn file_copy_with_text_fallback_records_file() {
        let (mut watcher, handle) = started(false).await;
        let mut history = HistoryStore::new(10);

        handle.copy(ClipboardSnapshot::files(["/tmp/photo.png"]).with_text("photo.png"));
        watcher.poll(&mut history).await;

        assert!(matches!(history.get(0).unwrap().kind, ItemKind::File(_)));
    }

    #[tokio::test]
    async fn stopped_watcher_reads_nothing() {
        let (mut watcher, handle) = started(false).await;
        let mut history = HistoryStore::new(10);
        let reads = handle.token_reads();

        watcher.stop();
        handle.copy_text("ignored");

        assert!(!watcher.is_running());
        assert_eq!(watcher.poll(&mut history).await, PollOutcome::Stopped);
        assert_eq!(handle.token_reads(), reads);
        assert!(history.is_empty());
    }
}
