//! Mock clipboard backend for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clipkeep_types::{ChangeToken, ClipboardSnapshot, ItemKind};

use crate::error::ClipboardError;
use crate::token::ContentTokens;
use crate::uri::file_uri;
use crate::ClipboardProvider;

/// Shared state behind `MockClipboard` and its handles.
#[derive(Debug, Default)]
struct MockState {
    contents: ClipboardSnapshot,
    change_count: u64,
    written: Vec<ItemKind>,
    token_reads: usize,
    snapshot_reads: usize,
    rearms: usize,
    /// Set when tokens come from the contents instead of the counter.
    content_tokens: Option<ContentTokens>,
    fail_reads: bool,
    fail_writes: bool,
}

/// In-memory clipboard with an explicit change counter.
///
/// Tests drive it through a [`MockClipboardHandle`]: every `copy` bumps the
/// change counter the way an OS pasteboard does.
pub struct MockClipboard {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClipboard {
    /// Create an empty mock clipboard.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create an empty mock clipboard without a change counter.
    ///
    /// Tokens are derived from the contents, as on platforms where the OS
    /// exposes no counter: copying identical contents again is invisible
    /// until the clipboard is rearmed.
    pub fn content_hashed() -> Self {
        let clipboard = Self::new();
        clipboard.state.lock().unwrap().content_tokens = Some(ContentTokens::default());
        clipboard
    }

    /// Get a clonable handle for driving and observing the clipboard.
    pub fn handle(&self) -> MockClipboardHandle {
        MockClipboardHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Clonable control handle for `MockClipboard`.
#[derive(Clone)]
pub struct MockClipboardHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockClipboardHandle {
    /// Simulate another application copying `contents`.
    pub fn copy(&self, contents: ClipboardSnapshot) {
        let mut state = self.state.lock().unwrap();
        state.contents = contents;
        state.change_count += 1;
    }

    /// Simulate copying plain text.
    pub fn copy_text(&self, text: &str) {
        self.copy(ClipboardSnapshot::text(text));
    }

    /// Current clipboard contents.
    pub fn contents(&self) -> ClipboardSnapshot {
        self.state.lock().unwrap().contents.clone()
    }

    /// Current change counter.
    pub fn change_count(&self) -> u64 {
        self.state.lock().unwrap().change_count
    }

    /// Every payload written through the provider, oldest first.
    pub fn written(&self) -> Vec<ItemKind> {
        self.state.lock().unwrap().written.clone()
    }

    /// Number of change-token reads so far.
    pub fn token_reads(&self) -> usize {
        self.state.lock().unwrap().token_reads
    }

    /// Number of full snapshot reads so far.
    pub fn snapshot_reads(&self) -> usize {
        self.state.lock().unwrap().snapshot_reads
    }

    /// Number of `rearm` calls so far.
    pub fn rearms(&self) -> usize {
        self.state.lock().unwrap().rearms
    }

    /// Make snapshot reads fail until reset.
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    /// Make writes fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }
}

#[async_trait]
impl ClipboardProvider for MockClipboard {
    async fn change_token(&self) -> Result<ChangeToken, ClipboardError> {
        let mut state = self.state.lock().unwrap();
        state.token_reads += 1;
        let token = match &state.content_tokens {
            Some(tokens) => tokens.token(&state.contents),
            None => ChangeToken::from_raw(state.change_count),
        };
        Ok(token)
    }

    async fn snapshot(&self) -> Result<ClipboardSnapshot, ClipboardError> {
        let mut state = self.state.lock().unwrap();
        state.snapshot_reads += 1;
        if state.fail_reads {
            return Err(ClipboardError::Read("mock read failure".to_string()));
        }
        Ok(state.contents.clone())
    }

    async fn write(&self, kind: &ItemKind) -> Result<(), ClipboardError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(ClipboardError::Write("mock write failure".to_string()));
        }
        state.contents = match kind {
            ItemKind::Text(text) => ClipboardSnapshot::text(text.clone()),
            ItemKind::Image(image) => ClipboardSnapshot::image(image.clone()),
            ItemKind::File(path) => ClipboardSnapshot::files([path.clone()]).with_text(file_uri(path)),
        };
        state.change_count += 1;
        state.written.push(kind.clone());
        Ok(())
    }

    fn rearm(&self) {
        let mut state = self.state.lock().unwrap();
        state.rearms += 1;
        if let Some(tokens) = &mut state.content_tokens {
            tokens.rearm();
        }
    }
}
