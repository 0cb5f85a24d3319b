//! System clipboard backend built on `arboard`.
//!
//! Change detection reads the OS change counter where there is one
//! (`NSPasteboard.changeCount` on macOS, the clipboard sequence number on
//! Windows), so an unchanged poll never touches the clipboard contents.
//! Elsewhere the token is a hash of the contents plus a generation number.
//! That hash is taken from a full read, which is kept and returned by the
//! `snapshot` call of the same poll.

use std::borrow::Cow;
use std::sync::{Arc, Mutex, MutexGuard};

use arboard::Clipboard;
use async_trait::async_trait;
use clipkeep_types::{ChangeToken, ClipboardSnapshot, ItemKind, RasterImage};
use tracing::{debug, warn};

use crate::error::ClipboardError;
use crate::token::ContentTokens;
use crate::uri::file_uri;
use crate::ClipboardProvider;

/// The desktop clipboard.
///
/// All `arboard` calls may block on the windowing system, so they run on
/// tokio's blocking pool.
#[derive(Clone)]
pub struct SystemClipboard {
    inner: Arc<Mutex<Clipboard>>,
    fallback: Arc<Mutex<Fallback>>,
}

impl SystemClipboard {
    /// Connect to the system clipboard.
    pub fn new() -> Result<Self, ClipboardError> {
        let clipboard = Clipboard::new().map_err(map_read_error)?;
        debug!(
            os_change_count = os_change_count().is_some(),
            "connected to system clipboard"
        );
        Ok(Self {
            inner: Arc::new(Mutex::new(clipboard)),
            fallback: Arc::new(Mutex::new(Fallback::default())),
        })
    }

    async fn with_clipboard<T, F>(&self, f: F) -> Result<T, ClipboardError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Clipboard) -> Result<T, ClipboardError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut clipboard = inner
                .lock()
                .map_err(|_| ClipboardError::Other(anyhow::anyhow!("clipboard mutex poisoned")))?;
            f(&mut clipboard)
        })
        .await
        .map_err(|e| ClipboardError::Other(anyhow::anyhow!("clipboard task failed: {e}")))?
    }

    fn fallback(&self) -> Result<MutexGuard<'_, Fallback>, ClipboardError> {
        self.fallback
            .lock()
            .map_err(|_| ClipboardError::Other(anyhow::anyhow!("token mutex poisoned")))
    }
}

/// Content-hash state for platforms without a change counter.
#[derive(Debug, Default)]
struct Fallback {
    tokens: ContentTokens,
    /// Contents read for the latest token, handed to the next `snapshot`.
    pending: Option<ClipboardSnapshot>,
}

impl Fallback {
    fn observe(&mut self, snapshot: ClipboardSnapshot) -> ChangeToken {
        let token = self.tokens.token(&snapshot);
        self.pending = Some(snapshot);
        token
    }

    fn take_pending(&mut self) -> Option<ClipboardSnapshot> {
        self.pending.take()
    }
}

#[async_trait]
impl ClipboardProvider for SystemClipboard {
    async fn change_token(&self) -> Result<ChangeToken, ClipboardError> {
        if let Some(count) = os_change_count() {
            return Ok(ChangeToken::from_raw(count));
        }
        let snapshot = self.with_clipboard(read_snapshot).await?;
        Ok(self.fallback()?.observe(snapshot))
    }

    async fn snapshot(&self) -> Result<ClipboardSnapshot, ClipboardError> {
        let pending = self.fallback()?.take_pending();
        match pending {
            Some(snapshot) => Ok(snapshot),
            None => self.with_clipboard(read_snapshot).await,
        }
    }

    async fn write(&self, kind: &ItemKind) -> Result<(), ClipboardError> {
        self.fallback()?.pending = None;
        let kind = kind.clone();
        self.with_clipboard(move |clipboard| {
            let result = match kind {
                ItemKind::Text(text) => clipboard.set_text(text),
                ItemKind::Image(image) => clipboard.set_image(arboard::ImageData {
                    width: image.width,
                    height: image.height,
                    bytes: Cow::Owned(image.bytes().to_vec()),
                }),
                ItemKind::File(path) => clipboard.set_text(file_uri(&path)),
            };
            result.map_err(|e| ClipboardError::Write(e.to_string()))
        })
        .await
    }

    fn rearm(&self) {
        match self.fallback() {
            Ok(mut fallback) => fallback.tokens.rearm(),
            Err(e) => warn!(error = %e, "could not rearm change token"),
        }
    }
}

#[cfg(target_os = "macos")]
#[allow(unsafe_code)]
fn os_change_count() -> Option<u64> {
    use cocoa::appkit::NSPasteboard;
    use cocoa::base::{id, nil};
    use objc::{msg_send, sel, sel_impl};

    // SAFETY: `generalPasteboard` returns the shared pasteboard (or nil),
    // and `changeCount` takes no arguments and returns an NSInteger.
    unsafe {
        let pasteboard: id = NSPasteboard::generalPasteboard(nil);
        if pasteboard.is_null() {
            return None;
        }
        let count: i64 = msg_send![pasteboard, changeCount];
        u64::try_from(count).ok()
    }
}

#[cfg(windows)]
fn os_change_count() -> Option<u64> {
    clipboard_win::raw::seq_num().map(|seq| u64::from(seq.get()))
}

#[cfg(not(any(target_os = "macos", windows)))]
fn os_change_count() -> Option<u64> {
    None
}

fn read_snapshot(clipboard: &mut Clipboard) -> Result<ClipboardSnapshot, ClipboardError> {
    let files = optional(clipboard.get().file_list())?.unwrap_or_default();

    let image = optional(clipboard.get_image())?.and_then(|data| {
        let (width, height) = (data.width, data.height);
        let image = RasterImage::from_rgba(width, height, data.bytes.into_owned());
        if image.is_none() {
            warn!(width, height, "clipboard image has inconsistent pixel data");
        }
        image
    });

    let text = optional(clipboard.get_text())?;

    Ok(ClipboardSnapshot { files, image, text })
}

/// Treat "format not on the clipboard" as absence rather than failure.
fn optional<T>(result: Result<T, arboard::Error>) -> Result<Option<T>, ClipboardError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(arboard::Error::ContentNotAvailable | arboard::Error::ConversionFailure) => Ok(None),
        Err(e) => Err(map_read_error(e)),
    }
}

fn map_read_error(e: arboard::Error) -> ClipboardError {
    match e {
        arboard::Error::ContentNotAvailable | arboard::Error::ConversionFailure => {
            ClipboardError::FormatUnavailable
        }
        arboard::Error::ClipboardNotSupported => ClipboardError::Unavailable,
        arboard::Error::ClipboardOccupied => {
            ClipboardError::Occupied("held by another application".to_string())
        }
        other => ClipboardError::Read(other.to_string()),
    }
}
