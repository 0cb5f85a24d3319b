//! OS clipboard access for clipkeep.
//!
//! Defines the [`ClipboardProvider`] trait the history engine reads and
//! writes the clipboard through, the [`ContentClassifier`] that turns a
//! raw [`ClipboardSnapshot`] into a history payload, and the `arboard`
//! backend used on real desktops.

use async_trait::async_trait;
use clipkeep_types::{ChangeToken, ClipboardSnapshot, ItemKind};

pub mod classify;
pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
pub mod system;
mod token;
pub mod uri;

pub use classify::ContentClassifier;
pub use error::ClipboardError;
pub use system::SystemClipboard;

/// Platform clipboard access.
#[async_trait]
pub trait ClipboardProvider: Send + Sync + 'static {
    /// Get a token that changes whenever the clipboard contents change.
    async fn change_token(&self) -> Result<ChangeToken, ClipboardError>;

    /// Read every representation currently on the clipboard.
    async fn snapshot(&self) -> Result<ClipboardSnapshot, ClipboardError>;

    /// Replace the clipboard contents with the given payload.
    async fn write(&self, kind: &ItemKind) -> Result<(), ClipboardError>;

    /// Make the next token differ even if the contents do not.
    ///
    /// Called after the history is cleared. Backends that derive tokens
    /// from the contents cannot see the same contents copied again, so they
    /// use this to offer the current contents once more. Backends with a
    /// real change counter ignore it.
    fn rearm(&self) {}
}
