//! Raw clipboard observations.

use std::path::PathBuf;

use crate::item::RasterImage;

/// Opaque clipboard version token.
///
/// Backends hand out a new value whenever the clipboard contents change.
/// Tokens are only ever compared for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeToken(u64);

impl ChangeToken {
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Every representation the clipboard currently exposes for one copy event.
///
/// Applications frequently publish several at once, e.g. a file copy that
/// also carries the file name as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    pub files: Vec<PathBuf>,
    pub image: Option<RasterImage>,
    pub text: Option<String>,
}

impl ClipboardSnapshot {
    /// A snapshot exposing only text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A snapshot exposing only an image.
    #[must_use]
    pub fn image(image: RasterImage) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    /// A snapshot exposing only file references.
    #[must_use]
    pub fn files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add a text representation.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add an image representation.
    #[must_use]
    pub fn with_image(mut self, image: RasterImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Whether no representation at all is present.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.image.is_none() && self.text.is_none()
    }
}
