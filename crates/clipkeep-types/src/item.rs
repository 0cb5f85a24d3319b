//! Recorded clipboard history items.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// A raster image detached from the clipboard buffer it was read from.
///
/// Pixels are stored as tightly packed RGBA8, row-major. The bytes are
/// shared behind an `Arc` so history snapshots stay cheap to clone.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: usize,
    pub height: usize,
    bytes: Arc<[u8]>,
}

impl RasterImage {
    /// Create an image from RGBA8 pixel data.
    ///
    /// Returns `None` when the byte count does not match `width * height * 4`.
    #[must_use]
    pub fn from_rgba(width: usize, height: usize, bytes: impl Into<Arc<[u8]>>) -> Option<Self> {
        let bytes = bytes.into();
        let expected = width.checked_mul(height)?.checked_mul(4)?;
        if bytes.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            bytes,
        })
    }

    /// Raw RGBA8 pixel data.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the pixel data in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// The payload of a history item.
///
/// Equality is payload equality: text by string, images by pixel bytes,
/// files by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// Plain UTF-8 text.
    Text(String),
    /// A single raster image.
    Image(RasterImage),
    /// A single file reference.
    File(PathBuf),
}

impl ItemKind {
    /// The text payload, if this is a text item.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) | Self::File(_) => None,
        }
    }

    /// The file path, if this is a file item.
    pub fn as_file(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Text(_) | Self::Image(_) => None,
        }
    }

    /// Short name of the kind, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::File(_) => "file",
        }
    }
}

/// A single entry in the clipboard history.
///
/// `created_at` is informational and never takes part in equality, so
/// re-copying identical content is recognised as a duplicate.
#[derive(Debug, Clone)]
pub struct ClipboardItem {
    pub kind: ItemKind,
    pub created_at: SystemTime,
}

impl ClipboardItem {
    /// Create an item captured now.
    #[must_use]
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            created_at: SystemTime::now(),
        }
    }

    /// Create a text item captured now.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ItemKind::Text(text.into()))
    }

    /// Create a file item captured now.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(ItemKind::File(path.into()))
    }

    /// Create an image item captured now.
    #[must_use]
    pub fn image(image: RasterImage) -> Self {
        Self::new(ItemKind::Image(image))
    }
}

impl PartialEq for ClipboardItem {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for ClipboardItem {}
