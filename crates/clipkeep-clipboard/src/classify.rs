//! Clipboard content classification.
//!
//! A single copy event often publishes several representations at once.
//! The classifier picks exactly one, in fixed priority order: file
//! reference, then raster image, then non-blank text.

use clipkeep_types::{ClipboardSnapshot, ItemKind};
use tracing::trace;

/// Chooses the history payload for a clipboard snapshot.
///
/// Classification is pure: it never touches history state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentClassifier;

impl ContentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Pick the payload to record, or `None` if nothing recognisable is
    /// present.
    pub fn classify(&self, snapshot: &ClipboardSnapshot) -> Option<ItemKind> {
        if let Some(path) = snapshot.files.first() {
            if snapshot.files.len() > 1 {
                trace!(count = snapshot.files.len(), "multiple files copied, keeping first");
            }
            return Some(ItemKind::File(path.clone()));
        }

        if let Some(image) = &snapshot.image {
            return Some(ItemKind::Image(image.clone()));
        }

        match &snapshot.text {
            Some(text) if !text.trim().is_empty() => Some(ItemKind::Text(text.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clipkeep_types::RasterImage;

    use super::*;

    fn pixel() -> RasterImage {
        RasterImage::from_rgba(1, 1, vec![255, 0, 0, 255]).unwrap()
    }

    #[test]
    fn file_beats_text() {
        let snapshot = ClipboardSnapshot::files(["/tmp/report.pdf"]).with_text("report.pdf");
        assert_eq!(
            ContentClassifier::new().classify(&snapshot),
            Some(ItemKind::File(PathBuf::from("/tmp/report.pdf")))
        );
    }

    #[test]
    fn file_beats_image() {
        let snapshot = ClipboardSnapshot::files(["/tmp/a.png"]).with_image(pixel());
        assert!(matches!(
            ContentClassifier::new().classify(&snapshot),
            Some(ItemKind::File(_))
        ));
    }

    #[test]
    fn first_file_wins() {
        let snapshot = ClipboardSnapshot::files(["/tmp/one", "/tmp/two"]);
        assert_eq!(
            ContentClassifier::new().classify(&snapshot),
            Some(ItemKind::File(PathBuf::from("/tmp/one")))
        );
    }

    #[test]
    fn image_beats_text() {
        let snapshot = ClipboardSnapshot::image(pixel()).with_text("image.png");
        assert_eq!(
            ContentClassifier::new().classify(&snapshot),
            Some(ItemKind::Image(pixel()))
        );
    }

    #[test]
    fn text_is_kept_untrimmed() {
        let snapshot = ClipboardSnapshot::text("  padded  ");
        assert_eq!(
            ContentClassifier::new().classify(&snapshot),
            Some(ItemKind::Text("  padded  ".to_string()))
        );
    }

    #[test]
    fn whitespace_only_text_is_rejected() {
        let snapshot = ClipboardSnapshot::text("   \n  ");
        assert_eq!(ContentClassifier::new().classify(&snapshot), None);
    }

    #[test]
    fn empty_snapshot_yields_nothing() {
        assert_eq!(ContentClassifier::new().classify(&ClipboardSnapshot::default()), None);
    }
}
