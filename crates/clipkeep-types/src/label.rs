//! Display labels for history items.
//!
//! Labels are derived from the stored payload alone and are never cached
//! on the item.

use std::fmt;
use std::path::Path;

use crate::item::{ClipboardItem, ItemKind};

/// Label shown for image entries.
pub const IMAGE_LABEL: &str = "[Image]";

/// Marker appended to the first line of multi-line text.
pub const ELLIPSIS: &str = "...";

/// Coarse category of a copied file, used for its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Text,
    /// Type unknown or not one of the above.
    Other,
}

impl FileCategory {
    /// Categorise a file by its extension, falling back to sniffing its
    /// leading bytes when the extension is unknown.
    pub fn of(path: &Path) -> Self {
        Self::from_extension(path)
            .or_else(|| Self::sniff(path))
            .unwrap_or(Self::Other)
    }

    /// Categorise by the declared extension only.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let category = match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tif" | "tiff" | "webp" | "heic" | "heif"
            | "svg" | "ico" => Self::Image,
            "mp4" | "mov" | "m4v" | "avi" | "mkv" | "webm" | "wmv" | "flv" | "mpg" | "mpeg" => {
                Self::Video
            }
            "mp3" | "wav" | "aac" | "flac" | "m4a" | "ogg" | "oga" | "opus" | "aif" | "aiff"
            | "wma" => Self::Audio,
            "txt" | "text" | "md" | "markdown" | "csv" | "tsv" | "log" | "rs" | "c" | "h"
            | "cpp" | "py" | "js" | "ts" | "swift" | "go" | "java" | "sh" | "rb" => Self::Text,
            _ => return None,
        };
        Some(category)
    }

    fn sniff(path: &Path) -> Option<Self> {
        let kind = infer::get_from_path(path).ok()??;
        match kind.matcher_type() {
            infer::MatcherType::Image => Some(Self::Image),
            infer::MatcherType::Video => Some(Self::Video),
            infer::MatcherType::Audio => Some(Self::Audio),
            infer::MatcherType::Text => Some(Self::Text),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Image => "🖼️",
            Self::Video => "🎬",
            Self::Audio => "🎵",
            Self::Text => "📄",
            Self::Other => "📁",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Text => "Text",
            Self::Other => "File",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ItemKind {
    /// Human-readable one-line label for this payload.
    pub fn display_label(&self) -> String {
        match self {
            Self::Text(text) => text_label(text),
            Self::Image(_) => IMAGE_LABEL.to_string(),
            Self::File(path) => file_label(path),
        }
    }
}

impl ClipboardItem {
    /// Human-readable one-line label for this item.
    pub fn display_label(&self) -> String {
        self.kind.display_label()
    }
}

fn text_label(text: &str) -> String {
    match text.split(['\n', '\r']).next() {
        Some(first) if first.len() < text.len() => format!("{first}{ELLIPSIS}"),
        _ => text.to_string(),
    }
}

fn file_label(path: &Path) -> String {
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let category = FileCategory::of(path);
    format!("{} [{}] {name}", category.icon(), category.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::RasterImage;

    #[test]
    fn single_line_text_is_verbatim() {
        assert_eq!(ClipboardItem::text("hello world").display_label(), "hello world");
    }

    #[test]
    fn multi_line_text_shows_first_line() {
        assert_eq!(
            ClipboardItem::text("first\nsecond\nthird").display_label(),
            "first..."
        );
        assert_eq!(ClipboardItem::text("dos\r\nline").display_label(), "dos...");
        assert_eq!(ClipboardItem::text("\nleading").display_label(), "...");
    }

    #[test]
    fn image_uses_placeholder() {
        let image = RasterImage::from_rgba(1, 1, vec![0; 4]).unwrap();
        assert_eq!(ClipboardItem::image(image).display_label(), IMAGE_LABEL);
    }

    #[test]
    fn file_labels_by_extension() {
        let cases = [
            ("/tmp/photo.JPG", "🖼️ [Image] photo.JPG"),
            ("/tmp/clip.mov", "🎬 [Video] clip.mov"),
            ("/tmp/song.mp3", "🎵 [Audio] song.mp3"),
            ("/tmp/notes.txt", "📄 [Text] notes.txt"),
        ];
        for (path, expected) in cases {
            assert_eq!(ClipboardItem::file(path).display_label(), expected, "{path}");
        }
    }

    #[test]
    fn unknown_file_falls_back_to_generic() {
        let label = ClipboardItem::file("/nonexistent/clipkeep/archive.xyz").display_label();
        assert_eq!(label, "📁 [File] archive.xyz");
    }

    #[test]
    fn sniffs_content_when_extension_unknown() {
        let path = std::env::temp_dir().join(format!("clipkeep-sniff-{}", std::process::id()));
        // PNG signature followed by an IHDR chunk header
        let png = [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
            0x44, 0x52,
        ];
        std::fs::write(&path, png).unwrap();
        let category = FileCategory::of(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(category, FileCategory::Image);
    }
}
