//! `file://` URI rendering for file write-back.

use std::path::Path;

/// Render a path as a `file://` URI with percent-encoded segments.
pub fn file_uri(path: &Path) -> String {
    let path = path.to_string_lossy();
    let encoded: Vec<String> = path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    let joined = encoded.join("/");
    if joined.starts_with('/') {
        format!("file://{joined}")
    } else {
        format!("file:///{joined}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_absolute_path() {
        assert_eq!(file_uri(Path::new("/tmp/notes.txt")), "file:///tmp/notes.txt");
    }

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(
            file_uri(Path::new("/home/me/My Files/a#1.png")),
            "file:///home/me/My%20Files/a%231.png"
        );
    }

    #[test]
    fn relative_path_gets_root() {
        assert_eq!(file_uri(Path::new("docs/a.md")), "file:///docs/a.md");
    }
}
