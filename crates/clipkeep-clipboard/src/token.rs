//! Change tokens derived from clipboard contents.
//!
//! Used where the platform has no change counter. A content hash cannot
//! tell "copied the same thing again" from "nothing happened", so a
//! generation number is mixed in: after [`ContentTokens::rearm`] the same
//! contents produce a different token and are seen once more.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use clipkeep_types::{ChangeToken, ClipboardSnapshot};

#[derive(Debug, Default)]
pub(crate) struct ContentTokens {
    generation: u64,
}

impl ContentTokens {
    pub(crate) fn token(&self, snapshot: &ClipboardSnapshot) -> ChangeToken {
        let mut hasher = DefaultHasher::new();
        self.generation.hash(&mut hasher);
        snapshot.files.hash(&mut hasher);
        snapshot.text.hash(&mut hasher);
        if let Some(image) = &snapshot.image {
            image.width.hash(&mut hasher);
            image.height.hash(&mut hasher);
            image.bytes().hash(&mut hasher);
        }
        ChangeToken::from_raw(hasher.finish())
    }

    pub(crate) fn rearm(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
