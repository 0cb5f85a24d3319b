//! Shared types for clipkeep.
//!
//! This crate contains the types shared across the clipkeep workspace:
//! recorded history items, the raw clipboard snapshot a poll observes,
//! the opaque change token, and display-label derivation.

pub mod item;
pub mod label;
pub mod snapshot;

pub use item::{ClipboardItem, ItemKind, RasterImage};
pub use label::FileCategory;
pub use snapshot::{ChangeToken, ClipboardSnapshot};
