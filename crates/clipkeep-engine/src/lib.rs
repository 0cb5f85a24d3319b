//! Clipboard history engine for clipkeep.
//!
//! Watches the clipboard for changes, keeps a bounded most-recent-first
//! history of distinct contents, and writes chosen entries back.

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod selection;
pub mod setup;
pub mod watcher;

pub use config::Config;
pub use engine::{Engine, EngineCommand, EngineEvent, EngineHandle, EngineStatus};
pub use error::EngineError;
pub use history::{HistorySnapshot, HistoryStore, InsertOutcome};
pub use selection::{SelectionController, SelectionOutcome};
pub use watcher::{ClipboardWatcher, PollOutcome};
