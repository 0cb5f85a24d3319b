//! Engine errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("engine is not running")]
    NotRunning,

    #[error("clipboard error: {0}")]
    Clipboard(#[from] clipkeep_clipboard::ClipboardError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
