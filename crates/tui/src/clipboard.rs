//! System clipboard access behind a small trait so copy commands can be
//! exercised without a display server.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Destination for copied hex codes.
pub trait ClipboardSink: Send {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The platform clipboard via `arboard`, opened fresh for every write.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|error| ClipboardError::Unavailable(error.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|error| ClipboardError::Write(error.to_string()))
    }
}
