//! Shared type definitions for the Swatchbox workspace.
//!
//! The wire types mirror the JSON contract of the palette server. The
//! message, effect and outcome enums describe how the terminal client moves
//! between pure state updates and side effects.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

mod history;

pub use history::{HistoryAverage, HistoryItem, HistoryPage, HistoryQuery};

/// One extracted representative color as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Hex code such as `#ff0000`
    pub hex: String,
    /// Red, green and blue channels in server order
    pub rgb: [u8; 3],
    /// Hue-opposite color computed server-side
    pub complement_hex: String,
}

/// Single color summarizing the whole image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageColor {
    pub hex: String,
}

/// Success payload of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteResult {
    /// Entries in the order the server ranked them
    pub palette: Vec<PaletteEntry>,
    pub average: AverageColor,
    /// Rendered palette image; absent when the server did not produce one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png_url: Option<String>,
    /// Raw JSON export, always present on success
    pub json_url: String,
    /// Server-side record id, when the server persists results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl PaletteResult {
    /// The PNG download URL, ignoring empty strings.
    pub fn png_download(&self) -> Option<&str> {
        self.png_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// Parsed reply of the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadReply {
    /// The server reported a semantic problem through a non-empty `error` field.
    Rejected(String),
    /// The server returned a palette.
    Palette(PaletteResult),
}

/// The image chosen by the user, held for one submission only.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Which server artifact a download refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadKind {
    Png,
    Json,
}

impl DownloadKind {
    pub fn label(self) -> &'static str {
        match self {
            DownloadKind::Png => "Download PNG",
            DownloadKind::Json => "Download JSON",
        }
    }
}

/// Transport-level outcome of one upload. `Err` carries the failure message,
/// which may be empty when the underlying error had no text.
pub type UploadOutcome = Result<UploadReply, String>;

/// Result of an asynchronous or immediate command execution.
#[derive(Debug, Clone)]
pub enum ExecOutcome {
    /// An upload finished; `request_id` identifies which selection issued it.
    Upload { request_id: u64, outcome: UploadOutcome },
    /// A clipboard write finished.
    Clipboard { hex: String, result: Result<(), String> },
    /// A download finished; `Ok` holds the written file path.
    Download {
        kind: DownloadKind,
        url: String,
        result: Result<PathBuf, String>,
    },
}

/// Messages that can be sent to update the application state.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (pulse animation, throbber)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// The user picked a file (or an empty selection)
    FileSelected(Option<PathBuf>),
    /// Background execution completed with outcome
    ExecCompleted(Box<ExecOutcome>),
    /// Close the blocking notification
    DismissNotification,
}

/// Side effects that can be triggered by state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit the selected file to the upload endpoint.
    UploadRequested {
        request_id: u64,
        file: SelectedFile,
        top_n: Option<u32>,
    },
    /// Copy a hex code to the system clipboard.
    CopyToClipboardRequested(String),
    /// Fetch a server artifact into the download directory.
    DownloadRequested(DownloadKind, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_result_deserializes_without_png() {
        let json = r##"{
            "palette": [{"hex": "#ff0000", "rgb": [255, 0, 0], "complement_hex": "#00ffff"}],
            "average": {"hex": "#808080"},
            "json_url": "/dl/1.json"
        }"##;

        let result: PaletteResult = serde_json::from_str(json).expect("deserialize PaletteResult");
        assert_eq!(result.palette.len(), 1);
        assert_eq!(result.palette[0].rgb, [255, 0, 0]);
        assert_eq!(result.palette[0].complement_hex, "#00ffff");
        assert_eq!(result.average.hex, "#808080");
        assert!(result.png_url.is_none());
        assert!(result.png_download().is_none());
        assert_eq!(result.json_url, "/dl/1.json");
    }

    #[test]
    fn palette_result_rejects_short_rgb() {
        let json = r##"{
            "palette": [{"hex": "#ff0000", "rgb": [255, 0], "complement_hex": "#00ffff"}],
            "average": {"hex": "#808080"},
            "json_url": "/dl/1.json"
        }"##;

        assert!(serde_json::from_str::<PaletteResult>(json).is_err());
    }

    #[test]
    fn empty_png_url_counts_as_absent() {
        let json = r##"{"palette": [], "average": {"hex": "#000000"}, "png_url": "", "json_url": "/a.json"}"##;
        let result: PaletteResult = serde_json::from_str(json).expect("deserialize PaletteResult");
        assert!(result.png_download().is_none());
    }

    #[test]
    fn selected_file_debug_hides_bytes() {
        let file = SelectedFile {
            file_name: "photo.jpg".into(),
            mime_type: "image/jpeg".into(),
            bytes: vec![0; 4096],
        };
        let rendered = format!("{:?}", file);
        assert!(rendered.contains("photo.jpg"));
        assert!(rendered.contains("4096"));
        assert!(!rendered.contains("[0, 0"));
    }
}
