//! Error types for palette server access.

use thiserror::Error;

/// Transport-level failures talking to the palette server.
///
/// A server that answers with a well-formed `{ "error": ... }` body is not
/// an error at this level; see [`swatchbox_types::UploadReply::Rejected`].
#[derive(Debug, Error)]
pub enum PaletteApiError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned invalid JSON (HTTP {status}): {source}")]
    InvalidJson {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("cannot derive a file name from '{0}'")]
    NoFileName(String),

    #[error("download I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PaletteApiError {
    /// Build an invalid base URL error.
    pub fn invalid_base_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
