//! Types for the palette history endpoints.

use serde::{Deserialize, Serialize};

/// Average color as stored in history rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryAverage {
    pub rgb: [u8; 3],
    pub hex: String,
}

/// One previously extracted palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: i64,
    pub filename: String,
    /// Server timestamp, `%Y-%m-%d %H:%M:%S`
    pub created_at: String,
    #[serde(default)]
    pub average: Option<HistoryAverage>,
    pub json_url: String,
    #[serde(default)]
    pub png_url: Option<String>,
}

/// Body of `GET /api/palettes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub palettes: Vec<HistoryItem>,
}

/// Filters for the history listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Case-insensitive filename substring
    pub search: Option<String>,
    /// Hex color a palette must contain (within a distance threshold)
    pub color: Option<String>,
}

impl HistoryQuery {
    /// Query pairs for the request, skipping blank values.
    pub fn as_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(color) = self.color.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("color", color.to_string()));
        }
        pairs
    }
}
