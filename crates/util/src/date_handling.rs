//! # Date Handling Utilities
//!
//! Formatting for the timestamps the palette server stores with history rows.

use chrono::NaiveDateTime;

/// Timestamp layout used by the server's history records.
pub const SERVER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a server timestamp as e.g. `Jan 02, 2025 10:11`.
///
/// Unparseable input is returned unchanged so callers can always display
/// something.
///
/// # Example
/// ```rust
/// use swatchbox_util::date_handling::format_created_at;
///
/// assert_eq!(format_created_at("2025-01-02 10:11:12"), "Jan 02, 2025 10:11");
/// assert_eq!(format_created_at("yesterday"), "yesterday");
/// ```
pub fn format_created_at(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw.trim(), SERVER_TIMESTAMP_FORMAT) {
        Ok(timestamp) => timestamp.format("%b %d, %Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}
