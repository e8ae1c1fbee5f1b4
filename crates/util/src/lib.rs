pub mod color;
pub mod date_handling;
pub mod path_processing;
pub mod preferences;

pub use color::{hex_to_rgb, normalize_color_filter, readable_text_rgb, rgb_to_hex};
pub use path_processing::{default_download_dir, default_log_path, download_file_name, expand_tilde};

use swatchbox_types::HistoryItem;

/// Fallback shown when a transport failure carries no message.
pub const GENERIC_FAILURE_MESSAGE: &str = "unknown error";

/// Build the user-facing text for a failed upload.
///
/// # Example
/// ```rust
/// use swatchbox_util::upload_failure_message;
///
/// assert_eq!(upload_failure_message("connection refused"), "Upload failed: connection refused");
/// assert_eq!(upload_failure_message("  "), "Upload failed: unknown error");
/// ```
pub fn upload_failure_message(detail: &str) -> String {
    let detail = detail.trim();
    let detail = if detail.is_empty() { GENERIC_FAILURE_MESSAGE } else { detail };
    format!("Upload failed: {}", detail)
}

/// Shorten `text` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate_for_summary(text: &str, max_len: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }

    let target_len = max_len.saturating_sub(3);
    let truncated: String = trimmed.chars().take(target_len).collect();
    format!("{}...", truncated.trim_end())
}

/// Keep history rows whose filename contains `search` (case-insensitive).
pub fn filter_history_by_name(items: Vec<HistoryItem>, search: Option<&str>) -> Vec<HistoryItem> {
    let needle = match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(needle) => needle.to_lowercase(),
        None => return items,
    };
    items
        .into_iter()
        .filter(|item| item.filename.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, filename: &str) -> HistoryItem {
        HistoryItem {
            id,
            filename: filename.into(),
            created_at: "2025-01-01 00:00:00".into(),
            average: None,
            json_url: format!("/dl/{id}.json"),
            png_url: None,
        }
    }

    #[test]
    fn truncates_long_text() {
        assert_eq!(truncate_for_summary("short", 10), "short");
        assert_eq!(truncate_for_summary("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn history_filter_is_case_insensitive() {
        let items = vec![item(1, "Beach.PNG"), item(2, "forest.jpg")];
        let kept = filter_history_by_name(items.clone(), Some("beach"));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);
        assert_eq!(filter_history_by_name(items, Some(" ")).len(), 2);
    }
}
