//! # Color Helpers
//!
//! Conversions between hex codes and RGB triples, plus the small amount of
//! color logic the client needs for labels and history filters.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static HEX_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex pattern is valid"));

/// Error surfaced when a string is not a 3- or 6-digit hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color '{0}'; expected #rgb or #rrggbb")]
pub struct ColorParseError(pub String);

/// Parse `#rgb` or `#rrggbb` (leading `#` optional) into an RGB triple.
///
/// # Example
/// ```rust
/// use swatchbox_util::color::hex_to_rgb;
///
/// assert_eq!(hex_to_rgb("#ff8000").unwrap(), [255, 128, 0]);
/// assert_eq!(hex_to_rgb("0f0").unwrap(), [0, 255, 0]);
/// assert!(hex_to_rgb("#12").is_err());
/// ```
pub fn hex_to_rgb(hex: &str) -> Result<[u8; 3], ColorParseError> {
    let trimmed = hex.trim();
    let captures = HEX_PATTERN
        .captures(trimmed)
        .ok_or_else(|| ColorParseError(trimmed.to_string()))?;
    let digits = &captures[1];

    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };

    let mut rgb = [0u8; 3];
    for (index, channel) in rgb.iter_mut().enumerate() {
        let start = index * 2;
        *channel =
            u8::from_str_radix(&expanded[start..start + 2], 16).map_err(|_| ColorParseError(trimmed.to_string()))?;
    }
    Ok(rgb)
}

/// Format an RGB triple as lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Black or white, whichever reads better on `background`.
///
/// Uses the Rec. 601 luma weights; anything brighter than mid-grey gets
/// black text.
pub fn readable_text_rgb(background: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = background;
    let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luma > 140.0 { [0, 0, 0] } else { [255, 255, 255] }
}

/// Canonical `#rrggbb` form of a history color filter, or `None` when the
/// filter should not be sent. Pure black is the color picker's initial value
/// and means "no filter".
///
/// # Example
/// ```rust
/// use swatchbox_util::color::normalize_color_filter;
///
/// assert_eq!(normalize_color_filter("#F00").as_deref(), Some("#ff0000"));
/// assert_eq!(normalize_color_filter("#000000"), None);
/// ```
pub fn normalize_color_filter(hex: &str) -> Option<String> {
    hex_to_rgb(hex)
        .ok()
        .filter(|rgb| *rgb != [0, 0, 0])
        .map(rgb_to_hex)
}
