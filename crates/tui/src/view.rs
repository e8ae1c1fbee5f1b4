//! Pure view models derived from a [`PaletteResult`].
//!
//! Rendering code only draws what these functions return, so the rules for
//! labels, tooltips, swatch colours and download actions are testable
//! without a terminal.

use swatchbox_types::{DownloadKind, PaletteEntry, PaletteResult};
use swatchbox_util::{hex_to_rgb, readable_text_rgb};

/// Neutral fill for an average hex the client cannot parse.
const UNPARSEABLE_SWATCH: [u8; 3] = [0, 0, 0];

/// One block of the palette grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBlockView {
    pub index: usize,
    /// Hex code exactly as received; this is what gets copied
    pub hex: String,
    pub tooltip: String,
    pub background: [u8; 3],
    pub foreground: [u8; 3],
    pub selected: bool,
    pub pulsing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub kind: DownloadKind,
    pub label: &'static str,
    pub url: String,
}

/// Average swatch plus download actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrasView {
    pub average_hex: String,
    pub average_background: [u8; 3],
    pub average_foreground: [u8; 3],
    pub downloads: Vec<DownloadLink>,
}

/// Inspectable metadata for one entry, e.g. `RGB: 255, 0, 0 • Comp: #00ffff`.
pub fn tooltip(entry: &PaletteEntry) -> String {
    let [r, g, b] = entry.rgb;
    format!("RGB: {}, {}, {} • Comp: {}", r, g, b, entry.complement_hex)
}

/// One block per entry, in server order.
pub fn palette_blocks(result: &PaletteResult, selected: Option<usize>, pulsing: Option<usize>) -> Vec<ColorBlockView> {
    result
        .palette
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            // The hex code is the displayed colour; fall back to the channels when it is malformed.
            let background = hex_to_rgb(&entry.hex).unwrap_or(entry.rgb);
            ColorBlockView {
                index,
                hex: entry.hex.clone(),
                tooltip: tooltip(entry),
                background,
                foreground: readable_text_rgb(background),
                selected: selected == Some(index),
                pulsing: pulsing == Some(index),
            }
        })
        .collect()
}

/// The extras region. PNG comes first and only when the server produced one;
/// JSON is always offered.
pub fn extras_panel(result: &PaletteResult) -> ExtrasView {
    let average_background = hex_to_rgb(&result.average.hex).unwrap_or(UNPARSEABLE_SWATCH);

    let mut downloads = Vec::with_capacity(2);
    if let Some(url) = result.png_download() {
        downloads.push(DownloadLink {
            kind: DownloadKind::Png,
            label: DownloadKind::Png.label(),
            url: url.to_string(),
        });
    }
    downloads.push(DownloadLink {
        kind: DownloadKind::Json,
        label: DownloadKind::Json.label(),
        url: result.json_url.clone(),
    });

    ExtrasView {
        average_hex: result.average.hex.clone(),
        average_background,
        average_foreground: readable_text_rgb(average_background),
        downloads,
    }
}

#[cfg(test)]
mod tests {
    use swatchbox_types::AverageColor;

    use super::*;

    fn entry(hex: &str, rgb: [u8; 3], complement: &str) -> PaletteEntry {
        PaletteEntry {
            hex: hex.into(),
            rgb,
            complement_hex: complement.into(),
        }
    }

    fn photo_result() -> PaletteResult {
        PaletteResult {
            palette: vec![entry("#ff0000", [255, 0, 0], "#00ffff")],
            average: AverageColor { hex: "#808080".into() },
            png_url: None,
            json_url: "/dl/1.json".into(),
            id: None,
            filename: None,
        }
    }

    #[test]
    fn single_red_entry_scenario() {
        let result = photo_result();
        let blocks = palette_blocks(&result, None, None);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].hex, "#ff0000");
        assert_eq!(blocks[0].background, [255, 0, 0]);
        assert!(blocks[0].tooltip.contains("RGB: 255, 0, 0"));
        assert!(blocks[0].tooltip.contains("Comp: #00ffff"));

        let extras = extras_panel(&result);
        assert_eq!(extras.average_hex, "#808080");
        assert_eq!(extras.average_background, [0x80, 0x80, 0x80]);
        assert_eq!(extras.downloads.len(), 1);
        assert_eq!(extras.downloads[0].label, "Download JSON");
        assert_eq!(extras.downloads[0].url, "/dl/1.json");
    }

    #[test]
    fn blocks_keep_server_order_and_flags() {
        let mut result = photo_result();
        result.palette = vec![
            entry("#00ff00", [0, 255, 0], "#ff00ff"),
            entry("#0000ff", [0, 0, 255], "#ffff00"),
            entry("#ffffff", [255, 255, 255], "#000000"),
        ];
        let blocks = palette_blocks(&result, Some(1), Some(2));
        let hexes: Vec<&str> = blocks.iter().map(|block| block.hex.as_str()).collect();
        assert_eq!(hexes, vec!["#00ff00", "#0000ff", "#ffffff"]);
        assert!(blocks[1].selected && !blocks[0].selected);
        assert!(blocks[2].pulsing && !blocks[1].pulsing);
        assert_eq!(blocks[2].foreground, [0, 0, 0]);
    }

    #[test]
    fn png_action_present_only_with_url() {
        let mut result = photo_result();
        result.png_url = Some("/dl/1.png".into());
        let extras = extras_panel(&result);
        let png: Vec<&DownloadLink> = extras
            .downloads
            .iter()
            .filter(|link| link.kind == DownloadKind::Png)
            .collect();
        assert_eq!(png.len(), 1);
        assert_eq!(png[0].url, "/dl/1.png");
        assert_eq!(extras.downloads[1].kind, DownloadKind::Json);

        result.png_url = Some(String::new());
        assert_eq!(extras_panel(&result).downloads.len(), 1);
    }

    #[test]
    fn malformed_hex_falls_back_to_channels() {
        let mut result = photo_result();
        result.palette = vec![entry("red", [200, 10, 10], "#00ffff")];
        let blocks = palette_blocks(&result, None, None);
        assert_eq!(blocks[0].background, [200, 10, 10]);
        assert_eq!(blocks[0].hex, "red");
    }
}
