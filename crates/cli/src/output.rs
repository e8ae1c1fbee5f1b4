//! Plain-terminal rendering for the one-shot subcommands.

use swatchbox_types::{HistoryItem, PaletteResult};
use swatchbox_tui::view;
use swatchbox_util::{date_handling::format_created_at, hex_to_rgb, readable_text_rgb};

const RESET: &str = "\x1b[0m";

/// ` #rrggbb ` on a truecolor background with a readable foreground.
pub fn color_block(hex: &str, rgb: [u8; 3]) -> String {
    let [r, g, b] = rgb;
    let [fr, fg, fb] = readable_text_rgb(rgb);
    format!("\x1b[48;2;{r};{g};{b}m\x1b[38;2;{fr};{fg};{fb}m {hex} {RESET}")
}

/// Every palette entry as a block with its metadata, then the average and
/// the download links, one item per line.
pub fn palette_lines(result: &PaletteResult, resolve: impl Fn(&str) -> String) -> Vec<String> {
    let mut lines: Vec<String> = view::palette_blocks(result, None, None)
        .iter()
        .zip(&result.palette)
        .map(|(block, entry)| {
            format!(
                "{}  RGB: {}, {}, {}  HEX: {}  Comp: {}",
                color_block(&block.hex, block.background),
                entry.rgb[0],
                entry.rgb[1],
                entry.rgb[2],
                entry.hex,
                entry.complement_hex
            )
        })
        .collect();

    let extras = view::extras_panel(result);
    lines.push(String::new());
    lines.push(format!(
        "Average  {}",
        color_block(&extras.average_hex, extras.average_background)
    ));
    for link in &extras.downloads {
        lines.push(format!("{:<14} {}", link.label, resolve(&link.url)));
    }
    lines
}

/// One history row: id, timestamp, average swatch and file name.
pub fn history_line(item: &HistoryItem) -> String {
    let average = match item.average.as_ref() {
        Some(average) => {
            let rgb = hex_to_rgb(&average.hex).unwrap_or(average.rgb);
            color_block(&average.hex, rgb)
        }
        None => " -       ".to_string(),
    };
    format!(
        "{:>6}  {:<18}  {}  {}",
        item.id,
        format_created_at(&item.created_at),
        average,
        item.filename
    )
}

#[cfg(test)]
mod tests {
    use swatchbox_types::{AverageColor, HistoryAverage, PaletteEntry};

    use super::*;

    fn result(png_url: Option<&str>) -> PaletteResult {
        PaletteResult {
            palette: vec![PaletteEntry {
                hex: "#ff0000".into(),
                rgb: [255, 0, 0],
                complement_hex: "#00ffff".into(),
            }],
            average: AverageColor { hex: "#808080".into() },
            png_url: png_url.map(str::to_string),
            json_url: "/dl/1.json".into(),
            id: None,
            filename: None,
        }
    }

    #[test]
    fn color_block_uses_truecolor_escape() {
        assert_eq!(
            color_block("#ff0000", [255, 0, 0]),
            "\x1b[48;2;255;0;0m\x1b[38;2;255;255;255m #ff0000 \x1b[0m"
        );
    }

    #[test]
    fn palette_lines_list_entries_average_and_links() {
        let lines = palette_lines(&result(None), |url| format!("http://h{}", url));
        assert!(lines[0].contains("RGB: 255, 0, 0  HEX: #ff0000  Comp: #00ffff"));
        assert!(lines[2].starts_with("Average"));
        assert!(lines[2].contains("#808080"));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "Download JSON  http://h/dl/1.json");

        let with_png = palette_lines(&result(Some("/dl/1.png")), str::to_string);
        assert_eq!(with_png[3], "Download PNG   /dl/1.png");
        assert_eq!(with_png[4], "Download JSON  /dl/1.json");
    }

    #[test]
    fn history_line_formats_timestamp_and_missing_average() {
        let mut item = HistoryItem {
            id: 42,
            filename: "beach.png".into(),
            created_at: "2025-01-02 10:11:12".into(),
            average: None,
            json_url: "/dl/42.json".into(),
            png_url: None,
        };
        let line = history_line(&item);
        assert!(line.starts_with("    42  Jan 02, 2025 10:11"));
        assert!(line.ends_with("beach.png"));

        item.average = Some(HistoryAverage {
            rgb: [0, 0, 255],
            hex: "#0000ff".into(),
        });
        assert!(history_line(&item).contains("\x1b[48;2;0;0;255m"));
    }
}
