//! Drawing of the whole screen from [`App`] state.
//!
//! Apart from recording hit areas for the mouse, rendering never mutates
//! state; everything shown comes from `App` and the view models in
//! [`crate::view`].

use ratatui::{
    prelude::*,
    widgets::{Clear, Paragraph, Wrap},
};
use swatchbox_util::{hex_to_rgb, readable_text_rgb};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, Focus, HitAreas};
use crate::preview::{ImagePreview, Thumbnail};
use crate::ui::layout::{self, MainLayout};
use crate::ui::theme::{
    Theme,
    theme_helpers::{block, input_style, panel_style, render_button, swatch_style},
};

const THROBBER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const BUTTON_WIDTH: u16 = 19;

pub fn draw(frame: &mut Frame, app: &mut App, theme: &dyn Theme) {
    let area = frame.area();
    frame.render_widget(Paragraph::new("").style(panel_style(theme)), area);

    let layout = MainLayout::responsive(area);
    let mut hit_areas = HitAreas::default();

    draw_title(frame, layout.title, app, theme);
    draw_inputs(frame, layout.inputs, app, theme);
    draw_preview(frame, layout.preview, app.preview.as_ref(), theme);
    draw_palette(frame, layout.palette, app, theme, &mut hit_areas);
    draw_inspector(frame, layout.inspector, app, theme);
    draw_extras(frame, layout.extras, app, theme, &mut hit_areas);
    draw_status(frame, layout.status, app, theme);
    draw_hints(frame, layout.hints, app, theme);

    app.hit_areas = hit_areas;

    if let Some(notification) = app.notification.as_ref() {
        draw_notification(frame, area, &notification.message, theme);
    }
}

fn draw_title(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let mut spans = vec![
        Span::styled("Swatchbox", theme.accent_emphasis_style()),
        Span::styled(format!("  {}", app.server_label), theme.text_muted_style()),
    ];
    let in_flight = app.requests.in_flight();
    if in_flight > 0 {
        let frame_symbol = THROBBER[app.throbber_idx % THROBBER.len()];
        spans.push(Span::styled(
            format!("  {} uploading ({})", frame_symbol, in_flight),
            theme.status_info(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_inputs(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let columns = Layout::horizontal([Constraint::Min(20), Constraint::Length(20)]).split(area);

    let path_focused = app.focus == Focus::PathInput;
    // Keep the end of long paths visible: borders plus the cursor take three cells.
    let visible = tail_fitting(&app.path_input, columns[0].width.saturating_sub(3) as usize);
    let path_text = input_line(visible, path_focused, "path to an image, Enter to upload", theme);
    frame.render_widget(
        Paragraph::new(path_text)
            .style(input_style(theme, path_focused))
            .block(block(theme, Some("Image"), path_focused)),
        columns[0],
    );

    let top_n_focused = app.focus == Focus::TopNInput;
    let placeholder = match app.default_top_n {
        Some(count) => format!("default {}", count),
        None => "server default".to_string(),
    };
    let top_n_text = input_line(&app.top_n_input, top_n_focused, &placeholder, theme);
    frame.render_widget(
        Paragraph::new(top_n_text)
            .style(input_style(theme, top_n_focused))
            .block(block(theme, Some("Top N"), top_n_focused)),
        columns[1],
    );
}

fn input_line<'a>(value: &'a str, focused: bool, placeholder: &str, theme: &dyn Theme) -> Line<'a> {
    if value.is_empty() && !focused {
        return Line::from(Span::styled(placeholder.to_string(), theme.text_muted_style()));
    }
    let mut spans = vec![Span::raw(value)];
    if focused {
        spans.push(Span::styled("▏", theme.accent_primary_style()));
    }
    Line::from(spans)
}

/// The longest suffix of `value` whose display width fits in `max_width` cells.
fn tail_fitting(value: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (offset, character) in value.char_indices().rev() {
        width += character.width().unwrap_or(0);
        if width > max_width {
            return &value[offset + character.len_utf8()..];
        }
    }
    value
}

fn draw_preview(frame: &mut Frame, area: Rect, preview: Option<&ImagePreview>, theme: &dyn Theme) {
    let title = preview.map(ImagePreview::summary).unwrap_or_else(|| "Preview".to_string());
    let container = block(theme, Some(&title), false);
    let inner = container.inner(area);
    frame.render_widget(container, area);

    let Some(preview) = preview else {
        frame.render_widget(
            Paragraph::new("Select an image to preview it").style(theme.text_muted_style()),
            inner,
        );
        return;
    };
    match preview.thumbnail.as_ref() {
        Some(thumbnail) => frame.render_widget(Paragraph::new(thumbnail_lines(thumbnail, inner)), inner),
        None => frame.render_widget(
            Paragraph::new(format!("No preview for {}", preview.mime_type)).style(theme.text_muted_style()),
            inner,
        ),
    }
}

/// Half-block rendering: each cell shows two vertically stacked pixels,
/// scaled to fit `area` while keeping the aspect ratio.
fn thumbnail_lines(thumbnail: &Thumbnail, area: Rect) -> Vec<Line<'static>> {
    if thumbnail.width == 0 || thumbnail.height == 0 || area.width == 0 || area.height == 0 {
        return Vec::new();
    }
    let max_columns = u32::from(area.width);
    let max_pixel_rows = u32::from(area.height) * 2;
    let scale = f64::min(
        max_columns as f64 / thumbnail.width as f64,
        max_pixel_rows as f64 / thumbnail.height as f64,
    );
    let columns = ((thumbnail.width as f64 * scale).floor() as u32).max(1);
    let pixel_rows = ((thumbnail.height as f64 * scale).floor() as u32).max(2);

    (0..pixel_rows / 2)
        .map(|cell_row| {
            let spans: Vec<Span<'static>> = (0..columns)
                .map(|column| {
                    let top = thumbnail.sample(column, cell_row * 2, columns, pixel_rows);
                    let bottom = thumbnail.sample(column, cell_row * 2 + 1, columns, pixel_rows);
                    let mut style = Style::default();
                    if let Some([r, g, b]) = top {
                        style = style.fg(Color::Rgb(r, g, b));
                    }
                    if let Some([r, g, b]) = bottom {
                        style = style.bg(Color::Rgb(r, g, b));
                    }
                    Span::styled("▀", style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn draw_palette(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme, hit_areas: &mut HitAreas) {
    let focused = app.focus == Focus::Palette;
    let blocks = app.blocks();
    let title = if blocks.is_empty() {
        "Palette".to_string()
    } else {
        format!("Palette ({})", blocks.len())
    };
    let container = block(theme, Some(&title), focused);
    let inner = container.inner(area);
    frame.render_widget(container, area);

    if blocks.is_empty() {
        frame.render_widget(
            Paragraph::new("No palette yet. Upload an image to extract one.").style(theme.text_muted_style()),
            inner,
        );
        return;
    }

    hit_areas.columns = layout::grid_columns(inner);
    let focus_index = app.result.as_ref().map(|view| view.selected).unwrap_or(0);
    for (index, rect) in layout::palette_grid(inner, blocks.len(), focus_index) {
        let view = &blocks[index];
        hit_areas.blocks.push((index, rect));

        // A pulsing block shrinks by one column on each side.
        let drawn = if view.pulsing && rect.width > 4 {
            Rect::new(rect.x + 1, rect.y, rect.width - 2, rect.height)
        } else {
            rect
        };
        let mut style = swatch_style(view.background, view.foreground);
        let label = if view.selected {
            style = style.add_modifier(Modifier::UNDERLINED);
            format!("›{}‹", view.hex)
        } else {
            view.hex.clone()
        };
        let lines = vec![Line::from(""), Line::from(label)];
        frame.render_widget(Paragraph::new(lines).centered().style(style), drawn);
    }
}

fn draw_inspector(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let container = block(theme, Some("Details"), false);
    let inner = container.inner(area);
    frame.render_widget(container, area);

    let line = match app.inspected_tooltip() {
        Some((hex, tooltip)) => {
            let swatch = hex_to_rgb(&hex)
                .map(|rgb| swatch_style(rgb, readable_text_rgb(rgb)))
                .unwrap_or_else(|_| theme.text_muted_style());
            Line::from(vec![
                Span::styled("    ", swatch),
                Span::raw(" "),
                Span::styled(hex, theme.text_primary_style().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(tooltip, theme.text_secondary_style()),
            ])
        }
        None => Line::from(Span::styled("Hover or select a color to inspect it", theme.text_muted_style())),
    };
    frame.render_widget(Paragraph::new(line), inner);
}

fn draw_extras(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme, hit_areas: &mut HitAreas) {
    let focused = app.focus == Focus::Downloads;
    let container = block(theme, Some("Average"), focused);
    let inner = container.inner(area);
    frame.render_widget(container, area);

    let Some(extras) = app.extras() else {
        frame.render_widget(
            Paragraph::new("Average color and downloads appear here").style(theme.text_muted_style()),
            inner,
        );
        return;
    };

    let rows = Layout::vertical([Constraint::Length(3), Constraint::Length(3)]).split(inner);
    let swatch = Paragraph::new(vec![Line::from(""), Line::from(extras.average_hex.clone())])
        .centered()
        .style(swatch_style(extras.average_background, extras.average_foreground));
    frame.render_widget(swatch, rows[0]);

    let selected_download = app.result.as_ref().map(|view| view.selected_download).unwrap_or(0);
    let constraints: Vec<Constraint> = extras
        .downloads
        .iter()
        .map(|_| Constraint::Length(BUTTON_WIDTH))
        .collect();
    let buttons = Layout::horizontal(constraints).spacing(1).split(rows[1]);
    for (position, (link, rect)) in extras.downloads.iter().zip(buttons.iter()).enumerate() {
        render_button(frame, *rect, link.label, focused, position == selected_download, theme);
        hit_areas.downloads.push((link.kind, *rect));
    }
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let text = app.status.latest().unwrap_or("Ready");
    frame.render_widget(Paragraph::new(text.to_string()).style(theme.text_muted_style()), area);
}

fn draw_hints(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let key = theme.accent_primary_style().add_modifier(Modifier::BOLD);
    let label = theme.text_muted_style();
    let mut spans = vec![Span::styled("Tab", key), Span::styled(" focus  ", label)];
    match app.focus {
        Focus::PathInput | Focus::TopNInput => {
            spans.push(Span::styled("Enter", key));
            spans.push(Span::styled(" upload  ", label));
        }
        Focus::Palette => {
            spans.push(Span::styled("←/→/↑/↓", key));
            spans.push(Span::styled(" select  ", label));
            spans.push(Span::styled("Enter", key));
            spans.push(Span::styled(" copy hex  ", label));
            spans.push(Span::styled("p/j", key));
            spans.push(Span::styled(" download PNG/JSON  ", label));
        }
        Focus::Downloads => {
            spans.push(Span::styled("←/→", key));
            spans.push(Span::styled(" choose  ", label));
            spans.push(Span::styled("Enter", key));
            spans.push(Span::styled(" download  ", label));
        }
    }
    spans.push(Span::styled("Ctrl-C", key));
    spans.push(Span::styled(" quit", label));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_notification(frame: &mut Frame, area: Rect, message: &str, theme: &dyn Theme) {
    frame.render_widget(Paragraph::new("").style(theme.modal_background_style()), area);

    let popup = layout::centered_rect(60, 7, area);
    frame.render_widget(Clear, popup);
    let container = block(theme, Some("Upload"), true).border_style(theme.status_error());
    let text = vec![
        Line::from(Span::styled(message.to_string(), theme.text_primary_style())),
        Line::from(""),
        Line::from(Span::styled("Enter or Esc to dismiss", theme.text_muted_style())),
    ];
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: true }).block(container),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use swatchbox_types::{AverageColor, ExecOutcome, Msg, PaletteEntry, PaletteResult, UploadReply};

    use super::*;
    use crate::ui::theme::DraculaTheme;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app_with_result(png_url: Option<&str>) -> App {
        let mut app = App::new(None, "http://127.0.0.1:5000");
        let request_id = app.requests.issue();
        let result = PaletteResult {
            palette: vec![
                PaletteEntry {
                    hex: "#ff0000".into(),
                    rgb: [255, 0, 0],
                    complement_hex: "#00ffff".into(),
                },
                PaletteEntry {
                    hex: "#00ff00".into(),
                    rgb: [0, 255, 0],
                    complement_hex: "#ff00ff".into(),
                },
            ],
            average: AverageColor { hex: "#808080".into() },
            png_url: png_url.map(str::to_string),
            json_url: "/dl/1.json".into(),
            id: None,
            filename: None,
        };
        app.update(Msg::ExecCompleted(Box::new(ExecOutcome::Upload {
            request_id,
            outcome: Ok(UploadReply::Palette(result)),
        })));
        app
    }

    #[test]
    fn long_paths_keep_their_tail() {
        assert_eq!(tail_fitting("/home/user/photo.jpg", 9), "photo.jpg");
        assert_eq!(tail_fitting("short", 10), "short");
        assert_eq!(tail_fitting("/写真/猫.png", 6), "猫.png");
    }

    #[test]
    fn renders_palette_average_and_json_action() {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        let mut app = app_with_result(None);
        let theme = DraculaTheme::new();
        terminal.draw(|frame| draw(frame, &mut app, &theme)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("#ff0000"));
        assert!(text.contains("#00ff00"));
        assert!(text.contains("#808080"));
        assert!(text.contains("Download JSON"));
        assert!(!text.contains("Download PNG"));
        assert!(text.contains("RGB: 255, 0, 0 • Comp: #00ffff"));
        assert_eq!(app.hit_areas.blocks.len(), 2);
        assert_eq!(app.hit_areas.downloads.len(), 1);
    }

    #[test]
    fn wide_layout_shows_png_action_and_swatch_colors() {
        let mut terminal = Terminal::new(TestBackend::new(140, 32)).unwrap();
        let mut app = app_with_result(Some("/dl/1.png"));
        let theme = DraculaTheme::new();
        terminal.draw(|frame| draw(frame, &mut app, &theme)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Download PNG"));
        assert_eq!(app.hit_areas.downloads.len(), 2);

        let (_, first_block) = app.hit_areas.blocks[0];
        let cell = &terminal.backend().buffer()[(first_block.x, first_block.y)];
        assert_eq!(cell.bg, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn notification_overlays_the_screen() {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        let mut app = app_with_result(None);
        let request_id = app.requests.issue();
        app.update(Msg::ExecCompleted(Box::new(ExecOutcome::Upload {
            request_id,
            outcome: Ok(UploadReply::Rejected("unsupported format".into())),
        })));
        let theme = DraculaTheme::new();
        terminal.draw(|frame| draw(frame, &mut app, &theme)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("unsupported format"));
        assert!(text.contains("Enter or Esc to dismiss"));
    }
}
