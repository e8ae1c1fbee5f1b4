use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(
            t,
            theme.text_secondary_style().add_modifier(Modifier::BOLD),
        ));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Style for input fields; caller sets the block border based on focus.
pub fn input_style<T: Theme + ?Sized>(theme: &T, focused: bool) -> Style {
    let mut style = panel_style(theme);
    if focused {
        style = style.add_modifier(Modifier::BOLD);
    }
    style
}

/// Fill style for a colour swatch with a readable label colour.
pub fn swatch_style(background: [u8; 3], foreground: [u8; 3]) -> Style {
    let [br, bg, bb] = background;
    let [fr, fg, fb] = foreground;
    Style::default()
        .bg(Color::Rgb(br, bg, bb))
        .fg(Color::Rgb(fr, fg, fb))
        .add_modifier(Modifier::BOLD)
}

/// Secondary button style (outline-like, rely on border color in Block).
pub fn button_secondary_style<T: Theme + ?Sized>(theme: &T, selected: bool) -> Style {
    let style = Style::default().fg(theme.roles().accent_secondary);
    if selected {
        return style.bg(theme.roles().selection_bg).add_modifier(Modifier::BOLD);
    }
    style
}

/// Renders a standard bordered button.
pub fn render_button<T: Theme + ?Sized>(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    is_focused: bool,
    is_selected: bool,
    theme: &T,
) {
    frame.render_widget(
        Paragraph::new(label.to_string())
            .centered()
            .block(
                Block::bordered()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(is_focused && is_selected)),
            )
            .style(button_secondary_style(theme, is_focused && is_selected)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::DraculaTheme;
    use crate::ui::theme::dracula::{BG, CURRENT_LINE, FOREGROUND};

    #[test]
    fn focused_input_is_bold_on_the_panel_surface() {
        let theme = DraculaTheme::new();
        let idle = input_style(&theme, false);
        assert_eq!(idle, Style::default().bg(BG).fg(FOREGROUND));
        assert!(input_style(&theme, true).add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn only_the_selected_button_is_highlighted() {
        let theme = DraculaTheme::new();
        assert_eq!(button_secondary_style(&theme, false).bg, None);
        let selected = button_secondary_style(&theme, true);
        assert_eq!(selected.bg, Some(CURRENT_LINE));
        assert!(selected.add_modifier.contains(Modifier::BOLD));
    }
}
