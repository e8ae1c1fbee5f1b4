//! Keyboard and mouse routing.
//!
//! Translates crossterm events into `App` calls and collects the resulting
//! effects. While a notification is open it swallows every other input.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use swatchbox_types::{DownloadKind, Effect, Msg};

use crate::app::{App, Focus};

/// Longest accepted top-N entry.
const MAX_TOP_N_DIGITS: usize = 3;

/// Keys that end the session regardless of focus.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    if key.kind != KeyEventKind::Press {
        return Vec::new();
    }

    if app.notification.is_some() {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => app.update(Msg::DismissNotification),
            _ => Vec::new(),
        };
    }

    match key.code {
        KeyCode::Tab => {
            app.focus = app.focus.next();
            return Vec::new();
        }
        KeyCode::BackTab => {
            app.focus = app.focus.previous();
            return Vec::new();
        }
        _ => {}
    }

    match app.focus {
        Focus::PathInput => handle_path_key(app, key),
        Focus::TopNInput => handle_top_n_key(app, key),
        Focus::Palette => handle_palette_key(app, key),
        Focus::Downloads => handle_downloads_key(app, key),
    }
}

fn handle_path_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    match key.code {
        KeyCode::Enter => app.submit_path(),
        KeyCode::Backspace => {
            app.path_input.pop();
            Vec::new()
        }
        KeyCode::Esc => {
            app.path_input.clear();
            Vec::new()
        }
        KeyCode::Char(character) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.path_input.push(character);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn handle_top_n_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    match key.code {
        KeyCode::Enter => app.submit_path(),
        KeyCode::Backspace => {
            app.top_n_input.pop();
            Vec::new()
        }
        KeyCode::Char(digit) if digit.is_ascii_digit() && app.top_n_input.len() < MAX_TOP_N_DIGITS => {
            app.top_n_input.push(digit);
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn handle_palette_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let columns = app.hit_areas.columns.max(1) as isize;
    match key.code {
        KeyCode::Left => app.move_selection(-1),
        KeyCode::Right => app.move_selection(1),
        KeyCode::Up => app.move_selection(-columns),
        KeyCode::Down => app.move_selection(columns),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('c') => return app.activate_selected(),
        KeyCode::Char('p') => return app.request_download(DownloadKind::Png),
        KeyCode::Char('j') => return app.request_download(DownloadKind::Json),
        _ => {}
    }
    app.hovered = None;
    Vec::new()
}

fn handle_downloads_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    match key.code {
        KeyCode::Left => app.move_download_selection(-1),
        KeyCode::Right => app.move_download_selection(1),
        KeyCode::Enter | KeyCode::Char(' ') => return app.download_selected(),
        _ => {}
    }
    Vec::new()
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
    if app.notification.is_some() {
        if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return app.update(Msg::DismissNotification);
        }
        return Vec::new();
    }

    match mouse.kind {
        MouseEventKind::Moved => {
            app.hovered = app.hit_areas.block_at(mouse.column, mouse.row);
            Vec::new()
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = app.hit_areas.block_at(mouse.column, mouse.row) {
                app.focus = Focus::Palette;
                return app.activate_block(index);
            }
            if let Some(kind) = app.hit_areas.download_at(mouse.column, mouse.row) {
                app.focus = Focus::Downloads;
                return app.request_download(kind);
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}
