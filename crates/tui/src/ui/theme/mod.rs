//! Theme styling module for the TUI UI layer.
//!
//! Two palettes are available (Dracula, the default, and Nord), selected by
//! `SWATCHBOX_THEME`. Prefer the helpers in [`theme_helpers`] over
//! hard-coding colors.

use std::env;

use tracing::debug;

pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::Theme;

/// Environment variable naming the palette to use.
pub const THEME_ENV: &str = "SWATCHBOX_THEME";

/// Pick a theme from `SWATCHBOX_THEME`, falling back to Dracula.
pub fn load_from_env() -> Box<dyn Theme> {
    let requested = env::var(THEME_ENV).unwrap_or_default();
    resolve(requested.trim())
}

fn resolve(name: &str) -> Box<dyn Theme> {
    match name.to_ascii_lowercase().as_str() {
        "nord" => Box::new(NordTheme::new()),
        "" | "dracula" => Box::new(DraculaTheme::new()),
        other => {
            debug!(theme = other, "unknown theme requested; using dracula");
            Box::new(DraculaTheme::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_dracula() {
        assert_eq!(resolve("NORD").roles().focus, nord::F1);
        assert_eq!(resolve("solarized").roles().focus, dracula::CYAN);
        assert_eq!(resolve("").roles().focus, dracula::CYAN);
    }
}
