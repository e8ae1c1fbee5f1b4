//! Path helpers: `~` expansion and the default locations Swatchbox writes to.

use std::env;
use std::path::PathBuf;

use dirs_next::{data_local_dir, download_dir, home_dir};
use url::Url;

/// Environment variable overriding where the TUI writes its tracing log.
pub const LOG_PATH_ENV: &str = "SWATCHBOX_LOG_PATH";

/// Expand a leading `~` (Unix or Windows separator) to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(trimmed),
    }
}

/// Directory downloads land in when no preference or flag says otherwise.
pub fn default_download_dir() -> PathBuf {
    download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Tracing log file used while the TUI owns the terminal.
pub fn default_log_path() -> PathBuf {
    if let Ok(path) = env::var(LOG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("swatchbox")
        .join("swatchbox.log")
}

/// Last non-empty path segment of an absolute or server-relative URL.
///
/// # Example
/// ```rust
/// use swatchbox_util::download_file_name;
///
/// assert_eq!(download_file_name("/static/downloads/palette_7.png").as_deref(), Some("palette_7.png"));
/// assert_eq!(download_file_name("http://host/dl/1.json?x=1").as_deref(), Some("1.json"));
/// assert_eq!(download_file_name("/").as_deref(), None);
/// ```
pub fn download_file_name(url: &str) -> Option<String> {
    let base = Url::parse("http://localhost/").ok()?;
    let resolved = base.join(url.trim()).ok()?;
    resolved
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/palettes"), home.join("palettes"));
        }
        assert_eq!(expand_tilde(" /abs/path "), PathBuf::from("/abs/path"));
    }

    #[test]
    fn log_path_honors_env_override() {
        temp_env::with_var(LOG_PATH_ENV, Some("/tmp/swatchbox.log"), || {
            assert_eq!(default_log_path(), PathBuf::from("/tmp/swatchbox.log"));
        });
    }

    #[test]
    fn file_name_ignores_trailing_slash() {
        assert_eq!(download_file_name("/dl/archive/").as_deref(), Some("archive"));
    }
}
