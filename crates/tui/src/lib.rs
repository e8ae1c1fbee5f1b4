//! # Swatchbox TUI
//!
//! Terminal client for the palette-extraction server. The user enters the
//! path of an image; the client previews it locally, uploads it, and renders
//! the returned palette grid together with the average color and download
//! actions.
//!
//! ## Architecture
//!
//! - [`app`]: all screen state and the `update` function that turns
//!   messages into effects
//! - [`view`]: pure view models for the palette grid and extras panel
//! - [`cmd`]: executes effects (uploads, downloads, clipboard writes)
//! - `ui`: layout, drawing, input routing and the event loop

pub mod app;
pub mod clipboard;
pub mod cmd;
pub mod preview;
mod ui;
pub mod view;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use swatchbox_api::PaletteService;

pub use preview::load_selected_file;

/// Everything the interactive session needs from the caller.
pub struct TuiOptions {
    pub service: Arc<dyn PaletteService>,
    /// Where downloaded PNG and JSON artifacts are written
    pub download_dir: PathBuf,
    /// Color count used when the top-N field is empty
    pub default_top_n: Option<u32>,
    /// Selected and uploaded as soon as the session starts
    pub initial_file: Option<PathBuf>,
    pub server_label: String,
}

/// Runs the interactive session until the user quits.
///
/// # Errors
///
/// Terminal setup and drawing failures. Upload problems are shown in the UI
/// and never end the session.
pub async fn run(options: TuiOptions) -> Result<()> {
    ui::runtime::run_app(options).await
}
