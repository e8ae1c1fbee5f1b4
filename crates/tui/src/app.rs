//! Application state and update logic for the upload controller.
//!
//! `App` owns everything the screen shows: the input fields, the local
//! preview, the one rendered palette result, the blocking notification and
//! the status log. [`App::update`] is the only place state changes in
//! response to messages; it returns [`Effect`]s for the runtime to execute.

use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use swatchbox_types::{DownloadKind, Effect, ExecOutcome, Msg, PaletteResult, UploadOutcome, UploadReply};
use swatchbox_util::upload_failure_message;
use tracing::{debug, info, warn};

use crate::preview::{ImagePreview, load_selected_file};
use crate::view::{self, ColorBlockView, ExtrasView};

/// How long an activated block stays visually pulsed.
pub const PULSE_DURATION: Duration = Duration::from_millis(120);

/// Maximum number of status lines retained in memory.
pub const MAX_STATUS_LINES: usize = 500;

/// Which control receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    PathInput,
    TopNInput,
    Palette,
    Downloads,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::PathInput => Focus::TopNInput,
            Focus::TopNInput => Focus::Palette,
            Focus::Palette => Focus::Downloads,
            Focus::Downloads => Focus::PathInput,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Focus::PathInput => Focus::Downloads,
            Focus::TopNInput => Focus::PathInput,
            Focus::Palette => Focus::TopNInput,
            Focus::Downloads => Focus::Palette,
        }
    }
}

/// Issues upload ids and decides which completions may touch the screen.
///
/// Ids increase monotonically; only the completion of the most recently
/// issued id is applied, so a slow earlier request can never overwrite a
/// newer result.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
    in_flight: usize,
}

impl RequestTracker {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.in_flight += 1;
        self.latest
    }

    /// Record a completion and report whether it is the latest request.
    pub fn complete(&mut self, request_id: u64) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        request_id == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

/// Brief highlight of a block after it was copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub index: usize,
    pub started: Instant,
}

impl Pulse {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= PULSE_DURATION
    }
}

/// Modal message that blocks input until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

/// The rendered palette result and the cursor positions within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub result: PaletteResult,
    pub selected: usize,
    pub selected_download: usize,
}

impl ResultView {
    fn new(result: PaletteResult) -> Self {
        Self {
            result,
            selected: 0,
            selected_download: 0,
        }
    }
}

/// Bounded in-memory log shown in the footer.
#[derive(Debug, Default)]
pub struct StatusLog {
    entries: VecDeque<String>,
}

impl StatusLog {
    pub fn push(&mut self, line: impl Into<String>) {
        if self.entries.len() == MAX_STATUS_LINES {
            self.entries.pop_front();
        }
        self.entries.push_back(line.into());
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Screen regions recorded during the last draw, used for mouse hit testing.
#[derive(Debug, Default, Clone)]
pub struct HitAreas {
    pub blocks: Vec<(usize, Rect)>,
    pub downloads: Vec<(DownloadKind, Rect)>,
    /// Blocks per grid row, for vertical keyboard movement
    pub columns: usize,
}

impl HitAreas {
    pub fn block_at(&self, column: u16, row: u16) -> Option<usize> {
        self.blocks
            .iter()
            .find(|(_, rect)| contains(rect, column, row))
            .map(|(index, _)| *index)
    }

    pub fn download_at(&self, column: u16, row: u16) -> Option<DownloadKind> {
        self.downloads
            .iter()
            .find(|(_, rect)| contains(rect, column, row))
            .map(|(kind, _)| *kind)
    }
}

fn contains(rect: &Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x.saturating_add(rect.width) && row >= rect.y && row < rect.y.saturating_add(rect.height)
}

#[derive(Debug, Default)]
pub struct App {
    pub path_input: String,
    pub top_n_input: String,
    /// Used when the top-N field is empty
    pub default_top_n: Option<u32>,
    pub focus: Focus,
    pub preview: Option<ImagePreview>,
    pub result: Option<ResultView>,
    pub hovered: Option<usize>,
    pub pulse: Option<Pulse>,
    pub notification: Option<Notification>,
    pub status: StatusLog,
    pub requests: RequestTracker,
    pub throbber_idx: usize,
    pub hit_areas: HitAreas,
    /// Shown in the title bar, typically the server base URL
    pub server_label: String,
}

impl App {
    pub fn new(default_top_n: Option<u32>, server_label: impl Into<String>) -> Self {
        Self {
            default_top_n,
            server_label: server_label.into(),
            ..Self::default()
        }
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                self.tick(Instant::now());
                Vec::new()
            }
            Msg::Resize(..) => {
                self.hovered = None;
                Vec::new()
            }
            Msg::FileSelected(None) => Vec::new(),
            Msg::FileSelected(Some(path)) => self.select_file(&path),
            Msg::ExecCompleted(outcome) => {
                self.apply_outcome(*outcome);
                Vec::new()
            }
            Msg::DismissNotification => {
                self.notification = None;
                Vec::new()
            }
        }
    }

    /// Expire the pulse and advance the throbber.
    pub fn tick(&mut self, now: Instant) {
        if self.pulse.is_some_and(|pulse| pulse.is_expired(now)) {
            self.pulse = None;
        }
        if self.requests.in_flight() > 0 {
            self.throbber_idx = self.throbber_idx.wrapping_add(1);
        } else {
            self.throbber_idx = 0;
        }
    }

    /// Whether the runtime should tick quickly.
    pub fn is_animating(&self) -> bool {
        self.pulse.is_some() || self.requests.in_flight() > 0
    }

    /// Turn the path field into a selection message. A blank field is an empty selection.
    pub fn submit_path(&mut self) -> Vec<Effect> {
        let trimmed = self.path_input.trim();
        let selection = if trimmed.is_empty() {
            None
        } else {
            Some(swatchbox_util::expand_tilde(trimmed))
        };
        self.update(Msg::FileSelected(selection))
    }

    fn select_file(&mut self, path: &Path) -> Vec<Effect> {
        let file = match load_selected_file(path) {
            Ok(Some(file)) => file,
            Ok(None) => {
                self.status.push(format!("No file at {}", path.display()));
                return Vec::new();
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "cannot read selected file");
                self.status.push(format!("Cannot read {}: {}", path.display(), error));
                return Vec::new();
            }
        };

        // Preview first: it never waits on the network.
        self.preview = Some(ImagePreview::from_file(&file));

        let request_id = self.requests.issue();
        let top_n = self.top_n();
        info!(request_id, file = %file.file_name, ?top_n, "submitting image");
        self.status.push(format!("Uploading {}", file.file_name));

        vec![Effect::UploadRequested {
            request_id,
            file,
            top_n,
        }]
    }

    /// The requested color count: the field when it holds a positive number, else the default.
    pub fn top_n(&self) -> Option<u32> {
        self.top_n_input
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|count| *count > 0)
            .or(self.default_top_n)
    }

    fn apply_outcome(&mut self, outcome: ExecOutcome) {
        match outcome {
            ExecOutcome::Upload { request_id, outcome } => self.apply_upload(request_id, outcome),
            ExecOutcome::Clipboard { hex, result } => match result {
                Ok(()) => self.status.push(format!("Copied {}", hex)),
                Err(error) => {
                    warn!(%hex, %error, "clipboard write failed");
                    self.status.push(format!("Copy failed: {}", error));
                }
            },
            ExecOutcome::Download { kind, url, result } => match result {
                Ok(path) => self.status.push(format!("Saved {}", path.display())),
                Err(error) => {
                    warn!(%url, %error, "download failed");
                    self.status.push(format!("{} failed: {}", kind.label(), error));
                }
            },
        }
    }

    fn apply_upload(&mut self, request_id: u64, outcome: UploadOutcome) {
        if !self.requests.complete(request_id) {
            debug!(request_id, latest = self.requests.latest(), "discarding stale upload result");
            return;
        }

        match outcome {
            Ok(UploadReply::Palette(result)) => {
                self.status.push(format!("Received {} colors", result.palette.len()));
                self.result = Some(ResultView::new(result));
                self.hovered = None;
                self.pulse = None;
            }
            Ok(UploadReply::Rejected(message)) => {
                info!(request_id, %message, "server rejected upload");
                self.notify(message);
            }
            Err(message) => self.notify(upload_failure_message(&message)),
        }
    }

    fn notify(&mut self, message: String) {
        self.status.push(message.clone());
        self.notification = Some(Notification { message });
    }

    /// Copy the hex code of block `index` and pulse it.
    pub fn activate_block(&mut self, index: usize) -> Vec<Effect> {
        let Some(view) = self.result.as_mut() else {
            return Vec::new();
        };
        let Some(entry) = view.result.palette.get(index) else {
            return Vec::new();
        };
        let hex = entry.hex.clone();
        view.selected = index;
        self.pulse = Some(Pulse {
            index,
            started: Instant::now(),
        });
        vec![Effect::CopyToClipboardRequested(hex)]
    }

    pub fn activate_selected(&mut self) -> Vec<Effect> {
        match self.result.as_ref() {
            Some(view) => self.activate_block(view.selected),
            None => Vec::new(),
        }
    }

    /// Move the palette cursor by `delta`, clamped to the grid.
    pub fn move_selection(&mut self, delta: isize) {
        if let Some(view) = self.result.as_mut() {
            let last = view.result.palette.len().saturating_sub(1);
            view.selected = view.selected.saturating_add_signed(delta).min(last);
        }
    }

    pub fn move_download_selection(&mut self, delta: isize) {
        let count = self.extras().map(|extras| extras.downloads.len()).unwrap_or(0);
        if let Some(view) = self.result.as_mut() {
            view.selected_download = view
                .selected_download
                .saturating_add_signed(delta)
                .min(count.saturating_sub(1));
        }
    }

    /// Ask for the artifact behind `kind`; a missing PNG only produces a status line.
    pub fn request_download(&mut self, kind: DownloadKind) -> Vec<Effect> {
        let Some(extras) = self.extras() else {
            return Vec::new();
        };
        match extras.downloads.into_iter().find(|link| link.kind == kind) {
            Some(link) => {
                self.status.push(format!("{}: {}", link.label, link.url));
                vec![Effect::DownloadRequested(kind, link.url)]
            }
            None => {
                self.status.push(format!("{} is not available", kind.label()));
                Vec::new()
            }
        }
    }

    pub fn download_selected(&mut self) -> Vec<Effect> {
        let selected = self.result.as_ref().map(|view| view.selected_download).unwrap_or(0);
        let kind = self
            .extras()
            .and_then(|extras| extras.downloads.get(selected).map(|link| link.kind));
        match kind {
            Some(kind) => self.request_download(kind),
            None => Vec::new(),
        }
    }

    pub fn blocks(&self) -> Vec<ColorBlockView> {
        let Some(view) = self.result.as_ref() else {
            return Vec::new();
        };
        let selected = (self.focus == Focus::Palette).then_some(view.selected);
        view::palette_blocks(&view.result, selected, self.pulse.map(|pulse| pulse.index))
    }

    pub fn extras(&self) -> Option<ExtrasView> {
        self.result.as_ref().map(|view| view::extras_panel(&view.result))
    }

    /// Metadata for the hovered block, or the selected one when nothing is hovered.
    pub fn inspected_tooltip(&self) -> Option<(String, String)> {
        let view = self.result.as_ref()?;
        let index = self.hovered.unwrap_or(view.selected);
        let entry = view.result.palette.get(index)?;
        Some((entry.hex.clone(), view::tooltip(entry)))
    }
}
