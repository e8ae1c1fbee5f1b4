use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use swatchbox_api::{ClientConfig, PaletteClient};
use swatchbox_types::{DownloadKind, HistoryQuery, UploadReply};
use swatchbox_tui::{TuiOptions, load_selected_file};
use swatchbox_util::preferences::UserPreferences;
use swatchbox_util::{default_download_dir, default_log_path, expand_tilde, hex_to_rgb, upload_failure_message};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod output;

#[derive(Debug, Parser)]
#[command(name = "swatchbox", version, about = "Extract color palettes from images with a palette server")]
struct Cli {
    /// Palette server base URL (overrides SWATCHBOX_BASE_URL and preferences)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Number of colors to request
    #[arg(long, global = true, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    top_n: Option<u32>,

    /// Directory downloads are written to
    #[arg(long, global = true, value_name = "DIR")]
    download_dir: Option<String>,

    /// Image to upload as soon as the interactive session starts
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload one image and print its palette
    Upload {
        file: PathBuf,
        /// Also download the PNG and JSON artifacts
        #[arg(long)]
        save: bool,
    },
    /// List previously extracted palettes
    History {
        /// Case-insensitive filename filter
        #[arg(long)]
        search: Option<String>,
        /// Only palettes containing a color near this hex code
        #[arg(long, value_name = "HEX")]
        color: Option<String>,
        /// Print the raw rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a stored palette and its artifacts
    Delete { id: i64 },
    /// Show or change saved preferences
    Config {
        #[arg(long, value_name = "N")]
        set_top_n: Option<u32>,
        #[arg(long, value_name = "DIR")]
        set_download_dir: Option<String>,
        #[arg(long, value_name = "URL")]
        set_base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.is_none());

    let preferences = load_preferences();
    let settings = Settings::resolve(&cli, &preferences);

    match cli.command {
        None => {
            let client = settings.client()?;
            info!(base_url = %client.config.base_url, "starting interactive session");
            swatchbox_tui::run(TuiOptions {
                server_label: client.config.base_url.clone(),
                service: Arc::new(client),
                download_dir: settings.download_dir,
                default_top_n: settings.top_n,
                initial_file: cli.file.map(|path| expand_tilde(&path.to_string_lossy())),
            })
            .await
        }
        Some(Command::Upload { file, save }) => run_upload(&settings, &file, save).await,
        Some(Command::History { search, color, json }) => run_history(&settings, HistoryQuery { search, color }, json).await,
        Some(Command::Delete { id }) => {
            settings.client()?.delete_palette(id).await.context("delete failed")?;
            println!("Deleted palette {}", id);
            Ok(())
        }
        Some(Command::Config {
            set_top_n,
            set_download_dir,
            set_base_url,
        }) => run_config(&preferences, set_top_n, set_download_dir, set_base_url),
    }
}

/// Effective settings after applying flags, environment and preferences.
struct Settings {
    client_config: ClientConfig,
    top_n: Option<u32>,
    download_dir: PathBuf,
}

impl Settings {
    fn resolve(cli: &Cli, preferences: &UserPreferences) -> Self {
        let client_config = ClientConfig::resolve(cli.base_url.as_deref(), preferences.base_url().as_deref());
        let download_dir = cli
            .download_dir
            .as_deref()
            .map(expand_tilde)
            .or_else(|| preferences.download_dir())
            .unwrap_or_else(default_download_dir);
        Self {
            client_config,
            top_n: cli.top_n.or(preferences.default_top_n()),
            download_dir,
        }
    }

    fn client(&self) -> Result<PaletteClient> {
        PaletteClient::new(self.client_config.clone()).context("invalid palette server configuration")
    }
}

/// Tracing goes to a log file while the TUI owns the terminal, to stderr otherwise.
fn init_tracing(interactive: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if interactive {
        match open_log_file(&default_log_path()) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
            Err(error) => eprintln!("swatchbox: logging disabled: {:#}", error),
        }
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))
}

fn load_preferences() -> UserPreferences {
    UserPreferences::new().unwrap_or_else(|error| {
        warn!(%error, "failed to load preferences; using defaults");
        UserPreferences::ephemeral()
    })
}

async fn run_upload(settings: &Settings, path: &Path, save: bool) -> Result<()> {
    let file = load_selected_file(path)
        .with_context(|| format!("read {}", path.display()))?
        .ok_or_else(|| anyhow!("no file at {}", path.display()))?;
    let file_name = file.file_name.clone();
    let client = settings.client()?;

    let reply = match client.upload(file, settings.top_n).await {
        Ok(reply) => reply,
        Err(upload_error) => {
            error!(file = %file_name, error = %upload_error, "upload failed");
            bail!(upload_failure_message(&upload_error.to_string()));
        }
    };
    let result = match reply {
        UploadReply::Palette(result) => result,
        UploadReply::Rejected(message) => bail!("server rejected {}: {}", file_name, message),
    };

    println!("Palette for {} ({} colors)", file_name, result.palette.len());
    let resolve = |url: &str| {
        client
            .resolve_url(url)
            .map(|resolved| resolved.to_string())
            .unwrap_or_else(|_| url.to_string())
    };
    for line in output::palette_lines(&result, resolve) {
        println!("{}", line);
    }

    if save {
        let mut targets = vec![(DownloadKind::Json, result.json_url.clone())];
        if let Some(png) = result.png_download() {
            targets.insert(0, (DownloadKind::Png, png.to_string()));
        }
        for (kind, url) in targets {
            let saved = client
                .download(&url, &settings.download_dir)
                .await
                .with_context(|| format!("{} failed", kind.label()))?;
            println!("Saved {}", saved.display());
        }
    }
    Ok(())
}

async fn run_history(settings: &Settings, query: HistoryQuery, json: bool) -> Result<()> {
    if let Some(color) = query.color.as_deref().map(str::trim).filter(|color| !color.is_empty()) {
        hex_to_rgb(color).context("invalid --color filter")?;
    }
    let items = settings
        .client()?
        .list_palettes(&query)
        .await
        .context("listing palettes failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        println!("No palettes found");
        return Ok(());
    }
    for item in &items {
        println!("{}", output::history_line(item));
    }
    Ok(())
}

fn run_config(
    preferences: &UserPreferences,
    set_top_n: Option<u32>,
    set_download_dir: Option<String>,
    set_base_url: Option<String>,
) -> Result<()> {
    if let Some(count) = set_top_n {
        // Zero clears the saved default.
        preferences.set_default_top_n((count > 0).then_some(count))?;
    }
    if let Some(dir) = set_download_dir {
        preferences.set_download_dir(Some(dir).filter(|dir| !dir.trim().is_empty()))?;
    }
    if let Some(url) = set_base_url {
        if !url.trim().is_empty() {
            swatchbox_api::validate_base_url(url.trim()).context("refusing to save base URL")?;
        }
        preferences.set_base_url(Some(url.trim().to_string()).filter(|url| !url.is_empty()))?;
    }

    println!("Preferences: {}", preferences.path().display());
    println!("{}", serde_json::to_string_pretty(&preferences.snapshot())?);
    Ok(())
}
