//! Command execution layer.
//!
//! Effects returned by [`crate::app::App::update`] are translated into
//! [`Cmd`]s here and executed. Clipboard writes complete immediately; uploads
//! and downloads are spawned onto the tokio runtime and handed back to the
//! event loop as join handles, so the UI never blocks on the network.

use std::path::PathBuf;
use std::sync::Arc;

use swatchbox_api::PaletteService;
use swatchbox_types::{DownloadKind, Effect, ExecOutcome, SelectedFile};
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::clipboard::ClipboardSink;

/// A side effect ready to run.
#[derive(Debug)]
pub enum Cmd {
    /// Write text into the system clipboard.
    ClipboardSet(String),

    /// Submit a selection to the upload endpoint.
    Upload {
        request_id: u64,
        file: SelectedFile,
        top_n: Option<u32>,
    },

    /// Fetch a server artifact into the download directory.
    Download { kind: DownloadKind, url: String },
}

pub fn from_effects(effects: Vec<Effect>) -> Vec<Cmd> {
    effects
        .into_iter()
        .map(|effect| match effect {
            Effect::UploadRequested {
                request_id,
                file,
                top_n,
            } => Cmd::Upload {
                request_id,
                file,
                top_n,
            },
            Effect::CopyToClipboardRequested(hex) => Cmd::ClipboardSet(hex),
            Effect::DownloadRequested(kind, url) => Cmd::Download { kind, url },
        })
        .collect()
}

/// Outcomes of a batch: finished ones plus handles to still-running tasks.
#[derive(Debug, Default)]
pub struct CommandBatch {
    pub immediate: Vec<ExecOutcome>,
    pub pending: Vec<JoinHandle<ExecOutcome>>,
}

/// Everything commands need to reach the outside world.
pub struct Executor {
    pub service: Arc<dyn PaletteService>,
    pub clipboard: Box<dyn ClipboardSink>,
    pub download_dir: PathBuf,
}

impl Executor {
    pub fn new(service: Arc<dyn PaletteService>, clipboard: Box<dyn ClipboardSink>, download_dir: PathBuf) -> Self {
        Self {
            service,
            clipboard,
            download_dir,
        }
    }
}

/// Execute commands. Must be called from within a tokio runtime.
pub fn run_cmds(executor: &mut Executor, commands: Vec<Cmd>) -> CommandBatch {
    let mut batch = CommandBatch::default();
    for command in commands {
        match command {
            Cmd::ClipboardSet(text) => batch.immediate.push(execute_clipboard_set(executor, text)),
            Cmd::Upload {
                request_id,
                file,
                top_n,
            } => batch
                .pending
                .push(spawn_upload(Arc::clone(&executor.service), request_id, file, top_n)),
            Cmd::Download { kind, url } => batch.pending.push(spawn_download(
                Arc::clone(&executor.service),
                kind,
                url,
                executor.download_dir.clone(),
            )),
        }
    }
    batch
}

fn execute_clipboard_set(executor: &mut Executor, hex: String) -> ExecOutcome {
    let result = executor.clipboard.set_text(&hex).map_err(|error| error.to_string());
    ExecOutcome::Clipboard { hex, result }
}

fn spawn_upload(
    service: Arc<dyn PaletteService>,
    request_id: u64,
    file: SelectedFile,
    top_n: Option<u32>,
) -> JoinHandle<ExecOutcome> {
    tokio::spawn(async move {
        let file_name = file.file_name.clone();
        let outcome = service.upload(file, top_n).await.map_err(|error| {
            error!(request_id, file = %file_name, %error, "upload failed");
            error.to_string()
        });
        ExecOutcome::Upload { request_id, outcome }
    })
}

fn spawn_download(service: Arc<dyn PaletteService>, kind: DownloadKind, url: String, dir: PathBuf) -> JoinHandle<ExecOutcome> {
    tokio::spawn(async move {
        let result = service.download(&url, &dir).await.map_err(|error| {
            warn!(%url, %error, "download failed");
            error.to_string()
        });
        ExecOutcome::Download { kind, url, result }
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use async_trait::async_trait;
    use swatchbox_api::PaletteApiError;
    use swatchbox_types::UploadReply;

    use super::*;
    use crate::clipboard::testing::RecordingClipboard;

    struct FakeService;

    #[async_trait]
    impl PaletteService for FakeService {
        async fn upload(&self, file: SelectedFile, top_n: Option<u32>) -> Result<UploadReply, PaletteApiError> {
            if file.bytes.is_empty() {
                return Err(PaletteApiError::UnexpectedShape("empty upload".into()));
            }
            Ok(UploadReply::Rejected(format!("{} top_n={:?}", file.file_name, top_n)))
        }

        async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, PaletteApiError> {
            Ok(dir.join(url.rsplit('/').next().unwrap_or("artifact")))
        }
    }

    fn executor(clipboard: RecordingClipboard) -> Executor {
        Executor::new(Arc::new(FakeService), Box::new(clipboard), PathBuf::from("/tmp/swatches"))
    }

    fn file(bytes: &[u8]) -> SelectedFile {
        SelectedFile {
            file_name: "photo.jpg".into(),
            mime_type: "image/jpeg".into(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn effects_map_one_to_one() {
        let commands = from_effects(vec![
            Effect::CopyToClipboardRequested("#ff0000".into()),
            Effect::DownloadRequested(DownloadKind::Json, "/dl/1.json".into()),
        ]);
        assert!(matches!(&commands[0], Cmd::ClipboardSet(hex) if hex == "#ff0000"));
        assert!(matches!(&commands[1], Cmd::Download { kind: DownloadKind::Json, .. }));
    }

    #[tokio::test]
    async fn clipboard_writes_exact_hex_immediately() {
        let clipboard = RecordingClipboard::default();
        let writes = Arc::clone(&clipboard.writes);
        let mut executor = executor(clipboard);

        let batch = run_cmds(&mut executor, vec![Cmd::ClipboardSet("#00FFaa".into())]);
        assert!(batch.pending.is_empty());
        assert!(matches!(
            &batch.immediate[0],
            ExecOutcome::Clipboard { hex, result: Ok(()) } if hex == "#00FFaa"
        ));
        assert_eq!(*writes.lock().unwrap(), vec!["#00FFaa".to_string()]);
    }

    #[tokio::test]
    async fn clipboard_failure_is_reported_not_raised() {
        let mut executor = executor(RecordingClipboard {
            fail: true,
            ..RecordingClipboard::default()
        });
        let batch = run_cmds(&mut executor, vec![Cmd::ClipboardSet("#123456".into())]);
        assert!(matches!(&batch.immediate[0], ExecOutcome::Clipboard { result: Err(_), .. }));
    }

    #[tokio::test]
    async fn upload_runs_in_background_and_keeps_request_id() {
        let mut executor = executor(RecordingClipboard::default());
        let mut batch = run_cmds(
            &mut executor,
            vec![
                Cmd::Upload {
                    request_id: 7,
                    file: file(b"jpeg"),
                    top_n: Some(4),
                },
                Cmd::Upload {
                    request_id: 8,
                    file: file(b""),
                    top_n: None,
                },
            ],
        );
        assert!(batch.immediate.is_empty());
        let second = batch.pending.pop().unwrap().await.unwrap();
        let first = batch.pending.pop().unwrap().await.unwrap();

        match first {
            ExecOutcome::Upload { request_id, outcome } => {
                assert_eq!(request_id, 7);
                assert_eq!(outcome, Ok(UploadReply::Rejected("photo.jpg top_n=Some(4)".into())));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        match second {
            ExecOutcome::Upload { request_id, outcome } => {
                assert_eq!(request_id, 8);
                assert_eq!(outcome.unwrap_err(), "unexpected response shape: empty upload");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn download_lands_in_configured_directory() {
        let mut executor = executor(RecordingClipboard::default());
        let mut batch = run_cmds(
            &mut executor,
            vec![Cmd::Download {
                kind: DownloadKind::Png,
                url: "/dl/1.png".into(),
            }],
        );
        match batch.pending.pop().unwrap().await.unwrap() {
            ExecOutcome::Download { kind, result, .. } => {
                assert_eq!(kind, DownloadKind::Png);
                assert_eq!(result.unwrap(), PathBuf::from("/tmp/swatches/1.png"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
