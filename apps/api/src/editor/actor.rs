//! The editor actor: one task owns the [`Editor`] and handles commands one at a time.
//!
//! Handlers talk to it through a cloneable [`EditorHandle`]. Export runs in its own
//! task against a shared snapshot of the preview, so edits keep flowing while a PDF
//! is produced. At most one export is in flight; the busy flag is published on a
//! `watch` channel and always cleared when the export task ends, panics included.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info};

use crate::editor::photo::encode_photo;
use crate::editor::session::{Edit, Editor, MutationOutcome, SessionSnapshot};
use crate::errors::AppError;
use crate::export::portable::PortableSnapshot;
use crate::export::{
    ExportError, ExportOutcome, ExportPipeline, ExportReceipt, ExportStatus, ExportTrigger,
    EXPORT_FAILURE_MESSAGE,
};
use crate::layout::PageLayout;
use crate::scoring::CompletenessReport;

type ExportResult = Result<ExportReceipt, ExportError>;

enum Command {
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Preview(oneshot::Sender<Option<Arc<PageLayout>>>),
    Score(oneshot::Sender<CompletenessReport>),
    Portable(oneshot::Sender<PortableSnapshot>),
    Apply(Edit, oneshot::Sender<MutationOutcome>),
    StartExport(oneshot::Sender<ExportTrigger>),
    ExportStatus(oneshot::Sender<ExportStatus>),
}

#[derive(Clone)]
pub struct EditorHandle {
    commands: mpsc::UnboundedSender<Command>,
    busy: watch::Receiver<bool>,
}

impl EditorHandle {
    /// Starts the actor task on the current runtime.
    pub fn spawn(editor: Editor, pipeline: ExportPipeline) -> Self {
        let (commands, inbox) = mpsc::unbounded_channel();
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        let (busy_tx, busy) = watch::channel(false);

        let actor = EditorActor {
            editor,
            pipeline: Arc::new(pipeline),
            status: ExportStatus::default(),
            busy_tx,
            finished_tx,
        };
        tokio::spawn(actor.run(inbox, finished_rx));

        Self { commands, busy }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, AppError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .map_err(|_| AppError::EditorUnavailable)?;
        rx.await.map_err(|_| AppError::EditorUnavailable)
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, AppError> {
        self.request(Command::Snapshot).await
    }

    pub async fn preview(&self) -> Result<Option<Arc<PageLayout>>, AppError> {
        self.request(Command::Preview).await
    }

    pub async fn score(&self) -> Result<CompletenessReport, AppError> {
        self.request(Command::Score).await
    }

    pub async fn portable(&self) -> Result<PortableSnapshot, AppError> {
        self.request(Command::Portable).await
    }

    pub async fn apply(&self, edit: Edit) -> Result<MutationOutcome, AppError> {
        self.request(|reply| Command::Apply(edit, reply)).await
    }

    /// Validates the upload off the actor, then stores it. An unreadable image leaves
    /// the current photo in place.
    pub async fn set_photo(&self, bytes: Bytes) -> Result<MutationOutcome, AppError> {
        let url = tokio::task::spawn_blocking(move || encode_photo(&bytes))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("photo decode task failed: {e}")))??;
        self.apply(Edit::SetPhoto(url)).await
    }

    pub async fn start_export(&self) -> Result<ExportTrigger, AppError> {
        self.request(Command::StartExport).await
    }

    pub async fn export_status(&self) -> Result<ExportStatus, AppError> {
        self.request(Command::ExportStatus).await
    }

    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy.clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Actor
// ────────────────────────────────────────────────────────────────────────────

struct EditorActor {
    editor: Editor,
    pipeline: Arc<ExportPipeline>,
    status: ExportStatus,
    busy_tx: watch::Sender<bool>,
    finished_tx: mpsc::UnboundedSender<ExportResult>,
}

impl EditorActor {
    async fn run(
        mut self,
        mut inbox: mpsc::UnboundedReceiver<Command>,
        mut finished: mpsc::UnboundedReceiver<ExportResult>,
    ) {
        loop {
            tokio::select! {
                command = inbox.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                Some(result) = finished.recv() => self.finish_export(result),
            }
        }
        debug!("editor actor stopped");
    }

    fn handle(&mut self, command: Command) {
        // A dropped reply receiver means the caller went away; nothing to do.
        match command {
            Command::Snapshot(reply) => {
                let _ = reply.send(self.editor.snapshot(self.status.clone()));
            }
            Command::Preview(reply) => {
                let _ = reply.send(self.editor.preview());
            }
            Command::Score(reply) => {
                let _ = reply.send(self.editor.score());
            }
            Command::Portable(reply) => {
                let _ = reply.send(self.editor.portable());
            }
            Command::Apply(edit, reply) => {
                let _ = reply.send(self.editor.apply(edit));
            }
            Command::StartExport(reply) => {
                let _ = reply.send(self.start_export());
            }
            Command::ExportStatus(reply) => {
                let _ = reply.send(self.status.clone());
            }
        }
    }

    fn start_export(&mut self) -> ExportTrigger {
        if self.status.busy {
            debug!("export already running; trigger ignored");
            return ExportTrigger::AlreadyRunning;
        }
        self.set_busy(true);

        let surface = self.editor.preview();
        let full_name = self.editor.document().personal_info.full_name.clone();
        let pipeline = Arc::clone(&self.pipeline);
        let guard = BusyGuard {
            finished: self.finished_tx.clone(),
            result: None,
        };
        info!("export started");

        tokio::spawn(async move {
            let mut guard = guard;
            guard.result = Some(pipeline.run(surface, &full_name).await);
        });
        ExportTrigger::Started
    }

    fn finish_export(&mut self, result: ExportResult) {
        let outcome = match result {
            Ok(receipt) => {
                info!(file_name = %receipt.file_name, bytes = receipt.bytes, "export finished");
                ExportOutcome::Succeeded(receipt)
            }
            Err(e) => {
                error!("export failed: {e}");
                ExportOutcome::Failed {
                    message: EXPORT_FAILURE_MESSAGE.to_string(),
                    finished_at: Utc::now(),
                }
            }
        };
        self.status.last = Some(outcome);
        self.set_busy(false);
    }

    fn set_busy(&mut self, busy: bool) {
        self.status.busy = busy;
        self.busy_tx.send_replace(busy);
    }
}

/// Reports the export result when dropped, so the actor hears back on every exit
/// path of the export task.
struct BusyGuard {
    finished: mpsc::UnboundedSender<ExportResult>,
    result: Option<ExportResult>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let result = self.result.take().unwrap_or_else(|| {
            Err(ExportError::CaptureFailed(
                "export task ended before completing".into(),
            ))
        });
        let _ = self.finished.send(result);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::editor::photo::tiny_png;
    use crate::export::download::{FsDownloadSink, MemoryDownloadSink};
    use crate::export::pdf::LopdfEncoder;
    use crate::export::raster::ImageRasterizer;
    use crate::export::testing::{FailingRasterizer, GatedRasterizer};
    use crate::export::{DownloadSink, Rasterizer};
    use crate::models::resume::ListSection;

    fn handle_with(rasterizer: Arc<dyn Rasterizer>, sink: Arc<dyn DownloadSink>) -> EditorHandle {
        let pipeline = ExportPipeline::new(rasterizer, Arc::new(LopdfEncoder::default()), sink, 2);
        EditorHandle::spawn(Editor::new(), pipeline)
    }

    async fn wait_idle(handle: &EditorHandle) {
        let mut busy = handle.busy();
        busy.wait_for(|busy| !*busy).await.unwrap();
    }

    #[tokio::test]
    async fn test_second_trigger_while_busy_is_noop() {
        let (rasterizer, release) = GatedRasterizer::new();
        let sink = Arc::new(MemoryDownloadSink::default());
        let handle = handle_with(rasterizer.clone(), sink.clone());

        assert_eq!(handle.start_export().await.unwrap(), ExportTrigger::Started);
        assert!(*handle.busy().borrow());
        assert_eq!(
            handle.start_export().await.unwrap(),
            ExportTrigger::AlreadyRunning
        );
        assert!(handle.export_status().await.unwrap().busy);

        release.send(()).unwrap();
        wait_idle(&handle).await;

        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(sink.files().len(), 1);
        let status = handle.export_status().await.unwrap();
        assert!(!status.busy);
        match status.last {
            Some(ExportOutcome::Succeeded(receipt)) => {
                assert_eq!(receipt.file_name, "Jane_Doe_Resume.pdf")
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_edits_proceed_while_export_runs() {
        let (rasterizer, release) = GatedRasterizer::new();
        let handle = handle_with(rasterizer, Arc::new(MemoryDownloadSink::default()));
        handle.start_export().await.unwrap();

        let outcome = handle
            .apply(Edit::UpdateField {
                section: "summary".into(),
                field: "summary".into(),
                value: "Edited mid-export".into(),
            })
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);

        release.send(()).unwrap();
        wait_idle(&handle).await;
    }

    #[tokio::test]
    async fn test_failure_clears_busy_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(FsDownloadSink::new(dir.path()));
        let handle = handle_with(Arc::new(FailingRasterizer), sink);

        assert_eq!(handle.start_export().await.unwrap(), ExportTrigger::Started);
        wait_idle(&handle).await;

        let status = handle.export_status().await.unwrap();
        match status.last {
            Some(ExportOutcome::Failed { message, .. }) => {
                assert_eq!(message, EXPORT_FAILURE_MESSAGE)
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        // The session is untouched and a new export may start.
        assert_eq!(handle.snapshot().await.unwrap().document.personal_info.full_name, "Jane Doe");
        assert_eq!(handle.start_export().await.unwrap(), ExportTrigger::Started);
        wait_idle(&handle).await;
    }

    #[tokio::test]
    async fn test_real_export_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(FsDownloadSink::new(dir.path()));
        let handle = handle_with(Arc::new(ImageRasterizer), sink);
        handle.set_photo(Bytes::from(tiny_png())).await.unwrap();

        handle.start_export().await.unwrap();
        wait_idle(&handle).await;

        let pdf = std::fs::read(dir.path().join("Jane_Doe_Resume.pdf")).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_unreadable_photo_is_rejected_and_not_stored() {
        let handle = handle_with(Arc::new(ImageRasterizer), Arc::new(MemoryDownloadSink::default()));
        let result = handle.set_photo(Bytes::from_static(b"not an image")).await;
        assert!(matches!(result, Err(AppError::PhotoLoad(_))));
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.document.personal_info.photo.is_none());
    }

    #[tokio::test]
    async fn test_apply_through_handle() {
        let handle = handle_with(Arc::new(ImageRasterizer), Arc::new(MemoryDownloadSink::default()));
        let snapshot = handle.snapshot().await.unwrap();
        let id = snapshot.document.projects[0].id;
        let outcome = handle
            .apply(Edit::RemoveListItem {
                section: ListSection::Projects,
                id,
            })
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);
        let preview = handle.preview().await.unwrap().unwrap();
        assert!(!preview.texts().any(|t| t == "E-Commerce App"));
        assert_eq!(handle.score().await.unwrap().score, 90);
    }
}
