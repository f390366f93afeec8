use sheet_preview::thumbnails::PdfiumLoader;
use sheet_preview::{
    DocumentLoader, DocumentRef, GenerationHandle, GenerationOutcome, ThumbnailPipeline,
    ThumbnailSettings, ThumbnailSnapshot, load_layout, read_page_count, summarize,
};
use sheet_preview_runtime::{DocumentId, PreviewCommand, PreviewUpdate};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Document currently feeding thumbnails to the UI
struct OpenDocument {
    doc_id: DocumentId,
    forwarder: JoinHandle<()>,
    /// Set when the document's generation ended in failure
    failed: Arc<AtomicBool>,
}

impl OpenDocument {
    fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

/// Async worker task that processes preview commands and sends updates
pub async fn worker_task<L: DocumentLoader>(
    mut command_rx: mpsc::UnboundedReceiver<PreviewCommand>,
    update_tx: mpsc::UnboundedSender<PreviewUpdate>,
    loader: L,
    settings: ThumbnailSettings,
) {
    let mut pipeline = ThumbnailPipeline::new(loader, settings);
    let mut open: Option<OpenDocument> = None;
    let mut next_doc_id = 0;

    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            PreviewCommand::LoadLayout { path } => {
                handle_load_layout(path, &update_tx).await;
            }
            PreviewCommand::LoadDocument { path } => {
                let page_count = match read_page_count(&path).await {
                    Ok(count) => count,
                    Err(e) => {
                        let _ = update_tx.send(PreviewUpdate::Error {
                            message: format!("Failed to read {}: {}", path.display(), e),
                        });
                        continue;
                    }
                };

                let document = DocumentRef::path(&path);
                let retry = open.as_ref().is_some_and(OpenDocument::failed);
                if pipeline.document() == Some(&document) && !retry {
                    log::debug!("{} is already loaded", path.display());
                    continue;
                }

                if let Some(previous) = open.take() {
                    previous.forwarder.abort();
                }

                next_doc_id += 1;
                let doc_id = DocumentId(next_doc_id);

                // The UI must know the new id before any of its snapshots arrive
                let _ = update_tx.send(PreviewUpdate::DocumentLoaded {
                    doc_id,
                    path,
                    page_count,
                });

                // Subscribe before starting so the reset snapshot is forwarded
                let snapshots = pipeline.subscribe();
                let handle = pipeline.start(document, page_count);
                let failed = Arc::new(AtomicBool::new(false));
                let forwarder = forward_generation(
                    doc_id,
                    snapshots,
                    handle,
                    Arc::clone(&failed),
                    update_tx.clone(),
                );

                open = Some(OpenDocument {
                    doc_id,
                    forwarder,
                    failed,
                });
            }
            PreviewCommand::CloseDocument => {
                pipeline.shutdown();
                if let Some(previous) = open.take() {
                    previous.forwarder.abort();
                    let _ = update_tx.send(PreviewUpdate::DocumentClosed {
                        doc_id: previous.doc_id,
                    });
                }
            }
        }
    }
}

/// Prefer a PDFium library under `vendor/pdfium/lib` in the working directory
pub fn pdfium_loader() -> PdfiumLoader {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join("vendor/pdfium/lib"))
        .filter(|dir| dir.exists())
        .map(PdfiumLoader::with_library_dir)
        .unwrap_or_default()
}

async fn handle_load_layout(path: PathBuf, update_tx: &mpsc::UnboundedSender<PreviewUpdate>) {
    match load_layout(&path).await {
        Ok(layout) => {
            log::info!(
                "Loaded layout {} ({} cells, {} marks)",
                path.display(),
                layout.grid.len(),
                layout.marks.len()
            );
            let summary = summarize(&layout);
            let _ = update_tx.send(PreviewUpdate::LayoutLoaded { layout, summary });
        }
        Err(e) => {
            let _ = update_tx.send(PreviewUpdate::Error {
                message: format!("Failed to load layout {}: {}", path.display(), e),
            });
        }
    }
}

/// Forward one generation's snapshots, then report how it ended.
///
/// Every snapshot of the generation is sent before `ThumbnailsFinished`.
fn forward_generation(
    doc_id: DocumentId,
    mut snapshots: watch::Receiver<ThumbnailSnapshot>,
    handle: GenerationHandle,
    failed: Arc<AtomicBool>,
    update_tx: mpsc::UnboundedSender<PreviewUpdate>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let forward = |snapshots: &mut watch::Receiver<ThumbnailSnapshot>| {
            let snapshot = snapshots.borrow_and_update().clone();
            update_tx
                .send(PreviewUpdate::Thumbnails { doc_id, snapshot })
                .is_ok()
        };

        let mut finish = std::pin::pin!(handle.finish());
        let outcome = loop {
            tokio::select! {
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break (&mut finish).await;
                    }
                    if !forward(&mut snapshots) {
                        return;
                    }
                }
                outcome = &mut finish => break outcome,
            }
        };

        if snapshots.has_changed().unwrap_or(false) && !forward(&mut snapshots) {
            return;
        }

        let (pages, error) = match outcome {
            Ok(GenerationOutcome::Completed { pages }) => {
                log::info!("Thumbnails ready for {} pages", pages);
                (pages, None)
            }
            Ok(GenerationOutcome::Cancelled { pages }) => (pages, None),
            Ok(GenerationOutcome::Failed { pages, error }) => (
                pages,
                Some(format!("Thumbnails stopped after {} pages: {}", pages, error)),
            ),
            Err(e) => (0, Some(format!("Thumbnail task failed: {}", e))),
        };

        failed.store(error.is_some(), Ordering::SeqCst);
        if let Some(message) = &error {
            log::warn!("{}", message);
            let _ = update_tx.send(PreviewUpdate::Error {
                message: message.clone(),
            });
        }
        let _ = update_tx.send(PreviewUpdate::ThumbnailsFinished {
            doc_id,
            pages,
            failed: error.is_some(),
        });
    })
}
