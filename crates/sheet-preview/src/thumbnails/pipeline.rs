use super::source::{DocumentLoader, DocumentRef, PageSource};
use super::surface::{RasterSurface, thumbnail_size};
use super::{Thumbnail, ThumbnailMap, ThumbnailSnapshot};
use crate::options::ThumbnailSettings;
use crate::types::{PreviewError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// State shared between the pipeline and its generation tasks.
///
/// The generation counter is only bumped while the snapshot channel's lock is
/// held, and publishers re-check it under the same lock. A superseded
/// generation therefore can never overwrite a newer snapshot.
struct Shared {
    generation: AtomicU64,
    snapshots: watch::Sender<ThumbnailSnapshot>,
}

impl Shared {
    fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }

    /// Replace the published map if `generation` is still current
    fn publish(&self, generation: u64, document: &DocumentRef, thumbnails: &ThumbnailMap) -> bool {
        self.snapshots.send_if_modified(|snapshot| {
            if !self.is_current(generation) {
                return false;
            }
            *snapshot = ThumbnailSnapshot {
                generation,
                document: Some(document.clone()),
                thumbnails: Arc::new(thumbnails.clone()),
            };
            true
        })
    }

    /// Invalidate any generation in flight without publishing
    fn invalidate(&self) -> u64 {
        let mut bumped = 0;
        self.snapshots.send_if_modified(|_| {
            bumped = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            false
        });
        bumped
    }
}

/// How a generation ended
#[derive(Debug)]
pub enum GenerationOutcome {
    /// Every requested page was rendered and the final snapshot published
    Completed { pages: usize },
    /// A newer generation (or teardown) superseded this one
    Cancelled { pages: usize },
    /// Opening the document or rendering a page failed
    Failed { pages: usize, error: PreviewError },
}

impl GenerationOutcome {
    /// Thumbnails rendered before the generation ended
    pub fn pages(&self) -> usize {
        match self {
            GenerationOutcome::Completed { pages }
            | GenerationOutcome::Cancelled { pages }
            | GenerationOutcome::Failed { pages, .. } => *pages,
        }
    }
}

/// A running generation
#[derive(Debug)]
pub struct GenerationHandle {
    generation: u64,
    task: JoinHandle<GenerationOutcome>,
}

impl GenerationHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the generation task to end
    pub async fn finish(self) -> Result<GenerationOutcome> {
        Ok(self.task.await?)
    }
}

/// Produces a [`ThumbnailMap`] per source document and publishes it to
/// subscribers as it grows.
///
/// Must be used from within a tokio runtime.
pub struct ThumbnailPipeline<L: DocumentLoader> {
    loader: Arc<L>,
    settings: ThumbnailSettings,
    shared: Arc<Shared>,
    current: Option<DocumentRef>,
}

impl<L: DocumentLoader> ThumbnailPipeline<L> {
    pub fn new(loader: L, settings: ThumbnailSettings) -> Self {
        let (snapshots, _) = watch::channel(ThumbnailSnapshot::default());
        Self {
            loader: Arc::new(loader),
            settings,
            shared: Arc::new(Shared {
                generation: AtomicU64::new(0),
                snapshots,
            }),
            current: None,
        }
    }

    pub fn settings(&self) -> &ThumbnailSettings {
        &self.settings
    }

    /// The generation most recently started or invalidated
    pub fn generation(&self) -> u64 {
        self.shared.current()
    }

    pub fn document(&self) -> Option<&DocumentRef> {
        self.current.as_ref()
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<ThumbnailSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// The latest published snapshot
    pub fn snapshot(&self) -> ThumbnailSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Begin generating thumbnails for the first `page_count` pages of
    /// `document`, superseding any generation in flight.
    ///
    /// Switching documents publishes an empty map immediately. Restarting the
    /// same document keeps its current thumbnails visible until the new
    /// generation publishes.
    pub fn start(&mut self, document: DocumentRef, page_count: usize) -> GenerationHandle {
        let mut generation = 0;
        self.shared.snapshots.send_modify(|snapshot| {
            generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
            snapshot.generation = generation;
            if snapshot.document.as_ref() != Some(&document) {
                snapshot.document = Some(document.clone());
                snapshot.thumbnails = Arc::new(ThumbnailMap::new());
            }
        });

        log::debug!(
            "Starting thumbnail generation {} for {} ({} pages)",
            generation,
            document,
            page_count
        );
        self.current = Some(document.clone());

        let task = tokio::spawn(run_generation(
            Arc::clone(&self.loader),
            Arc::clone(&self.shared),
            self.settings,
            document,
            page_count,
            generation,
        ));

        GenerationHandle { generation, task }
    }

    /// Start a generation only if `document` differs from the current one
    pub fn request(&mut self, document: DocumentRef, page_count: usize) -> Option<GenerationHandle> {
        if self.current.as_ref() == Some(&document) {
            return None;
        }
        Some(self.start(document, page_count))
    }

    /// Cancel any generation in flight. The last published snapshot stays.
    pub fn shutdown(&mut self) {
        let generation = self.shared.invalidate();
        log::debug!("Thumbnail pipeline shut down at generation {}", generation);
        self.current = None;
    }
}

impl<L: DocumentLoader> Drop for ThumbnailPipeline<L> {
    fn drop(&mut self) {
        self.shared.invalidate();
    }
}

async fn run_generation<L: DocumentLoader>(
    loader: Arc<L>,
    shared: Arc<Shared>,
    settings: ThumbnailSettings,
    document: DocumentRef,
    page_count: usize,
    generation: u64,
) -> GenerationOutcome {
    let mut source = match loader.open(&document).await {
        Ok(source) => source,
        Err(error) => {
            log::warn!("Failed to open {} for thumbnails: {}", document, error);
            shared.publish(generation, &document, &ThumbnailMap::new());
            return GenerationOutcome::Failed { pages: 0, error };
        }
    };

    let total = source.page_count().min(page_count);
    let mut thumbnails = ThumbnailMap::new();
    let mut surface = RasterSurface::new();

    for index in 0..total {
        if !shared.is_current(generation) {
            log::debug!(
                "Thumbnail generation {} superseded after {} pages",
                generation,
                thumbnails.len()
            );
            return GenerationOutcome::Cancelled {
                pages: thumbnails.len(),
            };
        }

        match render_thumbnail(&mut source, &mut surface, index, &settings).await {
            Ok(thumbnail) => {
                thumbnails.insert(index, thumbnail);
            }
            Err(error) => {
                log::warn!("Thumbnail generation for {} stopped: {}", document, error);
                return GenerationOutcome::Failed {
                    pages: thumbnails.len(),
                    error,
                };
            }
        }

        if thumbnails.len() % settings.snapshot_every.max(1) == 0 {
            shared.publish(generation, &document, &thumbnails);
        }
    }

    if !shared.publish(generation, &document, &thumbnails) {
        return GenerationOutcome::Cancelled {
            pages: thumbnails.len(),
        };
    }

    log::info!(
        "Generated {} thumbnails for {} (generation {})",
        thumbnails.len(),
        document,
        generation
    );
    GenerationOutcome::Completed {
        pages: thumbnails.len(),
    }
}

async fn render_thumbnail<S: PageSource>(
    source: &mut S,
    surface: &mut RasterSurface,
    index: usize,
    settings: &ThumbnailSettings,
) -> Result<Thumbnail> {
    let (width, height) = source.page_size(index)?;
    let (px_width, px_height) = thumbnail_size(width, height, settings.max_dimension_px)
        .ok_or_else(|| PreviewError::Render {
            page: index,
            message: format!("invalid page size {}x{}", width, height),
        })?;

    let mut frame = surface.prepare(px_width, px_height);
    source.render_page(index, &mut frame).await?;
    frame.encode_jpeg(settings.jpeg_quality)
}
