use sheet_preview::thumbnails::SurfaceFrame;
use sheet_preview::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Semaphore, watch};
use tokio::time::timeout;

/// In-memory documents with scripted rendering
#[derive(Clone, Default)]
struct FakeLoader {
    /// Page count per document id
    pages: HashMap<String, usize>,
    /// Page whose render fails
    fail_on: Option<usize>,
    /// When set, every page render waits for one permit
    gate: Option<Arc<Semaphore>>,
    /// (document id, page) for every finished render
    rendered: Arc<Mutex<Vec<(String, usize)>>>,
}

impl FakeLoader {
    fn with_document(mut self, id: &str, pages: usize) -> Self {
        self.pages.insert(id.to_string(), pages);
        self
    }

    fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    fn failing_on(mut self, page: usize) -> Self {
        self.fail_on = Some(page);
        self
    }
}

struct FakeSource {
    id: String,
    pages: usize,
    fail_on: Option<usize>,
    gate: Option<Arc<Semaphore>>,
    rendered: Arc<Mutex<Vec<(String, usize)>>>,
}

fn document_id(document: &DocumentRef) -> String {
    match document {
        DocumentRef::Memory { id, .. } => id.clone(),
        DocumentRef::Path(path) => path.display().to_string(),
    }
}

impl DocumentLoader for FakeLoader {
    type Source = FakeSource;

    async fn open(&self, document: &DocumentRef) -> Result<FakeSource> {
        let id = document_id(document);
        let pages = *self
            .pages
            .get(&id)
            .ok_or_else(|| PreviewError::DocumentOpen(format!("no such document: {id}")))?;

        Ok(FakeSource {
            id,
            pages,
            fail_on: self.fail_on,
            gate: self.gate.clone(),
            rendered: Arc::clone(&self.rendered),
        })
    }
}

impl PageSource for FakeSource {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn page_size(&self, _index: usize) -> Result<(f32, f32)> {
        Ok((612.0, 792.0))
    }

    async fn render_page(&mut self, index: usize, frame: &mut SurfaceFrame<'_>) -> Result<()> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        if self.fail_on == Some(index) {
            return Err(PreviewError::Render {
                page: index,
                message: "scripted failure".to_string(),
            });
        }

        if self.id == "transparent" {
            let rgba = vec![0u8; (frame.width() * frame.height() * 4) as usize];
            frame.composite_rgba(&rgba, frame.width(), frame.height());
        } else {
            frame.fill([(index * 20) as u8, 40, 80]);
        }

        self.rendered.lock().unwrap().push((self.id.clone(), index));
        Ok(())
    }
}

fn doc(id: &str) -> DocumentRef {
    DocumentRef::memory(id, Vec::<u8>::new())
}

async fn next_snapshot(rx: &mut watch::Receiver<ThumbnailSnapshot>) -> ThumbnailSnapshot {
    timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("timed out waiting for a snapshot")
        .expect("pipeline dropped");
    rx.borrow_and_update().clone()
}

async fn wait_for_pages(
    rx: &mut watch::Receiver<ThumbnailSnapshot>,
    pages: usize,
) -> ThumbnailSnapshot {
    loop {
        let snapshot = next_snapshot(rx).await;
        if snapshot.thumbnails.len() >= pages {
            return snapshot;
        }
    }
}

fn keys(snapshot: &ThumbnailSnapshot) -> Vec<usize> {
    snapshot.thumbnails.keys().copied().collect()
}

#[tokio::test]
async fn test_generates_every_page() {
    let loader = FakeLoader::default().with_document("a", 6);
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());

    let outcome = pipeline.start(doc("a"), 6).finish().await.unwrap();
    assert!(matches!(outcome, GenerationOutcome::Completed { pages: 6 }));

    let snapshot = pipeline.snapshot();
    assert_eq!(keys(&snapshot), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(snapshot.document, Some(doc("a")));

    let thumbnail = &snapshot.thumbnails[&0];
    assert!(thumbnail.data_uri.starts_with("data:image/jpeg;base64,"));
    assert_eq!((thumbnail.width, thumbnail.height), (155, 200));

    let decoded = image::load_from_memory(&thumbnail.jpeg_bytes().unwrap()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (155, 200));
}

#[tokio::test]
async fn test_page_count_is_bounded_by_document() {
    let loader = FakeLoader::default()
        .with_document("short", 3)
        .with_document("long", 10);
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());

    let outcome = pipeline.start(doc("short"), 10).finish().await.unwrap();
    assert_eq!(outcome.pages(), 3);
    assert_eq!(keys(&pipeline.snapshot()), vec![0, 1, 2]);

    let outcome = pipeline.start(doc("long"), 2).finish().await.unwrap();
    assert_eq!(outcome.pages(), 2);
    assert_eq!(keys(&pipeline.snapshot()), vec![0, 1]);
}

#[tokio::test]
async fn test_transparent_pages_render_on_white() {
    let loader = FakeLoader::default().with_document("transparent", 1);
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());
    pipeline.start(doc("transparent"), 1).finish().await.unwrap();

    let snapshot = pipeline.snapshot();
    let jpeg = snapshot.thumbnails[&0].jpeg_bytes().unwrap();
    let decoded = image::load_from_memory(&jpeg).unwrap().to_rgb8();
    assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c > 240)));
}

#[tokio::test]
async fn test_snapshots_every_four_pages() {
    let (loader, gate) = FakeLoader::default().with_document("a", 10).gated();
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());
    let mut rx = pipeline.subscribe();

    let handle = pipeline.start(doc("a"), 10);
    let started = next_snapshot(&mut rx).await;
    assert!(started.thumbnails.is_empty());
    assert_eq!(started.generation, handle.generation());

    gate.add_permits(4);
    let snapshot = wait_for_pages(&mut rx, 1).await;
    assert_eq!(keys(&snapshot), vec![0, 1, 2, 3]);

    gate.add_permits(4);
    let snapshot = wait_for_pages(&mut rx, 5).await;
    assert_eq!(keys(&snapshot), (0..8).collect::<Vec<_>>());

    gate.add_permits(2);
    let outcome = handle.finish().await.unwrap();
    assert!(matches!(outcome, GenerationOutcome::Completed { pages: 10 }));

    let snapshot = next_snapshot(&mut rx).await;
    assert_eq!(snapshot.thumbnails.len(), 10);
}

#[tokio::test]
async fn test_key_sets_never_shrink_within_a_generation() {
    let loader = FakeLoader::default().with_document("a", 13);
    let settings = ThumbnailSettings {
        snapshot_every: 2,
        ..ThumbnailSettings::default()
    };
    let mut pipeline = ThumbnailPipeline::new(loader, settings);
    let mut rx = pipeline.subscribe();

    let collector = tokio::spawn(async move {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            let done = snapshot.thumbnails.len() == 13;
            seen.push(snapshot.thumbnails.keys().copied().collect::<Vec<_>>());
            if done {
                break;
            }
        }
        seen
    });

    pipeline.start(doc("a"), 13).finish().await.unwrap();
    let seen = timeout(Duration::from_secs(5), collector)
        .await
        .unwrap()
        .unwrap();

    for pair in seen.windows(2) {
        assert!(pair[0].iter().all(|key| pair[1].contains(key)));
    }
    assert_eq!(seen.last().unwrap().len(), 13);
}

#[tokio::test]
async fn test_switching_documents_discards_old_generation() {
    let (loader, gate) = FakeLoader::default()
        .with_document("a", 10)
        .with_document("b", 3)
        .gated();
    let rendered = Arc::clone(&loader.rendered);
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());
    let mut rx = pipeline.subscribe();

    let first = pipeline.start(doc("a"), 10);
    gate.add_permits(4);
    let snapshot = wait_for_pages(&mut rx, 4).await;
    assert_eq!(snapshot.document, Some(doc("a")));

    // New document: its snapshot starts empty right away
    let second = pipeline.start(doc("b"), 3);
    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.document, Some(doc("b")));
    assert!(snapshot.thumbnails.is_empty());
    assert!(second.generation() > first.generation());

    gate.add_permits(100);
    let first_outcome = first.finish().await.unwrap();
    let second_outcome = second.finish().await.unwrap();

    assert!(matches!(first_outcome, GenerationOutcome::Cancelled { .. }));
    assert!(matches!(second_outcome, GenerationOutcome::Completed { pages: 3 }));

    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.document, Some(doc("b")));
    assert_eq!(keys(&snapshot), vec![0, 1, 2]);
    assert_eq!(snapshot.generation, pipeline.generation());

    // The old generation stopped after at most its in-flight page
    let old_pages = rendered
        .lock()
        .unwrap()
        .iter()
        .filter(|(id, _)| id == "a")
        .count();
    assert!(old_pages <= 5);
}

#[tokio::test]
async fn test_render_failure_keeps_published_pages() {
    let loader = FakeLoader::default().with_document("a", 10).failing_on(5);
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());

    let outcome = pipeline.start(doc("a"), 10).finish().await.unwrap();
    match outcome {
        GenerationOutcome::Failed { pages, error } => {
            assert_eq!(pages, 5);
            assert!(matches!(error, PreviewError::Render { page: 5, .. }));
        }
        other => panic!("Expected failure, got {:?}", other),
    }

    // Only the snapshot emitted after page 3 is visible
    assert_eq!(keys(&pipeline.snapshot()), vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn test_failed_open_yields_empty_map() {
    let loader = FakeLoader::default().with_document("a", 2);
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());

    pipeline.start(doc("a"), 2).finish().await.unwrap();
    assert_eq!(pipeline.snapshot().thumbnails.len(), 2);

    let outcome = pipeline.start(doc("missing"), 2).finish().await.unwrap();
    assert!(matches!(
        outcome,
        GenerationOutcome::Failed {
            pages: 0,
            error: PreviewError::DocumentOpen(_)
        }
    ));

    let snapshot = pipeline.snapshot();
    assert_eq!(snapshot.document, Some(doc("missing")));
    assert!(snapshot.thumbnails.is_empty());
}

#[tokio::test]
async fn test_restarting_same_document_keeps_thumbnails_visible() {
    let (loader, gate) = FakeLoader::default().with_document("a", 4).gated();
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());

    gate.add_permits(4);
    let first = pipeline.start(doc("a"), 4);
    first.finish().await.unwrap();
    let before = pipeline.snapshot();
    assert_eq!(before.thumbnails.len(), 4);

    let second = pipeline.start(doc("a"), 4);
    let during = pipeline.snapshot();
    assert_eq!(during.generation, second.generation());
    assert_eq!(during.thumbnails.len(), 4);

    gate.add_permits(4);
    let outcome = second.finish().await.unwrap();
    assert!(matches!(outcome, GenerationOutcome::Completed { pages: 4 }));
    assert_eq!(pipeline.snapshot().thumbnails.len(), 4);
}

#[tokio::test]
async fn test_request_starts_once_per_document() {
    let loader = FakeLoader::default()
        .with_document("a", 1)
        .with_document("b", 1);
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());

    let first = pipeline.request(doc("a"), 1).unwrap();
    assert!(pipeline.request(doc("a"), 1).is_none());
    assert_eq!(pipeline.generation(), first.generation());

    let second = pipeline.request(doc("b"), 1).unwrap();
    assert!(second.generation() > first.generation());
    assert_eq!(pipeline.document(), Some(&doc("b")));

    second.finish().await.unwrap();
}

#[tokio::test]
async fn test_every_start_bumps_generation() {
    let loader = FakeLoader::default().with_document("a", 1);
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());
    assert_eq!(pipeline.generation(), 0);

    let a = pipeline.start(doc("a"), 1);
    let b = pipeline.start(doc("a"), 1);
    assert_eq!(a.generation(), 1);
    assert_eq!(b.generation(), 2);

    pipeline.shutdown();
    assert_eq!(pipeline.generation(), 3);
    assert_eq!(pipeline.document(), None);
}

#[tokio::test]
async fn test_shutdown_cancels_in_flight_generation() {
    let (loader, gate) = FakeLoader::default().with_document("a", 10).gated();
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());
    let mut rx = pipeline.subscribe();

    let handle = pipeline.start(doc("a"), 10);
    gate.add_permits(4);
    wait_for_pages(&mut rx, 4).await;

    pipeline.shutdown();
    gate.add_permits(100);

    let outcome = handle.finish().await.unwrap();
    assert!(matches!(outcome, GenerationOutcome::Cancelled { .. }));
    assert_eq!(pipeline.snapshot().thumbnails.len(), 4);
}

#[tokio::test]
async fn test_dropping_pipeline_cancels_generation() {
    let (loader, gate) = FakeLoader::default().with_document("a", 10).gated();
    let pipeline_rendered = Arc::clone(&loader.rendered);
    let mut pipeline = ThumbnailPipeline::new(loader, ThumbnailSettings::default());

    let handle = pipeline.start(doc("a"), 10);
    drop(pipeline);
    gate.add_permits(100);

    let outcome = handle.finish().await.unwrap();
    assert!(matches!(outcome, GenerationOutcome::Cancelled { .. }));
    assert!(pipeline_rendered.lock().unwrap().len() <= 1);
}
