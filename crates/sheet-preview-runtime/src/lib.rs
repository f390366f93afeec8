use std::path::PathBuf;

// Re-export types from the library crate
pub use sheet_preview::{SheetLayout, SheetSummary, ThumbnailSnapshot};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum PreviewCommand {
    /// Read a sheet layout produced by the imposition engine
    LoadLayout { path: PathBuf },
    /// Open the source PDF and start generating its thumbnails
    LoadDocument { path: PathBuf },
    /// Stop thumbnail work and forget the current document
    CloseDocument,
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum PreviewUpdate {
    LayoutLoaded {
        layout: SheetLayout,
        summary: SheetSummary,
    },
    DocumentLoaded {
        doc_id: DocumentId,
        path: PathBuf,
        page_count: usize,
    },
    /// A thumbnail snapshot replaced the previous one
    Thumbnails {
        doc_id: DocumentId,
        snapshot: ThumbnailSnapshot,
    },
    /// A generation ended; no more snapshots follow for it
    ThumbnailsFinished {
        doc_id: DocumentId,
        pages: usize,
        failed: bool,
    },
    DocumentClosed {
        doc_id: DocumentId,
    },
    Error {
        message: String,
    },
}

/// Handle to a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);
