//! Document sources for thumbnail generation

use super::surface::SurfaceFrame;
use crate::types::Result;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

/// Identifies the source document thumbnails are generated from.
///
/// Two references are the same document when their paths or memory ids match.
#[derive(Clone)]
pub enum DocumentRef {
    /// A PDF on disk
    Path(PathBuf),
    /// A PDF already held in memory (uploaded or streamed in full)
    Memory { id: String, bytes: Arc<[u8]> },
}

impl DocumentRef {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        DocumentRef::Path(path.into())
    }

    pub fn memory(id: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        DocumentRef::Memory {
            id: id.into(),
            bytes: bytes.into(),
        }
    }
}

impl PartialEq for DocumentRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DocumentRef::Path(a), DocumentRef::Path(b)) => a == b,
            (DocumentRef::Memory { id: a, .. }, DocumentRef::Memory { id: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for DocumentRef {}

impl fmt::Debug for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRef::Path(path) => f.debug_tuple("Path").field(path).finish(),
            DocumentRef::Memory { id, bytes } => f
                .debug_struct("Memory")
                .field("id", id)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRef::Path(path) => write!(f, "{}", path.display()),
            DocumentRef::Memory { id, .. } => write!(f, "memory:{}", id),
        }
    }
}

/// An opened document that can rasterize its pages.
///
/// Dropping the source releases the underlying document.
pub trait PageSource: Send {
    /// Number of pages the document reports
    fn page_count(&self) -> usize;

    /// Page size in points (width, height)
    fn page_size(&self, index: usize) -> Result<(f32, f32)>;

    /// Draw page `index` onto `frame`, which is already sized and filled white.
    ///
    /// This is the pipeline's only suspension point.
    fn render_page(
        &mut self,
        index: usize,
        frame: &mut SurfaceFrame<'_>,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Opens documents for the thumbnail pipeline
pub trait DocumentLoader: Send + Sync + 'static {
    type Source: PageSource + 'static;

    fn open(&self, document: &DocumentRef) -> impl Future<Output = Result<Self::Source>> + Send;
}
