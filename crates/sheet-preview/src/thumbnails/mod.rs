//! Cancellable, progressive page thumbnail generation

mod pipeline;
mod source;
mod surface;

#[cfg(feature = "pdfium")]
mod pdfium;

pub use pipeline::{GenerationHandle, GenerationOutcome, ThumbnailPipeline};
pub use source::{DocumentLoader, DocumentRef, PageSource};
pub use surface::{RasterSurface, SurfaceFrame, thumbnail_size};

#[cfg(feature = "pdfium")]
pub use pdfium::{PdfiumLoader, PdfiumSource, bind_pdfium};

use crate::types::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::BTreeMap;
use std::sync::Arc;

const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// One encoded page thumbnail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// `data:image/jpeg;base64,...`, usable directly as an image source
    pub data_uri: Arc<str>,
    pub width: u32,
    pub height: u32,
}

impl Thumbnail {
    /// Decode the embedded JPEG bytes
    pub fn jpeg_bytes(&self) -> Result<Vec<u8>> {
        let payload = self
            .data_uri
            .strip_prefix(JPEG_DATA_URI_PREFIX)
            .unwrap_or(&self.data_uri);
        Ok(STANDARD.decode(payload)?)
    }
}

/// Thumbnails keyed by 0-based page index
pub type ThumbnailMap = BTreeMap<usize, Thumbnail>;

/// What observers of the pipeline receive. The map is never mutated after
/// publication; each snapshot replaces the previous one wholesale.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailSnapshot {
    pub generation: u64,
    pub document: Option<DocumentRef>,
    pub thumbnails: Arc<ThumbnailMap>,
}
