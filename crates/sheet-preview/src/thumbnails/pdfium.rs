//! PDFium-backed document loader
//!
//! PDFium bindings are not shareable across threads, so every blocking task
//! binds the library and loads the document from the shared bytes itself.

use super::source::{DocumentLoader, DocumentRef, PageSource};
use super::surface::SurfaceFrame;
use crate::types::{PreviewError, Result};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Bind PDFium from `library_dir` if given, then from the system search path
pub fn bind_pdfium(library_dir: Option<&Path>) -> std::result::Result<Pdfium, PdfiumError> {
    if let Some(dir) = library_dir {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
        {
            return Ok(Pdfium::new(binding));
        }
        log::debug!("No PDFium library in {}, trying system library", dir.display());
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// Opens PDFs with PDFium
#[derive(Debug, Clone, Default)]
pub struct PdfiumLoader {
    library_dir: Option<PathBuf>,
}

impl PdfiumLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look for the PDFium shared library in `dir` first
    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(dir.into()),
        }
    }
}

impl DocumentLoader for PdfiumLoader {
    type Source = PdfiumSource;

    async fn open(&self, document: &DocumentRef) -> Result<PdfiumSource> {
        let bytes: Arc<[u8]> = match document {
            DocumentRef::Path(path) => tokio::fs::read(path).await?.into(),
            DocumentRef::Memory { bytes, .. } => Arc::clone(bytes),
        };

        let library_dir = self.library_dir.clone();
        let task_bytes = Arc::clone(&bytes);
        let page_sizes = tokio::task::spawn_blocking(move || {
            let pdfium = bind_pdfium(library_dir.as_deref()).map_err(|e| e.to_string())?;
            let document = pdfium
                .load_pdf_from_byte_slice(&task_bytes[..], None)
                .map_err(|e| e.to_string())?;

            let sizes = document
                .pages()
                .iter()
                .map(|page| (page.width().value, page.height().value))
                .collect::<Vec<_>>();
            Ok::<_, String>(sizes)
        })
        .await?
        .map_err(PreviewError::DocumentOpen)?;

        log::debug!("Opened {} with {} pages", document, page_sizes.len());
        Ok(PdfiumSource {
            bytes,
            page_sizes,
            library_dir: self.library_dir.clone(),
        })
    }
}

/// An open PDF; pages are rasterized on the blocking pool
#[derive(Debug)]
pub struct PdfiumSource {
    bytes: Arc<[u8]>,
    page_sizes: Vec<(f32, f32)>,
    library_dir: Option<PathBuf>,
}

impl PageSource for PdfiumSource {
    fn page_count(&self) -> usize {
        self.page_sizes.len()
    }

    fn page_size(&self, index: usize) -> Result<(f32, f32)> {
        self.page_sizes
            .get(index)
            .copied()
            .ok_or_else(|| PreviewError::Render {
                page: index,
                message: "page out of range".to_string(),
            })
    }

    async fn render_page(&mut self, index: usize, frame: &mut SurfaceFrame<'_>) -> Result<()> {
        let bytes = Arc::clone(&self.bytes);
        let library_dir = self.library_dir.clone();
        let (width, height) = (frame.width(), frame.height());
        let page_index = pdfium_page_index(index)?;

        let (rgba, bitmap_width, bitmap_height) = tokio::task::spawn_blocking(move || {
            let pdfium = bind_pdfium(library_dir.as_deref()).map_err(|e| e.to_string())?;
            let document = pdfium
                .load_pdf_from_byte_slice(&bytes[..], None)
                .map_err(|e| e.to_string())?;
            let page = document
                .pages()
                .get(page_index)
                .map_err(|e| e.to_string())?;

            let config = PdfRenderConfig::new()
                .set_target_width(width as i32)
                .set_maximum_height(height as i32);

            let bitmap = page.render_with_config(&config).map_err(|e| e.to_string())?;
            let rgba = bitmap.as_rgba_bytes().to_vec();
            Ok::<_, String>((rgba, bitmap.width() as u32, bitmap.height() as u32))
        })
        .await?
        .map_err(|message| PreviewError::Render { page: index, message })?;

        frame.composite_rgba(&rgba, bitmap_width, bitmap_height);
        Ok(())
    }
}

/// PDFium addresses pages with a `u16`
fn pdfium_page_index(index: usize) -> Result<u16> {
    u16::try_from(index).map_err(|_| PreviewError::Render {
        page: index,
        message: format!("page index {} exceeds PDFium's limit of {}", index, u16::MAX),
    })
}
