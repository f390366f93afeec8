//! Layout and document I/O

use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Load and validate a sheet layout from a JSON file
pub async fn load_layout(path: impl AsRef<Path>) -> Result<SheetLayout> {
    let json = tokio::fs::read_to_string(path).await?;
    SheetLayout::from_json(&json)
}

/// Write a layout as pretty-printed JSON
pub async fn save_layout(layout: &SheetLayout, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(layout)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Number of pages in a PDF
pub async fn read_page_count(path: impl AsRef<Path>) -> Result<usize> {
    let bytes = tokio::fs::read(path).await?;
    let count = tokio::task::spawn_blocking(move || {
        let doc = Document::load_mem(&bytes)?;
        Ok::<_, PreviewError>(doc.get_pages().len())
    })
    .await??;
    Ok(count)
}
