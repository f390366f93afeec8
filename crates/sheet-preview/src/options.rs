use crate::constants::*;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Sheet margins used to draw the margin guide (from the engine's sheet config)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetGuides {
    /// Margin reserved for marks on every side
    pub mark_margin_mm: f32,
    /// Extra margin at the lead (bottom) edge for the press gripper
    pub grip_edge_mm: f32,
}

impl Default for SheetGuides {
    fn default() -> Self {
        Self {
            mark_margin_mm: 8.0,
            grip_edge_mm: 10.0,
        }
    }
}

/// Thumbnail generation tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailSettings {
    /// Longest edge of each thumbnail in pixels
    pub max_dimension_px: u32,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    /// Pages rendered between progressive snapshots
    pub snapshot_every: usize,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            max_dimension_px: THUMBNAIL_MAX_DIMENSION_PX,
            jpeg_quality: THUMBNAIL_JPEG_QUALITY,
            snapshot_every: THUMBNAIL_SNAPSHOT_EVERY,
        }
    }
}

/// Preview configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewOptions {
    // Layer toggles
    pub show_bleed: bool,
    pub show_marks: bool,

    // Sheet margins for the guide layer
    pub guides: Option<SheetGuides>,

    // Thumbnail pipeline
    pub thumbnails: ThumbnailSettings,

    // Initial zoom
    pub zoom: f32,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            show_bleed: true,
            show_marks: true,
            guides: Some(SheetGuides::default()),
            thumbnails: ThumbnailSettings::default(),
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl PreviewOptions {
    /// Load options from JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: PreviewOptions = serde_json::from_slice(&bytes)
            .map_err(|e| PreviewError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PreviewError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom) {
            return Err(PreviewError::Config(format!(
                "Zoom must be between {} and {}",
                MIN_ZOOM, MAX_ZOOM
            )));
        }

        if self.thumbnails.max_dimension_px == 0 {
            return Err(PreviewError::Config(
                "Thumbnail size must be at least 1 pixel".to_string(),
            ));
        }

        if !(1..=100).contains(&self.thumbnails.jpeg_quality) {
            return Err(PreviewError::Config(
                "JPEG quality must be between 1 and 100".to_string(),
            ));
        }

        if self.thumbnails.snapshot_every == 0 {
            return Err(PreviewError::Config(
                "Snapshot interval must be at least 1 page".to_string(),
            ));
        }

        if let Some(guides) = &self.guides {
            if guides.mark_margin_mm < 0.0 || guides.grip_edge_mm < 0.0 {
                return Err(PreviewError::Config(
                    "Sheet margins must not be negative".to_string(),
                ));
            }
        }

        Ok(())
    }
}
