use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid thumbnail data: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
    #[error("Failed to open document: {0}")]
    DocumentOpen(String),
    #[error("Failed to render page {page}: {message}")]
    Render { page: usize, message: String },
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PreviewError>;

/// Tolerance used when comparing millimeter coordinates
const EPSILON_MM: f32 = 1e-3;

/// A rectangle in print space (millimeters, origin bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rectangle {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// True when the interiors intersect; shared edges do not count.
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        self.x + EPSILON_MM < other.right()
            && other.x + EPSILON_MM < self.right()
            && self.y + EPSILON_MM < other.top()
            && other.y + EPSILON_MM < self.top()
    }
}

/// One of the four edges of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        })
    }
}

/// Bleed extending past each trim edge, in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeBleed {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// Which edges of a cell are cut lines shared with a neighbouring page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeFlags {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl EdgeFlags {
    /// Flagged edges in top, bottom, left, right order
    pub fn edges(&self) -> Vec<Edge> {
        [
            (self.top, Edge::Top),
            (self.bottom, Edge::Bottom),
            (self.left, Edge::Left),
            (self.right, Edge::Right),
        ]
        .into_iter()
        .filter_map(|(set, edge)| set.then_some(edge))
        .collect()
    }
}

/// A slot on the sheet, as delivered by the imposition engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridCell {
    #[serde(default)]
    pub row: usize,
    #[serde(default)]
    pub col: usize,
    /// Source page placed in this slot (None = empty slot)
    #[serde(default)]
    pub page_index: Option<usize>,
    /// Page rotation in degrees
    #[serde(default)]
    pub rotation: i32,
    /// Trim area grown by the bleed
    #[serde(default)]
    pub clip_rect: Option<Rectangle>,
    #[serde(default)]
    pub bleed_per_edge: Option<EdgeBleed>,
    #[serde(default)]
    pub is_interior_edge: Option<EdgeFlags>,
    #[serde(default)]
    pub trim_origin_x: f32,
    #[serde(default)]
    pub trim_origin_y: f32,
}

impl GridCell {
    /// Cell placing `page_index` with its trim origin at (x, y)
    pub fn placed(page_index: usize, x: f32, y: f32) -> Self {
        Self {
            page_index: Some(page_index),
            trim_origin_x: x,
            trim_origin_y: y,
            ..Self::default()
        }
    }

    /// Trim rectangle for the given trim size
    pub fn trim_rect(&self, trim_w: f32, trim_h: f32) -> Rectangle {
        Rectangle::new(self.trim_origin_x, self.trim_origin_y, trim_w, trim_h)
    }

    pub fn bleed(&self) -> EdgeBleed {
        self.bleed_per_edge.unwrap_or_default()
    }

    pub fn interior_edges(&self) -> EdgeFlags {
        self.is_interior_edge.unwrap_or_default()
    }
}

/// Kind of printer's mark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarkKind {
    Crop,
    Registration,
    ColorBar,
    Fold,
    SlugText,
    /// A mark type this renderer does not know about
    Other(String),
}

impl From<String> for MarkKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "crop" => MarkKind::Crop,
            "registration" => MarkKind::Registration,
            "color_bar" => MarkKind::ColorBar,
            "fold" => MarkKind::Fold,
            "slug_text" => MarkKind::SlugText,
            _ => MarkKind::Other(value),
        }
    }
}

impl From<MarkKind> for String {
    fn from(kind: MarkKind) -> Self {
        kind.as_str().to_string()
    }
}

impl MarkKind {
    pub fn as_str(&self) -> &str {
        match self {
            MarkKind::Crop => "crop",
            MarkKind::Registration => "registration",
            MarkKind::ColorBar => "color_bar",
            MarkKind::Fold => "fold",
            MarkKind::SlugText => "slug_text",
            MarkKind::Other(name) => name,
        }
    }
}

/// Type-specific mark attributes (`radius`, `width`, `cmyk`, `text`, ...)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkProperties(pub serde_json::Map<String, serde_json::Value>);

impl MarkProperties {
    /// Numeric property, ignoring values of the wrong type
    pub fn number(&self, key: &str) -> Option<f32> {
        self.0.get(key)?.as_f64().map(|v| v as f32)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.as_str()
    }

    /// The `cmyk` ink tuple; missing channels read as 0
    pub fn cmyk(&self) -> Option<[f32; 4]> {
        let values = self.0.get("cmyk")?.as_array()?;
        let mut ink = [0.0; 4];
        for (slot, value) in ink.iter_mut().zip(values) {
            *slot = value.as_f64().unwrap_or(0.0) as f32;
        }
        Some(ink)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<serde_json::Value>) {
        self.0.insert(key.to_string(), value.into());
    }
}

/// A printer's mark in print space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkKind,
    #[serde(default)]
    pub x1: f32,
    #[serde(default)]
    pub y1: f32,
    #[serde(default)]
    pub x2: f32,
    #[serde(default)]
    pub y2: f32,
    #[serde(default)]
    pub properties: MarkProperties,
}

impl Mark {
    pub fn new(kind: MarkKind, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            kind,
            x1,
            y1,
            x2,
            y2,
            properties: MarkProperties::default(),
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key, value);
        self
    }
}

/// One side of a press sheet as computed by the imposition engine.
///
/// Always replaced as a whole when the engine recomputes; never patched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetLayout {
    pub sheet_width_mm: f32,
    pub sheet_height_mm: f32,
    pub effective_trim_w: f32,
    pub effective_trim_h: f32,
    #[serde(default)]
    pub grid: Vec<GridCell>,
    #[serde(default)]
    pub marks: Vec<Mark>,
    /// Source document page count, when the engine reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
}

impl SheetLayout {
    pub fn new(sheet_width_mm: f32, sheet_height_mm: f32, trim_w: f32, trim_h: f32) -> Self {
        Self {
            sheet_width_mm,
            sheet_height_mm,
            effective_trim_w: trim_w,
            effective_trim_h: trim_h,
            ..Self::default()
        }
    }

    /// Parse and validate a layout from the engine's JSON response
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: SheetLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Trim rectangle of a cell in print space
    pub fn trim_rect(&self, cell: &GridCell) -> Rectangle {
        cell.trim_rect(self.effective_trim_w, self.effective_trim_h)
    }

    /// Cells holding a page, with their grid index
    pub fn placed_cells(&self) -> impl Iterator<Item = (usize, &GridCell)> {
        self.grid
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.page_index.is_some())
    }

    /// Distinct page indices referenced by the grid
    pub fn page_indices(&self) -> BTreeSet<usize> {
        self.grid.iter().filter_map(|cell| cell.page_index).collect()
    }

    /// Check sheet geometry and that placed trim areas are disjoint
    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("sheet_width_mm", self.sheet_width_mm),
            ("sheet_height_mm", self.sheet_height_mm),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(PreviewError::InvalidLayout(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let trims = [
            ("effective_trim_w", self.effective_trim_w),
            ("effective_trim_h", self.effective_trim_h),
        ];
        for (name, value) in trims {
            if !value.is_finite() || value < 0.0 {
                return Err(PreviewError::InvalidLayout(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        let placed: Vec<(usize, Rectangle)> = self
            .placed_cells()
            .map(|(index, cell)| (index, self.trim_rect(cell)))
            .collect();
        for (i, (a_index, a)) in placed.iter().enumerate() {
            for (b_index, b) in &placed[i + 1..] {
                if a.overlaps(b) {
                    return Err(PreviewError::InvalidLayout(format!(
                        "trim areas of cells {a_index} and {b_index} overlap"
                    )));
                }
            }
        }

        if let Some(page_count) = self.page_count {
            self.validate_page_indices(page_count)?;
        }

        Ok(())
    }

    /// Every placed page index must lie in `0..page_count`
    pub fn validate_page_indices(&self, page_count: usize) -> Result<()> {
        for (index, cell) in self.placed_cells() {
            if let Some(page) = cell.page_index {
                if page >= page_count {
                    return Err(PreviewError::InvalidLayout(format!(
                        "cell {index} places page {page} but the document has {page_count} pages"
                    )));
                }
            }
        }
        Ok(())
    }
}
