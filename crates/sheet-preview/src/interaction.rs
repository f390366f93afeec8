//! Hover and zoom state for an interactive sheet view
//!
//! Nothing here touches layout data: hover only changes how one cell is
//! presented, and zoom is a scale factor applied when the scene is painted.

use crate::compositor::RenderOptions;
use crate::constants::*;
use crate::coords::{CoordinateMapper, ScreenPoint};
use crate::types::{Edge, EdgeBleed, SheetLayout};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    hovered: Option<usize>,
    zoom: f32,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            hovered: None,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight a cell by grid index, or clear the highlight
    pub fn hover(&mut self, cell: Option<usize>) {
        self.hovered = cell;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Change the zoom by `delta`, clamped to the supported range
    pub fn zoom_by(&mut self, delta: f32) -> f32 {
        self.set_zoom(self.zoom + delta)
    }

    /// Set the zoom directly, clamped to the supported range.
    /// Non-finite values leave the zoom unchanged.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.zoom_by(ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.zoom_by(-ZOOM_STEP)
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = DEFAULT_ZOOM;
    }

    /// Apply the hover state to a set of render toggles
    pub fn render_options(&self, base: RenderOptions) -> RenderOptions {
        base.with_hovered(self.hovered)
    }

    /// Details for the hovered cell, if it holds a page
    pub fn tooltip(&self, layout: &SheetLayout) -> Option<CellTooltip> {
        let index = self.hovered?;
        let cell = layout.grid.get(index)?;
        let page_index = cell.page_index?;

        Some(CellTooltip {
            cell_index: index,
            page_number: page_index + 1,
            row: cell.row,
            col: cell.col,
            bleed: cell.bleed(),
            interior_edges: cell.interior_edges().edges(),
            rotation: cell.rotation,
        })
    }
}

/// Cell under a render-space point (unzoomed millimeters), ignoring empty slots.
///
/// Later cells win when trim areas touch, matching paint order.
pub fn hit_test(layout: &SheetLayout, point: ScreenPoint) -> Option<usize> {
    let mapper = CoordinateMapper::new(layout.sheet_height_mm);
    layout
        .placed_cells()
        .filter(|(_, cell)| mapper.rect(&layout.trim_rect(cell)).contains(point))
        .map(|(index, _)| index)
        .last()
}

/// Information shown while hovering a cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellTooltip {
    pub cell_index: usize,
    /// 1-based page number
    pub page_number: usize,
    pub row: usize,
    pub col: usize,
    pub bleed: EdgeBleed,
    pub interior_edges: Vec<Edge>,
    /// Degrees
    pub rotation: i32,
}

impl CellTooltip {
    pub fn lines(&self) -> Vec<String> {
        let interior = if self.interior_edges.is_empty() {
            "none".to_string()
        } else {
            self.interior_edges
                .iter()
                .map(|edge| edge.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        vec![
            format!("Page {}", self.page_number),
            format!("Row {}, column {}", self.row + 1, self.col + 1),
            format!(
                "Bleed: top {} / bottom {} / left {} / right {} mm",
                self.bleed.top, self.bleed.bottom, self.bleed.left, self.bleed.right
            ),
            format!("Interior edges: {}", interior),
            format!("Rotation: {}°", self.rotation),
        ]
    }
}
