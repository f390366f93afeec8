//! Layered rendering of one sheet side
//!
//! `compose` turns a layout, its marks and the current thumbnails into a
//! [`Scene`]. It keeps no state between calls: any change (new layout, new
//! thumbnail snapshot, toggles, hover) is handled by composing again, which is
//! cheap for the tens of cells and marks a sheet carries.
//!
//! Layers, back to front:
//! 1. sheet background
//! 2. margin guide
//! 3. cells (bleed, trim, thumbnail, border, label, interior edges)
//! 4. printer's marks

mod layers;
mod marks;
mod scene;
mod svg;

pub use marks::mark_primitives;
pub use scene::*;
pub use svg::scene_to_svg;

use crate::coords::CoordinateMapper;
use crate::options::{PreviewOptions, SheetGuides};
use crate::thumbnails::ThumbnailMap;
use crate::types::SheetLayout;

/// Toggles and presentation state for one composition
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderOptions {
    pub show_bleed: bool,
    pub show_marks: bool,
    /// Sheet margins used for the dashed guide; None hides the guide
    pub guides: Option<SheetGuides>,
    /// Grid index of the hovered cell
    pub hovered: Option<usize>,
}

impl RenderOptions {
    pub fn from_options(options: &PreviewOptions) -> Self {
        Self {
            show_bleed: options.show_bleed,
            show_marks: options.show_marks,
            guides: options.guides,
            hovered: None,
        }
    }

    pub fn with_hovered(mut self, hovered: Option<usize>) -> Self {
        self.hovered = hovered;
        self
    }
}

/// Compose one sheet side into a scene
pub fn compose(layout: &SheetLayout, thumbnails: &ThumbnailMap, options: &RenderOptions) -> Scene {
    let mapper = CoordinateMapper::new(layout.sheet_height_mm);
    let mut scene = Scene::new(layout.sheet_width_mm, layout.sheet_height_mm);

    layers::draw_sheet(&mut scene, layout, &mapper);

    if let Some(guides) = &options.guides {
        layers::draw_margin_guide(&mut scene, layout, &mapper, guides);
    }

    for (index, cell) in layout.grid.iter().enumerate() {
        if cell.page_index.is_none() {
            continue;
        }
        layers::draw_cell(&mut scene, index, cell, layout, &mapper, thumbnails, options);
    }

    if options.show_marks {
        for (index, mark) in layout.marks.iter().enumerate() {
            for primitive in mark_primitives(mark, &mapper) {
                scene.push(Role::Mark(index), primitive);
            }
        }
    }

    scene
}

impl Scene {
    /// Standalone SVG document; `zoom` scales the physical size only
    pub fn to_svg(&self, zoom: f32) -> String {
        scene_to_svg(self, zoom)
    }
}
