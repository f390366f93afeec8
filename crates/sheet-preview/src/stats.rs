use crate::types::*;
use std::collections::BTreeMap;

/// Summary of what one sheet side carries
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    /// Grid slots on the sheet
    pub cells: usize,
    /// Slots holding a page
    pub placed_pages: usize,
    /// Slots left empty
    pub empty_slots: usize,
    /// Distinct source pages referenced
    pub distinct_pages: usize,
    /// Slots with bleed on at least one edge
    pub cells_with_bleed: usize,
    /// Marks per type name
    pub marks: BTreeMap<String, usize>,
}

/// Summarize a sheet layout
pub fn summarize(layout: &SheetLayout) -> SheetSummary {
    let placed_pages = layout.placed_cells().count();

    let cells_with_bleed = layout
        .placed_cells()
        .filter(|(_, cell)| {
            let bleed = cell.bleed();
            bleed.top > 0.0 || bleed.bottom > 0.0 || bleed.left > 0.0 || bleed.right > 0.0
        })
        .count();

    let mut marks = BTreeMap::new();
    for mark in &layout.marks {
        *marks.entry(mark.kind.as_str().to_string()).or_insert(0) += 1;
    }

    SheetSummary {
        cells: layout.grid.len(),
        placed_pages,
        empty_slots: layout.grid.len() - placed_pages,
        distinct_pages: layout.page_indices().len(),
        cells_with_bleed,
        marks,
    }
}

impl SheetSummary {
    /// Human-readable lines, as printed by `sheetpv info`
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Cells: {}", self.cells),
            format!("Placed pages: {}", self.placed_pages),
            format!("Empty slots: {}", self.empty_slots),
            format!("Distinct pages: {}", self.distinct_pages),
            format!("Cells with bleed: {}", self.cells_with_bleed),
        ];
        if self.marks.is_empty() {
            lines.push("Marks: none".to_string());
        } else {
            for (kind, count) in &self.marks {
                lines.push(format!("Marks ({}): {}", kind, count));
            }
        }
        lines
    }
}
