use eframe::egui;
use sheet_preview::{InteractionState, PreviewOptions, SheetGuides, SheetSummary};
use std::path::PathBuf;

/// What the user asked for in the side panel this frame
#[derive(Debug)]
pub enum PanelAction {
    OpenLayout(PathBuf),
    OpenDocument(PathBuf),
    CloseDocument,
}

pub struct PanelState<'a> {
    pub options: &'a mut PreviewOptions,
    pub interaction: &'a mut InteractionState,
    pub summary: Option<&'a SheetSummary>,
    pub document: Option<(&'a str, usize)>,
    pub thumbnails_ready: usize,
}

pub fn show_panel(ui: &mut egui::Ui, state: PanelState<'_>) -> Option<PanelAction> {
    let mut action = None;

    ui.heading("Sheet");
    ui.horizontal(|ui| {
        if ui.button("Open layout...").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Layout", &["json"])
                .pick_file()
            {
                action = Some(PanelAction::OpenLayout(path));
            }
        }
        if ui.button("Open PDF...").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("PDF", &["pdf"])
                .pick_file()
            {
                action = Some(PanelAction::OpenDocument(path));
            }
        }
    });

    if let Some((name, page_count)) = state.document {
        ui.horizontal(|ui| {
            ui.label(format!(
                "{} ({}/{} thumbnails)",
                name, state.thumbnails_ready, page_count
            ));
            if ui.small_button("Close").clicked() {
                action = Some(PanelAction::CloseDocument);
            }
        });
    }

    ui.separator();
    ui.heading("Layers");
    ui.checkbox(&mut state.options.show_bleed, "Bleed");
    ui.checkbox(&mut state.options.show_marks, "Printer's marks");

    let mut show_guides = state.options.guides.is_some();
    if ui.checkbox(&mut show_guides, "Margin guide").changed() {
        state.options.guides = show_guides.then(SheetGuides::default);
    }
    if let Some(guides) = &mut state.options.guides {
        ui.add(
            egui::Slider::new(&mut guides.mark_margin_mm, 0.0..=30.0)
                .text("Mark margin (mm)"),
        );
        ui.add(egui::Slider::new(&mut guides.grip_edge_mm, 0.0..=30.0).text("Grip edge (mm)"));
    }

    ui.separator();
    ui.heading("Zoom");
    ui.horizontal(|ui| {
        if ui.button("−").clicked() {
            state.interaction.zoom_out();
        }
        ui.label(format!("{:.0}%", state.interaction.zoom() * 100.0));
        if ui.button("+").clicked() {
            state.interaction.zoom_in();
        }
        if ui.button("Reset").clicked() {
            state.interaction.reset_zoom();
        }
    });

    if let Some(summary) = state.summary {
        ui.separator();
        ui.heading("Summary");
        for line in summary.lines() {
            ui.label(line);
        }
    }

    action
}
