use eframe::egui;
use sheet_preview::{
    InteractionState, PreviewOptions, RenderOptions, SheetLayout, SheetSummary, ThumbnailMap,
    compose, hit_test,
};
use sheet_preview_runtime::{DocumentId, PreviewCommand, PreviewUpdate};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::textures::ThumbnailTextures;
use crate::views::{PanelAction, PanelState, fit_scale, show_panel, show_sheet};

struct LoadedDocument {
    doc_id: DocumentId,
    path: PathBuf,
    page_count: usize,
}

pub struct SheetPreviewApp {
    layout: Option<SheetLayout>,
    summary: Option<SheetSummary>,
    document: Option<LoadedDocument>,
    thumbnails: Arc<ThumbnailMap>,
    textures: ThumbnailTextures,
    /// A thumbnail generation for `document` is running
    generating: bool,

    options: PreviewOptions,
    interaction: InteractionState,
    status: String,
    logger: AppLogger,

    // Async infrastructure
    command_tx: mpsc::UnboundedSender<PreviewCommand>,
    update_rx: mpsc::UnboundedReceiver<PreviewUpdate>,
    _tokio_handle: tokio::runtime::Handle,
}

impl SheetPreviewApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        logger: AppLogger,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let options = PreviewOptions::default();

        // Spawn worker task
        tokio_handle.spawn(crate::worker::worker_task(
            command_rx,
            update_tx,
            crate::worker::pdfium_loader(),
            options.thumbnails,
        ));

        let mut interaction = InteractionState::new();
        interaction.set_zoom(options.zoom);

        Self {
            layout: None,
            summary: None,
            document: None,
            thumbnails: Arc::new(ThumbnailMap::new()),
            textures: ThumbnailTextures::default(),
            generating: false,
            options,
            interaction,
            status: String::new(),
            logger,
            command_tx,
            update_rx,
            _tokio_handle: tokio_handle,
        }
    }

    fn send(&mut self, command: PreviewCommand, status: &str) {
        if self.command_tx.send(command).is_err() {
            self.status = "Worker stopped".to_string();
        } else {
            self.status = status.to_string();
        }
    }

    fn open_path(&mut self, path: PathBuf) {
        match path.extension().and_then(|s| s.to_str()) {
            Some("pdf") => self.send(PreviewCommand::LoadDocument { path }, "Loading PDF..."),
            Some("json") => self.send(PreviewCommand::LoadLayout { path }, "Loading layout..."),
            _ => self.status = format!("Unsupported file: {}", path.display()),
        }
    }

    fn process_updates(&mut self, ctx: &egui::Context) {
        while let Ok(update) = self.update_rx.try_recv() {
            match update {
                PreviewUpdate::LayoutLoaded { layout, summary } => {
                    self.status = format!(
                        "Layout: {} x {} mm, {} cells",
                        layout.sheet_width_mm,
                        layout.sheet_height_mm,
                        layout.grid.len()
                    );
                    self.interaction.hover(None);
                    self.layout = Some(layout);
                    self.summary = Some(summary);
                }
                PreviewUpdate::DocumentLoaded {
                    doc_id,
                    path,
                    page_count,
                } => {
                    self.status = format!("Loaded PDF with {} pages", page_count);
                    self.document = Some(LoadedDocument {
                        doc_id,
                        path,
                        page_count,
                    });
                    self.thumbnails = Arc::new(ThumbnailMap::new());
                    self.textures.clear();
                    self.generating = true;
                }
                PreviewUpdate::Thumbnails { doc_id, snapshot } => {
                    let current = self.document.as_ref().map(|doc| doc.doc_id);
                    if current == Some(doc_id) {
                        self.thumbnails = snapshot.thumbnails;
                        self.textures.sync(ctx, &self.thumbnails);
                    }
                }
                PreviewUpdate::ThumbnailsFinished {
                    doc_id,
                    pages,
                    failed,
                } => {
                    let current = self.document.as_ref().map(|doc| doc.doc_id);
                    if current == Some(doc_id) {
                        self.generating = false;
                        if !failed {
                            self.status = format!("Thumbnails ready for {} pages", pages);
                        }
                    }
                }
                PreviewUpdate::DocumentClosed { .. } => {
                    self.document = None;
                    self.generating = false;
                    self.thumbnails = Arc::new(ThumbnailMap::new());
                    self.textures.clear();
                    self.status = "Closed PDF".to_string();
                }
                PreviewUpdate::Error { message } => {
                    log::warn!("{}", message);
                    self.status = format!("Error: {message}");
                }
            }
        }
    }

    fn show_canvas(&mut self, ui: &mut egui::Ui) {
        let Some(layout) = &self.layout else {
            ui.centered_and_justified(|ui| {
                ui.label("Open or drop a sheet layout (.json) and its PDF");
            });
            return;
        };

        // Ctrl+scroll and pinch
        let zoom_delta = ui.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.interaction.set_zoom(self.interaction.zoom() * zoom_delta);
        }

        let render = self
            .interaction
            .render_options(RenderOptions::from_options(&self.options));
        let scene = compose(layout, &self.thumbnails, &render);
        let scale = fit_scale(ui.available_size(), &scene) * self.interaction.zoom();

        let sheet = egui::ScrollArea::both()
            .show(ui, |ui| show_sheet(ui, &scene, &self.textures, scale))
            .inner;

        let hovered = sheet.pointer.and_then(|point| hit_test(layout, point));
        if hovered != self.interaction.hovered() {
            self.interaction.hover(hovered);
            ui.ctx().request_repaint();
        }

        if let Some(tooltip) = self.interaction.tooltip(layout) {
            sheet.response.on_hover_ui_at_pointer(|ui| {
                for line in tooltip.lines() {
                    ui.label(line);
                }
            });
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl eframe::App for SheetPreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle drag-and-drop for layouts and PDFs
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        for path in dropped {
            self.open_path(path);
        }

        self.process_updates(ctx);

        let document_name = self.document.as_ref().map(|doc| file_name(&doc.path));
        let action = egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                let state = PanelState {
                    options: &mut self.options,
                    interaction: &mut self.interaction,
                    summary: self.summary.as_ref(),
                    document: document_name
                        .as_deref()
                        .zip(self.document.as_ref().map(|doc| doc.page_count)),
                    thumbnails_ready: self.thumbnails.len(),
                };
                let action = show_panel(ui, state);

                ui.separator();
                egui::CollapsingHeader::new("Log").show(ui, |ui| {
                    for entry in self.logger.recent(20) {
                        ui.monospace(entry.display());
                    }
                });
                action
            })
            .inner;

        match action {
            Some(PanelAction::OpenLayout(path)) | Some(PanelAction::OpenDocument(path)) => {
                self.open_path(path)
            }
            Some(PanelAction::CloseDocument) => {
                self.send(PreviewCommand::CloseDocument, "Closing PDF...")
            }
            None => {}
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let message = if self.status.is_empty() {
                self.logger.latest_message().unwrap_or_default()
            } else {
                self.status.clone()
            };
            ui.label(message);
        });

        egui::CentralPanel::default().show(ctx, |ui| self.show_canvas(ui));

        // Thumbnails arrive from the worker without user input
        if self.generating {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
