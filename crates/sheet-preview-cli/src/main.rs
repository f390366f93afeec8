use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sheet_preview::thumbnails::PdfiumLoader;
use sheet_preview::*;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetpv", about = "Press sheet preview CLI", version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one sheet side to SVG
    Render {
        /// Sheet layout JSON from the imposition engine
        #[arg(short, long)]
        layout: PathBuf,

        /// Source PDF; when given, placed pages show thumbnails
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,

        /// Preview options JSON
        #[arg(long)]
        options: Option<PathBuf>,

        /// Show bleed areas
        #[arg(long)]
        bleed: Option<bool>,

        /// Show printer's marks
        #[arg(long)]
        marks: Option<bool>,

        /// Zoom factor applied to the SVG size
        #[arg(long)]
        zoom: Option<f32>,

        /// Highlight the cell with this grid index
        #[arg(long)]
        hover: Option<usize>,

        /// Mark margin in mm for the margin guide
        #[arg(long)]
        mark_margin: Option<f32>,

        /// Grip edge in mm for the margin guide
        #[arg(long)]
        grip_edge: Option<f32>,

        /// Hide the margin guide
        #[arg(long)]
        no_guides: bool,
    },

    /// Write page thumbnails as JPEG files
    Thumbnails {
        /// Source PDF
        #[arg(long)]
        pdf: PathBuf,

        /// Number of pages to render (default: all)
        #[arg(long)]
        pages: Option<usize>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Summarize a sheet layout
    Info {
        /// Sheet layout JSON
        #[arg(short, long)]
        layout: PathBuf,

        /// Check page indices against this PDF
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    match cli.command {
        Commands::Render {
            layout,
            pdf,
            output,
            options,
            bleed,
            marks,
            zoom,
            hover,
            mark_margin,
            grip_edge,
            no_guides,
        } => {
            let mut preview = match options {
                Some(path) => PreviewOptions::load(&path)
                    .await
                    .with_context(|| format!("loading options {}", path.display()))?,
                None => PreviewOptions::default(),
            };
            if let Some(bleed) = bleed {
                preview.show_bleed = bleed;
            }
            if let Some(marks) = marks {
                preview.show_marks = marks;
            }
            if let Some(zoom) = zoom {
                preview.zoom = zoom;
            }
            if no_guides {
                preview.guides = None;
            } else if mark_margin.is_some() || grip_edge.is_some() {
                let guides = preview.guides.get_or_insert_with(SheetGuides::default);
                if let Some(margin) = mark_margin {
                    guides.mark_margin_mm = margin;
                }
                if let Some(grip) = grip_edge {
                    guides.grip_edge_mm = grip;
                }
            }
            preview.validate()?;

            let layout = load_layout(&layout)
                .await
                .with_context(|| format!("loading layout {}", layout.display()))?;

            let thumbnails = match pdf {
                Some(pdf) => {
                    check_pages(&layout, &pdf).await?;
                    let needed = layout.page_indices().last().map_or(0, |last| last + 1);
                    thumbnails_for_render(
                        PdfiumLoader::new(),
                        DocumentRef::path(&pdf),
                        needed,
                        preview.thumbnails,
                    )
                    .await
                }
                None => ThumbnailMap::new(),
            };

            let mut state = InteractionState::new();
            state.set_zoom(preview.zoom);
            state.hover(hover);

            let render = state.render_options(RenderOptions::from_options(&preview));
            let scene = compose(&layout, &thumbnails, &render);
            tokio::fs::write(&output, scene.to_svg(state.zoom())).await?;

            if let Some(tooltip) = state.tooltip(&layout) {
                for line in tooltip.lines() {
                    println!("  {}", line);
                }
            }
            println!(
                "Rendered {} primitives ({} thumbnails) → {}",
                scene.len(),
                thumbnails.len(),
                output.display()
            );
        }

        Commands::Thumbnails { pdf, pages, output } => {
            let page_count = read_page_count(&pdf).await?;
            let pages = pages.unwrap_or(page_count);
            let thumbnails =
                generate_thumbnails(&pdf, pages, ThumbnailSettings::default()).await?;

            tokio::fs::create_dir_all(&output).await?;
            for (index, thumbnail) in &thumbnails {
                let path = output.join(format!("page-{:04}.jpg", index + 1));
                tokio::fs::write(&path, thumbnail.jpeg_bytes()?).await?;
            }
            println!(
                "Wrote {} thumbnails → {}",
                thumbnails.len(),
                output.display()
            );
        }

        Commands::Info { layout, pdf } => {
            let layout = load_layout(&layout)
                .await
                .with_context(|| format!("loading layout {}", layout.display()))?;

            println!("Sheet Summary:");
            println!(
                "  Sheet: {} x {} mm, trim {} x {} mm",
                layout.sheet_width_mm,
                layout.sheet_height_mm,
                layout.effective_trim_w,
                layout.effective_trim_h
            );
            for line in summarize(&layout).lines() {
                println!("  {}", line);
            }

            if let Some(pdf) = pdf {
                let page_count = check_pages(&layout, &pdf).await?;
                println!("  Document pages: {}", page_count);
            }
        }
    }

    Ok(())
}

/// Fail if the layout places pages the PDF does not have
async fn check_pages(layout: &SheetLayout, pdf: &Path) -> Result<usize> {
    let page_count = read_page_count(pdf)
        .await
        .with_context(|| format!("reading {}", pdf.display()))?;
    layout.validate_page_indices(page_count)?;
    Ok(page_count)
}

/// Run one generation to its end; the map is whatever was last published
async fn run_pipeline<L: DocumentLoader>(
    loader: L,
    document: DocumentRef,
    pages: usize,
    settings: ThumbnailSettings,
) -> (ThumbnailMap, sheet_preview::Result<GenerationOutcome>) {
    let mut pipeline = ThumbnailPipeline::new(loader, settings);
    let outcome = pipeline.start(document, pages).finish().await;
    let thumbnails = pipeline.snapshot().thumbnails.as_ref().clone();
    (thumbnails, outcome)
}

/// Thumbnails for a render. A failed generation leaves an empty or partial
/// map, and pages without a thumbnail are drawn with their number instead.
async fn thumbnails_for_render<L: DocumentLoader>(
    loader: L,
    document: DocumentRef,
    pages: usize,
    settings: ThumbnailSettings,
) -> ThumbnailMap {
    let (thumbnails, outcome) = run_pipeline(loader, document.clone(), pages, settings).await;
    match outcome {
        Ok(GenerationOutcome::Completed { pages }) => {
            log::debug!("Rendered {} thumbnails from {}", pages, document);
        }
        Ok(GenerationOutcome::Failed { pages, error }) => log::warn!(
            "Thumbnails for {} stopped after {} pages, rendering labels instead: {}",
            document,
            pages,
            error
        ),
        Ok(GenerationOutcome::Cancelled { pages }) => {
            log::warn!("Thumbnails for {} cancelled after {} pages", document, pages)
        }
        Err(e) => log::warn!("Thumbnail task for {} failed: {}", document, e),
    }
    thumbnails
}

/// Thumbnails for export; any failure is an error
async fn generate_thumbnails(
    pdf: &Path,
    pages: usize,
    settings: ThumbnailSettings,
) -> Result<ThumbnailMap> {
    let (thumbnails, outcome) =
        run_pipeline(PdfiumLoader::new(), DocumentRef::path(pdf), pages, settings).await;

    match outcome? {
        GenerationOutcome::Completed { pages } => {
            log::debug!("Rendered {} thumbnails from {}", pages, pdf.display());
        }
        GenerationOutcome::Failed { pages, error } => {
            bail!("thumbnail generation stopped after {} pages: {}", pages, error)
        }
        GenerationOutcome::Cancelled { .. } => bail!("thumbnail generation was cancelled"),
    }

    Ok(thumbnails)
}
