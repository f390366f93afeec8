pub mod compositor;
pub mod constants;
pub mod coords;
pub mod interaction;
mod io;
mod options;
mod stats;
pub mod thumbnails;
mod types;

pub use compositor::{RenderOptions, Scene, compose};
pub use coords::{CoordinateMapper, ScreenPoint, ScreenRect};
pub use interaction::{CellTooltip, InteractionState, hit_test};
pub use io::{load_layout, read_page_count, save_layout};
pub use options::*;
pub use stats::{SheetSummary, summarize};
pub use thumbnails::{
    DocumentLoader, DocumentRef, GenerationHandle, GenerationOutcome, PageSource, Thumbnail,
    ThumbnailMap, ThumbnailPipeline, ThumbnailSnapshot,
};
pub use types::*;
