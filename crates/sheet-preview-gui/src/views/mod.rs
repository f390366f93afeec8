pub mod panel;
pub mod sheet;

pub use panel::{PanelAction, PanelState, show_panel};
pub use sheet::{fit_scale, show_sheet};
