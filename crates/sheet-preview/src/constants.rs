//! Shared constants for sheet previews
//!
//! This module centralizes the magic numbers used by the compositor,
//! the thumbnail pipeline and the interaction layer.

// =============================================================================
// Thumbnails
// =============================================================================

/// Longest edge of a generated thumbnail (pixels)
pub const THUMBNAIL_MAX_DIMENSION_PX: u32 = 200;

/// JPEG quality used for thumbnails (0-100)
pub const THUMBNAIL_JPEG_QUALITY: u8 = 55;

/// Completed pages between progressive snapshots
pub const THUMBNAIL_SNAPSHOT_EVERY: usize = 4;

// =============================================================================
// Zoom
// =============================================================================

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 3.0;
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Zoom change applied by one zoom-in / zoom-out step
pub const ZOOM_STEP: f32 = 0.1;

// =============================================================================
// Marks (millimeters)
// =============================================================================

/// Outer circle radius of a registration mark when none is given
pub const REGISTRATION_DEFAULT_RADIUS: f32 = 4.0;

/// Inner circle radius relative to the outer radius
pub const REGISTRATION_INNER_RATIO: f32 = 0.3;

/// Crosshair arm length relative to the outer radius
pub const REGISTRATION_CROSSHAIR_RATIO: f32 = 0.8;

/// Color bar patch size when width/height are not given
pub const COLOR_BAR_DEFAULT_SIZE: f32 = 4.0;

pub const CROP_MARK_WIDTH: f32 = 0.25;
pub const REGISTRATION_MARK_WIDTH: f32 = 0.25;
pub const FOLD_LINE_WIDTH: f32 = 0.3;

/// Dash pattern for fold lines (dash, gap)
pub const FOLD_DASH: (f32, f32) = (2.0, 1.0);

/// Slug text size when `font_size` is not given (points)
pub const SLUG_FONT_SIZE_PT: f32 = 6.0;

// =============================================================================
// Sheet and cells
// =============================================================================

/// Millimeters per typographic point
pub const MM_PER_POINT: f32 = 25.4 / 72.0;

/// Offset of the sheet drop shadow
pub const SHADOW_OFFSET: f32 = 1.5;

pub const SHEET_BORDER_WIDTH: f32 = 0.3;
pub const GUIDE_LINE_WIDTH: f32 = 0.25;
pub const GUIDE_DASH: (f32, f32) = (3.0, 2.0);

pub const TRIM_BORDER_WIDTH: f32 = 0.3;
pub const TRIM_BORDER_WIDTH_HOVERED: f32 = 0.6;
pub const INTERIOR_EDGE_WIDTH: f32 = 0.6;

/// Thumbnail opacity while its cell is hovered
pub const HOVERED_THUMBNAIL_OPACITY: f32 = 0.75;

/// Page label size relative to the shorter trim edge
pub const LABEL_SIZE_RATIO: f32 = 0.25;
pub const LABEL_MIN_SIZE: f32 = 2.0;
pub const LABEL_MAX_SIZE: f32 = 12.0;

/// Badge font size drawn over thumbnails
pub const BADGE_FONT_SIZE: f32 = 3.0;
pub const BADGE_PADDING: f32 = 1.0;
