//! Sheet and cell layers

use super::scene::*;
use crate::constants::*;
use crate::coords::{CoordinateMapper, ScreenRect};
use crate::options::SheetGuides;
use crate::thumbnails::ThumbnailMap;
use crate::types::{GridCell, SheetLayout};

const SHEET_BORDER: Rgb = Rgb::new(160, 160, 160);
const GUIDE: Rgb = Rgb::new(59, 130, 246);
const BLEED: Rgb = Rgb::new(239, 68, 68);
const TRIM_EMPTY: Rgb = Rgb::new(241, 245, 249);
const TRIM_HOVERED: Rgb = Rgb::new(219, 234, 254);
const TRIM_BORDER: Rgb = Rgb::new(100, 116, 139);
const TRIM_BORDER_HOVERED: Rgb = Rgb::new(37, 99, 235);
const LABEL: Rgb = Rgb::new(100, 116, 139);
const BADGE: Rgb = Rgb::new(15, 23, 42);
const INTERIOR_EDGE: Rgb = Rgb::new(245, 158, 11);

pub(super) fn draw_sheet(scene: &mut Scene, layout: &SheetLayout, mapper: &CoordinateMapper) {
    let sheet = mapper.rect_at(0.0, 0.0, layout.sheet_width_mm, layout.sheet_height_mm);

    let shadow = ScreenRect::new(
        sheet.x + SHADOW_OFFSET,
        sheet.y + SHADOW_OFFSET,
        sheet.width,
        sheet.height,
    );
    scene.push(
        Role::SheetShadow,
        Primitive::Rect {
            rect: shadow,
            style: Style::filled(Rgb::BLACK).with_opacity(0.12),
        },
    );

    scene.push(
        Role::Sheet,
        Primitive::Rect {
            rect: sheet,
            style: Style::filled(Rgb::WHITE)
                .with_stroke(Stroke::solid(SHEET_BORDER, SHEET_BORDER_WIDTH)),
        },
    );
}

/// Dashed rectangle inside the mark margin, above the grip edge
pub(super) fn draw_margin_guide(
    scene: &mut Scene,
    layout: &SheetLayout,
    mapper: &CoordinateMapper,
    guides: &SheetGuides,
) {
    let margin = guides.mark_margin_mm;
    let width = layout.sheet_width_mm - 2.0 * margin;
    let height = layout.sheet_height_mm - 2.0 * margin - guides.grip_edge_mm;
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    scene.push(
        Role::MarginGuide,
        Primitive::Rect {
            rect: mapper.rect_at(margin, margin + guides.grip_edge_mm, width, height),
            style: Style::outlined(Stroke::dashed(GUIDE, GUIDE_LINE_WIDTH, GUIDE_DASH)),
        },
    );
}

pub(super) fn draw_cell(
    scene: &mut Scene,
    index: usize,
    cell: &GridCell,
    layout: &SheetLayout,
    mapper: &CoordinateMapper,
    thumbnails: &ThumbnailMap,
    options: &super::RenderOptions,
) {
    let Some(page_index) = cell.page_index else {
        return;
    };
    let hovered = options.hovered == Some(index);
    let thumbnail = thumbnails.get(&page_index);
    let trim = mapper.rect(&layout.trim_rect(cell));

    if options.show_bleed {
        if let Some(clip) = &cell.clip_rect {
            scene.push(
                Role::Bleed(index),
                Primitive::Rect {
                    rect: mapper.rect(clip),
                    style: Style::filled(BLEED).with_opacity(0.15),
                },
            );
        }
    }

    let background = match (hovered, thumbnail.is_some()) {
        (true, _) => TRIM_HOVERED,
        (false, true) => Rgb::WHITE,
        (false, false) => TRIM_EMPTY,
    };
    scene.push(
        Role::Trim(index),
        Primitive::Rect {
            rect: trim,
            style: Style::filled(background),
        },
    );

    if let Some(thumbnail) = thumbnail {
        scene.push(
            Role::Thumbnail(index),
            Primitive::Image {
                page_index,
                href: thumbnail.data_uri.clone(),
                rect: image_rect(&trim, cell.rotation),
                clip: trim,
                rotation: cell.rotation,
                opacity: if hovered {
                    HOVERED_THUMBNAIL_OPACITY
                } else {
                    1.0
                },
            },
        );
    }

    let border = if hovered {
        Stroke::solid(TRIM_BORDER_HOVERED, TRIM_BORDER_WIDTH_HOVERED)
    } else {
        Stroke::solid(TRIM_BORDER, TRIM_BORDER_WIDTH)
    };
    scene.push(
        Role::TrimBorder(index),
        Primitive::Rect {
            rect: trim,
            style: Style::outlined(border),
        },
    );

    let label = (page_index + 1).to_string();
    if thumbnail.is_some() {
        draw_badge(scene, index, &trim, label);
    } else {
        let size = (trim.width.min(trim.height) * LABEL_SIZE_RATIO)
            .clamp(LABEL_MIN_SIZE, LABEL_MAX_SIZE);
        scene.push(
            Role::PageLabel(index),
            Primitive::Text {
                anchor: trim.center(),
                text: label,
                size,
                color: LABEL,
                align: TextAlign::Center,
            },
        );
    }

    draw_interior_edges(scene, index, cell, layout, mapper);
}

/// Rectangle the thumbnail is stretched into before rotation, so that the
/// rotated image covers the trim area
fn image_rect(trim: &ScreenRect, rotation: i32) -> ScreenRect {
    match rotation.rem_euclid(360) {
        90 | 270 => {
            let center = trim.center();
            ScreenRect::new(
                center.x - trim.height / 2.0,
                center.y - trim.width / 2.0,
                trim.height,
                trim.width,
            )
        }
        _ => *trim,
    }
}

/// Compact page-number badge in the top-left corner of the trim area
fn draw_badge(scene: &mut Scene, index: usize, trim: &ScreenRect, label: String) {
    let text_width = label.chars().count() as f32 * BADGE_FONT_SIZE * 0.6;
    let badge = ScreenRect::new(
        trim.x + BADGE_PADDING,
        trim.y + BADGE_PADDING,
        text_width + 2.0 * BADGE_PADDING,
        BADGE_FONT_SIZE + 2.0 * BADGE_PADDING,
    );

    scene.push(
        Role::PageLabel(index),
        Primitive::Rect {
            rect: badge,
            style: Style::filled(BADGE).with_opacity(0.7),
        },
    );
    scene.push(
        Role::PageLabel(index),
        Primitive::Text {
            anchor: badge.center(),
            text: label,
            size: BADGE_FONT_SIZE,
            color: Rgb::WHITE,
            align: TextAlign::Center,
        },
    );
}

/// Highlight right and bottom edges that are internal cut lines.
///
/// Left and top edges are drawn by the neighbouring cell.
fn draw_interior_edges(
    scene: &mut Scene,
    index: usize,
    cell: &GridCell,
    layout: &SheetLayout,
    mapper: &CoordinateMapper,
) {
    let flags = cell.interior_edges();
    let trim = layout.trim_rect(cell);
    let stroke = Stroke::solid(INTERIOR_EDGE, INTERIOR_EDGE_WIDTH);

    if flags.right {
        scene.push(
            Role::InteriorEdge(index),
            Primitive::Line {
                from: mapper.point(trim.right(), trim.y),
                to: mapper.point(trim.right(), trim.top()),
                stroke,
            },
        );
    }

    if flags.bottom {
        scene.push(
            Role::InteriorEdge(index),
            Primitive::Line {
                from: mapper.point(trim.x, trim.y),
                to: mapper.point(trim.right(), trim.y),
                stroke,
            },
        );
    }
}
