//! Printer's marks rendering
//!
//! Each mark delivered by the imposition engine becomes one or more scene
//! primitives. Mark kinds this module does not know produce nothing, so newer
//! engines can add kinds without breaking older previews.

use super::scene::*;
use crate::constants::*;
use crate::coords::CoordinateMapper;
use crate::types::{Mark, MarkKind};

/// Primitives for a single mark, in paint order
pub fn mark_primitives(mark: &Mark, mapper: &CoordinateMapper) -> Vec<Primitive> {
    match &mark.kind {
        MarkKind::Crop => vec![crop_mark(mark, mapper)],
        MarkKind::Registration => registration_mark(mark, mapper),
        MarkKind::ColorBar => vec![color_bar(mark, mapper)],
        MarkKind::Fold => vec![fold_mark(mark, mapper)],
        MarkKind::SlugText => slug_text(mark, mapper).into_iter().collect(),
        MarkKind::Other(_) => Vec::new(),
    }
}

/// Stroke width from `stroke` or `line_weight`, falling back to `default`
fn stroke_width(mark: &Mark, default: f32) -> f32 {
    mark.properties
        .number("stroke")
        .or_else(|| mark.properties.number("line_weight"))
        .filter(|w| *w > 0.0)
        .unwrap_or(default)
}

/// Straight trim line between the two endpoints
fn crop_mark(mark: &Mark, mapper: &CoordinateMapper) -> Primitive {
    Primitive::Line {
        from: mapper.point(mark.x1, mark.y1),
        to: mapper.point(mark.x2, mark.y2),
        stroke: Stroke::solid(Rgb::BLACK, stroke_width(mark, CROP_MARK_WIDTH)),
    }
}

/// Two concentric circles with a crosshair, centered on (x1, y1)
fn registration_mark(mark: &Mark, mapper: &CoordinateMapper) -> Vec<Primitive> {
    let radius = mark
        .properties
        .number("radius")
        .filter(|r| *r > 0.0)
        .unwrap_or(REGISTRATION_DEFAULT_RADIUS);
    let arm = radius * REGISTRATION_CROSSHAIR_RATIO;
    let stroke = Stroke::solid(Rgb::BLACK, stroke_width(mark, REGISTRATION_MARK_WIDTH));
    let center = mapper.point(mark.x1, mark.y1);

    vec![
        Primitive::Circle {
            center,
            radius,
            style: Style::outlined(stroke),
        },
        Primitive::Circle {
            center,
            radius: radius * REGISTRATION_INNER_RATIO,
            style: Style::outlined(stroke),
        },
        // Horizontal arm
        Primitive::Line {
            from: mapper.point(mark.x1 - arm, mark.y1),
            to: mapper.point(mark.x1 + arm, mark.y1),
            stroke,
        },
        // Vertical arm
        Primitive::Line {
            from: mapper.point(mark.x1, mark.y1 - arm),
            to: mapper.point(mark.x1, mark.y1 + arm),
            stroke,
        },
    ]
}

/// Ink patch whose bottom-left print corner is (x1, y1)
fn color_bar(mark: &Mark, mapper: &CoordinateMapper) -> Primitive {
    let width = mark
        .properties
        .number("width")
        .unwrap_or(COLOR_BAR_DEFAULT_SIZE);
    let height = mark
        .properties
        .number("height")
        .unwrap_or(COLOR_BAR_DEFAULT_SIZE);
    let ink = mark.properties.cmyk().unwrap_or([0.0; 4]);

    Primitive::Rect {
        rect: mapper.rect_at(mark.x1, mark.y1, width, height),
        style: Style::filled(Rgb::from_cmyk(ink)),
    }
}

/// Dashed line, distinct from the solid crop marks
fn fold_mark(mark: &Mark, mapper: &CoordinateMapper) -> Primitive {
    Primitive::Line {
        from: mapper.point(mark.x1, mark.y1),
        to: mapper.point(mark.x2, mark.y2),
        stroke: Stroke::dashed(Rgb::BLACK, stroke_width(mark, FOLD_LINE_WIDTH), FOLD_DASH),
    }
}

/// Job information text starting at (x1, y1); nothing when the text is empty
fn slug_text(mark: &Mark, mapper: &CoordinateMapper) -> Option<Primitive> {
    let text = mark.properties.text("text").filter(|t| !t.is_empty())?;
    let size_pt = mark
        .properties
        .number("font_size")
        .filter(|s| *s > 0.0)
        .unwrap_or(SLUG_FONT_SIZE_PT);

    Some(Primitive::Text {
        anchor: mapper.point(mark.x1, mark.y1),
        text: text.to_string(),
        size: size_pt * MM_PER_POINT,
        color: Rgb::BLACK,
        align: TextAlign::Start,
    })
}
