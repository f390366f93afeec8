//! Display list produced by the compositor
//!
//! A scene is an ordered list of primitives in render space (millimeters,
//! origin top-left). Back ends paint the items in order, back to front.

use crate::coords::{ScreenPoint, ScreenRect};
use std::sync::Arc;

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Screen approximation of a CMYK ink mix, each channel in `[0, 1]`
    pub fn from_cmyk(ink: [f32; 4]) -> Self {
        let [c, m, y, k] = ink.map(|v| v.clamp(0.0, 1.0));
        let channel = |v: f32| (255.0 * (1.0 - v) * (1.0 - k)).round() as u8;
        Self::new(channel(c), channel(m), channel(y))
    }

    /// CSS `rgb(r,g,b)` notation
    pub fn to_css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Outline settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
    /// (dash, gap) lengths; None is a solid line
    pub dash: Option<(f32, f32)>,
}

impl Stroke {
    pub fn solid(color: Rgb, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgb, width: f32, dash: (f32, f32)) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

/// Fill and outline of a closed shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Option<Rgb>,
    pub stroke: Option<Stroke>,
    pub opacity: f32,
}

impl Style {
    pub fn filled(color: Rgb) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            opacity: 1.0,
        }
    }

    pub fn outlined(stroke: Stroke) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
            opacity: 1.0,
        }
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Horizontal placement of text relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor is the left end of the baseline
    Start,
    /// Anchor is the center of the text box
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        rect: ScreenRect,
        style: Style,
    },
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        stroke: Stroke,
    },
    Circle {
        center: ScreenPoint,
        radius: f32,
        style: Style,
    },
    /// A page thumbnail drawn into `rect`, never painting outside `clip`
    Image {
        page_index: usize,
        href: Arc<str>,
        rect: ScreenRect,
        clip: ScreenRect,
        /// Clockwise rotation about the center of `rect`, in degrees
        rotation: i32,
        opacity: f32,
    },
    Text {
        anchor: ScreenPoint,
        text: String,
        size: f32,
        color: Rgb,
        align: TextAlign,
    },
}

/// What a scene item depicts; cell and mark variants carry their index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    SheetShadow,
    Sheet,
    MarginGuide,
    Bleed(usize),
    Trim(usize),
    Thumbnail(usize),
    TrimBorder(usize),
    PageLabel(usize),
    InteriorEdge(usize),
    Mark(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneItem {
    pub role: Role,
    pub primitive: Primitive,
}

/// A composed sheet side, in render space
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub items: Vec<SceneItem>,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, role: Role, primitive: Primitive) {
        self.items.push(SceneItem { role, primitive });
    }

    /// Primitives with the given role, in paint order
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &Primitive> {
        self.items
            .iter()
            .filter(move |item| item.role == role)
            .map(|item| &item.primitive)
    }

    pub fn first_with_role(&self, role: Role) -> Option<&Primitive> {
        self.with_role(role).next()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmyk_primaries() {
        assert_eq!(Rgb::from_cmyk([1.0, 0.0, 0.0, 0.0]), Rgb::new(0, 255, 255));
        assert_eq!(Rgb::from_cmyk([0.0, 1.0, 0.0, 0.0]), Rgb::new(255, 0, 255));
        assert_eq!(Rgb::from_cmyk([0.0, 0.0, 1.0, 0.0]), Rgb::new(255, 255, 0));
        assert_eq!(Rgb::from_cmyk([0.0, 0.0, 0.0, 0.5]), Rgb::new(128, 128, 128));
    }

    #[test]
    fn cmyk_out_of_range_is_clamped() {
        assert_eq!(Rgb::from_cmyk([-1.0, 2.0, 0.0, 0.0]), Rgb::new(255, 0, 255));
    }
}
