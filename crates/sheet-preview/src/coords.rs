//! Print space to render space conversion
//!
//! Layout and mark data use print space: millimeters, origin at the
//! bottom-left corner of the sheet, y growing upwards. Everything drawn uses
//! render space: the same millimeters, origin top-left, y growing downwards.
//! Each value is converted exactly once, at the point where a primitive is
//! built, and the distinct `Screen*` types keep the two spaces apart.

use crate::types::Rectangle;

/// Flip a print-space y coordinate into render space
pub fn screen_y(print_y: f32, height: f32) -> f32 {
    height - print_y
}

/// Render-space top edge of a rectangle of height `h` anchored at print-space `y`
pub fn rect_top(y: f32, h: f32, height: f32) -> f32 {
    height - y - h
}

/// A point in render space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in render space, `y` being the top edge
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Grow (or shrink, for negative `amount`) on every side
    pub fn inflate(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }
}

/// Converts print-space geometry for one sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    sheet_height_mm: f32,
}

impl CoordinateMapper {
    pub fn new(sheet_height_mm: f32) -> Self {
        Self { sheet_height_mm }
    }

    pub fn screen_y(&self, print_y: f32) -> f32 {
        screen_y(print_y, self.sheet_height_mm)
    }

    pub fn point(&self, x: f32, y: f32) -> ScreenPoint {
        ScreenPoint::new(x, self.screen_y(y))
    }

    /// Rectangle whose bottom-left print corner is (x, y)
    pub fn rect_at(&self, x: f32, y: f32, width: f32, height: f32) -> ScreenRect {
        ScreenRect::new(x, rect_top(y, height, self.sheet_height_mm), width, height)
    }

    pub fn rect(&self, rect: &Rectangle) -> ScreenRect {
        self.rect_at(rect.x, rect.y, rect.width, rect.height)
    }
}
