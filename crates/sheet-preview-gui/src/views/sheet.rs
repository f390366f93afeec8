//! Paints a composed sheet scene with egui

use crate::textures::ThumbnailTextures;
use eframe::egui;
use egui::emath::Rot2;
use egui::epaint::Mesh;
use egui::{Color32, FontId, Pos2, Rect, Shape};
use sheet_preview::compositor::{Primitive, Rgb, Stroke, Style, TextAlign};
use sheet_preview::{Scene, ScreenPoint, ScreenRect};

/// Space around the sheet so its shadow and edge marks stay visible
const MARGIN_PX: f32 = 16.0;

/// Pixels per millimeter that fit the whole sheet in `available` at zoom 1
pub fn fit_scale(available: egui::Vec2, scene: &Scene) -> f32 {
    let width = (available.x - 2.0 * MARGIN_PX) / scene.width.max(1.0);
    let height = (available.y - 2.0 * MARGIN_PX) / scene.height.max(1.0);
    width.min(height).max(0.1)
}

pub struct SheetResponse {
    pub response: egui::Response,
    /// Pointer position in scene millimeters
    pub pointer: Option<ScreenPoint>,
}

/// Render-space millimeters to screen pixels
struct PixelMapper {
    origin: Pos2,
    scale: f32,
}

impl PixelMapper {
    fn pos(&self, point: &ScreenPoint) -> Pos2 {
        self.origin + egui::vec2(point.x, point.y) * self.scale
    }

    fn rect(&self, rect: &ScreenRect) -> Rect {
        Rect::from_min_size(
            self.pos(&ScreenPoint::new(rect.x, rect.y)),
            egui::vec2(rect.width, rect.height) * self.scale,
        )
    }

    fn length(&self, mm: f32) -> f32 {
        mm * self.scale
    }

    fn to_scene(&self, pos: Pos2) -> ScreenPoint {
        let offset = (pos - self.origin) / self.scale;
        ScreenPoint::new(offset.x, offset.y)
    }
}

pub fn show_sheet(
    ui: &mut egui::Ui,
    scene: &Scene,
    textures: &ThumbnailTextures,
    scale: f32,
) -> SheetResponse {
    let size = egui::vec2(scene.width, scene.height) * scale + egui::Vec2::splat(2.0 * MARGIN_PX);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let mapper = PixelMapper {
        origin: response.rect.min + egui::Vec2::splat(MARGIN_PX),
        scale,
    };

    for item in &scene.items {
        paint(&painter, &mapper, &item.primitive, textures);
    }

    let pointer = response.hover_pos().map(|pos| mapper.to_scene(pos));
    SheetResponse { response, pointer }
}

fn color(rgb: Rgb, opacity: f32) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b).gamma_multiply(opacity)
}

fn egui_stroke(mapper: &PixelMapper, stroke: &Stroke, opacity: f32) -> egui::Stroke {
    // Hairlines stay visible when zoomed out
    egui::Stroke::new(
        mapper.length(stroke.width).max(1.0),
        color(stroke.color, opacity),
    )
}

fn paint(
    painter: &egui::Painter,
    mapper: &PixelMapper,
    primitive: &Primitive,
    textures: &ThumbnailTextures,
) {
    match primitive {
        Primitive::Rect { rect, style } => paint_rect(painter, mapper, mapper.rect(rect), style),
        Primitive::Line { from, to, stroke } => {
            paint_polyline(painter, mapper, &[mapper.pos(from), mapper.pos(to)], stroke, 1.0);
        }
        Primitive::Circle {
            center,
            radius,
            style,
        } => {
            let center = mapper.pos(center);
            let radius = mapper.length(*radius);
            if let Some(fill) = style.fill {
                painter.circle_filled(center, radius, color(fill, style.opacity));
            }
            if let Some(stroke) = &style.stroke {
                painter.circle_stroke(center, radius, egui_stroke(mapper, stroke, style.opacity));
            }
        }
        Primitive::Image {
            page_index,
            rect,
            clip,
            rotation,
            opacity,
            ..
        } => {
            let Some(texture) = textures.get(*page_index) else {
                return;
            };
            let target = mapper.rect(rect);
            let clipped = painter.with_clip_rect(mapper.rect(clip).intersect(painter.clip_rect()));

            let mut mesh = Mesh::with_texture(texture.id());
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            mesh.add_rect_with_uv(target, uv, Color32::WHITE.gamma_multiply(*opacity));
            if rotation.rem_euclid(360) != 0 {
                let angle = (*rotation as f32).to_radians();
                mesh.rotate(Rot2::from_angle(angle), target.center());
            }
            clipped.add(Shape::mesh(mesh));
        }
        Primitive::Text {
            anchor,
            text,
            size,
            color: text_color,
            align,
        } => {
            let align = match align {
                TextAlign::Start => egui::Align2::LEFT_BOTTOM,
                TextAlign::Center => egui::Align2::CENTER_CENTER,
            };
            painter.text(
                mapper.pos(anchor),
                align,
                text,
                FontId::proportional(mapper.length(*size).max(4.0)),
                color(*text_color, 1.0),
            );
        }
    }
}

fn paint_rect(painter: &egui::Painter, mapper: &PixelMapper, rect: Rect, style: &Style) {
    if let Some(fill) = style.fill {
        painter.rect_filled(rect, 0.0, color(fill, style.opacity));
    }

    let Some(stroke) = &style.stroke else {
        return;
    };
    if stroke.dash.is_some() {
        let outline = [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
            rect.left_top(),
        ];
        paint_polyline(painter, mapper, &outline, stroke, style.opacity);
    } else {
        painter.rect_stroke(
            rect,
            0.0,
            egui_stroke(mapper, stroke, style.opacity),
            egui::StrokeKind::Middle,
        );
    }
}

fn paint_polyline(
    painter: &egui::Painter,
    mapper: &PixelMapper,
    points: &[Pos2],
    stroke: &Stroke,
    opacity: f32,
) {
    let egui_stroke = egui_stroke(mapper, stroke, opacity);
    match stroke.dash {
        Some((dash, gap)) => {
            painter.extend(Shape::dashed_line(
                points,
                egui_stroke,
                mapper.length(dash).max(2.0),
                mapper.length(gap).max(2.0),
            ));
        }
        None => {
            painter.add(Shape::line(points.to_vec(), egui_stroke));
        }
    }
}
