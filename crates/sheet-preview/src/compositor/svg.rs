//! SVG output for composed scenes
//!
//! The document uses millimeters as user units (`viewBox` equals the sheet
//! size). Zoom only changes the outer `width`/`height`, so coordinates stay
//! identical at every zoom level.

use super::scene::*;
use crate::coords::ScreenRect;

/// Serialize a scene as a standalone SVG document
pub fn scene_to_svg(scene: &Scene, zoom: f32) -> String {
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         width=\"{}mm\" height=\"{}mm\" viewBox=\"0 0 {} {}\">\n",
        num(scene.width * zoom),
        num(scene.height * zoom),
        num(scene.width),
        num(scene.height)
    ));

    // Each thumbnail gets its own clip region
    let clips: Vec<&ScreenRect> = scene
        .items
        .iter()
        .filter_map(|item| match &item.primitive {
            Primitive::Image { clip, .. } => Some(clip),
            _ => None,
        })
        .collect();
    if !clips.is_empty() {
        svg.push_str("<defs>\n");
        for (n, clip) in clips.iter().enumerate() {
            svg.push_str(&format!(
                "<clipPath id=\"clip-{n}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/></clipPath>\n",
                num(clip.x),
                num(clip.y),
                num(clip.width),
                num(clip.height)
            ));
        }
        svg.push_str("</defs>\n");
    }

    let mut clip_id = 0;
    for item in &scene.items {
        match &item.primitive {
            Primitive::Rect { rect, style } => {
                svg.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{}/>\n",
                    num(rect.x),
                    num(rect.y),
                    num(rect.width),
                    num(rect.height),
                    style_attrs(style)
                ));
            }
            Primitive::Line { from, to, stroke } => {
                svg.push_str(&format!(
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{}/>\n",
                    num(from.x),
                    num(from.y),
                    num(to.x),
                    num(to.y),
                    stroke_attrs(stroke)
                ));
            }
            Primitive::Circle {
                center,
                radius,
                style,
            } => {
                svg.push_str(&format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"{}/>\n",
                    num(center.x),
                    num(center.y),
                    num(*radius),
                    style_attrs(style)
                ));
            }
            Primitive::Image {
                href,
                rect,
                rotation,
                opacity,
                ..
            } => {
                let transform = if rotation.rem_euclid(360) != 0 {
                    let center = rect.center();
                    format!(
                        " transform=\"rotate({} {} {})\"",
                        rotation,
                        num(center.x),
                        num(center.y)
                    )
                } else {
                    String::new()
                };
                svg.push_str(&format!(
                    "<g clip-path=\"url(#clip-{clip_id})\"><image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" \
                     preserveAspectRatio=\"xMidYMid slice\" opacity=\"{}\"{}/></g>\n",
                    escape(href),
                    num(rect.x),
                    num(rect.y),
                    num(rect.width),
                    num(rect.height),
                    num(*opacity),
                    transform
                ));
                clip_id += 1;
            }
            Primitive::Text {
                anchor,
                text,
                size,
                color,
                align,
            } => {
                let placement = match align {
                    TextAlign::Start => "text-anchor=\"start\"",
                    TextAlign::Center => "text-anchor=\"middle\" dominant-baseline=\"central\"",
                };
                svg.push_str(&format!(
                    "<text x=\"{}\" y=\"{}\" font-family=\"Helvetica, Arial, sans-serif\" font-size=\"{}\" fill=\"{}\" {}>{}</text>\n",
                    num(anchor.x),
                    num(anchor.y),
                    num(*size),
                    color.to_css(),
                    placement,
                    escape(text)
                ));
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn style_attrs(style: &Style) -> String {
    let mut attrs = match style.fill {
        Some(fill) => format!(" fill=\"{}\"", fill.to_css()),
        None => " fill=\"none\"".to_string(),
    };
    if let Some(stroke) = &style.stroke {
        attrs.push_str(&stroke_attrs(stroke));
    }
    if style.opacity < 1.0 {
        attrs.push_str(&format!(" opacity=\"{}\"", num(style.opacity)));
    }
    attrs
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut attrs = format!(
        " stroke=\"{}\" stroke-width=\"{}\"",
        stroke.color.to_css(),
        num(stroke.width)
    );
    if let Some((dash, gap)) = stroke.dash {
        attrs.push_str(&format!(" stroke-dasharray=\"{} {}\"", num(dash), num(gap)));
    }
    attrs
}

/// Format a coordinate with at most three decimals and no trailing zeros
fn num(value: f32) -> String {
    let formatted = format!("{:.3}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        _ => trimmed.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(265.0), "265");
        assert_eq!(num(0.25), "0.25");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(1.23456), "1.235");
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
