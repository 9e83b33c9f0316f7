use std::fmt::{self, Display, Formatter};

use crate::canvas::{Align2, DrawList, Fill, Shape, Stroke};
use crate::color::Color;

const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

/// SVG rendering of a [`DrawList`]. Gradient ids are derived from shape indices.
pub struct SvgDocument<'a> {
    list: &'a DrawList,
}

impl DrawList {
    pub fn svg(&self) -> SvgDocument<'_> {
        SvgDocument { list: self }
    }

    pub fn to_svg(&self) -> String {
        self.svg().to_string()
    }
}

impl Display for SvgDocument<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (width, height) = (self.list.width(), self.list.height());
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            num(width),
            num(height),
            num(width),
            num(height)
        )?;

        writeln!(f, "<defs>")?;
        for (idx, shape) in self.list.shapes().iter().enumerate() {
            if let Some(Fill::Linear { start, end, stops }) = shape_fill(shape) {
                writeln!(
                    f,
                    r#"<linearGradient id="g{idx}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">"#,
                    num(start.x),
                    num(start.y),
                    num(end.x),
                    num(end.y)
                )?;
                for stop in stops {
                    writeln!(
                        f,
                        r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
                        num(stop.offset),
                        stop.color.to_hex(),
                        num(stop.color.opacity())
                    )?;
                }
                writeln!(f, "</linearGradient>")?;
            }
        }
        writeln!(f, "</defs>")?;

        for (idx, shape) in self.list.shapes().iter().enumerate() {
            write_shape(f, idx, shape)?;
        }
        writeln!(f, "</svg>")
    }
}

fn shape_fill(shape: &Shape) -> Option<&Fill> {
    match shape {
        Shape::Polygon { fill, .. } | Shape::Circle { fill, .. } => Some(fill),
        Shape::Rect { fill, .. } => fill.as_ref(),
        Shape::Text { .. } => None,
    }
}

fn write_shape(f: &mut Formatter<'_>, idx: usize, shape: &Shape) -> fmt::Result {
    match shape {
        Shape::Polygon { points, fill } => {
            write!(f, r#"<polygon points=""#)?;
            for (n, point) in points.iter().enumerate() {
                if n > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{},{}", num(point.x), num(point.y))?;
            }
            write!(f, "\"")?;
            write_fill(f, idx, fill)?;
            writeln!(f, "/>")
        }
        Shape::Rect {
            rect,
            radius,
            fill,
            stroke,
        } => {
            write!(
                f,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}""#,
                num(rect.min.x),
                num(rect.min.y),
                num(rect.width().max(0.0)),
                num(rect.height().max(0.0)),
                num(*radius)
            )?;
            match fill {
                Some(fill) => write_fill(f, idx, fill)?,
                None => write!(f, r#" fill="none""#)?,
            }
            if let Some(stroke) = stroke {
                write_stroke(f, *stroke)?;
            }
            writeln!(f, "/>")
        }
        Shape::Circle {
            center,
            radius,
            fill,
        } => {
            write!(
                f,
                r#"<circle cx="{}" cy="{}" r="{}""#,
                num(center.x),
                num(center.y),
                num(*radius)
            )?;
            write_fill(f, idx, fill)?;
            writeln!(f, "/>")
        }
        Shape::Text {
            pos,
            align,
            text,
            size,
            color,
        } => {
            let (anchor, baseline) = match align {
                Align2::CenterCenter => ("middle", "central"),
            };
            write!(
                f,
                r#"<text x="{}" y="{}" font-family="{FONT_FAMILY}" font-weight="bold" font-size="{}" text-anchor="{anchor}" dominant-baseline="{baseline}""#,
                num(pos.x),
                num(pos.y),
                num(*size)
            )?;
            write_paint(f, "fill", *color)?;
            writeln!(f, ">{}</text>", escape(text))
        }
    }
}

fn write_fill(f: &mut Formatter<'_>, idx: usize, fill: &Fill) -> fmt::Result {
    match fill {
        Fill::Solid(color) => write_paint(f, "fill", *color),
        Fill::Linear { .. } => write!(f, r#" fill="url(#g{idx})""#),
    }
}

fn write_stroke(f: &mut Formatter<'_>, stroke: Stroke) -> fmt::Result {
    write_paint(f, "stroke", stroke.color)?;
    write!(f, r#" stroke-width="{}""#, num(stroke.width))
}

fn write_paint(f: &mut Formatter<'_>, attr: &str, color: Color) -> fmt::Result {
    write!(f, r#" {attr}="{}""#, color.to_hex())?;
    if color.a < 255 {
        write!(f, r#" {attr}-opacity="{}""#, num(color.opacity()))?;
    }
    Ok(())
}

fn num(value: f32) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" || text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::geom::{Rect, pos2, vec2};

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(f32::NAN), "0");
        assert_eq!(num(1.255), "1.25");
    }

    #[test]
    fn gradients_are_defined_and_referenced() {
        let mut list = DrawList::new(100.0, 50.0);
        list.fill_rect(
            Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 50.0)),
            0.0,
            Fill::Solid(Color::WHITE),
        );
        list.fill_polygon(
            vec![pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(5.0, 5.0)],
            Fill::linear(pos2(0.0, 0.0), pos2(0.0, 5.0), Color::WHITE, Color::BLACK),
        );
        let svg = list.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"<linearGradient id="g1""#));
        assert!(svg.contains(r#"fill="url(#g1)""#));
        assert!(!svg.contains(r#"id="g0""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn text_is_escaped() {
        let mut list = DrawList::new(10.0, 10.0);
        list.text(
            pos2(5.0, 5.0),
            Align2::CenterCenter,
            "<1&2>".to_string(),
            11.0,
            Color::WHITE.with_alpha(128),
        );
        let svg = list.to_svg();
        assert!(svg.contains("&lt;1&amp;2&gt;"));
        assert!(svg.contains(r#"fill-opacity="0.5""#));
    }
}
