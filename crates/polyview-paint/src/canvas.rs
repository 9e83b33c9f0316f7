use crate::color::Color;
use crate::geom::{Point2, Rect};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    Solid(Color),
    Linear {
        start: Point2,
        end: Point2,
        stops: Vec<GradientStop>,
    },
}

impl Fill {
    /// Two-stop linear gradient from `from` at `start` to `to` at `end`.
    pub fn linear(start: Point2, end: Point2, from: Color, to: Color) -> Self {
        Self::Linear {
            start,
            end,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: from,
                },
                GradientStop {
                    offset: 1.0,
                    color: to,
                },
            ],
        }
    }

    /// Color at the start of the fill.
    pub fn base_color(&self) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::Linear { stops, .. } => stops.first().map_or(Color::BLACK, |stop| stop.color),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

impl Stroke {
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align2 {
    CenterCenter,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Polygon {
        points: Vec<Point2>,
        fill: Fill,
    },
    Rect {
        rect: Rect,
        radius: f32,
        fill: Option<Fill>,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Point2,
        radius: f32,
        fill: Fill,
    },
    Text {
        pos: Point2,
        align: Align2,
        text: String,
        size: f32,
        color: Color,
    },
}

pub trait Canvas {
    fn fill_polygon(&mut self, points: Vec<Point2>, fill: Fill);
    fn fill_rect(&mut self, rect: Rect, radius: f32, fill: Fill);
    fn stroke_rect(&mut self, rect: Rect, radius: f32, stroke: Stroke);
    fn fill_circle(&mut self, center: Point2, radius: f32, fill: Fill);
    fn text(&mut self, pos: Point2, align: Align2, text: String, size: f32, color: Color);
}

/// Records shapes in paint order. Later shapes cover earlier ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    width: f32,
    height: f32,
    shapes: Vec<Shape>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(Point2::default(), Point2::new(self.width, self.height))
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn fill_polygon(&mut self, points: Vec<Point2>, fill: Fill) {
        self.shapes.push(Shape::Polygon { points, fill });
    }

    fn fill_rect(&mut self, rect: Rect, radius: f32, fill: Fill) {
        self.shapes.push(Shape::Rect {
            rect,
            radius,
            fill: Some(fill),
            stroke: None,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, radius: f32, stroke: Stroke) {
        self.shapes.push(Shape::Rect {
            rect,
            radius,
            fill: None,
            stroke: Some(stroke),
        });
    }

    fn fill_circle(&mut self, center: Point2, radius: f32, fill: Fill) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            fill,
        });
    }

    fn text(&mut self, pos: Point2, align: Align2, text: String, size: f32, color: Color) {
        self.shapes.push(Shape::Text {
            pos,
            align,
            text,
            size,
            color,
        });
    }
}
