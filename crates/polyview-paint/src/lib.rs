use thiserror::Error;

pub mod canvas;
pub mod color;
pub mod geom;
pub mod raster;
pub mod svg;

pub use canvas::{Align2, Canvas, DrawList, Fill, GradientStop, Shape, Stroke};
pub use color::{
    BACKGROUND_END, BACKGROUND_START, Color, PIECE_PALETTE, SpecialPalette, piece_color, shade,
};
pub use geom::{Point2, Rect, Vec2, pos2, vec2};
pub use raster::{rasterize, save_png};

#[derive(Error, Debug)]
pub enum PaintError {
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("canvas size {width}x{height} cannot be rasterized")]
    CanvasSize { width: u32, height: u32 },
    #[error("svg: {0}")]
    Svg(String),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PaintError>;
