use image::{ImageFormat, RgbaImage};
use std::path::Path;
use tiny_skia::{Pixmap, Transform};
use usvg::{Options, Tree};

use crate::canvas::DrawList;
use crate::{PaintError, Result};

/// Renders the draw list through its SVG form into straight-alpha RGBA pixels.
pub fn rasterize(list: &DrawList) -> Result<RgbaImage> {
    let width = list.width().ceil().max(0.0) as u32;
    let height = list.height().ceil().max(0.0) as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(PaintError::CanvasSize { width, height })?;

    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = Tree::from_str(&list.to_svg(), &options)
        .map_err(|err| PaintError::Svg(err.to_string()))?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    let mut pixels = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        pixels.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    RgbaImage::from_raw(width, height, pixels).ok_or(PaintError::CanvasSize { width, height })
}

pub fn save_png(list: &DrawList, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    rasterize(list)?.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
