use anyhow::{Context, Result};
use polyview_base::Puzzle;
use polyview_paint::{DrawList, save_png};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const BOARD_STEM: &str = "board";
pub const GALLERY_STEM: &str = "gallery";
pub const PUZZLE_FILE: &str = "puzzle.json";
pub const FRAME_FILE: &str = "viewer.png";

/// Writes `<stem>.svg` and `<stem>.png` into `dir`.
pub fn write_drawing(list: &DrawList, dir: &Path, stem: &str) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output directory {}", dir.display()))?;
    let svg = dir.join(format!("{stem}.svg"));
    std::fs::write(&svg, list.to_svg()).with_context(|| format!("write SVG file {}", svg.display()))?;
    let png = dir.join(format!("{stem}.png"));
    save_png(list, &png).with_context(|| format!("write PNG file {}", png.display()))?;
    debug!(svg = %svg.display(), png = %png.display(), "drawing written");
    Ok(())
}

pub fn write_png(list: &DrawList, path: &Path) -> Result<PathBuf> {
    create_parent(path)?;
    save_png(list, path).with_context(|| format!("write PNG file {}", path.display()))?;
    Ok(path.to_path_buf())
}

pub fn write_puzzle(puzzle: &Puzzle, path: &Path) -> Result<()> {
    create_parent(path)?;
    let text = serde_json::to_string_pretty(puzzle).context("serialize puzzle")?;
    std::fs::write(path, text).with_context(|| format!("write puzzle file {}", path.display()))?;
    Ok(())
}

pub fn read_puzzle(path: &Path) -> Result<Puzzle> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read puzzle file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse puzzle file {}", path.display()))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    Ok(())
}
