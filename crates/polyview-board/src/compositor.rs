//! Painter's-algorithm compositing of the isometric board.
//!
//! Each cell becomes a cube built from three flat faces. There is no depth
//! buffer, so correctness depends entirely on paint order: primitives are
//! stable-sorted by `row + col` and painted back to front.

use polyview_base::{Cell, CellKind, Puzzle};
use polyview_paint::{Canvas, Color, DrawList, Fill, Point2, SpecialPalette, piece_color, pos2, shade};

use crate::paint_background;
use crate::projector::{ISOMETRIC_CELL_CAP, IsometricProjector};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellSource {
    Piece(usize),
    Special(CellKind),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawPrimitive {
    pub cell: Cell,
    pub source: CellSource,
    pub color: Color,
    pub screen: Point2,
    pub depth_key: usize,
}

/// One primitive per grid coordinate, sorted back to front.
pub fn collect_primitives(
    puzzle: &Puzzle,
    projector: &IsometricProjector,
    palette: &SpecialPalette,
) -> Vec<DrawPrimitive> {
    let grid = puzzle.grid();
    let mut primitives = Vec::with_capacity(grid.len());

    for (idx, piece) in puzzle.pieces().iter().enumerate() {
        let color = piece_color(idx);
        for &cell in piece.cells() {
            primitives.push(DrawPrimitive {
                cell,
                source: CellSource::Piece(idx),
                color,
                screen: projector.project(cell),
                depth_key: cell.depth_key(),
            });
        }
    }

    for cell in grid.cells() {
        if puzzle.owner(cell).is_some() {
            continue;
        }
        let Some(kind) = grid.kind(cell) else {
            continue;
        };
        primitives.push(DrawPrimitive {
            cell,
            source: CellSource::Special(kind),
            color: palette.color_for(kind),
            screen: projector.project(cell),
            depth_key: cell.depth_key(),
        });
    }

    primitives.sort_by_key(|primitive| primitive.depth_key);
    primitives
}

/// Top, right and left faces of a cube whose bounding square starts at `origin`.
pub fn paint_cube(canvas: &mut impl Canvas, origin: Point2, size: f32, color: Color) {
    let (x, y, s) = (origin.x, origin.y, size);

    canvas.fill_polygon(
        vec![
            pos2(x + s * 0.5, y),
            pos2(x + s, y + s * 0.25),
            pos2(x + s * 0.5, y + s * 0.5),
            pos2(x, y + s * 0.25),
        ],
        Fill::linear(
            pos2(x + s * 0.25, y),
            pos2(x + s * 0.25, y + s * 0.25),
            color,
            shade(color, -10.0),
        ),
    );

    let right = shade(color, -25.0);
    canvas.fill_polygon(
        vec![
            pos2(x + s, y + s * 0.25),
            pos2(x + s, y + s * 0.75),
            pos2(x + s * 0.5, y + s),
            pos2(x + s * 0.5, y + s * 0.5),
        ],
        Fill::linear(
            pos2(x + s, y + s * 0.25),
            pos2(x + s * 0.5, y + s * 0.75),
            shade(right, 5.0),
            right,
        ),
    );

    let left = shade(color, -35.0);
    canvas.fill_polygon(
        vec![
            pos2(x, y + s * 0.25),
            pos2(x, y + s * 0.75),
            pos2(x + s * 0.5, y + s),
            pos2(x + s * 0.5, y + s * 0.5),
        ],
        Fill::linear(
            pos2(x, y + s * 0.25),
            pos2(x + s * 0.5, y + s * 0.75),
            shade(left, 5.0),
            left,
        ),
    );
}

#[derive(Clone, Copy, Debug)]
pub struct DepthCompositor {
    pub cell_cap: f32,
    pub palette: SpecialPalette,
}

impl Default for DepthCompositor {
    fn default() -> Self {
        Self {
            cell_cap: ISOMETRIC_CELL_CAP,
            palette: SpecialPalette::ISOMETRIC,
        }
    }
}

impl DepthCompositor {
    pub fn projector(&self, puzzle: &Puzzle, width: f32, height: f32) -> IsometricProjector {
        let grid = puzzle.grid();
        IsometricProjector::fit(grid.rows(), grid.cols(), width, height, self.cell_cap)
    }

    pub fn render(&self, puzzle: &Puzzle, width: f32, height: f32) -> DrawList {
        let mut list = DrawList::new(width, height);
        paint_background(&mut list, width, height);

        let projector = self.projector(puzzle, width, height);
        for primitive in collect_primitives(puzzle, &projector, &self.palette) {
            paint_cube(&mut list, primitive.screen, projector.cell_size(), primitive.color);
        }
        list
    }
}
