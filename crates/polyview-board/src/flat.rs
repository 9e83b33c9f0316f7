use polyview_base::{Cell, Puzzle};
use polyview_paint::{Canvas, Color, DrawList, Fill, Rect, SpecialPalette, Vec2, piece_color, pos2, shade, vec2};

use crate::paint_background;

pub const FLAT_CELL_CAP: f32 = 80.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatLayout {
    pub cell_size: f32,
    pub offset: Vec2,
}

impl FlatLayout {
    pub fn fit(rows: usize, cols: usize, width: f32, height: f32, cap: f32) -> Self {
        let cell_size = (width / cols as f32).min(height / rows as f32).min(cap);
        Self {
            cell_size,
            offset: vec2(
                (width - cell_size * cols as f32) / 2.0,
                (height - cell_size * rows as f32) / 2.0,
            ),
        }
    }

    pub fn cell_rect(&self, cell: Cell) -> Rect {
        let min = pos2(
            self.offset.x + cell.col as f32 * self.cell_size,
            self.offset.y + cell.row as f32 * self.cell_size,
        );
        Rect::from_min_size(min, vec2(self.cell_size, self.cell_size))
    }
}

/// Axis-aligned board view. Cells never overlap, so paint order is irrelevant.
#[derive(Clone, Copy, Debug)]
pub struct FlatRenderer {
    pub cell_cap: f32,
    pub palette: SpecialPalette,
}

impl Default for FlatRenderer {
    fn default() -> Self {
        Self {
            cell_cap: FLAT_CELL_CAP,
            palette: SpecialPalette::FLAT,
        }
    }
}

impl FlatRenderer {
    pub fn layout(&self, puzzle: &Puzzle, width: f32, height: f32) -> FlatLayout {
        let grid = puzzle.grid();
        FlatLayout::fit(grid.rows(), grid.cols(), width, height, self.cell_cap)
    }

    pub fn render(&self, puzzle: &Puzzle, width: f32, height: f32) -> DrawList {
        let mut list = DrawList::new(width, height);
        paint_background(&mut list, width, height);
        let layout = self.layout(puzzle, width, height);

        for (idx, piece) in puzzle.pieces().iter().enumerate() {
            for &cell in piece.cells() {
                paint_cell(&mut list, layout.cell_rect(cell), piece_color(idx));
            }
        }

        let grid = puzzle.grid();
        for cell in grid.cells() {
            if puzzle.owner(cell).is_some() {
                continue;
            }
            if let Some(kind) = grid.kind(cell) {
                paint_cell(&mut list, layout.cell_rect(cell), self.palette.color_for(kind));
            }
        }
        list
    }
}

fn paint_cell(canvas: &mut impl Canvas, rect: Rect, color: Color) {
    let fill = Fill::linear(
        rect.min,
        pos2(rect.min.x, rect.max.y),
        color,
        shade(color, -15.0),
    );
    canvas.fill_rect(rect, 0.0, fill);
}
