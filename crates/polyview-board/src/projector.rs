use polyview_base::Cell;
use polyview_paint::{Point2, Rect, Vec2, pos2};

pub const ISOMETRIC_CELL_CAP: f32 = 180.0;

/// 2:1 isometric mapping of grid cells onto a canvas, centered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsometricProjector {
    cell_size: f32,
    offset: Vec2,
}

impl IsometricProjector {
    pub fn cell_size_for(rows: usize, cols: usize, width: f32, height: f32, cap: f32) -> f32 {
        let span = (rows + cols + 1) as f32;
        (2.0 * width / span).min(4.0 * height / span).min(cap)
    }

    pub fn fit(rows: usize, cols: usize, width: f32, height: f32, cap: f32) -> Self {
        let mut projector = Self {
            cell_size: Self::cell_size_for(rows, cols, width, height, cap),
            offset: Vec2::default(),
        };
        let extent = projector.extent(rows, cols);
        projector.offset = Vec2::new(
            (width - extent.width()) / 2.0 - extent.min.x,
            (height - extent.height()) / 2.0 - extent.min.y,
        );
        projector
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Top-left of the cube drawn for `cell`.
    pub fn project(&self, cell: Cell) -> Point2 {
        self.unshifted(cell) + self.offset
    }

    /// Screen-space box covering every cube of a `rows` x `cols` grid.
    pub fn bounds(&self, rows: usize, cols: usize) -> Rect {
        let extent = self.extent(rows, cols);
        Rect {
            min: extent.min + self.offset,
            max: extent.max + self.offset,
        }
    }

    fn unshifted(&self, cell: Cell) -> Point2 {
        let (r, c) = (cell.row as f32, cell.col as f32);
        let s = self.cell_size;
        pos2(c * s * 0.5 - r * s * 0.5, r * s * 0.25 + c * s * 0.25)
    }

    // The mapping is linear, so the four corner cells carry the extremes.
    fn extent(&self, rows: usize, cols: usize) -> Rect {
        let last_row = rows.saturating_sub(1);
        let last_col = cols.saturating_sub(1);
        let corners = [
            Cell::new(0, 0),
            Cell::new(0, last_col),
            Cell::new(last_row, 0),
            Cell::new(last_row, last_col),
        ];
        let mut min = pos2(f32::INFINITY, f32::INFINITY);
        let mut max = pos2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for corner in corners {
            let p = self.unshifted(corner);
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x + self.cell_size);
            max.y = max.y.max(p.y + self.cell_size);
        }
        Rect { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_size_respects_all_three_limits() {
        let cases = [
            (1, 1, 800.0, 600.0),
            (4, 4, 800.0, 600.0),
            (10, 3, 300.0, 900.0),
            (3, 30, 1200.0, 200.0),
            (50, 50, 640.0, 480.0),
        ];
        for (rows, cols, width, height) in cases {
            let size = IsometricProjector::cell_size_for(rows, cols, width, height, 180.0);
            let span = (rows + cols + 1) as f32;
            assert!(size <= 180.0);
            assert!(size <= 2.0 * width / span + 1e-4);
            assert!(size <= 4.0 * height / span + 1e-4);
        }
    }

    #[test]
    fn single_cell_is_capped() {
        let projector = IsometricProjector::fit(1, 1, 2000.0, 2000.0, 180.0);
        assert_eq!(projector.cell_size(), 180.0);
    }

    #[test]
    fn projection_is_centered() {
        let (width, height) = (800.0, 600.0);
        let projector = IsometricProjector::fit(5, 7, width, height, 180.0);
        let bounds = projector.bounds(5, 7);
        assert!((bounds.center().x - width / 2.0).abs() < 1e-3);
        assert!((bounds.center().y - height / 2.0).abs() < 1e-3);
        assert!(bounds.min.x >= -1e-3 && bounds.max.x <= width + 1e-3);
        assert!(bounds.min.y >= -1e-3 && bounds.max.y <= height + 1e-3);
    }

    #[test]
    fn corners_bound_every_cell() {
        let projector = IsometricProjector::fit(4, 6, 500.0, 400.0, 180.0);
        let bounds = projector.bounds(4, 6);
        let s = projector.cell_size();
        for row in 0..4 {
            for col in 0..6 {
                let p = projector.project(Cell::new(row, col));
                assert!(bounds.contains(p));
                assert!(bounds.contains(pos2(p.x + s, p.y + s)));
            }
        }
    }

    #[test]
    fn skew_is_two_to_one() {
        let projector = IsometricProjector::fit(3, 3, 600.0, 600.0, 180.0);
        let s = projector.cell_size();
        let origin = projector.project(Cell::new(0, 0));
        let right = projector.project(Cell::new(0, 1));
        let down = projector.project(Cell::new(1, 0));
        assert!((right.x - origin.x - s * 0.5).abs() < 1e-4);
        assert!((right.y - origin.y - s * 0.25).abs() < 1e-4);
        assert!((down.x - origin.x + s * 0.5).abs() < 1e-4);
        assert!((down.y - origin.y - s * 0.25).abs() < 1e-4);
    }
}
