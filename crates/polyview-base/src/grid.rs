use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Code of a solid border cell.
pub const WALL: i32 = 0;
/// Code of an empty cell.
pub const AIR: i32 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Anti-diagonal index; larger values sit nearer the viewer in the isometric view.
    pub const fn depth_key(self) -> usize {
        self.row + self.col
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl From<Cell> for (usize, usize) {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Wall,
    Air,
    Fillable,
}

impl CellKind {
    pub const fn from_code(code: i32) -> Self {
        match code {
            WALL => Self::Wall,
            AIR => Self::Air,
            _ => Self::Fillable,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i32>>", into = "Vec<Vec<i32>>")]
pub struct Grid {
    rows: usize,
    cols: usize,
    codes: Vec<i32>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(Error::InvalidGrid(
                "grid needs at least one row and one column".to_string(),
            ));
        }
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(Error::InvalidGrid(format!(
                "row {idx} has {} cells, expected {width}",
                row.len()
            )));
        }

        Ok(Self {
            rows: height,
            cols: width,
            codes: rows.into_iter().flatten().collect(),
        })
    }

    pub fn filled(rows: usize, cols: usize, code: i32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidGrid(format!(
                "grid size {rows}x{cols} must be at least 1x1"
            )));
        }
        Ok(Self {
            rows,
            cols,
            codes: vec![code; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn code(&self, cell: Cell) -> Option<i32> {
        self.index(cell).map(|idx| self.codes[idx])
    }

    pub fn kind(&self, cell: Cell) -> Option<CellKind> {
        self.code(cell).map(CellKind::from_code)
    }

    pub fn set(&mut self, cell: Cell, code: i32) -> Result<()> {
        let idx = self
            .index(cell)
            .ok_or_else(|| Error::InvalidParameter(format!("cell {cell} is outside the grid")))?;
        self.codes[idx] = code;
        Ok(())
    }

    /// Row-major iteration over every coordinate.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
    }

    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.codes.chunks(self.cols).map(<[i32]>::to_vec).collect()
    }

    pub(crate) fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then(|| cell.row * self.cols + cell.col)
    }
}

impl TryFrom<Vec<Vec<i32>>> for Grid {
    type Error = Error;

    fn try_from(rows: Vec<Vec<i32>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<i32>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Grid::from_rows(vec![vec![1, 1], vec![1]]).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(Grid::from_rows(Vec::new()).is_err());
        assert!(Grid::filled(0, 3, AIR).is_err());
    }

    #[test]
    fn codes_map_to_kinds() -> Result<()> {
        let grid = Grid::from_rows(vec![vec![0, -1, 3], vec![1, 7, -5]])?;
        assert_eq!(grid.kind(Cell::new(0, 0)), Some(CellKind::Wall));
        assert_eq!(grid.kind(Cell::new(0, 1)), Some(CellKind::Air));
        assert_eq!(grid.kind(Cell::new(0, 2)), Some(CellKind::Fillable));
        assert_eq!(grid.kind(Cell::new(1, 2)), Some(CellKind::Fillable));
        assert_eq!(grid.kind(Cell::new(2, 0)), None);
        Ok(())
    }

    #[test]
    fn cells_are_row_major() -> Result<()> {
        let grid = Grid::filled(2, 3, 1)?;
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[3], Cell::new(1, 0));
        assert_eq!(grid.to_rows(), vec![vec![1, 1, 1], vec![1, 1, 1]]);
        Ok(())
    }
}
