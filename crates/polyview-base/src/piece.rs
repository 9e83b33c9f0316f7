use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Grid};
use crate::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Piece {
    cells: Vec<Cell>,
}

impl Piece {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn from_coords(coords: &[(usize, usize)]) -> Self {
        Self::new(coords.iter().copied().map(Cell::from).collect())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn bounds(&self) -> Option<PieceBounds> {
        let mut iter = self.cells.iter();
        let first = iter.next()?;
        let mut bounds = PieceBounds {
            min_row: first.row,
            max_row: first.row,
            min_col: first.col,
            max_col: first.col,
        };
        for cell in iter {
            bounds.min_row = bounds.min_row.min(cell.row);
            bounds.max_row = bounds.max_row.max(cell.row);
            bounds.min_col = bounds.min_col.min(cell.col);
            bounds.max_col = bounds.max_col.max(cell.col);
        }
        Some(bounds)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceBounds {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl PieceBounds {
    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }
}

/// Coordinate to owning piece index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceMap {
    cols: usize,
    owners: Vec<Option<usize>>,
}

impl PieceMap {
    pub fn build(grid: &Grid, pieces: &[Piece]) -> Result<Self> {
        let mut owners = vec![None; grid.len()];
        for (idx, piece) in pieces.iter().enumerate() {
            for &cell in piece.cells() {
                let slot = grid.index(cell).ok_or_else(|| {
                    Error::InvalidPartition(format!(
                        "piece {} has cell {cell} outside the {}x{} grid",
                        idx + 1,
                        grid.rows(),
                        grid.cols()
                    ))
                })?;
                if let Some(other) = owners[slot] {
                    return Err(Error::InvalidPartition(format!(
                        "cell {cell} is claimed by piece {} and piece {}",
                        other + 1,
                        idx + 1
                    )));
                }
                owners[slot] = Some(idx);
            }
        }
        Ok(Self {
            cols: grid.cols(),
            owners,
        })
    }

    pub fn owner(&self, cell: Cell) -> Option<usize> {
        if cell.col >= self.cols {
            return None;
        }
        self.owners
            .get(cell.row * self.cols + cell.col)
            .copied()
            .flatten()
    }

    pub fn assigned(&self) -> usize {
        self.owners.iter().filter(|owner| owner.is_some()).count()
    }
}

/// Wire shape of a puzzle: the raw grid plus its piece list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuzzleData {
    pub grid: Grid,
    pub pieces: Vec<Piece>,
}

/// A grid together with a validated piece partition.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "PuzzleData", into = "PuzzleData")]
pub struct Puzzle {
    grid: Grid,
    pieces: Vec<Piece>,
    owners: PieceMap,
}

impl Puzzle {
    pub fn new(grid: Grid, pieces: Vec<Piece>) -> Result<Self> {
        let owners = PieceMap::build(&grid, &pieces)?;
        Ok(Self {
            grid,
            pieces,
            owners,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn owner(&self, cell: Cell) -> Option<usize> {
        self.owners.owner(cell)
    }

    pub fn piece_map(&self) -> &PieceMap {
        &self.owners
    }
}

impl TryFrom<PuzzleData> for Puzzle {
    type Error = Error;

    fn try_from(data: PuzzleData) -> Result<Self> {
        Self::new(data.grid, data.pieces)
    }
}

impl From<Puzzle> for PuzzleData {
    fn from(puzzle: Puzzle) -> Self {
        Self {
            grid: puzzle.grid,
            pieces: puzzle.pieces,
        }
    }
}
