use thiserror::Error;

pub mod grid;
pub mod piece;
pub mod state;
pub mod status;

pub use grid::{AIR, Cell, CellKind, Grid, WALL};
pub use piece::{Piece, PieceBounds, PieceMap, Puzzle, PuzzleData};
pub use state::{PuzzleViewState, ViewMode};
pub use status::{StatusChannel, StatusLevel, StatusLine};

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    #[error("invalid piece partition: {0}")]
    InvalidPartition(String),
}

pub type Result<T> = std::result::Result<T, Error>;
