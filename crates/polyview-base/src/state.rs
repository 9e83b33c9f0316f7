use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;
use crate::piece::Puzzle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Isometric,
    Flat,
}

impl ViewMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Isometric => "isometric",
            Self::Flat => "flat",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "isometric" | "iso" => Ok(Self::Isometric),
            "flat" => Ok(Self::Flat),
            other => Err(Error::InvalidParameter(format!(
                "unknown view mode '{other}', expected isometric or flat"
            ))),
        }
    }
}

/// The puzzle being shown, its solution cursor and the active board view.
///
/// `current_solution == None` is the original, unsolved layout.
#[derive(Clone, Debug, Default)]
pub struct PuzzleViewState {
    puzzle: Option<Puzzle>,
    solution_count: usize,
    current_solution: Option<usize>,
    view_mode: ViewMode,
}

impl PuzzleViewState {
    pub fn new(view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            ..Self::default()
        }
    }

    /// Replaces the puzzle wholesale and forgets any solutions of the previous one.
    pub fn load(&mut self, puzzle: Puzzle) {
        self.puzzle = Some(puzzle);
        self.solution_count = 0;
        self.current_solution = None;
    }

    pub fn puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.as_ref()
    }

    pub fn has_puzzle(&self) -> bool {
        self.puzzle.is_some()
    }

    pub fn set_solution_count(&mut self, count: usize) {
        self.solution_count = count;
        self.current_solution = None;
    }

    pub fn solution_count(&self) -> usize {
        self.solution_count
    }

    pub fn current_solution(&self) -> Option<usize> {
        self.current_solution
    }

    pub fn next_solution(&mut self) {
        if self.solution_count == 0 {
            return;
        }
        self.current_solution = Some(match self.current_solution {
            None => 0,
            Some(idx) => (idx + 1) % self.solution_count,
        });
    }

    pub fn prev_solution(&mut self) {
        if self.solution_count == 0 {
            return;
        }
        self.current_solution = Some(match self.current_solution {
            None => self.solution_count - 1,
            Some(idx) => (idx + self.solution_count - 1) % self.solution_count,
        });
    }

    pub fn show_original(&mut self) {
        self.current_solution = None;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn solution_label(&self) -> String {
        match self.current_solution {
            None => format!("Solution: 0 (Original) | Found: {}", self.solution_count),
            Some(idx) => format!("Solution: {} | Found: {}", idx + 1, self.solution_count),
        }
    }
}
