use rpngrid_engine::engine::Grid;
use std::path::PathBuf;

/// A loaded sheet: the cell grid plus where it came from.
#[derive(Clone, Debug, Default)]
pub struct Document {
    /// Cell contents; evaluation state is mutated only by command-mode evaluation
    pub grid: Grid,
    /// Source file, if the sheet was read from disk
    pub file_path: Option<PathBuf>,
}

impl Document {
    /// Create an empty (0 x 0) document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_grid(grid: Grid) -> Self {
        Document {
            grid,
            file_path: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }
}
