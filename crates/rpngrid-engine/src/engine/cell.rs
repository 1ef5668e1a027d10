//! Cell data structures for the evaluation grid.
//!
//! - [`CellState`] - Evaluation progress of a cell, holding the value once known
//! - [`Cell`] - Immutable content plus evaluation state
//! - [`Grid`] - Fixed-size, row-major storage that owns every cell

use super::cell_ref::CellRef;
use crate::error::{EvalError, GridError};

/// Evaluation progress of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum CellState {
    #[default]
    Unevaluated,
    /// On the current evaluation path; meeting it again means a cycle.
    InProgress,
    Evaluated(f64),
}

/// A cell in the grid.
#[derive(Clone, Debug)]
pub struct Cell {
    content: String,
    pub(crate) state: CellState,
}

impl Cell {
    pub fn new(content: impl Into<String>) -> Cell {
        Cell {
            content: content.into(),
            state: CellState::Unevaluated,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    /// The computed value, available only once the cell is evaluated.
    pub fn value(&self) -> Option<f64> {
        match self.state {
            CellState::Evaluated(v) => Some(v),
            _ => None,
        }
    }
}

/// Fixed-size grid of cells stored in row-major order.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from `rows * cols` contents listed in row-major order.
    pub fn new<S: Into<String>>(
        rows: usize,
        cols: usize,
        contents: Vec<S>,
    ) -> Result<Grid, GridError> {
        let expected = rows.checked_mul(cols).unwrap_or(usize::MAX);
        if contents.len() != expected {
            return Err(GridError::DimensionMismatch {
                rows,
                cols,
                expected,
                actual: contents.len(),
            });
        }

        let mut cells = Vec::with_capacity(expected);
        for (i, content) in contents.into_iter().enumerate() {
            let cell = Cell::new(content);
            if cell.content.trim().is_empty() {
                return Err(GridError::EmptyCell(CellRef::new(i % cols, i / cols)));
            }
            cells.push(cell);
        }

        Ok(Grid { rows, cols, cells })
    }

    /// Build a grid from a list of rows; every row must have the same width.
    pub fn from_rows<S: Into<String>>(rows: Vec<Vec<S>>) -> Result<Grid, GridError> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        let mut contents = Vec::with_capacity(row_count * cols);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != cols {
                return Err(GridError::RaggedRow {
                    row,
                    expected: cols,
                    actual: cells.len(),
                });
            }
            contents.extend(cells.into_iter().map(Into::into));
        }
        Grid::new::<String>(row_count, cols, contents)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, at: &CellRef) -> Option<usize> {
        (at.row < self.rows && at.col < self.cols).then(|| at.row * self.cols + at.col)
    }

    pub fn get(&self, at: &CellRef) -> Option<&Cell> {
        self.index(at).map(|i| &self.cells[i])
    }

    pub(crate) fn get_mut(&mut self, at: &CellRef) -> Option<&mut Cell> {
        self.index(at).map(move |i| &mut self.cells[i])
    }

    /// Resolve a reference token to an in-bounds coordinate.
    ///
    /// Tokens shaped like a reference that name no cell of this grid,
    /// including row 0, are `OutOfBounds`; anything else is `InvalidReference`.
    pub fn resolve(&self, reference: &str) -> Result<CellRef, EvalError> {
        let out_of_bounds = || EvalError::OutOfBounds {
            reference: reference.to_string(),
            rows: self.rows,
            cols: self.cols,
        };
        match CellRef::from_str(reference) {
            Some(at) if self.index(&at).is_some() => Ok(at),
            Some(_) => Err(out_of_bounds()),
            None if CellRef::is_well_formed(reference) => Err(out_of_bounds()),
            None => Err(EvalError::InvalidReference(reference.to_string())),
        }
    }

    /// Iterate over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (CellRef::new(i % cols, i / cols), cell))
    }
}
