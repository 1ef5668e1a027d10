//! Error types for the evaluation engine.

use thiserror::Error;

use crate::engine::CellRef;

/// Fatal conditions that abort an evaluation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Circular dependency detected at {cell}: {}", format_path(.path))]
    CyclicDependency { cell: CellRef, path: Vec<CellRef> },

    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    #[error("Cell reference {reference} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        reference: String,
        rows: usize,
        cols: usize,
    },

    #[error("Malformed expression '{expression}': {detail}")]
    MalformedExpression { expression: String, detail: String },

    #[error("Dependency chain exceeds the maximum depth of {limit} cells")]
    DepthExceeded { limit: usize },
}

fn format_path(path: &[CellRef]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors raised while building a grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Expected {expected} cells for a {rows}x{cols} grid, got {actual}")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Cell {0} has no content")]
    EmptyCell(CellRef),
}

pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_path() {
        let err = EvalError::CyclicDependency {
            cell: CellRef::new(0, 0),
            path: vec![CellRef::new(0, 0), CellRef::new(1, 0), CellRef::new(0, 0)],
        };
        assert_eq!(
            err.to_string(),
            "Circular dependency detected at A1: A1 -> B1 -> A1"
        );
    }
}
