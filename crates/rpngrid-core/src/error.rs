//! Error types for rpngrid core.

use thiserror::Error;

use rpngrid_engine::{EvalError, GridError};

/// Errors that can occur while loading, evaluating or writing a sheet
#[derive(Error, Debug)]
pub enum RpnGridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid grid: {0}")]
    Grid(#[from] GridError),

    #[error("Evaluation failed: {0}")]
    Eval(#[from] EvalError),
}

pub type Result<T> = std::result::Result<T, RpnGridError>;
