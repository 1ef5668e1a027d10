//! Spreadsheet evaluation engine API.
//!
//! This module provides the core computation engine for the grid:
//!
//! - [`Cell`], [`CellState`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`classify`], [`Token`], [`Operator`] - Postfix token classification
//! - [`evaluate_postfix`], [`PostfixRun`], [`OperandStack`] - Postfix expression interpreter
//! - [`EvalStack`] - Evaluation path used for circular dependency detection
//! - [`evaluate_grid`], [`evaluate_expression`] - Memoized work-stack driver

mod cell;
mod cell_ref;
mod cycle;
mod eval;
mod postfix;
mod token;

pub use cell::{Cell, CellState, Grid};
pub use cell_ref::CellRef;
pub use cycle::EvalStack;
pub use eval::{
    DEFAULT_MAX_DEPTH, EvalOptions, EvalReport, EvaluatedGrid, evaluate_expression, evaluate_grid,
};
pub use postfix::{OperandStack, PostfixRun, Step, evaluate_postfix};
pub use token::{Operator, Token, classify, tokenize};
