//! rpngrid_engine - Postfix cell evaluation with memoization and cycle detection.

pub mod engine;
pub mod error;

pub use error::{EvalError, GridError, Result};
