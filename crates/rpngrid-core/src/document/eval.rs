use super::Document;
use crate::error::Result;
use rpngrid_engine::engine::{EvalOptions, EvaluatedGrid, evaluate_expression, evaluate_grid};
use tracing::debug;

impl Document {
    /// Evaluate every cell.
    ///
    /// Works on a copy of the grid, so the document can be evaluated again
    /// and always starts from unevaluated cells.
    pub fn evaluate(&self, options: &EvalOptions) -> Result<EvaluatedGrid> {
        let values = evaluate_grid(self.grid.clone(), options)?;
        Ok(values)
    }

    /// Evaluate a single postfix expression against the document's cells.
    ///
    /// Referenced cells stay memoized for later commands.
    pub fn eval_command(&mut self, expression: &str, options: &EvalOptions) -> Result<f64> {
        let value = evaluate_expression(&mut self.grid, expression, options)?;
        debug!(expression, value, "command evaluated");
        Ok(value)
    }
}
