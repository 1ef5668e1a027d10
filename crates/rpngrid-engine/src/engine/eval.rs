//! Memoized, cycle-safe evaluation of grid cells.
//!
//! Each cell moves `Unevaluated -> InProgress -> Evaluated` exactly once per
//! run. A reference to an evaluated cell returns the stored value; a
//! reference to an in-progress cell is a circular dependency. Any error
//! aborts the whole run.

use tracing::{debug, info_span};

use super::cell::{Cell, CellState, Grid};
use super::cell_ref::CellRef;
use super::cycle::EvalStack;
use super::postfix::{PostfixRun, Step, evaluate_postfix};
use crate::error::{EvalError, Result};

/// Default limit on the length of a dependency chain.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Knobs for an evaluation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalOptions {
    /// Maximum number of cells on one evaluation path before the run fails
    /// with [`EvalError::DepthExceeded`].
    pub max_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Counters collected during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalReport {
    pub cells: usize,
    /// Cell expressions actually interpreted.
    pub expressions_evaluated: usize,
    /// References answered from an already evaluated cell.
    pub cache_hits: usize,
}

/// Values of a fully evaluated grid.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluatedGrid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
    report: EvalReport,
}

impl EvaluatedGrid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn value(&self, at: &CellRef) -> Option<f64> {
        (at.row < self.rows && at.col < self.cols).then(|| self.values[at.row * self.cols + at.col])
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks(self.cols.max(1))
    }

    pub fn report(&self) -> EvalReport {
        self.report
    }
}

/// A cell whose expression is suspended on the work-stack.
struct Frame {
    at: CellRef,
    run: PostfixRun,
}

enum Entered {
    Known(f64),
    Started(Frame),
}

struct Driver<'g> {
    grid: &'g mut Grid,
    options: &'g EvalOptions,
    report: EvalReport,
}

impl<'g> Driver<'g> {
    fn new(grid: &'g mut Grid, options: &'g EvalOptions) -> Self {
        let report = EvalReport {
            cells: grid.len(),
            ..EvalReport::default()
        };
        Driver {
            grid,
            options,
            report,
        }
    }

    /// Evaluate `root` and everything it depends on.
    ///
    /// Dependencies are followed on a heap-allocated work-stack of frames,
    /// so chain length is bounded by `max_depth` and memory, never by the
    /// native call stack. On failure every cell left on the work-stack goes
    /// back to `Unevaluated`.
    fn evaluate(&mut self, root: &CellRef, stack: &mut EvalStack) -> Result<f64> {
        let mut frames = Vec::new();
        let result = self.run(root, stack, &mut frames);
        if result.is_err() {
            for frame in frames.iter().rev() {
                stack.pop();
                if let Some(cell) = self.grid.get_mut(&frame.at) {
                    cell.state = CellState::Unevaluated;
                }
            }
        }
        result
    }

    fn run(
        &mut self,
        root: &CellRef,
        stack: &mut EvalStack,
        frames: &mut Vec<Frame>,
    ) -> Result<f64> {
        match self.enter(root, stack)? {
            Entered::Known(value) => return Ok(value),
            Entered::Started(frame) => frames.push(frame),
        }

        let mut result = 0.0;
        while let Some(frame) = frames.last_mut() {
            match frame.run.step()? {
                Step::Continue => {}
                Step::Reference(name) => {
                    let target = self.grid.resolve(&name)?;
                    match self.enter(&target, stack)? {
                        Entered::Known(value) => frame.run.supply(value),
                        Entered::Started(next) => frames.push(next),
                    }
                }
                Step::Done(value) => {
                    let at = frame.at.clone();
                    frames.pop();
                    stack.pop();
                    if let Some(cell) = self.grid.get_mut(&at) {
                        cell.state = CellState::Evaluated(value);
                    }
                    self.report.expressions_evaluated += 1;
                    debug!(cell = %at, value, depth = stack.depth(), "evaluated cell");

                    match frames.last_mut() {
                        Some(parent) => parent.run.supply(value),
                        None => result = value,
                    }
                }
            }
        }
        Ok(result)
    }

    /// Visit a cell: answer from memo, report a cycle, or start a new frame.
    fn enter(&mut self, at: &CellRef, stack: &mut EvalStack) -> Result<Entered> {
        let Some(cell) = self.grid.get_mut(at) else {
            return Err(EvalError::OutOfBounds {
                reference: at.to_string(),
                rows: self.grid.rows(),
                cols: self.grid.cols(),
            });
        };

        match cell.state {
            CellState::Evaluated(value) => {
                self.report.cache_hits += 1;
                return Ok(Entered::Known(value));
            }
            CellState::InProgress => {
                let path = stack.cycle_path(at);
                debug!(cell = %at, on_path = stack.depth(), "circular dependency");
                return Err(EvalError::CyclicDependency {
                    cell: at.clone(),
                    path,
                });
            }
            CellState::Unevaluated => {}
        }

        if stack.depth() >= self.options.max_depth {
            return Err(EvalError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }

        cell.state = CellState::InProgress;
        let run = PostfixRun::new(cell.content());
        stack.push(at.clone());
        Ok(Entered::Started(Frame {
            at: at.clone(),
            run,
        }))
    }
}

/// Evaluate every cell of `grid` in row-major order.
///
/// Cells already evaluated as a dependency of an earlier cell are not
/// revisited. On failure the grid is dropped and only the error is returned.
pub fn evaluate_grid(mut grid: Grid, options: &EvalOptions) -> Result<EvaluatedGrid> {
    let rows = grid.rows();
    let cols = grid.cols();
    let _span = info_span!("evaluate_grid", rows, cols).entered();

    let coords: Vec<CellRef> = grid.iter().map(|(at, _)| at).collect();
    let mut driver = Driver::new(&mut grid, options);
    let mut values = Vec::with_capacity(coords.len());

    for at in &coords {
        let known = driver.grid.get(at).and_then(Cell::value);
        let value = match known {
            Some(value) => value,
            None => driver.evaluate(at, &mut EvalStack::new())?,
        };
        values.push(value);
    }

    let report = driver.report;
    debug!(?report, "grid evaluated");
    Ok(EvaluatedGrid {
        rows,
        cols,
        values,
        report,
    })
}

/// Evaluate a free-standing postfix expression against `grid`.
///
/// Cells reached through references are memoized in the grid, so repeated
/// calls do not recompute them.
pub fn evaluate_expression(grid: &mut Grid, expression: &str, options: &EvalOptions) -> Result<f64> {
    let mut driver = Driver::new(grid, options);
    let mut stack = EvalStack::new();
    evaluate_postfix(expression, |name| {
        let target = driver.grid.resolve(name)?;
        driver.evaluate(&target, &mut stack)
    })
}
