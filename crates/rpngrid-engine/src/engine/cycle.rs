//! Evaluation path tracking for circular dependency detection.
//!
//! While a cell is being evaluated it sits on the [`EvalStack`]. Reaching a
//! cell that is already on the stack means the current path loops back on
//! itself (e.g. A1 references B1, B1 references C1, C1 references A1).

use std::collections::HashSet;

use super::CellRef;

/// Ordered set of cells under evaluation along the current dependency path.
#[derive(Debug, Default)]
pub struct EvalStack {
    path: Vec<CellRef>,
    members: HashSet<CellRef>,
}

impl EvalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        self.members.contains(cell)
    }

    pub fn push(&mut self, cell: CellRef) {
        self.members.insert(cell.clone());
        self.path.push(cell);
    }

    pub fn pop(&mut self) -> Option<CellRef> {
        let cell = self.path.pop()?;
        self.members.remove(&cell);
        Some(cell)
    }

    pub fn path(&self) -> &[CellRef] {
        &self.path
    }

    /// The full evaluation path that led back to `cell`, ending with `cell`
    /// itself, e.g. `A1 -> B1 -> C1 -> B1`.
    pub fn cycle_path(&self, cell: &CellRef) -> Vec<CellRef> {
        let mut cycle = Vec::with_capacity(self.path.len() + 1);
        cycle.extend(self.path.iter().cloned());
        cycle.push(cell.clone());
        cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_tracks_membership() {
        let mut stack = EvalStack::new();
        let a1 = CellRef::new(0, 0);
        stack.push(a1.clone());
        assert!(stack.contains(&a1));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pop(), Some(a1.clone()));
        assert!(!stack.contains(&a1));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_cycle_path_keeps_cells_leading_into_loop() {
        let mut stack = EvalStack::new();
        let a1 = CellRef::new(0, 0);
        let b1 = CellRef::new(1, 0);
        let c1 = CellRef::new(2, 0);
        stack.push(a1.clone());
        stack.push(b1.clone());
        stack.push(c1.clone());
        assert_eq!(stack.cycle_path(&b1), vec![a1, b1.clone(), c1, b1]);
    }
}
