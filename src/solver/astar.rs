use crate::grid::{euclidean, CellId, Grid};
use crate::solver::GridSolver;

/// A* search. The key is the cell's `f` value (steps taken plus accumulated distance) plus the
/// straight-line distance to the destination.
#[derive(Clone, Debug)]
pub struct AstarSolver;

impl GridSolver for AstarSolver {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn priority(&self, grid: &Grid, candidate: CellId, destination: CellId, _distance: f64) -> f64 {
        let cell = grid.cell(candidate);
        cell.f + euclidean(&cell.position, &grid.cell(destination).position)
    }
}
