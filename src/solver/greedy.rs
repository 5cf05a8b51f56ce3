use crate::config::GreedyUnits;
use crate::grid::{euclidean, squared_distance, CellId, Grid};
use crate::solver::GridSolver;

/// Greedy best-first search. The key adds the distance to the destination to the accumulated
/// distance; with [GreedyUnits::Squared] the destination term is squared, which makes it dominate
/// on all but the smallest grids.
#[derive(Clone, Debug)]
pub struct GreedySolver {
    pub units: GreedyUnits,
}

impl GreedySolver {
    pub fn new(units: GreedyUnits) -> GreedySolver {
        GreedySolver { units }
    }
}

impl Default for GreedySolver {
    fn default() -> Self {
        GreedySolver::new(GreedyUnits::Squared)
    }
}

impl GridSolver for GreedySolver {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn priority(&self, grid: &Grid, candidate: CellId, destination: CellId, distance: f64) -> f64 {
        let p1 = &grid.cell(candidate).position;
        let p2 = &grid.cell(destination).position;
        match self.units {
            GreedyUnits::Squared => distance + squared_distance(p1, p2) as f64,
            GreedyUnits::Linear => distance + euclidean(p1, p2),
        }
    }
}
