use crate::solver::GridSolver;

/// Queues cells by their accumulated distance from the source.
#[derive(Clone, Debug)]
pub struct DijkstraSolver;

impl GridSolver for DijkstraSolver {
    fn name(&self) -> &'static str {
        "Dijkstra"
    }
}
