use crate::grid::{CellId, Grid};
use crate::solver::{GridSolver, RunOutcome, SearchResult};
use fxhash::FxHashSet;
use log::debug;

/// Depth-first search with an explicit stack.
///
/// The destination is detected when it shows up among the neighbours of a popped cell, not when
/// it is popped itself; it is then appended to `visited` and the stack is dropped. The reported
/// length is the number of cells explored, `visited.len() - 1`, which is not a shortest path,
/// and no path cells are produced.
#[derive(Clone, Debug)]
pub struct DfsSolver;

impl GridSolver for DfsSolver {
    fn name(&self) -> &'static str {
        "DFS"
    }

    fn solve(&self, grid: &mut Grid, source: CellId, destination: CellId) -> SearchResult {
        let mut visited = vec![source];
        let mut seen: FxHashSet<CellId> = FxHashSet::default();
        let mut pending: FxHashSet<CellId> = FxHashSet::default();
        let mut stack: Vec<CellId> = Vec::new();
        seen.insert(source);

        let mut found = source == destination
            || expand(grid, source, destination, &seen, &mut pending, &mut stack);
        while !found {
            let Some(cell) = stack.pop() else {
                break;
            };
            pending.remove(&cell);
            seen.insert(cell);
            visited.push(cell);
            found = expand(grid, cell, destination, &seen, &mut pending, &mut stack);
        }
        if found {
            stack.clear();
            if destination != source {
                visited.push(destination);
            }
        }
        debug!("DFS explored {} cells, found: {found}", visited.len());

        let outcome = if found {
            RunOutcome::Found {
                hops: visited.len() - 1,
            }
        } else {
            RunOutcome::NoPath
        };
        SearchResult {
            visited,
            path: Vec::new(),
            outcome,
        }
    }
}

/// Pushes the unexplored neighbours of `cell`, or reports that the destination is one of them.
fn expand(
    grid: &Grid,
    cell: CellId,
    destination: CellId,
    seen: &FxHashSet<CellId>,
    pending: &mut FxHashSet<CellId>,
    stack: &mut Vec<CellId>,
) -> bool {
    let neighbors = grid.neighbors(cell);
    if neighbors.contains(&destination) {
        return true;
    }
    for n in neighbors {
        if !seen.contains(&n) && pending.insert(n) {
            stack.push(n);
        }
    }
    false
}
