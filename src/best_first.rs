//! This module implements the best-first search shared by Dijkstra, greedy best-first and A*.
//! The variants only differ in the priority key a discovered cell is queued with.
use crate::grid::{euclidean, CellId, Grid};
use crate::solver::{RunOutcome, SearchResult};
use fxhash::{FxBuildHasher, FxHashMap, FxHashSet};
use indexmap::IndexMap;
use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

struct FrontierEntry {
    priority: f64,
    order: usize,
    cell: CellId,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest priority first, equal priorities in the order they were queued
        match other.priority.total_cmp(&self.priority) {
            Ordering::Equal => other.order.cmp(&self.order),
            s => s,
        }
    }
}

/// Walks the predecessor chain back from `destination`. The chain is cut after one step per cell
/// so a corrupted map can never loop; an empty path is returned if it does not end at `source`.
pub(crate) fn reverse_path(
    predecessors: &FxIndexMap<CellId, CellId>,
    source: CellId,
    destination: CellId,
    limit: usize,
) -> Vec<CellId> {
    let mut path: Vec<CellId> =
        std::iter::successors(Some(destination), |cell| predecessors.get(cell).copied())
            .take(limit)
            .collect();
    path.reverse();
    if path.first() == Some(&source) {
        path
    } else {
        Vec::new()
    }
}

/// Runs a best-first search from `source` until `destination` is popped or the frontier is
/// exhausted. `priority` receives the grid (with the candidate's scratch values already
/// updated), the candidate and its tentative distance, and returns the key it is queued with.
///
/// Frontier entries are never removed when a better route to a cell is found, stale entries are
/// skipped when popped instead. Cells are relaxed even after they were finalized, which keeps
/// every predecessor strictly closer to the source than its successor.
pub fn best_first<FP>(
    grid: &mut Grid,
    source: CellId,
    destination: CellId,
    mut priority: FP,
) -> SearchResult
where
    FP: FnMut(&Grid, CellId, f64) -> f64,
{
    grid.reset_scratch();
    let mut distances: FxHashMap<CellId, f64> = FxHashMap::default();
    let mut predecessors: FxIndexMap<CellId, CellId> = FxIndexMap::default();
    let mut finalized: FxHashSet<CellId> = FxHashSet::default();
    let mut visited = Vec::new();
    let mut frontier = BinaryHeap::new();
    let mut pushes = 0;

    distances.insert(source, 0.0);
    frontier.push(FrontierEntry {
        priority: 0.0,
        order: pushes,
        cell: source,
    });
    let mut reached = false;
    while let Some(FrontierEntry { cell: current, .. }) = frontier.pop() {
        if finalized.contains(&current) {
            continue;
        }
        if current == destination {
            reached = true;
            break;
        }
        finalized.insert(current);
        visited.push(current);

        let current_distance = distances[&current];
        let current_position = grid.cell(current).position;
        let current_g = grid.cell(current).g;
        for neighbour in grid.neighbors(current) {
            let tentative =
                current_distance + euclidean(&current_position, &grid.cell(neighbour).position);
            let known = distances.get(&neighbour).copied().unwrap_or(f64::INFINITY);
            if tentative < known {
                let cell = grid.cell_mut(neighbour);
                cell.g = current_g + 1;
                cell.h = tentative;
                cell.f = cell.g as f64 + cell.h;
                predecessors.insert(neighbour, current);
                distances.insert(neighbour, tentative);
                pushes += 1;
                frontier.push(FrontierEntry {
                    priority: priority(&*grid, neighbour, tentative),
                    order: pushes,
                    cell: neighbour,
                });
            }
        }
    }
    debug!(
        "Best-first search finalized {} cells with {} frontier pushes",
        visited.len(),
        pushes
    );

    let path = if reached {
        reverse_path(&predecessors, source, destination, grid.len())
    } else {
        Vec::new()
    };
    let outcome = match path.len() {
        0 => RunOutcome::NoPath,
        n => RunOutcome::Found { hops: n - 1 },
    };
    SearchResult {
        visited,
        path,
        outcome,
    }
}
