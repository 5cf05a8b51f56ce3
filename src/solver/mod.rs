use crate::best_first::best_first;
use crate::config::VisualizerConfig;
use crate::error::VisualizerError;
use crate::grid::{euclidean, CellId, Grid};
use core::fmt;
use itertools::Itertools;
use std::str::FromStr;

pub mod astar;
pub mod dfs;
pub mod dijkstra;
pub mod greedy;

use astar::AstarSolver;
use dfs::DfsSolver;
use dijkstra::DijkstraSolver;
use greedy::GreedySolver;

/// How a search run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Found { hops: usize },
    NoPath,
}

impl RunOutcome {
    pub fn hops(&self) -> Option<usize> {
        match self {
            RunOutcome::Found { hops } => Some(*hops),
            RunOutcome::NoPath => None,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunOutcome::Found { hops } => write!(f, "{hops}"),
            RunOutcome::NoPath => write!(f, "no path"),
        }
    }
}

/// Everything a run produces. `visited` holds cells in the order they were finalized, starting
/// with the source; `path` runs from source to destination and is empty when none was found.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub visited: Vec<CellId>,
    pub path: Vec<CellId>,
    pub outcome: RunOutcome,
}

/// Sum of the straight-line step lengths along `path`.
pub fn path_cost(grid: &Grid, path: &[CellId]) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| euclidean(&grid.cell(*a).position, &grid.cell(*b).position))
        .sum()
}

/// Checks that consecutive cells of `path` are open geometric neighbours.
pub fn is_connected_path(grid: &Grid, path: &[CellId]) -> bool {
    path.iter()
        .tuple_windows()
        .all(|(a, b)| grid.neighbors(*a).contains(b))
}

pub trait GridSolver {
    fn name(&self) -> &'static str;

    /// Key a discovered cell is queued with, given its tentative distance from the source.
    /// Defaults to that distance.
    fn priority(&self, _grid: &Grid, _candidate: CellId, _destination: CellId, distance: f64) -> f64 {
        distance
    }

    fn solve(&self, grid: &mut Grid, source: CellId, destination: CellId) -> SearchResult {
        best_first(grid, source, destination, |grid, candidate, distance| {
            self.priority(grid, candidate, destination, distance)
        })
    }
}

/// The searches a session can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Dijkstra,
    Greedy,
    Astar,
    Dfs,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Dijkstra,
        Algorithm::Greedy,
        Algorithm::Astar,
        Algorithm::Dfs,
    ];

    pub fn solver(self, config: &VisualizerConfig) -> Box<dyn GridSolver> {
        match self {
            Algorithm::Dijkstra => Box::new(DijkstraSolver),
            Algorithm::Greedy => Box::new(GreedySolver::new(config.greedy_units)),
            Algorithm::Astar => Box::new(AstarSolver),
            Algorithm::Dfs => Box::new(DfsSolver),
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Greedy => "greedy",
            Algorithm::Astar => "astar",
            Algorithm::Dfs => "dfs",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = VisualizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.id() == s)
            .ok_or_else(|| VisualizerError::UnknownAlgorithm(s.to_owned()))
    }
}
