//! # grid_visualizer
//!
//! The core of an interactive grid pathfinding visualizer. A [Session](session::Session) owns a
//! [Grid](grid::Grid) of square cells, some of them walls, with a source and a destination.
//! [Dijkstra](solver::dijkstra), [greedy best-first](solver::greedy), [A*](solver::astar) and
//! [depth-first search](solver::dfs) explore the grid, and the
//! [Scheduler](animation::Scheduler) turns what they did into a deterministic
//! [Timeline](animation::Timeline) of paint and report events for a drawing collaborator that
//! implements [Renderer](render::Renderer).
//!
//! Steps between adjacent cells have uniform cost; every priority is computed from cell
//! coordinates only.
//!
//! ```
//! use grid_visualizer::animation::VirtualClock;
//! use grid_visualizer::config::VisualizerConfig;
//! use grid_visualizer::render::RecordingRenderer;
//! use grid_visualizer::session::{EditKind, Session};
//! use grid_visualizer::solver::{Algorithm, RunOutcome};
//! use grid_util::point::Point;
//!
//! let mut session = Session::new(VisualizerConfig::for_cells(3, 3, 15)).unwrap();
//! session.edit_cell(Point::new(0, 0), EditKind::MakeSource).unwrap();
//! session.edit_cell(Point::new(40, 40), EditKind::MakeDestination).unwrap();
//! let mut renderer = RecordingRenderer::new();
//! let outcome = session
//!     .run_and_play(Algorithm::Astar, &mut renderer, &mut VirtualClock::default())
//!     .unwrap();
//! assert_eq!(outcome, RunOutcome::Found { hops: 4 });
//! ```
pub mod animation;
pub mod best_first;
pub mod config;
pub mod error;
pub mod grid;
pub mod render;
pub mod session;
pub mod solver;

pub use error::{Result, VisualizerError};
