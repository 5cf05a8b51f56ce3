//! The session controller: the single owner of the grid and of the run gate.

use crate::animation::{Clock, Event, Scheduler, Timeline};
use crate::config::{check_rate, VisualizerConfig};
use crate::error::{Endpoint, Result, VisualizerError};
use crate::grid::{CellId, Grid, Role};
use crate::render::Renderer;
use crate::solver::{Algorithm, RunOutcome, SearchResult};
use grid_util::point::Point;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::{smallvec, SmallVec};

/// Edits a collaborator can apply to the cell under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    MakeSource,
    MakeDestination,
    ToggleWall,
    Clear,
}

/// Holds the grid, its endpoints and the state of the current run.
///
/// A run is in flight from [run_algorithm](Self::run_algorithm) until
/// [finish_run](Self::finish_run); in between every edit and run request fails with
/// [VisualizerError::Busy]. The collaborator is expected to call `finish_run` when the terminal
/// event of the timeline has been shown. A collaborator that calls `finish_run` early and starts
/// another run while still replaying the previous timeline gets interleaved paints; the session
/// does not try to reconcile them.
#[derive(Clone, Debug)]
pub struct Session {
    config: VisualizerConfig,
    grid: Grid,
    scheduler: Scheduler,
    rng: StdRng,
    in_flight: bool,
    marked: Vec<CellId>,
    last_result: Option<SearchResult>,
}

impl Session {
    pub fn new(config: VisualizerConfig) -> Result<Session> {
        config.validate()?;
        let grid = Grid::from_canvas(config.canvas_width, config.canvas_height, config.cell_size)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            "Session with a {}x{} grid of {}px cells",
            grid.columns(),
            grid.rows(),
            config.cell_size
        );
        Ok(Session {
            scheduler: Scheduler::new(config.step_ms),
            config,
            grid,
            rng,
            in_flight: false,
            marked: Vec::new(),
            last_result: None,
        })
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn is_running(&self) -> bool {
        self.in_flight
    }

    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last_result.as_ref()
    }

    /// Rebuilds the grid for a new canvas. Endpoints and walls are dropped.
    pub fn configure_grid(&mut self, width: i32, height: i32, cell_size: i32) -> Result<Vec<Event>> {
        self.ensure_idle()?;
        self.grid = Grid::from_canvas(width, height, cell_size)?;
        self.config.canvas_width = width;
        self.config.canvas_height = height;
        self.config.cell_size = cell_size;
        self.marked.clear();
        self.last_result = None;
        info!(
            "Grid rebuilt as {}x{} cells",
            self.grid.columns(),
            self.grid.rows()
        );
        Ok(self.repaint(0..self.grid.len()))
    }

    /// Applies an edit to the cell under `point`. Placing an endpoint on a wall clears the wall,
    /// placing it on the other endpoint takes that role away. Wall toggles on endpoints are
    /// ignored.
    pub fn edit_cell(&mut self, point: Point, kind: EditKind) -> Result<Vec<Event>> {
        self.ensure_idle()?;
        let id = self
            .grid
            .find_cell_at(point)
            .ok_or(VisualizerError::OutOfBounds {
                x: point.x,
                y: point.y,
            })?;
        let mut touched: SmallVec<[CellId; 2]> = smallvec![id];
        match kind {
            EditKind::MakeSource | EditKind::MakeDestination => {
                let (role, previous) = if kind == EditKind::MakeSource {
                    (Role::Source, self.grid.source())
                } else {
                    (Role::Destination, self.grid.destination())
                };
                if let Some(previous) = previous.filter(|p| *p != id) {
                    self.grid.clear_obstacle(previous);
                    touched.push(previous);
                }
                self.grid.set_role(id, role);
            }
            EditKind::ToggleWall => {
                self.grid.toggle_obstacle(id);
            }
            EditKind::Clear => self.grid.clear_obstacle(id),
        }
        debug!("Applied {kind:?} to cell {id}");
        self.marked.retain(|cell| !touched.contains(cell));
        Ok(self.repaint(touched))
    }

    /// Rerolls every wall with probability `rate` and fills in missing endpoints. The rate becomes
    /// the configured wall rate used by [reroll](Self::reroll).
    pub fn randomize(&mut self, rate: f64) -> Result<Vec<Event>> {
        self.ensure_idle()?;
        check_rate(rate)?;
        self.config.wall_rate = rate;
        let mut touched = self.grid.randomize_obstacles(rate, &mut self.rng);
        let assigned = self
            .grid
            .randomize_endpoints(&mut self.rng, self.config.endpoint_retries);
        for id in assigned {
            if !touched.contains(&id) {
                touched.push(id);
            }
        }
        self.marked.clear();
        debug!("Randomized {} cells at rate {rate}", touched.len());
        Ok(self.repaint(touched))
    }

    /// [randomize](Self::randomize) at the configured wall rate.
    pub fn reroll(&mut self) -> Result<Vec<Event>> {
        self.randomize(self.config.wall_rate)
    }

    /// Reopens every cell and drops both endpoints.
    pub fn reset_all(&mut self) -> Result<Vec<Event>> {
        self.ensure_idle()?;
        self.grid.reset_all();
        self.marked.clear();
        self.last_result = None;
        Ok(self.repaint(0..self.grid.len()))
    }

    /// Runs a search and returns its timeline. The session stays busy until
    /// [finish_run](Self::finish_run).
    pub fn run_algorithm(&mut self, algorithm: Algorithm) -> Result<Timeline> {
        self.start_run(algorithm).map(|(timeline, _)| timeline)
    }

    fn start_run(&mut self, algorithm: Algorithm) -> Result<(Timeline, RunOutcome)> {
        self.ensure_idle()?;
        let (source, destination) = match (self.grid.source(), self.grid.destination()) {
            (Some(source), Some(destination)) => (source, destination),
            (None, None) => return Err(VisualizerError::MissingEndpoint(Endpoint::Both)),
            (None, _) => return Err(VisualizerError::MissingEndpoint(Endpoint::Source)),
            (_, None) => return Err(VisualizerError::MissingEndpoint(Endpoint::Destination)),
        };
        let solver = algorithm.solver(&self.config);
        if !self.grid.reachable(source, destination) {
            warn!(
                "Destination {destination} is not reachable, {} will exhaust the component",
                solver.name()
            );
        }
        info!("Running {} from {source} to {destination}", solver.name());
        let result = solver.solve(&mut self.grid, source, destination);
        info!(
            "{} finalized {} cells, result: {}",
            solver.name(),
            result.visited.len(),
            result.outcome
        );

        let timeline = self
            .scheduler
            .schedule(&result, source, destination, &self.marked);
        self.marked = self.scheduler.marked_cells(&result, source, destination);
        let outcome = result.outcome;
        self.last_result = Some(result);
        self.in_flight = true;
        Ok((timeline, outcome))
    }

    /// Opens the gate for the next run.
    pub fn finish_run(&mut self) {
        self.in_flight = false;
    }

    /// Runs a search, plays its timeline to completion and opens the gate again.
    pub fn run_and_play<R, C>(
        &mut self,
        algorithm: Algorithm,
        renderer: &mut R,
        clock: &mut C,
    ) -> Result<RunOutcome>
    where
        R: Renderer + ?Sized,
        C: Clock + ?Sized,
    {
        let (timeline, outcome) = self.start_run(algorithm)?;
        timeline.play(renderer, clock);
        self.finish_run();
        Ok(outcome)
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.in_flight {
            debug!("Rejecting request while a run is in flight");
            return Err(VisualizerError::Busy);
        }
        Ok(())
    }

    fn repaint<I: IntoIterator<Item = CellId>>(&self, cells: I) -> Vec<Event> {
        cells
            .into_iter()
            .map(|cell| Event::Render {
                cell,
                color: self.grid.cell(cell).color(),
                run_mark: false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SemanticColor;

    fn session(columns: i32, rows: i32) -> Session {
        let config = VisualizerConfig {
            seed: Some(11),
            ..VisualizerConfig::for_cells(columns, rows, 15)
        };
        Session::new(config).unwrap()
    }

    fn at(session: &Session, id: CellId) -> Point {
        session.grid().cell(id).position
    }

    #[test]
    fn run_requires_both_endpoints() {
        let mut session = session(3, 3);
        assert_eq!(
            session.run_algorithm(Algorithm::Dijkstra),
            Err(VisualizerError::MissingEndpoint(Endpoint::Both))
        );
        session.edit_cell(at(&session, 0), EditKind::MakeSource).unwrap();
        assert_eq!(
            session.run_algorithm(Algorithm::Dijkstra),
            Err(VisualizerError::MissingEndpoint(Endpoint::Destination))
        );
        assert!(!session.is_running());
    }

    #[test]
    fn destination_on_wall_clears_the_wall() {
        let mut session = session(3, 3);
        session.edit_cell(at(&session, 8), EditKind::ToggleWall).unwrap();
        assert!(!session.grid().cell(8).active);
        let events = session
            .edit_cell(at(&session, 8), EditKind::MakeDestination)
            .unwrap();
        assert!(session.grid().cell(8).active);
        assert_eq!(
            events,
            vec![Event::Render {
                cell: 8,
                color: SemanticColor::Destination,
                run_mark: false
            }]
        );
    }

    #[test]
    fn moving_an_endpoint_repaints_the_old_cell() {
        let mut session = session(3, 3);
        session.edit_cell(at(&session, 0), EditKind::MakeSource).unwrap();
        let events = session.edit_cell(at(&session, 4), EditKind::MakeSource).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(session.grid().source(), Some(4));
        assert_eq!(session.grid().cell(0).role, Role::Free);
        // Making the source the destination drops the source
        session.edit_cell(at(&session, 4), EditKind::MakeDestination).unwrap();
        assert_eq!(session.grid().source(), None);
        assert_eq!(session.grid().destination(), Some(4));
    }

    #[test]
    fn out_of_bounds_edit() {
        let mut session = session(3, 3);
        assert_eq!(
            session.edit_cell(Point::new(200, 5), EditKind::ToggleWall),
            Err(VisualizerError::OutOfBounds { x: 200, y: 5 })
        );
    }

    #[test]
    fn busy_until_finished() {
        let mut session = session(3, 3);
        session.edit_cell(at(&session, 0), EditKind::MakeSource).unwrap();
        session.edit_cell(at(&session, 8), EditKind::MakeDestination).unwrap();
        let timeline = session.run_algorithm(Algorithm::Astar).unwrap();
        assert!(!timeline.is_empty());
        assert_eq!(session.run_algorithm(Algorithm::Dfs), Err(VisualizerError::Busy));
        assert_eq!(
            session.edit_cell(at(&session, 4), EditKind::ToggleWall),
            Err(VisualizerError::Busy)
        );
        assert_eq!(session.randomize(0.5), Err(VisualizerError::Busy));
        assert_eq!(session.reroll(), Err(VisualizerError::Busy));
        assert_eq!(session.reset_all(), Err(VisualizerError::Busy));
        assert_eq!(session.configure_grid(64, 32, 15), Err(VisualizerError::Busy));
        assert_eq!(session.grid().source(), Some(0));
        session.finish_run();
        assert!(session.run_algorithm(Algorithm::Dfs).is_ok());
    }

    #[test]
    fn randomize_rejects_bad_rate() {
        let mut session = session(3, 3);
        assert_eq!(session.randomize(-0.1), Err(VisualizerError::InvalidRate(-0.1)));
        assert_eq!(session.config().wall_rate, 0.3);
    }

    fn walls(session: &Session) -> usize {
        session.grid().cells().iter().filter(|c| !c.active).count()
    }

    #[test]
    fn reroll_uses_the_configured_wall_rate() {
        let config = VisualizerConfig {
            seed: Some(2),
            wall_rate: 1.0,
            ..VisualizerConfig::for_cells(4, 4, 15)
        };
        let mut session = Session::new(config).unwrap();
        session.reroll().unwrap();
        // Both endpoints are placed on cleared walls
        assert_eq!(walls(&session), 14);

        session.randomize(0.0).unwrap();
        assert_eq!(session.config().wall_rate, 0.0);
        assert_eq!(walls(&session), 0);
        session.edit_cell(at(&session, 5), EditKind::ToggleWall).unwrap();
        session.reroll().unwrap();
        assert_eq!(walls(&session), 0);
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        let mut session = session(3, 3);
        assert_eq!(
            session.configure_grid(i32::MAX, 16, 15),
            Err(VisualizerError::InvalidDimensions {
                width: i32::MAX,
                height: 16,
                cell_size: 15
            })
        );
        assert!(matches!(
            session.configure_grid(800, 480, i32::MAX),
            Err(VisualizerError::InvalidDimensions { .. })
        ));
        assert_eq!(session.grid().len(), 9);
        let config = VisualizerConfig {
            cell_size: i32::MAX,
            ..VisualizerConfig::default()
        };
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn configure_grid_rebuilds() {
        let mut session = session(3, 3);
        session.edit_cell(at(&session, 0), EditKind::MakeSource).unwrap();
        let events = session.configure_grid(64, 32, 15).unwrap();
        assert_eq!(events.len(), 8);
        assert_eq!(session.grid().source(), None);
        assert!(matches!(
            session.configure_grid(0, 32, 15),
            Err(VisualizerError::InvalidDimensions { .. })
        ));
    }
}
