//! The callback surface a drawing collaborator implements.

use crate::animation::Event;
use crate::grid::CellId;
use crate::solver::RunOutcome;

/// What a cell means, independent of how the collaborator draws it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SemanticColor {
    Idle,
    Wall,
    Source,
    Destination,
    Visited,
    Path,
}

/// Receives the events of a session. `run_mark` is set on paints produced by a search run; those
/// are repainted [SemanticColor::Idle] when the next run starts.
pub trait Renderer {
    fn render(&mut self, cell: CellId, color: SemanticColor, run_mark: bool);
    fn report_visited_count(&mut self, count: usize);
    fn report_elapsed_time(&mut self, seconds: u64);
    fn report_result(&mut self, outcome: RunOutcome);
    fn set_input_enabled(&mut self, enabled: bool);
}

/// Keeps every event it receives, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    pub events: Vec<Event>,
}

impl RecordingRenderer {
    pub fn new() -> RecordingRenderer {
        RecordingRenderer::default()
    }

    /// Cells painted with `color`, in paint order.
    pub fn painted(&self, color: SemanticColor) -> Vec<CellId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Render { cell, color: c, .. } if *c == color => Some(*cell),
                _ => None,
            })
            .collect()
    }

    pub fn last_result(&self) -> Option<RunOutcome> {
        self.events.iter().rev().find_map(|event| match event {
            Event::Result(outcome) => Some(*outcome),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, cell: CellId, color: SemanticColor, run_mark: bool) {
        self.events.push(Event::Render {
            cell,
            color,
            run_mark,
        });
    }

    fn report_visited_count(&mut self, count: usize) {
        self.events.push(Event::VisitedCount(count));
    }

    fn report_elapsed_time(&mut self, seconds: u64) {
        self.events.push(Event::ElapsedTime(seconds));
    }

    fn report_result(&mut self, outcome: RunOutcome) {
        self.events.push(Event::Result(outcome));
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.events.push(Event::InputEnabled(enabled));
    }
}
