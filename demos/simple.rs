use grid_util::point::Point;
use grid_visualizer::animation::ThreadClock;
use grid_visualizer::config::VisualizerConfig;
use grid_visualizer::grid::CellId;
use grid_visualizer::render::{Renderer, SemanticColor};
use grid_visualizer::session::{EditKind, Session};
use grid_visualizer::solver::{Algorithm, RunOutcome};

// In this example the four searches run in turn on a random 12x8 grid
// with the source in the top left and the destination in the bottom right.
// The renderer prints what it is asked to draw instead of drawing it.

struct PrintingRenderer;

impl Renderer for PrintingRenderer {
    fn render(&mut self, cell: CellId, color: SemanticColor, _run_mark: bool) {
        if color == SemanticColor::Path {
            println!("  path through cell {cell}");
        }
    }

    fn report_visited_count(&mut self, _count: usize) {}

    fn report_elapsed_time(&mut self, seconds: u64) {
        println!("  {seconds}s elapsed");
    }

    fn report_result(&mut self, outcome: RunOutcome) {
        println!("  result: {outcome}");
    }

    fn set_input_enabled(&mut self, _enabled: bool) {}
}

fn main() -> grid_visualizer::Result<()> {
    let config = VisualizerConfig {
        step_ms: 2,
        seed: Some(7),
        ..VisualizerConfig::for_cells(12, 8, 15)
    };
    let mut session = Session::new(config)?;
    session.edit_cell(Point::new(0, 0), EditKind::MakeSource)?;
    session.edit_cell(Point::new(11 * 16, 7 * 16), EditKind::MakeDestination)?;
    session.randomize(0.25)?;
    println!("{}", session.grid());
    for algorithm in Algorithm::ALL {
        println!("{algorithm}:");
        let outcome = session.run_and_play(algorithm, &mut PrintingRenderer, &mut ThreadClock::new())?;
        println!("  {algorithm} finished with {outcome}");
    }
    Ok(())
}
