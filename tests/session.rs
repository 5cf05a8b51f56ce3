use grid_util::point::Point;
use grid_visualizer::animation::{Event, VirtualClock};
use grid_visualizer::config::VisualizerConfig;
use grid_visualizer::grid::CellId;
use grid_visualizer::render::{RecordingRenderer, SemanticColor};
use grid_visualizer::session::{EditKind, Session};
use grid_visualizer::solver::{Algorithm, RunOutcome};
use grid_visualizer::VisualizerError;

fn session(columns: i32, rows: i32, seed: u64) -> Session {
    let config = VisualizerConfig {
        seed: Some(seed),
        ..VisualizerConfig::for_cells(columns, rows, 15)
    };
    Session::new(config).unwrap()
}

fn edit(session: &mut Session, id: CellId, kind: EditKind) -> Vec<Event> {
    let point = session.grid().cell(id).position;
    session.edit_cell(point, kind).unwrap()
}

fn visited_counts(renderer: &RecordingRenderer) -> Vec<usize> {
    renderer
        .events
        .iter()
        .filter_map(|event| match event {
            Event::VisitedCount(count) => Some(*count),
            _ => None,
        })
        .collect()
}

// |S  |
// |   |
// |  D|
#[test]
fn three_by_three_example() {
    for algorithm in [Algorithm::Dijkstra, Algorithm::Astar] {
        let mut session = session(3, 3, 0);
        edit(&mut session, 0, EditKind::MakeSource);
        edit(&mut session, 8, EditKind::MakeDestination);
        let mut renderer = RecordingRenderer::new();
        let outcome = session
            .run_and_play(algorithm, &mut renderer, &mut VirtualClock::default())
            .unwrap();
        assert_eq!(outcome, RunOutcome::Found { hops: 4 });
        let result = session.last_result().unwrap();
        assert_eq!(result.visited[0], 0);
        assert_eq!(result.path.len(), 5);
        assert_eq!(renderer.painted(SemanticColor::Path).len(), 3);
        assert_eq!(renderer.last_result(), Some(RunOutcome::Found { hops: 4 }));
        assert_eq!(renderer.events.last(), Some(&Event::InputEnabled(true)));
        assert!(!session.is_running());
    }
}

#[test]
fn enclosed_destination_reports_no_path() {
    // |S..|
    // |..#|
    // |.#D|
    for algorithm in Algorithm::ALL {
        let mut session = session(3, 3, 0);
        edit(&mut session, 0, EditKind::MakeSource);
        edit(&mut session, 8, EditKind::MakeDestination);
        edit(&mut session, 5, EditKind::ToggleWall);
        edit(&mut session, 7, EditKind::ToggleWall);
        let mut renderer = RecordingRenderer::new();
        let outcome = session
            .run_and_play(algorithm, &mut renderer, &mut VirtualClock::default())
            .unwrap();
        assert_eq!(outcome, RunOutcome::NoPath, "{algorithm}");
        assert_eq!(renderer.last_result(), Some(RunOutcome::NoPath));
        assert_eq!(visited_counts(&renderer).last(), Some(&6));
        let mut visited = session.last_result().unwrap().visited.clone();
        visited.sort_unstable();
        assert_eq!(visited, vec![0, 1, 2, 3, 4, 6]);
    }
}

/// DFS notices the destination next to the cell it pops instead of popping it, so the last
/// counted visit is the cell before the destination.
#[test]
fn dfs_stops_when_destination_is_discovered() {
    // One row: S . . D
    let mut session = session(4, 1, 0);
    edit(&mut session, 0, EditKind::MakeSource);
    edit(&mut session, 3, EditKind::MakeDestination);
    let mut renderer = RecordingRenderer::new();
    let outcome = session
        .run_and_play(Algorithm::Dfs, &mut renderer, &mut VirtualClock::default())
        .unwrap();
    assert_eq!(session.last_result().unwrap().visited, vec![0, 1, 2, 3]);
    assert_eq!(outcome, RunOutcome::Found { hops: 3 });
    assert_eq!(renderer.painted(SemanticColor::Visited), vec![1, 2]);
    assert_eq!(visited_counts(&renderer), vec![0, 1, 2, 3]);
    assert!(renderer.painted(SemanticColor::Path).is_empty());
}

#[test]
fn previous_marks_are_cleared_on_the_next_run() {
    let mut session = session(4, 4, 0);
    edit(&mut session, 0, EditKind::MakeSource);
    edit(&mut session, 15, EditKind::MakeDestination);
    let mut first = RecordingRenderer::new();
    session
        .run_and_play(Algorithm::Dijkstra, &mut first, &mut VirtualClock::default())
        .unwrap();
    let mut marked = first.painted(SemanticColor::Visited);
    marked.sort_unstable();

    // A wall placed on a visited cell must not be repainted idle
    let events = edit(&mut session, 5, EditKind::ToggleWall);
    assert_eq!(
        events,
        vec![Event::Render {
            cell: 5,
            color: SemanticColor::Wall,
            run_mark: false
        }]
    );

    let mut second = RecordingRenderer::new();
    session
        .run_and_play(Algorithm::Greedy, &mut second, &mut VirtualClock::default())
        .unwrap();
    let mut cleared = second
        .events
        .iter()
        .take_while(|event| !matches!(event, Event::VisitedCount(n) if *n > 0))
        .filter_map(|event| match event {
            Event::Render {
                cell,
                color: SemanticColor::Idle,
                ..
            } => Some(*cell),
            _ => None,
        })
        .collect::<Vec<_>>();
    cleared.sort_unstable();
    let expected = marked.into_iter().filter(|id| *id != 5).collect::<Vec<_>>();
    assert_eq!(cleared, expected);
}

#[test]
fn randomize_keeps_endpoints_and_is_seeded() {
    let mut first = session(12, 8, 42);
    let mut second = session(12, 8, 42);
    edit(&mut first, 3, EditKind::MakeSource);
    edit(&mut second, 3, EditKind::MakeSource);
    for _ in 0..10 {
        let a = first.randomize(0.6).unwrap();
        let b = second.randomize(0.6).unwrap();
        assert_eq!(a, b);
        let grid = first.grid();
        assert_eq!(grid.source(), Some(3));
        let destination = grid.destination().unwrap();
        assert_ne!(destination, 3);
        assert!(grid.cell(3).active && grid.cell(destination).active);
    }
    let a = first.run_algorithm(Algorithm::Astar).unwrap();
    let b = second.run_algorithm(Algorithm::Astar).unwrap();
    assert_eq!(a, b);
}

#[test]
fn fully_walled_randomize_still_places_endpoints() {
    let mut session = session(2, 2, 5);
    session.randomize(1.0).unwrap();
    let grid = session.grid();
    let (source, destination) = (grid.source().unwrap(), grid.destination().unwrap());
    assert_ne!(source, destination);
    assert!(grid.cell(source).active && grid.cell(destination).active);
}

#[test]
fn reset_all_drops_everything() {
    let mut session = session(3, 3, 0);
    edit(&mut session, 0, EditKind::MakeSource);
    edit(&mut session, 4, EditKind::ToggleWall);
    let events = session.reset_all().unwrap();
    assert_eq!(events.len(), 9);
    assert!(events.iter().all(|event| matches!(
        event,
        Event::Render {
            color: SemanticColor::Idle,
            ..
        }
    )));
    assert_eq!(
        session.run_algorithm(Algorithm::Dfs),
        Err(VisualizerError::MissingEndpoint(
            grid_visualizer::error::Endpoint::Both
        ))
    );
}

#[test]
fn frame_driven_playback() {
    let mut session = session(5, 5, 0);
    edit(&mut session, 0, EditKind::MakeSource);
    edit(&mut session, 24, EditKind::MakeDestination);
    let timeline = session.run_algorithm(Algorithm::Greedy).unwrap();
    let mut playback = timeline.playback();
    let mut renderer = RecordingRenderer::new();
    let mut elapsed = 0;
    while !playback.is_finished() {
        for scheduled in playback.advance(elapsed) {
            assert!(scheduled.offset_ms <= elapsed);
            scheduled.event.dispatch(&mut renderer);
        }
        elapsed += 16;
    }
    session.finish_run();
    assert_eq!(renderer.last_result(), session.last_result().map(|r| r.outcome));
    assert!(session.edit_cell(Point::new(20, 20), EditKind::ToggleWall).is_ok());
}
