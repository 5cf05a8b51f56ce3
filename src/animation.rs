//! Turns a finished search into a timeline of delayed events and replays it.
//!
//! Offsets are derived from a fixed step only, so a timeline is the same for the same search
//! result no matter how long playback actually takes.

use crate::grid::CellId;
use crate::render::{Renderer, SemanticColor};
use crate::solver::{RunOutcome, SearchResult};
use fxhash::FxHashSet;
use log::debug;
use std::thread;
use std::time::{Duration, Instant};

/// Something the collaborator has to show.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Render {
        cell: CellId,
        color: SemanticColor,
        run_mark: bool,
    },
    VisitedCount(usize),
    ElapsedTime(u64),
    Result(RunOutcome),
    InputEnabled(bool),
}

impl Event {
    pub fn dispatch<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        match self {
            Event::Render {
                cell,
                color,
                run_mark,
            } => renderer.render(*cell, *color, *run_mark),
            Event::VisitedCount(count) => renderer.report_visited_count(*count),
            Event::ElapsedTime(seconds) => renderer.report_elapsed_time(*seconds),
            Event::Result(outcome) => renderer.report_result(*outcome),
            Event::InputEnabled(enabled) => renderer.set_input_enabled(*enabled),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scheduled {
    pub offset_ms: u64,
    pub event: Event,
}

/// Events of one run sorted by offset. Events sharing an offset keep the order they were
/// scheduled in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    events: Vec<Scheduled>,
}

impl Timeline {
    fn new(mut events: Vec<Scheduled>) -> Timeline {
        events.sort_by_key(|scheduled| scheduled.offset_ms);
        Timeline { events }
    }

    pub fn events(&self) -> &[Scheduled] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Offset of the last event.
    pub fn duration_ms(&self) -> u64 {
        self.events.last().map_or(0, |scheduled| scheduled.offset_ms)
    }

    /// Restarts `clock`, then waits on it before each event and hands the event to `renderer`.
    pub fn play<R, C>(&self, renderer: &mut R, clock: &mut C)
    where
        R: Renderer + ?Sized,
        C: Clock + ?Sized,
    {
        clock.restart();
        for scheduled in &self.events {
            clock.wait_until(scheduled.offset_ms);
            scheduled.event.dispatch(renderer);
        }
    }

    /// A cursor for collaborators that drive playback from their own frame loop.
    pub fn playback(&self) -> Playback<'_> {
        Playback {
            timeline: self,
            next: 0,
        }
    }
}

/// Position in a [Timeline] during frame-driven playback.
#[derive(Clone, Debug)]
pub struct Playback<'a> {
    timeline: &'a Timeline,
    next: usize,
}

impl<'a> Playback<'a> {
    /// Events that became due since the previous call, given the time elapsed since the run
    /// started.
    pub fn advance(&mut self, elapsed_ms: u64) -> &'a [Scheduled] {
        let events = &self.timeline.events;
        let start = self.next;
        while self.next < events.len() && events[self.next].offset_ms <= elapsed_ms {
            self.next += 1;
        }
        &events[start..self.next]
    }

    pub fn is_finished(&self) -> bool {
        self.next == self.timeline.events.len()
    }
}

/// The suspension point of [Timeline::play].
pub trait Clock {
    /// Marks the start of a playback.
    fn restart(&mut self);

    /// Returns once `offset_ms` milliseconds have passed since playback started.
    fn wait_until(&mut self, offset_ms: u64);
}

/// Sleeps the current thread.
#[derive(Clone, Debug)]
pub struct ThreadClock {
    start: Instant,
}

impl ThreadClock {
    pub fn new() -> ThreadClock {
        ThreadClock {
            start: Instant::now(),
        }
    }
}

impl Default for ThreadClock {
    fn default() -> Self {
        ThreadClock::new()
    }
}

impl Clock for ThreadClock {
    fn restart(&mut self) {
        self.start = Instant::now();
    }

    fn wait_until(&mut self, offset_ms: u64) {
        let target = self.start + Duration::from_millis(offset_ms);
        let now = Instant::now();
        if target > now {
            thread::sleep(target - now);
        }
    }
}

/// Jumps straight to the requested offset. Used for tests and headless runs.
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    pub now_ms: u64,
    pub waits: usize,
}

impl Clock for VirtualClock {
    fn restart(&mut self) {
        self.now_ms = 0;
    }

    fn wait_until(&mut self, offset_ms: u64) {
        self.now_ms = self.now_ms.max(offset_ms);
        self.waits += 1;
    }
}

/// Builds timelines with a fixed delay between consecutive steps.
#[derive(Clone, Copy, Debug)]
pub struct Scheduler {
    pub step_ms: u64,
}

impl Scheduler {
    pub fn new(step_ms: u64) -> Scheduler {
        Scheduler { step_ms }
    }

    /// Lays out one run:
    /// - at offset 0 input is disabled, the counters are zeroed and `cleared` cells are repainted
    ///   idle,
    /// - the n-th finalized cell is painted at `n * step` together with the visited count,
    ///   the source is counted but not painted,
    /// - whole elapsed seconds are reported until the last visit,
    /// - path cells between the endpoints follow one step apart, source side first,
    /// - one step later the outcome is reported and input enabled again.
    pub fn schedule(
        &self,
        result: &SearchResult,
        source: CellId,
        destination: CellId,
        cleared: &[CellId],
    ) -> Timeline {
        let step = self.step_ms;
        let mut events = Vec::with_capacity(2 * result.visited.len() + result.path.len() + 8);
        let mut push = |offset_ms: u64, event: Event| events.push(Scheduled { offset_ms, event });

        push(0, Event::InputEnabled(false));
        push(0, Event::ElapsedTime(0));
        push(0, Event::VisitedCount(0));
        for cell in cleared {
            push(
                0,
                Event::Render {
                    cell: *cell,
                    color: SemanticColor::Idle,
                    run_mark: false,
                },
            );
        }

        let mut visit_end = 0;
        let visits = result.visited.iter().filter(|cell| **cell != destination);
        for (i, cell) in visits.enumerate() {
            visit_end = step * (i as u64 + 1);
            if *cell != source {
                push(
                    visit_end,
                    Event::Render {
                        cell: *cell,
                        color: SemanticColor::Visited,
                        run_mark: true,
                    },
                );
            }
            push(visit_end, Event::VisitedCount(i + 1));
        }
        for second in 1..=visit_end / 1000 {
            push(second * 1000, Event::ElapsedTime(second));
        }

        let inner = path_interior(&result.path);
        for (k, cell) in inner.iter().enumerate() {
            push(
                visit_end + step * (k as u64 + 1),
                Event::Render {
                    cell: *cell,
                    color: SemanticColor::Path,
                    run_mark: true,
                },
            );
        }
        let end = visit_end + step * (inner.len() as u64 + 1);
        push(end, Event::Result(result.outcome));
        push(end, Event::InputEnabled(true));

        let timeline = Timeline::new(events);
        debug!(
            "Scheduled {} events over {} ms",
            timeline.len(),
            timeline.duration_ms()
        );
        timeline
    }

    /// Cells a run paints, which the next run has to clear.
    pub fn marked_cells(
        &self,
        result: &SearchResult,
        source: CellId,
        destination: CellId,
    ) -> Vec<CellId> {
        let mut seen = FxHashSet::default();
        result
            .visited
            .iter()
            .chain(path_interior(&result.path))
            .copied()
            .filter(|cell| *cell != source && *cell != destination)
            .filter(|cell| seen.insert(*cell))
            .collect()
    }
}

fn path_interior(path: &[CellId]) -> &[CellId] {
    if path.len() > 2 {
        &path[1..path.len() - 1]
    } else {
        &[]
    }
}
