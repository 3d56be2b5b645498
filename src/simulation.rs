use crate::error::Result;
use crate::grid::Grid;
use crate::report::RunReport;
use crate::walker::{Direction, DirectionSource, DirectionTally, WalkState, Walker};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// What a single engine evaluation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// The walker was free and moved one cell
    Moved(Direction),
    /// The walker stuck away from the center; that cell is now filled
    Froze { x: u32, y: u32 },
    /// The walker is stuck at the center, nothing more can grow
    Finished,
}

/// Aggregation engine: one grid, one walker, one direction source
pub struct LightningSimulation<S: DirectionSource> {
    grid: Grid,
    walker: Walker,
    source: S,
    tally: DirectionTally,
    steps: u64,
    freezes: u64,
    finished: bool,
    started: Option<Instant>,
    elapsed: Duration,
}

impl<S: DirectionSource> LightningSimulation<S> {
    pub fn new(grid: Grid, source: S) -> Self {
        let walker = Walker::spawn(&grid);
        Self {
            grid,
            walker,
            source,
            tally: DirectionTally::default(),
            steps: 0,
            freezes: 0,
            finished: false,
            started: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn walker(&self) -> &Walker {
        &self.walker
    }

    pub fn tally(&self) -> &DirectionTally {
        &self.tally
    }

    /// Moves taken so far (one per direction sample)
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn freezes(&self) -> u64 {
        self.freezes
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Evaluate the walker once: freeze, finish, or take one random step
    pub fn step(&mut self) -> Result<StepEvent> {
        if self.finished {
            return Ok(StepEvent::Finished);
        }
        let started = *self.started.get_or_insert_with(Instant::now);

        if self.walker.probe(&self.grid) == WalkState::Stuck {
            if self.walker.is_at_center(&self.grid) {
                self.finished = true;
                self.elapsed = started.elapsed();
                info!(
                    steps = self.steps,
                    freezes = self.freezes,
                    "aggregate reached the center"
                );
                return Ok(StepEvent::Finished);
            }

            let (x, y) = self.walker.position();
            self.grid.set_filled(x, y)?;
            self.freezes += 1;
            debug!(x, y, freezes = self.freezes, "particle frozen");
            self.walker = Walker::spawn(&self.grid);
            // set_filled succeeded, so both coordinates are on the grid
            return Ok(StepEvent::Froze {
                x: x as u32,
                y: y as u32,
            });
        }

        let direction = self.source.next_direction()?;
        self.tally.record(direction);
        self.walker.advance(direction);
        self.steps += 1;
        Ok(StepEvent::Moved(direction))
    }

    /// Run until the walker sticks at the center, calling `on_freeze` for
    /// every newly filled cell
    pub fn run<F>(&mut self, mut on_freeze: F) -> Result<()>
    where
        F: FnMut(u32, u32) -> Result<()>,
    {
        loop {
            match self.step()? {
                StepEvent::Froze { x, y } => on_freeze(x, y)?,
                StepEvent::Finished => return Ok(()),
                StepEvent::Moved(_) => {}
            }
        }
    }

    /// Snapshot of the statistics gathered so far
    pub fn report(&self) -> RunReport {
        let elapsed = match (self.finished, self.started) {
            (false, Some(started)) => started.elapsed(),
            _ => self.elapsed,
        };
        RunReport {
            side: self.grid.side(),
            tally: self.tally,
            steps: self.steps,
            freezes: self.freezes,
            filled_cells: self.grid.filled_count(),
            completed: self.finished,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}
