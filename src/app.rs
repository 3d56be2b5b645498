use crate::error::Result;
use crate::export::GifRecorder;
use crate::grid::Grid;
use crate::renderer::{self, FrameBuffer};
use crate::report::RunReport;
use crate::settings::RunSettings;
use crate::simulation::{LightningSimulation, StepEvent};
use crate::walker::RandomDirections;
use rand::rngs::StdRng;
use std::path::Path;
use std::time::Instant;
use tracing::info;

pub type Simulation = LightningSimulation<RandomDirections<StdRng>>;

/// What the status box shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Disc drawn, start delay not over yet
    Waiting,
    Running,
    Paused,
    Complete,
}

impl RunStatus {
    pub fn label(&self) -> &str {
        match self {
            RunStatus::Waiting => "WAITING",
            RunStatus::Running => "RUNNING",
            RunStatus::Paused => "PAUSED",
            RunStatus::Complete => "COMPLETE",
        }
    }
}

/// Main application state
pub struct App {
    pub settings: RunSettings,
    pub simulation: Simulation,
    pub canvas: FrameBuffer,
    pub paused: bool,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub should_quit: bool,
    recorder: Option<GifRecorder>,
    ready_at: Instant,
    finished_at: Option<Instant>,
}

impl App {
    pub fn new(settings: RunSettings) -> Result<Self> {
        let (simulation, canvas) = build_run(&settings)?;
        Ok(Self {
            ready_at: Instant::now() + settings.start_delay(),
            settings,
            simulation,
            canvas,
            paused: false,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            should_quit: false,
            recorder: None,
            finished_at: None,
        })
    }

    /// Start streaming a GIF of the growth from the current canvas
    pub fn start_recording(&mut self, path: &Path) -> Result<()> {
        self.recorder = Some(GifRecorder::create(
            path,
            &self.canvas,
            self.settings.palette,
            self.settings.gif_every,
        )?);
        Ok(())
    }

    /// Close the GIF, returning the number of frames written
    pub fn finish_recording(&mut self) -> Result<Option<u64>> {
        match self.recorder.take() {
            Some(recorder) => recorder.finish(&self.canvas).map(Some),
            None => Ok(None),
        }
    }

    pub fn status(&self) -> RunStatus {
        if self.simulation.is_finished() {
            RunStatus::Complete
        } else if self.paused {
            RunStatus::Paused
        } else if Instant::now() < self.ready_at {
            RunStatus::Waiting
        } else {
            RunStatus::Running
        }
    }

    /// Run engine evaluations for the current frame
    pub fn tick(&mut self) -> Result<()> {
        if let Some(finished_at) = self.finished_at {
            if finished_at.elapsed() >= self.settings.finish_delay() {
                self.should_quit = true;
            }
            return Ok(());
        }
        if self.status() != RunStatus::Running {
            return Ok(());
        }

        for _ in 0..self.settings.steps_per_frame {
            match self.simulation.step()? {
                StepEvent::Froze { x, y } => {
                    renderer::project_freeze(&mut self.canvas, x, y)?;
                    if let Some(recorder) = self.recorder.as_mut() {
                        recorder.on_freeze(&self.canvas)?;
                    }
                }
                StepEvent::Finished => {
                    self.finished_at = Some(Instant::now());
                    break;
                }
                StepEvent::Moved(_) => {}
            }
        }
        Ok(())
    }

    pub fn report(&self) -> RunReport {
        self.simulation.report()
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Start over on a fresh grid with the current settings.
    /// An active recording is closed on the old run's final canvas.
    pub fn restart(&mut self) -> Result<()> {
        if let Some(frames) = self.finish_recording()? {
            info!(frames, "recording closed on restart");
        }
        let (simulation, canvas) = build_run(&self.settings)?;
        self.simulation = simulation;
        self.canvas = canvas;
        self.ready_at = Instant::now() + self.settings.start_delay();
        self.finished_at = None;
        self.paused = false;
        info!(size = self.settings.size, "restarted");
        Ok(())
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn increase_speed(&mut self) {
        self.settings.increase_speed();
    }

    pub fn decrease_speed(&mut self) {
        self.settings.decrease_speed();
    }

    pub fn cycle_palette(&mut self) {
        self.settings.palette = self.settings.palette.next();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.help_scroll = 0;
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }
}

/// Fresh grid, engine and projected canvas for one run
fn build_run(settings: &RunSettings) -> Result<(Simulation, FrameBuffer)> {
    let grid = Grid::new(settings.size)?;
    let mut canvas = FrameBuffer::default();
    renderer::project(&grid, &mut canvas)?;
    let source = RandomDirections::from_seed_option(settings.seed);
    Ok((LightningSimulation::new(grid, source), canvas))
}
