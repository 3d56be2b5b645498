use crate::color::Palette;
use crate::error::{LightningError, Result};
use crate::grid::{MAX_SIZE, MIN_SIZE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MIN_STEPS_PER_FRAME: usize = 1;
pub const MAX_STEPS_PER_FRAME: usize = 5_000_000;

/// All run settings consolidated into one struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Requested grid size (forced odd when the grid is built)
    pub size: u32,
    /// Fixed seed for reproducible runs, entropy when absent
    pub seed: Option<u64>,
    /// Engine evaluations per rendered frame (1-5,000,000)
    pub steps_per_frame: usize,
    /// Pause after the initial disc is drawn, in milliseconds
    pub start_delay_ms: u64,
    /// Pause after the run completes, in milliseconds
    pub finish_delay_ms: u64,
    pub palette: Palette,
    /// Freezes between GIF frames
    pub gif_every: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            size: 1000,
            seed: None,
            steps_per_frame: 20_000,
            start_delay_ms: 3000,
            finish_delay_ms: 3000,
            palette: Palette::default(),
            gif_every: 500,
        }
    }
}

impl RunSettings {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn finish_delay(&self) -> Duration {
        Duration::from_millis(self.finish_delay_ms)
    }

    /// Double the engine speed, within bounds
    pub fn increase_speed(&mut self) {
        self.steps_per_frame = self
            .steps_per_frame
            .saturating_mul(2)
            .clamp(MIN_STEPS_PER_FRAME, MAX_STEPS_PER_FRAME);
    }

    /// Halve the engine speed, within bounds
    pub fn decrease_speed(&mut self) {
        self.steps_per_frame = (self.steps_per_frame / 2).clamp(MIN_STEPS_PER_FRAME, MAX_STEPS_PER_FRAME);
    }

    pub fn set_steps_per_frame(&mut self, steps: usize) {
        self.steps_per_frame = steps.clamp(MIN_STEPS_PER_FRAME, MAX_STEPS_PER_FRAME);
    }

    pub fn set_gif_every(&mut self, every: u64) {
        self.gif_every = every.max(1);
    }

    /// Pull values read from a file back into the ranges the setters allow
    pub fn sanitize(&mut self) {
        self.set_steps_per_frame(self.steps_per_frame);
        self.set_gif_every(self.gif_every);
    }

    /// Reject a size no grid can be built from
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.size) {
            return Err(LightningError::InvalidSize(self.size));
        }
        Ok(())
    }
}
