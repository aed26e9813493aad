// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod animation;
mod app;
pub mod config;
pub mod controls;
pub mod error;
pub mod face;
pub mod font;
pub mod input;
pub mod logging;
pub mod render;
pub mod state;
pub mod timing;
pub mod wallclock;

use std::sync::mpsc::Receiver;

pub use animation::{AnimationStatus, Clockwork, HandAngles};
pub use config::{ClockConfig, Color};
pub use error::{ClockError, Result};
pub use input::{parse_clock_time, TimeInputError};
pub use state::{ClockCommand, ClockState, CommandError};
pub use timing::{AnimationTimingModel, ArcSweepSpec, ClockTime, HandAnimationSpec};
pub use wallclock::{FixedWallClock, SystemWallClock, WallClock};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// An analog clock window.
#[derive(Debug, Clone)]
pub struct Clock {
    config: ClockConfig,
    state: ClockState,
}

impl Clock {
    /// Clock seeded from the local system time.
    pub fn new(config: ClockConfig) -> Self {
        Self::with_wall_clock(config, &SystemWallClock)
    }

    pub fn with_wall_clock(config: ClockConfig, wall_clock: &dyn WallClock) -> Self {
        Self::starting_at(config, wall_clock.now())
    }

    pub fn starting_at(config: ClockConfig, time: ClockTime) -> Self {
        let state = ClockState::new(time).with_max_rate(config.max_rate);
        Self { config, state }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn state(&self) -> &ClockState {
        &self.state
    }

    /// Applies a command before the window opens.
    pub fn apply(&mut self, command: ClockCommand) {
        self.state = self.state.apply(command);
    }

    pub fn show(&mut self) -> Result<()> {
        app::run_window(&self.config, self.state, None)
    }

    /// Like [`Clock::show`], also draining `receiver` once per frame.
    pub fn show_with_commands(&mut self, receiver: Receiver<ClockCommand>) -> Result<()> {
        app::run_window(&self.config, self.state, Some(receiver))
    }
}
