//! Water droplet state.

use glam::Vec2;

use super::ErosionConfig;

/// Why a droplet stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// Moved outside the interior `[1, size - 2]` on either axis.
    LeftInterior,
    /// Water fell below `min_water`.
    Evaporated,
    /// Ran out of steps.
    StepBudget,
}

/// Lifecycle of a droplet. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropletState {
    Spawned,
    Stepping,
    Terminated(TerminationReason),
}

/// A simulated water particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Droplet {
    /// Continuous grid position; `y` is the z axis.
    pub position: Vec2,
    /// Unit direction, or zero before the droplet has felt any slope.
    pub direction: Vec2,
    pub speed: f32,
    pub water: f32,
    pub sediment: f32,
    steps: u32,
    state: DropletState,
}

impl Droplet {
    /// Creates a droplet at rest with the configured starting speed and water.
    pub fn new(position: Vec2, config: &ErosionConfig) -> Self {
        Self {
            position,
            direction: Vec2::ZERO,
            speed: config.initial_speed,
            water: config.initial_water,
            sediment: 0.0,
            steps: 0,
            state: DropletState::Spawned,
        }
    }

    pub fn state(&self) -> DropletState {
        self.state
    }

    /// Steps taken so far.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, DropletState::Terminated(_))
    }

    pub(crate) fn begin_step(&mut self) {
        if self.state == DropletState::Spawned {
            self.state = DropletState::Stepping;
        }
    }

    pub(crate) fn finish_step(&mut self) {
        self.steps += 1;
    }

    pub(crate) fn terminate(&mut self, reason: TerminationReason) {
        if !self.is_terminated() {
            self.state = DropletState::Terminated(reason);
        }
    }
}
