//! Erosion configuration.

use serde::{Deserialize, Serialize};

use crate::config::{ensure_finite, ensure_in_range, ConfigError};

/// Tuning for the droplet erosion pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionConfig {
    /// Number of droplets simulated.
    pub iterations: u32,
    /// Radius of the erosion kernel in cells. 0 erodes only the centre cell.
    ///
    /// Kernel weights are not normalised, so a droplet removes roughly the
    /// kernel's weight sum times what it picks up: about 2.6x at 1.5, about 9x at 3.
    pub radius: f32,
    /// How much of its previous direction a droplet keeps each step (0-1).
    pub inertia: f32,
    /// Multiplier on sediment capacity.
    pub sediment_capacity_factor: f32,
    /// Lower bound on the slope term of sediment capacity, so flat ground still erodes.
    pub min_slope: f32,
    /// Fraction of water lost per step (0-1).
    pub evaporate_speed: f32,
    /// Fraction of excess sediment dropped per step (0-1).
    pub deposit_speed: f32,
    /// Fraction of free capacity filled from the terrain per step (0-1).
    pub erode_speed: f32,
    /// Speed gained per unit of height lost.
    pub gravity: f32,
    /// Step budget per droplet.
    pub max_steps: u32,
    pub initial_speed: f32,
    pub initial_water: f32,
    /// Droplets with less water than this are terminated.
    pub min_water: f32,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            iterations: 50_000,
            radius: 1.5,
            inertia: 0.05,
            sediment_capacity_factor: 4.0,
            min_slope: 0.01,
            evaporate_speed: 0.01,
            deposit_speed: 0.3,
            erode_speed: 0.3,
            gravity: 4.0,
            max_steps: 128,
            initial_speed: 1.0,
            initial_water: 1.0,
            min_water: 0.01,
        }
    }
}

impl ErosionConfig {
    /// Checks every tuning value; erosion itself never fails afterwards.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("radius", self.radius)?;
        if self.radius < 0.0 {
            return Err(ConfigError::NegativeRadius(self.radius));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidStepBudget);
        }
        ensure_in_range("inertia", self.inertia, 0.0, 1.0)?;
        ensure_in_range("evaporate_speed", self.evaporate_speed, 0.0, 1.0)?;
        ensure_in_range("deposit_speed", self.deposit_speed, 0.0, 1.0)?;
        ensure_in_range("erode_speed", self.erode_speed, 0.0, 1.0)?;
        ensure_in_range(
            "sediment_capacity_factor",
            self.sediment_capacity_factor,
            0.0,
            f32::MAX,
        )?;
        ensure_in_range("min_slope", self.min_slope, 0.0, f32::MAX)?;
        ensure_in_range("gravity", self.gravity, 0.0, f32::MAX)?;
        ensure_in_range("initial_speed", self.initial_speed, 0.0, f32::MAX)?;
        ensure_in_range("initial_water", self.initial_water, 0.0, f32::MAX)?;
        ensure_in_range("min_water", self.min_water, 0.0, f32::MAX)?;
        Ok(())
    }
}
