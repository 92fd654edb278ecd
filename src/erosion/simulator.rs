//! Sequential droplet erosion over a [`HeightGrid`].
//!
//! Each droplet follows the local downhill gradient, picking up sediment
//! while it has spare capacity and dropping it when it slows down or climbs.
//! Droplets run one after another and each sees every change made by the
//! ones before it, so the loop must stay sequential.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use super::droplet::{Droplet, TerminationReason};
use super::ErosionConfig;
use crate::config::{ConfigError, MIN_GRID_SIZE};
use crate::terrain::HeightGrid;

/// Weight of the deposit kernel centre relative to its raw distance falloff.
const DEPOSIT_SCALE: f32 = 0.25;
/// Distance at which the deposit falloff reaches zero.
const DEPOSIT_FALLOFF: f32 = 2.0;

/// One cell of a precomputed write kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
struct KernelCell {
    dx: i32,
    dz: i32,
    weight: f32,
}

/// Erosion kernel: every cell within `radius`, weight `1 - d / radius`.
///
/// Weights are not normalised; the total removed from the grid differs from
/// the amount credited to the droplet.
fn erosion_kernel(radius: f32) -> Vec<KernelCell> {
    if radius <= 0.0 {
        return vec![KernelCell { dx: 0, dz: 0, weight: 1.0 }];
    }
    let reach = radius.ceil() as i32;
    let mut cells = Vec::new();
    for dz in -reach..=reach {
        for dx in -reach..=reach {
            let distance = ((dx * dx + dz * dz) as f32).sqrt();
            if distance > radius {
                continue;
            }
            let weight = (1.0 - distance / radius).max(0.0);
            if weight > 0.0 {
                cells.push(KernelCell { dx, dz, weight });
            }
        }
    }
    cells
}

/// Deposit kernel: the 3×3 block, weight `max(0, 1 - d / 2) * 0.25`.
fn deposit_kernel() -> Vec<KernelCell> {
    let mut cells = Vec::with_capacity(9);
    for dz in -1..=1 {
        for dx in -1..=1 {
            let distance = ((dx * dx + dz * dz) as f32).sqrt();
            let weight = (1.0 - distance / DEPOSIT_FALLOFF).max(0.0) * DEPOSIT_SCALE;
            cells.push(KernelCell { dx, dz, weight });
        }
    }
    cells
}

fn apply_kernel(grid: &mut HeightGrid, kernel: &[KernelCell], center: Vec2, amount: f32) {
    let cx = center.x.floor() as i32;
    let cz = center.y.floor() as i32;
    for cell in kernel {
        grid.add(cx + cell.dx, cz + cell.dz, amount * cell.weight);
    }
}

/// Aggregate counters for an erosion run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErosionStats {
    pub droplets: u32,
    pub total_steps: u64,
    /// Steps where the blended direction had zero length and was left unnormalised.
    pub stalled_steps: u64,
    /// Sediment credited to droplets (not the exact mass removed from the grid).
    pub eroded: f64,
    /// Sediment released by droplets (not the exact mass added to the grid).
    pub deposited: f64,
    pub left_interior: u32,
    pub evaporated: u32,
    pub step_budget: u32,
}

impl ErosionStats {
    fn record_termination(&mut self, reason: TerminationReason) {
        self.droplets += 1;
        match reason {
            TerminationReason::LeftInterior => self.left_interior += 1,
            TerminationReason::Evaporated => self.evaporated += 1,
            TerminationReason::StepBudget => self.step_budget += 1,
        }
    }
}

/// Outcome of a single droplet.
#[derive(Debug, Clone, PartialEq)]
pub struct DropletReport {
    pub start: Vec2,
    pub end: Vec2,
    pub steps: u32,
    pub termination: TerminationReason,
    /// Sediment still carried when the droplet stopped.
    pub sediment: f32,
}

/// State observed at the start of one traced step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStep {
    pub position: Vec2,
    /// Direction carried into the step.
    pub direction: Vec2,
    /// Uphill gradient sampled at `position`.
    pub gradient: Vec2,
}

/// Step-by-step record of one droplet.
#[derive(Debug, Clone, PartialEq)]
pub struct DropletTrace {
    pub steps: Vec<TraceStep>,
    pub report: DropletReport,
}

/// Runs droplets against a grid.
pub struct ErosionSimulator {
    config: ErosionConfig,
    rng: ChaCha8Rng,
    erosion_kernel: Vec<KernelCell>,
    deposit_kernel: Vec<KernelCell>,
}

impl ErosionSimulator {
    /// Validates `config` and seeds the spawn generator.
    ///
    /// # Errors
    /// Any `ConfigError` from [`ErosionConfig::validate`].
    pub fn new(config: &ErosionConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            erosion_kernel: erosion_kernel(config.radius),
            deposit_kernel: deposit_kernel(),
        })
    }

    pub fn config(&self) -> &ErosionConfig {
        &self.config
    }

    /// Uniformly random interior position, or `None` if the grid has no interior.
    pub fn spawn_position(&mut self, size: usize) -> Option<Vec2> {
        if size < MIN_GRID_SIZE {
            return None;
        }
        let max = (size - 2) as f32;
        let x = self.rng.random_range(1.0..max);
        let z = self.rng.random_range(1.0..max);
        Some(Vec2::new(x, z))
    }

    /// Simulates `config.iterations` droplets.
    pub fn run(&mut self, grid: &mut HeightGrid) -> ErosionStats {
        self.run_with_progress(grid, usize::MAX, |_, _| {})
    }

    /// Simulates `config.iterations` droplets, calling `on_progress(done, total)`
    /// every `every` droplets and after the last one.
    ///
    /// # Arguments
    /// * `grid` - Heightfield eroded in place; its shape never changes
    /// * `every` - Droplets between progress calls (0 is treated as 1)
    /// * `on_progress` - Receives `(droplets_done, total_droplets)`
    ///
    /// # Returns
    /// Aggregate statistics for the run
    pub fn run_with_progress<F>(
        &mut self,
        grid: &mut HeightGrid,
        every: usize,
        mut on_progress: F,
    ) -> ErosionStats
    where
        F: FnMut(usize, usize),
    {
        let mut stats = ErosionStats::default();
        let total = self.config.iterations as usize;
        let every = every.max(1);

        if grid.size() < MIN_GRID_SIZE {
            warn!(size = grid.size(), "grid has no interior, skipping erosion");
            return stats;
        }

        for done in 1..=total {
            if let Some(start) = self.spawn_position(grid.size()) {
                self.drive(grid, start, &mut stats, |_| {});
            }
            if done % every == 0 || done == total {
                on_progress(done, total);
            }
        }

        debug!(
            droplets = stats.droplets,
            steps = stats.total_steps,
            stalled = stats.stalled_steps,
            eroded = stats.eroded,
            deposited = stats.deposited,
            "erosion finished"
        );
        stats
    }

    /// Simulates one droplet starting at `start`.
    ///
    /// The spawn generator is not advanced, so this can be interleaved with
    /// [`spawn_position`](Self::spawn_position) freely.
    ///
    /// # Arguments
    /// * `grid` - Heightfield eroded in place
    /// * `start` - Continuous starting position; `y` is the z axis
    ///
    /// # Returns
    /// Where the droplet stopped, why, and how many steps it took. On a grid
    /// without an interior the report is `LeftInterior` after zero steps.
    pub fn simulate_droplet(&mut self, grid: &mut HeightGrid, start: Vec2) -> DropletReport {
        let mut stats = ErosionStats::default();
        self.drive(grid, start, &mut stats, |_| {})
    }

    /// Simulates one droplet starting at `start`, recording every step.
    pub fn trace_droplet(&mut self, grid: &mut HeightGrid, start: Vec2) -> DropletTrace {
        let mut stats = ErosionStats::default();
        let mut steps = Vec::new();
        let report = self.drive(grid, start, &mut stats, |step| steps.push(step));
        DropletTrace { steps, report }
    }

    fn drive<V>(
        &self,
        grid: &mut HeightGrid,
        start: Vec2,
        stats: &mut ErosionStats,
        mut visit: V,
    ) -> DropletReport
    where
        V: FnMut(TraceStep),
    {
        if grid.size() < MIN_GRID_SIZE {
            stats.record_termination(TerminationReason::LeftInterior);
            return DropletReport {
                start,
                end: start,
                steps: 0,
                termination: TerminationReason::LeftInterior,
                sediment: 0.0,
            };
        }

        let mut droplet = Droplet::new(start, &self.config);
        let reason = loop {
            if let Some(reason) = self.step(grid, &mut droplet, stats, &mut visit) {
                break reason;
            }
        };
        droplet.terminate(reason);
        stats.record_termination(reason);

        DropletReport {
            start,
            end: droplet.position,
            steps: droplet.steps(),
            termination: reason,
            sediment: droplet.sediment,
        }
    }

    /// Advances `droplet` by one step, returning why it stopped if it did.
    fn step<V>(
        &self,
        grid: &mut HeightGrid,
        droplet: &mut Droplet,
        stats: &mut ErosionStats,
        visit: &mut V,
    ) -> Option<TerminationReason>
    where
        V: FnMut(TraceStep),
    {
        let cfg = &self.config;
        droplet.begin_step();

        let old = droplet.position;
        let gradient = grid.gradient(old.x, old.y);
        visit(TraceStep {
            position: old,
            direction: droplet.direction,
            gradient,
        });

        let blended = droplet.direction * cfg.inertia - gradient * (1.0 - cfg.inertia);
        let length = blended.length();
        if length > 0.0 {
            droplet.direction = blended / length;
        } else {
            droplet.direction = blended;
            stats.stalled_steps += 1;
            trace!(x = old.x, z = old.y, "droplet direction degenerate");
        }

        droplet.position += droplet.direction;
        droplet.finish_step();
        stats.total_steps += 1;

        let new = droplet.position;
        let max = grid.size().saturating_sub(2) as f32;
        if new.x < 1.0 || new.y < 1.0 || new.x > max || new.y > max {
            return Some(TerminationReason::LeftInterior);
        }

        let delta_height = grid.get_smooth(new.x, new.y) - grid.get_smooth(old.x, old.y);
        let capacity = (-delta_height).max(cfg.min_slope)
            * droplet.speed
            * droplet.water
            * cfg.sediment_capacity_factor;

        if droplet.sediment > capacity || delta_height > 0.0 {
            let amount = if delta_height > 0.0 {
                delta_height.min(droplet.sediment)
            } else {
                ((droplet.sediment - capacity) * cfg.deposit_speed).min(droplet.sediment)
            };
            droplet.sediment -= amount;
            apply_kernel(grid, &self.deposit_kernel, new, amount);
            stats.deposited += amount as f64;
        } else {
            let amount = ((capacity - droplet.sediment) * cfg.erode_speed).min(-delta_height);
            apply_kernel(grid, &self.erosion_kernel, old, -amount);
            droplet.sediment += amount;
            stats.eroded += amount as f64;
        }

        droplet.speed = (droplet.speed * droplet.speed + delta_height * cfg.gravity)
            .max(0.0)
            .sqrt();
        droplet.water *= 1.0 - cfg.evaporate_speed;

        if droplet.water < cfg.min_water {
            return Some(TerminationReason::Evaporated);
        }
        if droplet.steps() >= cfg.max_steps {
            return Some(TerminationReason::StepBudget);
        }
        None
    }
}
