//! Generation stage trait and pipeline orchestration.

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, TerrainConfig};
use crate::erosion::ErosionSimulator;
use crate::terrain::{fill_heightmap, HeightGrid};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Noise heightmap generation.
    Heightmap,
    /// Droplet hydraulic erosion.
    Erosion,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Heightmap => "heightmap",
            StageId::Erosion => "erosion",
        }
    }
}

/// Errors that can occur while building or running a pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// Progress sink handed to stages: `(done, total)` in stage-specific units.
pub type ProgressFn<'a> = dyn FnMut(usize, usize) + 'a;

/// Trait for implementing generation stages.
///
/// Each stage transforms the grid in place, building on the stages before it.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, reporting progress every `every` units of work.
    fn execute(
        &self,
        grid: &mut HeightGrid,
        config: &TerrainConfig,
        every: usize,
        progress: &mut ProgressFn<'_>,
    ) -> Result<(), PipelineError>;
}

/// Fills the grid from fractal noise. Progress is counted in rows.
pub struct HeightmapStage;

impl GenerationStage for HeightmapStage {
    fn id(&self) -> StageId {
        StageId::Heightmap
    }

    fn name(&self) -> &str {
        "Heightmap Generation"
    }

    fn execute(
        &self,
        grid: &mut HeightGrid,
        config: &TerrainConfig,
        every: usize,
        progress: &mut ProgressFn<'_>,
    ) -> Result<(), PipelineError> {
        config.noise.validate()?;
        fill_heightmap(grid, config, every, |done, total| progress(done, total));
        Ok(())
    }
}

/// Runs droplet erosion over the grid. Progress is counted in droplets.
pub struct ErosionStage;

impl GenerationStage for ErosionStage {
    fn id(&self) -> StageId {
        StageId::Erosion
    }

    fn name(&self) -> &str {
        "Hydraulic Erosion"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(
        &self,
        grid: &mut HeightGrid,
        config: &TerrainConfig,
        every: usize,
        progress: &mut ProgressFn<'_>,
    ) -> Result<(), PipelineError> {
        let mut simulator = ErosionSimulator::new(&config.erosion, config.seed)?;
        let stats = simulator.run_with_progress(grid, every, |done, total| progress(done, total));
        info!(
            droplets = stats.droplets,
            steps = stats.total_steps,
            left_interior = stats.left_interior,
            evaporated = stats.evaporated,
            step_budget = stats.step_budget,
            "erosion stage complete"
        );
        Ok(())
    }
}

/// Orchestrates generation stages over a single owned grid.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
    config: TerrainConfig,
}

impl Pipeline {
    /// Creates an empty pipeline, validating `config` up front.
    pub fn new(config: TerrainConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            stages: Vec::new(),
            config,
        })
    }

    /// Heightmap followed by erosion.
    pub fn standard(config: TerrainConfig) -> Result<Self, PipelineError> {
        let mut pipeline = Self::new(config)?;
        pipeline.add_stage(HeightmapStage).add_stage(ErosionStage);
        Ok(pipeline)
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns the validated configuration every stage receives.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Runs every stage on a fresh grid and returns it.
    pub fn run(&self) -> Result<HeightGrid, PipelineError> {
        let mut grid = HeightGrid::new(self.config.size)?;
        self.run_on(&mut grid)?;
        Ok(grid)
    }

    /// Runs every stage on an existing grid.
    pub fn run_on(&self, grid: &mut HeightGrid) -> Result<(), PipelineError> {
        self.execute_all(grid, usize::MAX, &mut |_, _, _| {}, &mut |_, _, _| {}, &mut |_, _, _| {})
    }

    /// Runs every stage on a fresh grid, calling `on_stage_start` and
    /// `on_stage_complete` with `(name, index, total_stages)`.
    pub fn run_with_callbacks<F1, F2>(
        &self,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<HeightGrid, PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let mut grid = HeightGrid::new(self.config.size)?;
        self.execute_all(
            &mut grid,
            usize::MAX,
            &mut on_stage_start,
            &mut |_, _, _| {},
            &mut on_stage_complete,
        )?;
        Ok(grid)
    }

    /// Runs every stage on a fresh grid, calling `on_progress(stage, done, total)`
    /// every `every` units of stage work.
    ///
    /// Intended for hosts that need to yield to a frame loop; the callback
    /// cannot influence the result.
    pub fn run_with_progress<F>(&self, every: usize, mut on_progress: F) -> Result<HeightGrid, PipelineError>
    where
        F: FnMut(StageId, usize, usize),
    {
        let mut grid = HeightGrid::new(self.config.size)?;
        self.execute_all(
            &mut grid,
            every,
            &mut |_, _, _| {},
            &mut on_progress,
            &mut |_, _, _| {},
        )?;
        Ok(grid)
    }

    fn execute_all(
        &self,
        grid: &mut HeightGrid,
        every: usize,
        on_stage_start: &mut dyn FnMut(&str, usize, usize),
        on_progress: &mut dyn FnMut(StageId, usize, usize),
        on_stage_complete: &mut dyn FnMut(&str, usize, usize),
    ) -> Result<(), PipelineError> {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            // Check dependencies
            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            on_stage_start(stage.name(), i, total);
            info!(stage = stage.name(), index = i + 1, total, "stage started");

            let id = stage.id();
            stage.execute(grid, &self.config, every, &mut |done: usize, of: usize| {
                on_progress(id, done, of)
            })?;
            completed.push(id);

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Generates a complete terrain (noise plus erosion) for `config`.
///
/// # Arguments
/// * `config` - Terrain configuration; validated before any work starts
///
/// # Returns
/// The eroded heightfield, `config.size` cells on a side
///
/// # Errors
/// `PipelineError::Config` if `config` fails validation; nothing runs in that case.
pub fn generate_terrain(config: &TerrainConfig) -> Result<HeightGrid, PipelineError> {
    Pipeline::standard(config.clone())?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erosion::ErosionConfig;
    use crate::terrain::generate_heightmap;

    fn small_config(seed: u64) -> TerrainConfig {
        let mut config = TerrainConfig::new(seed, 32);
        config.erosion = ErosionConfig {
            iterations: 400,
            ..Default::default()
        };
        config
    }

    #[test]
    fn test_stage_id_name() {
        assert_eq!(StageId::Heightmap.name(), "heightmap");
        assert_eq!(StageId::Erosion.name(), "erosion");
    }

    #[test]
    fn test_pipeline_execution() {
        let mut pipeline = Pipeline::new(small_config(42)).unwrap();
        pipeline.add_stage(HeightmapStage);

        let grid = pipeline.run().unwrap();
        let (min, max) = grid.height_range();
        assert!(min < max, "Heightmap should have variation");
        assert_eq!(grid, generate_heightmap(pipeline.config()).unwrap());
    }

    #[test]
    fn test_invalid_config_fails_before_running() {
        let mut config = small_config(1);
        config.size = 0;
        assert_eq!(
            Pipeline::new(config).err(),
            Some(PipelineError::Config(ConfigError::InvalidGridSize(0)))
        );

        let mut config = small_config(1);
        config.erosion.inertia = f32::NAN;
        assert!(matches!(
            generate_terrain(&config),
            Err(PipelineError::Config(ConfigError::NonFinite { field: "inertia", .. }))
        ));
    }

    #[test]
    fn test_missing_dependency() {
        let mut pipeline = Pipeline::new(small_config(1)).unwrap();
        pipeline.add_stage(ErosionStage);
        assert_eq!(
            pipeline.run().err(),
            Some(PipelineError::MissingDependency(
                "Hydraulic Erosion".to_string(),
                "heightmap".to_string()
            ))
        );
    }

    #[test]
    fn test_generate_terrain_is_deterministic() {
        let config = small_config(1234);
        let a = generate_terrain(&config).unwrap();
        let b = generate_terrain(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.size(), 32);
        assert_eq!(a.len(), 32 * 32);
    }

    #[test]
    fn test_erosion_reshapes_noise_terrain() {
        let config = small_config(77);
        let noise_only = generate_heightmap(&config).unwrap();
        let eroded = generate_terrain(&config).unwrap();
        assert_ne!(noise_only, eroded);
        assert!(eroded.heights().iter().all(|h| h.is_finite()));
    }

    #[test]
    fn test_pipeline_with_callbacks() {
        let pipeline = Pipeline::standard(small_config(3)).unwrap();
        assert_eq!(pipeline.stage_count(), 2);

        let mut started = Vec::new();
        let mut completed = Vec::new();
        pipeline
            .run_with_callbacks(
                |name, i, total| started.push((name.to_string(), i, total)),
                |name, i, total| completed.push((name.to_string(), i, total)),
            )
            .unwrap();

        assert_eq!(
            started,
            vec![
                ("Heightmap Generation".to_string(), 0, 2),
                ("Hydraulic Erosion".to_string(), 1, 2)
            ]
        );
        assert_eq!(started, completed);
    }

    #[test]
    fn test_progress_does_not_change_result() {
        let config = small_config(5);
        let pipeline = Pipeline::standard(config.clone()).unwrap();

        let mut events = Vec::new();
        let grid = pipeline
            .run_with_progress(100, |stage, done, total| events.push((stage, done, total)))
            .unwrap();

        assert_eq!(grid, generate_terrain(&config).unwrap());
        assert_eq!(events.first(), Some(&(StageId::Heightmap, 32, 32)));
        let erosion: Vec<_> = events
            .iter()
            .filter(|(stage, _, _)| *stage == StageId::Erosion)
            .map(|&(_, done, _)| done)
            .collect();
        assert_eq!(erosion, vec![100, 200, 300, 400]);
    }

    #[test]
    fn test_run_on_existing_grid() {
        let mut config = small_config(9);
        config.size = 16;
        let mut pipeline = Pipeline::new(config).unwrap();
        pipeline.add_stage(HeightmapStage).add_stage(ErosionStage);

        let mut grid = HeightGrid::filled(16, 5.0).unwrap();
        pipeline.run_on(&mut grid).unwrap();
        assert_eq!(grid.size(), 16);
        assert!(grid.heights().iter().any(|&h| h != 5.0));
    }
}
