//! Pipeline module for orchestrating terrain generation stages.
//!
//! Stages share one grid and run in insertion order; each declares the
//! stages it depends on.

mod stage;

pub use stage::{
    generate_terrain, ErosionStage, GenerationStage, HeightmapStage, Pipeline, PipelineError,
    ProgressFn, StageId,
};
