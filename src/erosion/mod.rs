//! Droplet-based hydraulic erosion.
//!
//! Simulates individual water droplets rolling over a [`HeightGrid`](crate::terrain::HeightGrid),
//! eroding where they have spare sediment capacity and depositing where they
//! slow down or climb. Carves drainage channels and deposition fans into
//! noise terrain.

mod config;
mod droplet;
mod simulator;

pub use config::ErosionConfig;
pub use droplet::{Droplet, DropletState, TerminationReason};
pub use simulator::{DropletReport, DropletTrace, ErosionSimulator, ErosionStats, TraceStep};
