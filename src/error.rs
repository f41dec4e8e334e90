//! Error type for the build phase of the pipeline.
//!
//! Only mesh ingestion and voxelization can fail. Everything running inside a
//! simulation tick handles degenerate input with neutral-value guards instead,
//! so a tick never aborts halfway through.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("mesh has no vertices or no triangles")]
    EmptyMesh,
    #[error("mesh is degenerate: {reason}")]
    DegenerateMesh { reason: &'static str },
    #[error("voxel size must be positive and finite")]
    InvalidVoxelSize,
}
