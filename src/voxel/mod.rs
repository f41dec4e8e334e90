pub mod grid;
pub mod voxelize;

pub use grid::VoxelGrid;
pub use voxelize::voxelize;
