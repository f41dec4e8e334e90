pub mod aabb;
pub mod bvh;
pub mod raycast;
pub mod sp_grid;
pub mod trimesh;

pub use aabb::Aabb;
pub use bvh::Bvh;
pub use raycast::Ray;
pub use sp_grid::{PackedCell, SpGrid, pack_coords, unpack_coords};
pub use trimesh::TriMesh;
