//! Rigid collision partner: a static voxel lattice with no spring network.
//!
//! Rigid bodies only exist for the collision pass. They expose their
//! interior centers as immovable sample points (zero inverse mass, very
//! high hardness), so deformable bodies yield around them.

use bevy::math::Affine3A;
use bevy::prelude::Transform;

use crate::collision::registry::CollisionObject;
use crate::config::constants::RIGID_HARDNESS;
use crate::error::SimError;
use crate::geometry::{Aabb, Bvh, TriMesh};
use crate::math::{Point, Real, Vector, zero_vector};
use crate::voxel;

pub struct RigidBody {
    centers: Vec<Point>,
    voxel_size: Real,
    restitution: Real,
    transform: Transform,
    affine: Affine3A,
}

impl RigidBody {
    pub fn from_centers(centers: Vec<Point>, voxel_size: Real, restitution: Real) -> Self {
        Self {
            centers,
            voxel_size,
            restitution,
            transform: Transform::IDENTITY,
            affine: Affine3A::IDENTITY,
        }
    }

    pub fn from_mesh(
        mesh: &TriMesh,
        voxel_size: Real,
        restitution: Real,
    ) -> Result<Self, SimError> {
        let bvh = Bvh::build(mesh);
        let grid = voxel::voxelize(mesh, &bvh, voxel_size)?;
        Ok(Self::from_centers(
            grid.interior_centers(),
            voxel_size,
            restitution,
        ))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.set_transform(transform);
        self
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.affine = transform.compute_affine();
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn centers(&self) -> &[Point] {
        &self.centers
    }
}

impl CollisionObject for RigidBody {
    fn world_aabb(&self) -> Aabb {
        Aabb::from_points(
            self.centers
                .iter()
                .map(|&c| self.affine.transform_point3(c)),
        )
        .padded(self.voxel_size * 0.5)
    }

    fn voxel_size(&self) -> Real {
        self.voxel_size
    }

    fn hardness(&self) -> Real {
        RIGID_HARDNESS
    }

    fn restitution(&self) -> Real {
        self.restitution
    }

    fn sample_count(&self) -> usize {
        self.centers.len()
    }

    fn sample_position(&self, index: usize) -> Point {
        self.affine.transform_point3(self.centers[index])
    }

    fn sample_velocity(&self, _index: usize) -> Vector {
        zero_vector()
    }

    fn inverse_mass(&self, _index: usize) -> Real {
        0.0
    }

    fn apply_correction(&mut self, _index: usize, _delta: Vector) {
        // Immovable.
    }

    fn apply_impulse(&mut self, _index: usize, _delta_velocity: Vector) {
        // Immovable.
    }
}
