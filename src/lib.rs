//! Voxelized soft-body physics.
//!
//! A closed triangle mesh is voxelized into an interior particle lattice,
//! nearby particles are linked with springs, and each body evolves under
//! gravity, elasticity, damping and ground/inter-body collisions on a fixed
//! timestep. Particle world positions are exposed every tick for external
//! skinning or rendering; iso-surface extraction over the density grid is an
//! external consumer of [`VoxelGrid`] and lives outside this crate.

use bevy::prelude::*;

pub mod collision;
pub mod config;
pub mod core;
pub mod error;
pub mod geometry;
pub mod math;
pub mod voxel;

// Public re-exports for clean API
pub use collision::{BodyId, CollisionObject, CollisionRegistry};
pub use config::SolverParams;
pub use core::{Body, MaterialKind, MaterialParams, Particle, RigidBody, SimState, SoftBody, Spring};
pub use error::SimError;
pub use geometry::{Aabb, Bvh, Ray, TriMesh};
pub use voxel::{VoxelGrid, voxelize};

pub struct SoftVoxPlugin;

impl Plugin for SoftVoxPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimState>()
            .add_systems(Update, advance_simulation);
    }
}

/// Tick the whole simulation from Bevy's clock. Each body accumulates the
/// frame delta and runs whole fixed steps, then one collision pass runs.
pub fn advance_simulation(time: Res<Time>, mut state: ResMut<SimState>) {
    state.advance(time.delta_secs());
}
