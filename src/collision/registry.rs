//! Explicit collision registry and the body capability interface.
//!
//! Bodies register into (and out of) the registry instead of being
//! discovered by scanning live objects, and the narrow phase talks to them
//! only through `CollisionObject`, so the physics pass never reaches into a
//! concrete scene representation.

use indexmap::IndexSet;

use crate::geometry::Aabb;
use crate::math::{Point, Real, Vector};

/// Stable handle for a registered body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Capabilities a body exposes to the collision pass: bounds, sample points
/// and the sinks corrections flow back through. Rigid bodies report zero
/// inverse mass and ignore both sinks.
pub trait CollisionObject {
    /// World-space bounds around the body's sample points.
    fn world_aabb(&self) -> Aabb;

    /// Edge length of the lattice the body was built from.
    fn voxel_size(&self) -> Real;

    /// Weight of this body in positional correction splits.
    fn hardness(&self) -> Real;

    fn restitution(&self) -> Real;

    fn sample_count(&self) -> usize;

    /// World-space position of sample point `index`.
    fn sample_position(&self, index: usize) -> Point;

    /// World-space velocity of sample point `index`.
    fn sample_velocity(&self, index: usize) -> Vector;

    /// Zero for rigid/static points.
    fn inverse_mass(&self, index: usize) -> Real;

    /// World-space positional correction sink.
    fn apply_correction(&mut self, index: usize, delta: Vector);

    /// World-space velocity impulse sink.
    fn apply_impulse(&mut self, index: usize, delta_velocity: Vector);
}

/// Insertion-ordered set of collidable bodies, owned by the simulation
/// state. Insertion order is the tie-break order of the broad-phase sweep,
/// which keeps collision passes reproducible across runs.
#[derive(Default, Debug)]
pub struct CollisionRegistry {
    bodies: IndexSet<BodyId>,
}

impl CollisionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: BodyId) {
        self.bodies.insert(id);
    }

    pub fn unregister(&mut self, id: BodyId) {
        self.bodies.shift_remove(&id);
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies.iter().copied()
    }
}
