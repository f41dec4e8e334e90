//! Aggregate simulation state: body arena, collision registry, parameters.

use bevy::prelude::*;

use crate::collision::registry::{BodyId, CollisionObject, CollisionRegistry};
use crate::collision::{broad, narrow};
use crate::config::SolverParams;
use crate::core::rigid_body::RigidBody;
use crate::core::soft_body::SoftBody;
use crate::geometry::Aabb;
use crate::math::Real;

pub enum Body {
    Soft(SoftBody),
    Rigid(RigidBody),
}

impl Body {
    fn as_object(&self) -> &dyn CollisionObject {
        match self {
            Body::Soft(body) => body,
            Body::Rigid(body) => body,
        }
    }

    fn as_object_mut(&mut self) -> &mut dyn CollisionObject {
        match self {
            Body::Soft(body) => body,
            Body::Rigid(body) => body,
        }
    }
}

/// All simulation state, exposed to Bevy as one resource. Bodies live in a
/// flat arena indexed by `BodyId`; removal leaves a vacant slot so handles
/// stay stable.
#[derive(Resource, Default)]
pub struct SimState {
    bodies: Vec<Option<Body>>,
    registry: CollisionRegistry,
    params: SolverParams,
}

impl SimState {
    pub fn new(params: SolverParams) -> Self {
        Self {
            bodies: Vec::new(),
            registry: CollisionRegistry::new(),
            params,
        }
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut SolverParams {
        &mut self.params
    }

    pub fn add_soft_body(&mut self, body: SoftBody) -> BodyId {
        info!(
            "registering soft body: {} particles, {} springs",
            body.particles().len(),
            body.springs().len()
        );
        self.push_body(Body::Soft(body))
    }

    pub fn add_rigid_body(&mut self, body: RigidBody) -> BodyId {
        info!("registering rigid body: {} sample points", body.centers().len());
        self.push_body(Body::Rigid(body))
    }

    fn push_body(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(Some(body));
        self.registry.register(id);
        id
    }

    pub fn remove_body(&mut self, id: BodyId) {
        if let Some(slot) = self.bodies.get_mut(id.0 as usize) {
            if slot.take().is_some() {
                debug!("unregistering body {:?}", id);
                self.registry.unregister(id);
            }
        }
    }

    pub fn body_count(&self) -> usize {
        self.registry.len()
    }

    pub fn soft_body(&self, id: BodyId) -> Option<&SoftBody> {
        match self.bodies.get(id.0 as usize)?.as_ref()? {
            Body::Soft(body) => Some(body),
            Body::Rigid(_) => None,
        }
    }

    pub fn soft_body_mut(&mut self, id: BodyId) -> Option<&mut SoftBody> {
        match self.bodies.get_mut(id.0 as usize)?.as_mut()? {
            Body::Soft(body) => Some(body),
            Body::Rigid(_) => None,
        }
    }

    pub fn rigid_body(&self, id: BodyId) -> Option<&RigidBody> {
        match self.bodies.get(id.0 as usize)?.as_ref()? {
            Body::Rigid(body) => Some(body),
            Body::Soft(_) => None,
        }
    }

    /// Advance every body by `elapsed` (each runs whole fixed steps against
    /// its own accumulator), then run one collision pass. Strictly
    /// sequential and deterministic.
    pub fn advance(&mut self, elapsed: Real) {
        let params = self.params;
        for id in self.registry.iter().collect::<Vec<_>>() {
            if let Some(Body::Soft(body)) = self.bodies[id.0 as usize].as_mut() {
                body.advance(elapsed, &params);
            }
        }
        self.collision_pass();
    }

    /// Broad-phase sweep over registered bodies' world AABBs, then pairwise
    /// narrow-phase resolution.
    fn collision_pass(&mut self) {
        let mut entries: Vec<(BodyId, Aabb)> = self
            .registry
            .iter()
            .filter_map(|id| {
                let body = self.bodies[id.0 as usize].as_ref()?;
                if body.as_object().sample_count() == 0 {
                    return None;
                }
                Some((id, body.as_object().world_aabb()))
            })
            .collect();

        for (id_a, id_b) in broad::sweep_pairs(&mut entries) {
            let (slot_a, slot_b) = (id_a.0 as usize, id_b.0 as usize);
            let (lo, hi) = (slot_a.min(slot_b), slot_a.max(slot_b));
            let (left, right) = self.bodies.split_at_mut(hi);
            let (Some(first), Some(second)) = (left[lo].as_mut(), right[0].as_mut()) else {
                continue;
            };
            if slot_a < slot_b {
                narrow::resolve_pair(first.as_object_mut(), second.as_object_mut());
            } else {
                narrow::resolve_pair(second.as_object_mut(), first.as_object_mut());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::MaterialParams;
    use crate::math::{Point, Vector, zero_vector};

    fn single_particle_body(x: Real, vx: Real) -> SoftBody {
        let mut body = SoftBody::from_centers(
            &[Point::new(x, 1.0, 0.0)],
            0.5,
            MaterialParams::squishy().with_particle_damping(0.0),
        );
        body.particles_mut()[0].velocity = Vector::new(vx, 0.0, 0.0);
        body
    }

    #[test]
    fn removed_bodies_skip_collision() {
        let mut state = SimState::new(SolverParams::default().with_gravity(zero_vector()));
        let a = state.add_soft_body(single_particle_body(0.0, 1.0));
        let b = state.add_soft_body(single_particle_body(0.4, -1.0));
        state.remove_body(b);
        assert_eq!(state.body_count(), 1);
        state.advance(state.params().fixed_dt);
        // Nothing left to collide with; velocity unchanged.
        let vx = state.soft_body(a).unwrap().particles()[0].velocity.x;
        assert_eq!(vx, 1.0);
    }

    #[test]
    fn approaching_bodies_collide_through_advance() {
        let mut state = SimState::new(SolverParams::default().with_gravity(zero_vector()));
        let a = state.add_soft_body(single_particle_body(0.0, 1.0));
        let _b = state.add_soft_body(single_particle_body(0.4, -1.0));
        state.advance(state.params().fixed_dt);
        let vx = state.soft_body(a).unwrap().particles()[0].velocity.x;
        assert!(vx < 1.0, "impulse should slow body a, vx = {vx}");
    }
}
