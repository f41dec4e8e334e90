//! Lattice particles.
//!
//! Particles carry position, velocity, an accumulated per-step force, mass
//! and a linear damping coefficient. They live in a flat arena inside their
//! body; springs refer to them by index, never by reference.

use crate::math::{Point, Real, Vector, zero_vector};

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Body-local position.
    pub position: Point,
    pub velocity: Vector,
    /// Reset to zero at the start of every step.
    pub force: Vector,
    pub mass: Real,
    /// Linear drag coefficient.
    pub damping: Real,
}

impl Particle {
    pub fn new(position: Point, mass: Real, damping: Real) -> Self {
        Self {
            position,
            velocity: zero_vector(),
            force: zero_vector(),
            mass: mass.max(1e-6),
            damping,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline(always)]
    pub fn inverse_mass(&self) -> Real {
        1.0 / self.mass
    }
}
