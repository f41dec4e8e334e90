use crate::config::constants;
use crate::math::{Real, Vector};

/// Global parameters for fixed-step integration and constraint relaxation.
#[derive(Clone, Copy, Debug)]
pub struct SolverParams {
    /// Gravity applied to every particle each step.
    pub gravity: Vector,

    /// Fixed step size; callers may tick at any cadence, bodies accumulate
    /// elapsed time and run whole steps.
    pub fixed_dt: Real,

    /// Rounds of spring/ground relaxation after integration.
    pub relaxation_iterations: usize,

    /// World-space height of the ground plane.
    pub ground_height: Real,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            gravity: constants::GRAVITY,
            fixed_dt: constants::FIXED_DT,
            relaxation_iterations: constants::RELAXATION_ITERATIONS,
            ground_height: constants::GROUND_HEIGHT,
        }
    }
}

impl SolverParams {
    pub fn with_gravity(mut self, gravity: Vector) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_fixed_dt(mut self, fixed_dt: Real) -> Self {
        self.fixed_dt = fixed_dt.max(1e-6);
        self
    }

    pub fn with_relaxation_iterations(mut self, iterations: usize) -> Self {
        self.relaxation_iterations = iterations;
        self
    }

    pub fn with_ground_height(mut self, height: Real) -> Self {
        self.ground_height = height;
        self
    }
}
