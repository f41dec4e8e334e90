//! Numeric defaults shared across the solver and geometry code.

use crate::math::{Real, Vector};

/// Default gravity (m/s^2, Y-up).
pub const GRAVITY: Vector = Vector::new(0.0, -9.81, 0.0);

/// Fixed simulation step (seconds).
pub const FIXED_DT: Real = 1.0 / 60.0;

/// Constraint relaxation rounds per step.
pub const RELAXATION_ITERATIONS: usize = 10;

/// Ground plane height (world Y).
pub const GROUND_HEIGHT: Real = 0.0;

/// Maximum triangles a BVH leaf may hold.
pub const MAX_LEAF_TRIANGLES: usize = 8;

/// Epsilon for ray/triangle intersection (Moller-Trumbore).
pub const RAY_EPSILON: Real = 1e-6;

/// Below this magnitude a ray direction component counts as zero.
pub const DIR_EPSILON: Real = 1e-8;

/// Springs shorter than this skip force application and projection.
pub const MIN_SPRING_LENGTH: Real = 1e-5;

/// Below this separation two contact points share a position and the
/// fallback contact normal is used.
pub const CONTACT_NORMAL_EPSILON: Real = 1e-6;

/// Hardness assigned to bodies without a deformable network. Large but
/// finite so the hardness-weighted correction split stays well defined.
pub const RIGID_HARDNESS: Real = 1e9;
