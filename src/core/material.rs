//! Material presets.
//!
//! Two families: compliant bodies link only face-adjacent lattice neighbors,
//! stiff bodies widen the link radius toward the cube diagonal so diagonal
//! bracing springs appear.

use crate::math::Real;

/// Small material vocabulary bodies are built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    /// Soft, jelly-like response.
    Squishy,
    /// Stiffer lattice with diagonal bracing.
    Firm,
}

/// Resolved material parameters.
#[derive(Clone, Copy, Debug)]
pub struct MaterialParams {
    pub name: &'static str,
    /// Mass density (kg/m^3); particle mass = density * voxel volume.
    pub density: Real,
    pub stiffness: Real,
    pub spring_damping: Real,
    pub particle_damping: Real,
    /// Weight in collision positional splits; harder bodies yield less.
    pub hardness: Real,
    pub restitution: Real,
    /// Spring link radius as a multiple of the voxel edge length.
    pub link_radius_factor: Real,
}

impl MaterialParams {
    pub const fn squishy() -> Self {
        Self {
            name: "squishy",
            density: 900.0,
            stiffness: 60.0,
            spring_damping: 0.6,
            particle_damping: 0.08,
            hardness: 1.0,
            restitution: 0.4,
            link_radius_factor: 1.1,
        }
    }

    pub const fn firm() -> Self {
        Self {
            name: "firm",
            density: 1200.0,
            stiffness: 220.0,
            spring_damping: 1.2,
            particle_damping: 0.12,
            hardness: 8.0,
            restitution: 0.2,
            // Just above sqrt(3): links reach across cell diagonals.
            link_radius_factor: 1.8,
        }
    }

    pub fn with_restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_particle_damping(mut self, damping: Real) -> Self {
        self.particle_damping = damping;
        self
    }

    pub fn with_stiffness(mut self, stiffness: Real) -> Self {
        self.stiffness = stiffness;
        self
    }
}

impl From<MaterialKind> for MaterialParams {
    fn from(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Squishy => Self::squishy(),
            MaterialKind::Firm => Self::firm(),
        }
    }
}
