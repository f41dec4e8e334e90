use crate::math::Real;

/// Link between two particles of the same body, referenced by arena index.
/// The rest length is fixed at construction to the initial inter-particle
/// distance and is always strictly positive.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    pub a: u32,
    pub b: u32,
    pub stiffness: Real,
    pub damping: Real,
    pub rest_length: Real,
}

impl Spring {
    pub fn new(a: u32, b: u32, stiffness: Real, damping: Real, rest_length: Real) -> Self {
        debug_assert!(rest_length > 0.0);
        Self {
            a,
            b,
            stiffness,
            damping,
            rest_length,
        }
    }
}
