use bevy::math::Vec3;

pub type Real = f32;
pub const DIM: usize = 3;

pub type Vector = Vec3;
pub type Point = Vec3;

#[inline(always)]
pub fn zero_vector() -> Vector {
    Vec3::ZERO
}

#[inline(always)]
pub fn repeat_vector(value: Real) -> Vector {
    Vec3::splat(value)
}

/// Exact zero check inverse (prevents NaN from division by zero)
#[inline(always)]
pub fn safe_inverse(e: Real) -> Real {
    if e == 0.0 { 0.0 } else { 1.0 / e }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_inverse_guards_zero() {
        assert_eq!(safe_inverse(0.0), 0.0);
        assert_eq!(safe_inverse(2.0), 0.5);
    }
}
