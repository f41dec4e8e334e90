//! Ray and triangle primitives used by the voxel classifier.
//!
//! Ray/box uses the slab method with a guarded reciprocal so an axis-aligned
//! ray never produces NaN bounds. Ray/triangle is Moller-Trumbore; only
//! forward, non-grazing hits count.

use crate::config::constants::{DIR_EPSILON, RAY_EPSILON};
use crate::geometry::Aabb;
use crate::math::{Point, Real, Vector};

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point,
    pub direction: Vector,
}

impl Ray {
    pub fn new(origin: Point, direction: Vector) -> Self {
        Self { origin, direction }
    }

    /// Slab test. Axes with a near-zero direction component degenerate to a
    /// containment check instead of dividing by zero.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        let mut t_min: Real = 0.0;
        let mut t_max: Real = Real::MAX;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            let lo = aabb.min[axis];
            let hi = aabb.max[axis];

            if dir.abs() < DIR_EPSILON {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }

    /// Moller-Trumbore intersection distance, `None` for misses, backfacing
    /// grazes (|det| < epsilon) and hits at t <= epsilon.
    pub fn intersects_triangle(&self, a: Point, b: Point, c: Point) -> Option<Real> {
        let edge1 = b - a;
        let edge2 = c - a;
        let pvec = self.direction.cross(edge2);
        let det = edge1.dot(pvec);
        if det.abs() < RAY_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = self.origin - a;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = self.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(qvec) * inv_det;
        (t > RAY_EPSILON).then_some(t)
    }
}

/// Closest point on triangle `abc` to `p` (Voronoi region walk).
pub fn closest_point_on_triangle(p: Point, a: Point, b: Point, c: Point) -> Point {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    a + ab * v + ac * w
}

/// Distance from `p` to triangle `abc`.
#[inline]
pub fn point_triangle_distance(p: Point, a: Point, b: Point, c: Point) -> Real {
    (p - closest_point_on_triangle(p, a, b, c)).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slab_handles_zero_direction_component() {
        let aabb = Aabb::new(Point::ZERO, Point::ONE);
        // Axis-aligned ray whose y and z components are exactly zero.
        let hit = Ray::new(Point::new(-1.0, 0.5, 0.5), Vector::X);
        assert!(hit.intersects_aabb(&aabb));
        let miss = Ray::new(Point::new(-1.0, 2.0, 0.5), Vector::X);
        assert!(!miss.intersects_aabb(&aabb));
    }

    #[test]
    fn slab_accepts_ray_starting_inside() {
        let aabb = Aabb::new(Point::ZERO, Point::ONE);
        let ray = Ray::new(Point::splat(0.5), Vector::Z);
        assert!(ray.intersects_aabb(&aabb));
    }

    #[test]
    fn triangle_hit_reports_distance() {
        let ray = Ray::new(Point::new(0.25, 0.25, -2.0), Vector::Z);
        let t = ray
            .intersects_triangle(Point::ZERO, Point::X, Point::Y)
            .expect("forward hit");
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn triangle_behind_origin_is_rejected() {
        let ray = Ray::new(Point::new(0.25, 0.25, 2.0), Vector::Z);
        assert!(ray.intersects_triangle(Point::ZERO, Point::X, Point::Y).is_none());
    }

    #[test]
    fn grazing_triangle_is_rejected() {
        // Ray lies in the triangle plane.
        let ray = Ray::new(Point::new(-1.0, 0.25, 0.0), Vector::X);
        assert!(ray.intersects_triangle(Point::ZERO, Point::X, Point::Y).is_none());
    }

    #[test]
    fn closest_point_covers_face_edge_and_vertex() {
        let (a, b, c) = (Point::ZERO, Point::X, Point::Y);
        // Above the interior: projects onto the face.
        let face = closest_point_on_triangle(Point::new(0.25, 0.25, 1.0), a, b, c);
        assert!((face - Point::new(0.25, 0.25, 0.0)).length() < 1e-6);
        // Beyond vertex a.
        let vert = closest_point_on_triangle(Point::new(-1.0, -1.0, 0.0), a, b, c);
        assert_eq!(vert, a);
        // Past the ab edge.
        let edge = closest_point_on_triangle(Point::new(0.5, -1.0, 0.0), a, b, c);
        assert!((edge - Point::new(0.5, 0.0, 0.0)).length() < 1e-6);
    }
}
