use bevy::math::Affine3A;

use crate::math::{Point, Real, Vector};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point,
    pub max: Point,
}

impl Aabb {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Inverted box; growing it by any point yields that point's box.
    pub fn empty() -> Self {
        Self {
            min: Point::splat(Real::MAX),
            max: Point::splat(Real::MIN),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.grow(p);
        }
        aabb
    }

    #[inline]
    pub fn grow(&mut self, p: Point) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[inline]
    pub fn size(&self) -> Vector {
        self.max - self.min
    }

    /// Index of the axis with the largest extent.
    #[inline]
    pub fn largest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Squared distance from `p` to the box; zero when inside. Lower bound
    /// for the distance to any geometry the box encloses.
    #[inline]
    pub fn min_distance_squared(&self, p: Point) -> Real {
        let clamped = p.clamp(self.min, self.max);
        (p - clamped).length_squared()
    }

    pub fn padded(&self, margin: Real) -> Aabb {
        Aabb {
            min: self.min - Vector::splat(margin),
            max: self.max + Vector::splat(margin),
        }
    }

    /// Box around the eight transformed corners.
    pub fn transformed(&self, affine: &Affine3A) -> Aabb {
        let mut out = Aabb::empty();
        for i in 0..8 {
            let corner = Point::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.grow(affine.transform_point3(corner));
        }
        out
    }
}
