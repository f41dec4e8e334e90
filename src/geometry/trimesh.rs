//! Immutable triangle mesh input.

use crate::error::SimError;
use crate::geometry::Aabb;
use crate::math::Point;

/// Closed triangle mesh: vertex positions plus index triples. Immutable once
/// constructed; the BVH and voxelizer borrow it read-only.
#[derive(Clone, Debug)]
pub struct TriMesh {
    vertices: Vec<Point>,
    triangles: Vec<[u32; 3]>,
}

impl TriMesh {
    pub fn new(vertices: Vec<Point>, triangles: Vec<[u32; 3]>) -> Result<Self, SimError> {
        if vertices.is_empty() || triangles.is_empty() {
            return Err(SimError::EmptyMesh);
        }
        let count = vertices.len() as u32;
        for tri in &triangles {
            if tri.iter().any(|&i| i >= count) {
                return Err(SimError::DegenerateMesh {
                    reason: "triangle index out of range",
                });
            }
        }
        Ok(Self {
            vertices,
            triangles,
        })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Vertex positions of triangle `index`.
    #[inline]
    pub fn triangle(&self, index: usize) -> [Point; 3] {
        let [a, b, c] = self.triangles[index];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    #[inline]
    pub fn triangle_centroid(&self, index: usize) -> Point {
        let [a, b, c] = self.triangle(index);
        (a + b + c) / 3.0
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().copied())
    }

    /// Axis-aligned box from `min` to `max`, triangulated with outward
    /// winding. Handy for demos and tests.
    pub fn cuboid(min: Point, max: Point) -> Self {
        let v = |x: u8, y: u8, z: u8| {
            Point::new(
                if x == 0 { min.x } else { max.x },
                if y == 0 { min.y } else { max.y },
                if z == 0 { min.z } else { max.z },
            )
        };
        let vertices = vec![
            v(0, 0, 0), // 0
            v(1, 0, 0), // 1
            v(1, 1, 0), // 2
            v(0, 1, 0), // 3
            v(0, 0, 1), // 4
            v(1, 0, 1), // 5
            v(1, 1, 1), // 6
            v(0, 1, 1), // 7
        ];
        let triangles = vec![
            // -Z
            [0, 2, 1],
            [0, 3, 2],
            // +Z
            [4, 5, 6],
            [4, 6, 7],
            // -X
            [0, 4, 7],
            [0, 7, 3],
            // +X
            [1, 2, 6],
            [1, 6, 5],
            // -Y
            [0, 1, 5],
            [0, 5, 4],
            // +Y
            [3, 7, 6],
            [3, 6, 2],
        ];
        Self {
            vertices,
            triangles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mesh_is_rejected() {
        assert!(matches!(
            TriMesh::new(Vec::new(), Vec::new()),
            Err(SimError::EmptyMesh)
        ));
        assert!(matches!(
            TriMesh::new(vec![Point::ZERO], Vec::new()),
            Err(SimError::EmptyMesh)
        ));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let result = TriMesh::new(vec![Point::ZERO, Point::X, Point::Y], vec![[0, 1, 3]]);
        assert!(matches!(result, Err(SimError::DegenerateMesh { .. })));
    }

    #[test]
    fn cuboid_bounds_match_inputs() {
        let mesh = TriMesh::cuboid(Point::ZERO, Point::ONE);
        assert_eq!(mesh.triangle_count(), 12);
        let aabb = mesh.aabb();
        assert_eq!(aabb.min, Point::ZERO);
        assert_eq!(aabb.max, Point::ONE);
    }
}
