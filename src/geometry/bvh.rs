//! Static median-split BVH over a mesh's triangles.
//!
//! Built once per mesh and read-only afterwards, which is what lets the
//! voxel classifier share it across worker threads without locking.

use crate::config::constants::MAX_LEAF_TRIANGLES;
use crate::geometry::raycast::point_triangle_distance;
use crate::geometry::{Aabb, Ray, TriMesh};
use crate::math::Real;

#[derive(Debug)]
enum BvhChildren {
    /// Triangle indices into the source mesh. At most `MAX_LEAF_TRIANGLES`.
    Leaf(Vec<u32>),
    /// Internal node exclusively owns its two subtrees.
    Split(Box<BvhNode>, Box<BvhNode>),
}

#[derive(Debug)]
pub struct BvhNode {
    aabb: Aabb,
    children: BvhChildren,
}

/// Bounding volume hierarchy accelerating ray parity counts and
/// nearest-surface queries during voxelization.
#[derive(Debug)]
pub struct Bvh {
    root: Option<BvhNode>,
}

impl Bvh {
    /// Median-split build: recursively halve the triangle set along the
    /// largest AABB axis, sorting by centroid. O(n log n), done once.
    pub fn build(mesh: &TriMesh) -> Self {
        let mut indices: Vec<u32> = (0..mesh.triangle_count() as u32).collect();
        if indices.is_empty() {
            return Self { root: None };
        }
        let root = build_node(mesh, &mut indices);
        Self { root: Some(root) }
    }

    pub fn aabb(&self) -> Option<Aabb> {
        self.root.as_ref().map(|n| n.aabb)
    }

    /// Number of valid (forward, non-grazing) triangle hits along `ray`,
    /// pruned by the slab test.
    pub fn ray_hit_count(&self, mesh: &TriMesh, ray: &Ray) -> u32 {
        match &self.root {
            Some(root) => count_hits(root, mesh, ray),
            None => 0,
        }
    }

    /// Distance from `point` to the nearest triangle. Subtrees are pruned by
    /// the box's minimum distance bound against the best hit so far, with the
    /// nearer child visited first. Returns `Real::MAX` for an empty tree.
    pub fn nearest_distance(&self, mesh: &TriMesh, point: crate::math::Point) -> Real {
        let mut best = Real::MAX;
        if let Some(root) = &self.root {
            nearest_in_node(root, mesh, point, &mut best);
        }
        best
    }

    /// Leaf triangle-count bound, for diagnostics and tests.
    pub fn max_leaf_size(&self) -> usize {
        fn walk(node: &BvhNode) -> usize {
            match &node.children {
                BvhChildren::Leaf(tris) => tris.len(),
                BvhChildren::Split(l, r) => walk(l).max(walk(r)),
            }
        }
        self.root.as_ref().map_or(0, walk)
    }
}

fn triangles_aabb(mesh: &TriMesh, indices: &[u32]) -> Aabb {
    let mut aabb = Aabb::empty();
    for &tri in indices {
        for v in mesh.triangle(tri as usize) {
            aabb.grow(v);
        }
    }
    aabb
}

fn build_node(mesh: &TriMesh, indices: &mut [u32]) -> BvhNode {
    let aabb = triangles_aabb(mesh, indices);
    if indices.len() <= MAX_LEAF_TRIANGLES {
        return BvhNode {
            aabb,
            children: BvhChildren::Leaf(indices.to_vec()),
        };
    }

    let axis = aabb.largest_axis();
    indices.sort_by(|&a, &b| {
        let ca = mesh.triangle_centroid(a as usize)[axis];
        let cb = mesh.triangle_centroid(b as usize)[axis];
        ca.total_cmp(&cb)
    });

    let mid = indices.len() / 2;
    let (left, right) = indices.split_at_mut(mid);
    BvhNode {
        aabb,
        children: BvhChildren::Split(
            Box::new(build_node(mesh, left)),
            Box::new(build_node(mesh, right)),
        ),
    }
}

fn count_hits(node: &BvhNode, mesh: &TriMesh, ray: &Ray) -> u32 {
    if !ray.intersects_aabb(&node.aabb) {
        return 0;
    }
    match &node.children {
        BvhChildren::Leaf(tris) => tris
            .iter()
            .filter(|&&tri| {
                let [a, b, c] = mesh.triangle(tri as usize);
                ray.intersects_triangle(a, b, c).is_some()
            })
            .count() as u32,
        BvhChildren::Split(left, right) => {
            count_hits(left, mesh, ray) + count_hits(right, mesh, ray)
        }
    }
}

fn nearest_in_node(node: &BvhNode, mesh: &TriMesh, point: crate::math::Point, best: &mut Real) {
    if node.aabb.min_distance_squared(point) >= *best * *best {
        return;
    }
    match &node.children {
        BvhChildren::Leaf(tris) => {
            for &tri in tris {
                let [a, b, c] = mesh.triangle(tri as usize);
                let d = point_triangle_distance(point, a, b, c);
                if d < *best {
                    *best = d;
                }
            }
        }
        BvhChildren::Split(left, right) => {
            let dl = left.aabb.min_distance_squared(point);
            let dr = right.aabb.min_distance_squared(point);
            if dl <= dr {
                nearest_in_node(left, mesh, point, best);
                nearest_in_node(right, mesh, point, best);
            } else {
                nearest_in_node(right, mesh, point, best);
                nearest_in_node(left, mesh, point, best);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point, Vector};

    fn grid_mesh(n: usize) -> TriMesh {
        // n*n unit quads in the z=0 plane, two triangles each.
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for i in 0..=n {
            for j in 0..=n {
                vertices.push(Point::new(i as Real, j as Real, 0.0));
            }
        }
        let idx = |i: usize, j: usize| (i * (n + 1) + j) as u32;
        for i in 0..n {
            for j in 0..n {
                triangles.push([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1)]);
                triangles.push([idx(i, j), idx(i + 1, j + 1), idx(i, j + 1)]);
            }
        }
        TriMesh::new(vertices, triangles).unwrap()
    }

    #[test]
    fn leaves_stay_within_bound() {
        let mesh = grid_mesh(8);
        let bvh = Bvh::build(&mesh);
        assert!(bvh.max_leaf_size() <= MAX_LEAF_TRIANGLES);
        assert!(bvh.max_leaf_size() > 0);
    }

    #[test]
    fn ray_through_closed_cube_counts_two_hits() {
        let mesh = TriMesh::cuboid(Point::ZERO, Point::ONE);
        let bvh = Bvh::build(&mesh);
        // Slightly off-center so the ray avoids the face diagonals.
        let ray = Ray::new(Point::new(-1.0, 0.3, 0.4), Vector::X);
        assert_eq!(bvh.ray_hit_count(&mesh, &ray), 2);
    }

    #[test]
    fn ray_missing_cube_counts_zero() {
        let mesh = TriMesh::cuboid(Point::ZERO, Point::ONE);
        let bvh = Bvh::build(&mesh);
        let ray = Ray::new(Point::new(-1.0, 2.0, 0.5), Vector::X);
        assert_eq!(bvh.ray_hit_count(&mesh, &ray), 0);
    }

    #[test]
    fn nearest_distance_matches_brute_force() {
        let mesh = grid_mesh(6);
        let bvh = Bvh::build(&mesh);
        for query in [
            Point::new(3.2, 2.7, 1.5),
            Point::new(-1.0, -1.0, 0.5),
            Point::new(8.0, 3.0, -2.0),
        ] {
            let brute = (0..mesh.triangle_count())
                .map(|i| {
                    let [a, b, c] = mesh.triangle(i);
                    point_triangle_distance(query, a, b, c)
                })
                .fold(Real::MAX, Real::min);
            let fast = bvh.nearest_distance(&mesh, query);
            assert!(
                (fast - brute).abs() < 1e-5,
                "query {query:?}: bvh {fast} vs brute {brute}"
            );
        }
    }
}
