//! Dense signed-density grid produced by voxelization.
//!
//! Densities live on the corner lattice; negative means inside the mesh.
//! The grid is immutable once built. Downstream consumers are the spring
//! network builder (interior cell centers) and an external iso-surface
//! extractor (raw corner densities).

use crate::math::{Point, Real, Vector};

#[derive(Clone, Debug)]
pub struct VoxelGrid {
    origin: Point,
    voxel_size: Real,
    /// Cell counts per axis; the corner lattice is one larger on each.
    cells: [usize; 3],
    /// Corner densities, x slowest: `(i * (ny+1) + j) * (nz+1) + k`.
    densities: Vec<Real>,
}

impl VoxelGrid {
    pub(crate) fn new(origin: Point, voxel_size: Real, cells: [usize; 3]) -> Self {
        let corners = (cells[0] + 1) * (cells[1] + 1) * (cells[2] + 1);
        Self {
            origin,
            voxel_size,
            cells,
            densities: vec![0.0; corners],
        }
    }

    pub fn voxel_size(&self) -> Real {
        self.voxel_size
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn cell_counts(&self) -> [usize; 3] {
        self.cells
    }

    pub fn corner_counts(&self) -> [usize; 3] {
        [self.cells[0] + 1, self.cells[1] + 1, self.cells[2] + 1]
    }

    #[inline]
    pub fn corner_index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * (self.cells[1] + 1) + j) * (self.cells[2] + 1) + k
    }

    #[inline]
    pub fn corner_density(&self, i: usize, j: usize, k: usize) -> Real {
        self.densities[self.corner_index(i, j, k)]
    }

    #[inline]
    pub fn corner_position(&self, i: usize, j: usize, k: usize) -> Point {
        self.origin + Vector::new(i as Real, j as Real, k as Real) * self.voxel_size
    }

    pub fn densities(&self) -> &[Real] {
        &self.densities
    }

    pub(crate) fn densities_mut(&mut self) -> &mut [Real] {
        &mut self.densities
    }

    /// A cell is interior iff at least one of its eight corners is negative.
    pub fn is_cell_interior(&self, i: usize, j: usize, k: usize) -> bool {
        for di in 0..2 {
            for dj in 0..2 {
                for dk in 0..2 {
                    if self.corner_density(i + di, j + dj, k + dk) < 0.0 {
                        return true;
                    }
                }
            }
        }
        false
    }

    #[inline]
    pub fn cell_center(&self, i: usize, j: usize, k: usize) -> Point {
        self.origin
            + Vector::new(i as Real + 0.5, j as Real + 0.5, k as Real + 0.5) * self.voxel_size
    }

    /// Local-space centers of every interior cell, in lattice order.
    pub fn interior_centers(&self) -> Vec<Point> {
        let mut centers = Vec::new();
        for i in 0..self.cells[0] {
            for j in 0..self.cells[1] {
                for k in 0..self.cells[2] {
                    if self.is_cell_interior(i, j, k) {
                        centers.push(self.cell_center(i, j, k));
                    }
                }
            }
        }
        centers
    }
}
