//! Uniform spatial hash over packed integer cell coordinates.
//!
//! Cells are keyed by flooring a position by the cell width and packing the
//! three signed coordinates into 21-bit fields of a `u64`. Lookups only ever
//! probe explicit keys (a cell and its 27-neighborhood), never iterate the
//! map, so the hash order cannot leak into simulation results.

use std::collections::HashMap;

use bevy::math::IVec3;

use crate::math::{Point, Real};

pub type PackedCell = u64;

const COORD_BITS: u32 = 21;
const COORD_MASK: u64 = (1 << COORD_BITS) - 1;
const COORD_BIAS: i64 = 1 << (COORD_BITS - 1);

#[inline]
pub fn pack_coords(ix: i32, iy: i32, iz: i32) -> PackedCell {
    let x = (ix as i64 + COORD_BIAS) as u64 & COORD_MASK;
    let y = (iy as i64 + COORD_BIAS) as u64 & COORD_MASK;
    let z = (iz as i64 + COORD_BIAS) as u64 & COORD_MASK;
    (x << (2 * COORD_BITS)) | (y << COORD_BITS) | z
}

#[inline]
pub fn unpack_coords(id: PackedCell) -> (i32, i32, i32) {
    let x = ((id >> (2 * COORD_BITS)) & COORD_MASK) as i64 - COORD_BIAS;
    let y = ((id >> COORD_BITS) & COORD_MASK) as i64 - COORD_BIAS;
    let z = (id & COORD_MASK) as i64 - COORD_BIAS;
    (x as i32, y as i32, z as i32)
}

#[inline]
pub fn cell_from_position(position: Point, cell_width: Real) -> IVec3 {
    let inv = 1.0 / cell_width;
    IVec3::new(
        (position.x * inv).floor() as i32,
        (position.y * inv).floor() as i32,
        (position.z * inv).floor() as i32,
    )
}

#[derive(Clone)]
pub struct SpGrid<T> {
    cell_width: Real,
    cells: HashMap<PackedCell, T>,
}

impl<T: Default> SpGrid<T> {
    pub fn new(cell_width: Real) -> Self {
        Self {
            cell_width,
            cells: HashMap::new(),
        }
    }

    pub fn cell_width(&self) -> Real {
        self.cell_width
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn key_for(&self, position: Point) -> PackedCell {
        let c = cell_from_position(position, self.cell_width);
        pack_coords(c.x, c.y, c.z)
    }

    pub fn get_packed(&self, id: PackedCell) -> Option<&T> {
        self.cells.get(&id)
    }

    pub fn get_packed_mut(&mut self, id: PackedCell) -> &mut T {
        self.cells.entry(id).or_default()
    }

    /// Visit the 27 cells around (and including) `base_id` that exist.
    pub fn for_each_neighbor_packed<F>(&self, base_id: PackedCell, mut f: F)
    where
        F: FnMut(PackedCell, &T),
    {
        let (ix, iy, iz) = unpack_coords(base_id);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor_id = pack_coords(ix + dx, iy + dy, iz + dz);
                    if let Some(cell) = self.cells.get(&neighbor_id) {
                        f(neighbor_id, cell);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_roundtrips_negative_coords() {
        for coords in [(0, 0, 0), (-5, 12, -1000), (1 << 19, -(1 << 19), 7)] {
            let id = pack_coords(coords.0, coords.1, coords.2);
            assert_eq!(unpack_coords(id), coords);
        }
    }

    #[test]
    fn cell_from_position_floors() {
        let c = cell_from_position(Point::new(-0.1, 0.0, 2.3), 1.0);
        assert_eq!(c, IVec3::new(-1, 0, 2));
    }

    #[test]
    fn neighbor_probe_visits_adjacent_cells() {
        let mut grid: SpGrid<Vec<u32>> = SpGrid::new(1.0);
        let a = grid.key_for(Point::new(0.5, 0.5, 0.5));
        let b = grid.key_for(Point::new(1.5, 0.5, 0.5));
        grid.get_packed_mut(a).push(1);
        grid.get_packed_mut(b).push(2);

        let mut seen = Vec::new();
        grid.for_each_neighbor_packed(a, |_, cell| seen.extend_from_slice(cell));
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2]);
    }
}
