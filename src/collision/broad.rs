//! Sweep-and-prune broad phase over body AABBs.

use crate::collision::registry::BodyId;
use crate::geometry::Aabb;

/// Sort entries by minimum x (ties by id, so registration order decides)
/// and sweep; the inner scan stops as soon as a candidate starts past the
/// current body's maximum x. Surviving pairs must overlap on all axes.
pub fn sweep_pairs(entries: &mut [(BodyId, Aabb)]) -> Vec<(BodyId, BodyId)> {
    entries.sort_by(|a, b| a.1.min.x.total_cmp(&b.1.min.x).then(a.0.cmp(&b.0)));

    let mut pairs = Vec::new();
    for i in 0..entries.len() {
        let (id_i, aabb_i) = entries[i];
        for &(id_j, aabb_j) in &entries[i + 1..] {
            if aabb_j.min.x > aabb_i.max.x {
                break;
            }
            if aabb_i.overlaps(&aabb_j) {
                pairs.push((id_i, id_j));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point;

    fn aabb(min_x: f32, max_x: f32) -> Aabb {
        Aabb::new(Point::new(min_x, 0.0, 0.0), Point::new(max_x, 1.0, 1.0))
    }

    #[test]
    fn sweep_finds_overlaps_and_skips_separated() {
        let mut entries = vec![
            (BodyId(0), aabb(0.0, 1.0)),
            (BodyId(1), aabb(0.5, 1.5)),
            (BodyId(2), aabb(3.0, 4.0)),
        ];
        let pairs = sweep_pairs(&mut entries);
        assert_eq!(pairs, vec![(BodyId(0), BodyId(1))]);
    }

    #[test]
    fn x_overlap_alone_is_not_enough() {
        let mut entries = vec![
            (BodyId(0), aabb(0.0, 1.0)),
            (
                BodyId(1),
                Aabb::new(Point::new(0.5, 5.0, 0.0), Point::new(1.5, 6.0, 1.0)),
            ),
        ];
        assert!(sweep_pairs(&mut entries).is_empty());
    }

    #[test]
    fn unsorted_input_is_handled() {
        let mut entries = vec![
            (BodyId(0), aabb(2.0, 3.0)),
            (BodyId(1), aabb(0.0, 2.5)),
        ];
        let pairs = sweep_pairs(&mut entries);
        assert_eq!(pairs, vec![(BodyId(1), BodyId(0))]);
    }
}
