//! Narrow phase and contact resolution for one overlapping body pair.
//!
//! One body's sample points are hashed by the smaller of the two voxel
//! sizes; the other body's points probe the 27-neighborhood. Points closer
//! than a cell on every axis form a contact.

use crate::collision::registry::CollisionObject;
use crate::config::constants::CONTACT_NORMAL_EPSILON;
use crate::geometry::SpGrid;
use crate::math::{Real, Vector};

/// Detect and resolve all point contacts between `a` and `b`. Contacts are
/// gathered first (in a's hash / b's point order), then resolved
/// sequentially, so resolution order is deterministic.
pub fn resolve_pair(a: &mut dyn CollisionObject, b: &mut dyn CollisionObject) {
    let cell = a.voxel_size().min(b.voxel_size());
    if !(cell > 0.0) || a.sample_count() == 0 || b.sample_count() == 0 {
        return;
    }

    let mut hash: SpGrid<Vec<u32>> = SpGrid::new(cell);
    for i in 0..a.sample_count() {
        let key = hash.key_for(a.sample_position(i));
        hash.get_packed_mut(key).push(i as u32);
    }

    let mut contacts: Vec<(usize, usize)> = Vec::new();
    for j in 0..b.sample_count() {
        let p = b.sample_position(j);
        let key = hash.key_for(p);
        hash.for_each_neighbor_packed(key, |_, bucket| {
            for &i in bucket {
                let q = a.sample_position(i as usize);
                let d = p - q;
                if d.x.abs() <= cell && d.y.abs() <= cell && d.z.abs() <= cell {
                    contacts.push((i as usize, j));
                }
            }
        });
    }

    for (i, j) in contacts {
        resolve_contact(a, i, b, j, cell);
    }
}

/// Positional correction split by relative hardness plus a restitution
/// impulse along the contact normal, applied only when approaching.
fn resolve_contact(
    a: &mut dyn CollisionObject,
    i: usize,
    b: &mut dyn CollisionObject,
    j: usize,
    cell: Real,
) {
    let delta = b.sample_position(j) - a.sample_position(i);
    let distance = delta.length();
    // Coincident points get an arbitrary but fixed normal.
    let normal = if distance > CONTACT_NORMAL_EPSILON {
        delta / distance
    } else {
        Vector::Y
    };

    let penetration = (cell - distance).max(0.0);
    if penetration > 0.0 {
        let total_hardness = a.hardness() + b.hardness();
        if total_hardness > 0.0 {
            // The harder the other body, the larger this body's share.
            let share_a = b.hardness() / total_hardness;
            let share_b = a.hardness() / total_hardness;
            a.apply_correction(i, -normal * (penetration * share_a));
            b.apply_correction(j, normal * (penetration * share_b));
        }
    }

    let relative = b.sample_velocity(j) - a.sample_velocity(i);
    let closing = relative.dot(normal);
    if closing >= 0.0 {
        return;
    }
    let inverse_mass_sum = a.inverse_mass(i) + b.inverse_mass(j);
    if inverse_mass_sum <= 0.0 {
        return;
    }
    let restitution = 0.5 * (a.restitution() + b.restitution());
    let impulse = -(1.0 + restitution) * closing / inverse_mass_sum;
    a.apply_impulse(i, -normal * (impulse * a.inverse_mass(i)));
    b.apply_impulse(j, normal * (impulse * b.inverse_mass(j)));
}
