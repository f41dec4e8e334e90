/// Simple custom benchmarking without criterion
/// Avoids Windows MSVC linker issues with rayon/criterion
use std::time::Instant;

use bevy::prelude::*;
use softvox::{Bvh, MaterialParams, SimState, SoftBody, SolverParams, TriMesh, voxelize};

fn time_it<F: FnMut()>(name: &str, iterations: usize, mut f: F) {
    // Warmup
    for _ in 0..5 {
        f();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    let elapsed = start.elapsed();

    let avg_ms = elapsed.as_secs_f64() * 1000.0 / iterations as f64;
    println!("{}: {:.3}ms avg ({} iterations)", name, avg_ms, iterations);
}

fn block_centers(side: usize, spacing: f32) -> Vec<Vec3> {
    let mut centers = Vec::new();
    for i in 0..side {
        for j in 0..side {
            for k in 0..side {
                centers.push(Vec3::new(
                    i as f32 * spacing,
                    j as f32 * spacing,
                    k as f32 * spacing,
                ));
            }
        }
    }
    centers
}

fn main() {
    println!("\n=== SoftVox Benchmarks ===\n");

    println!("--- Voxelization ---");
    let cube = TriMesh::cuboid(Vec3::splat(-1.0), Vec3::splat(1.0));
    let bvh = Bvh::build(&cube);
    for &voxel_size in &[0.25, 0.1, 0.05] {
        time_it(
            &format!("voxelize (cube, size={})", voxel_size),
            10,
            || {
                voxelize(&cube, &bvh, voxel_size).unwrap();
            },
        );
    }

    println!("\n--- Network Construction ---");
    for &side in &[8, 12, 16] {
        let centers = block_centers(side, 0.1);
        time_it(
            &format!("from_centers (n={})", centers.len()),
            10,
            || {
                SoftBody::from_centers(&centers, 0.1, MaterialParams::firm());
            },
        );
    }

    println!("\n--- Stepping ---");
    for &side in &[8, 12] {
        let centers = block_centers(side, 0.1);
        let params = SolverParams::default();
        let mut body = SoftBody::from_centers(&centers, 0.1, MaterialParams::squishy());
        body.set_transform(Transform::from_xyz(0.0, 2.0, 0.0));

        time_it(&format!("step (n={})", centers.len()), 50, || {
            body.step(&params);
        });
    }

    println!("\n--- Collision Pass ---");
    for &side in &[6, 8] {
        let centers = block_centers(side, 0.1);
        let mut state = SimState::new(SolverParams::default());
        for offset in 0..4 {
            let mut body = SoftBody::from_centers(&centers, 0.1, MaterialParams::squishy());
            body.set_transform(Transform::from_xyz(offset as f32 * 0.55, 1.0, 0.0));
            state.add_soft_body(body);
        }

        time_it(
            &format!("advance 4 bodies (n={} each)", centers.len()),
            20,
            || {
                state.advance(state.params().fixed_dt);
            },
        );
    }

    println!("\n=== Benchmark Complete ===\n");
}
