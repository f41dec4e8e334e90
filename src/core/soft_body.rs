//! Deformable body: particle arena + spring network + fixed-step solver.

use bevy::math::Affine3A;
use bevy::prelude::Transform;

use crate::collision::registry::CollisionObject;
use crate::config::SolverParams;
use crate::config::constants::MIN_SPRING_LENGTH;
use crate::core::material::MaterialParams;
use crate::core::particle::Particle;
use crate::core::spring::Spring;
use crate::error::SimError;
use crate::geometry::{Aabb, Bvh, SpGrid, TriMesh};
use crate::math::{Point, Real, Vector, zero_vector};
use crate::voxel;

/// Soft body built from interior voxel centers. Particles are integrated in
/// body-local space; the transform maps them to world space for ground and
/// inter-body collision, and for external rendering.
pub struct SoftBody {
    particles: Vec<Particle>,
    springs: Vec<Spring>,
    material: MaterialParams,
    voxel_size: Real,
    transform: Transform,
    affine: Affine3A,
    inv_affine: Affine3A,
    accumulator: Real,
}

impl SoftBody {
    /// Build the particle-spring network over `centers`.
    ///
    /// Particles go into a uniform spatial hash keyed by the link radius;
    /// each particle scans the 27 neighboring cells and links every other
    /// particle within the radius, visiting each unordered pair exactly
    /// once. Zero-length pairs are rejected, so every spring's rest length
    /// is strictly positive. Spring order is insertion order, which is also
    /// the fixed relaxation order.
    pub fn from_centers(centers: &[Point], voxel_size: Real, material: MaterialParams) -> Self {
        let particle_mass = material.density * voxel_size * voxel_size * voxel_size;
        let particles: Vec<Particle> = centers
            .iter()
            .map(|&center| Particle::new(center, particle_mass, material.particle_damping))
            .collect();

        let link_radius = material.link_radius_factor * voxel_size;
        let radius_squared = link_radius * link_radius;

        let mut hash: SpGrid<Vec<u32>> = SpGrid::new(link_radius);
        for (index, particle) in particles.iter().enumerate() {
            let key = hash.key_for(particle.position);
            hash.get_packed_mut(key).push(index as u32);
        }

        let mut springs = Vec::new();
        for (i, particle) in particles.iter().enumerate() {
            let key = hash.key_for(particle.position);
            hash.for_each_neighbor_packed(key, |_, cell| {
                for &j in cell {
                    if (j as usize) <= i {
                        continue;
                    }
                    let delta = particles[j as usize].position - particle.position;
                    let distance_squared = delta.length_squared();
                    if distance_squared > MIN_SPRING_LENGTH * MIN_SPRING_LENGTH
                        && distance_squared <= radius_squared
                    {
                        springs.push(Spring::new(
                            i as u32,
                            j,
                            material.stiffness,
                            material.spring_damping,
                            distance_squared.sqrt(),
                        ));
                    }
                }
            });
        }

        let transform = Transform::IDENTITY;
        Self {
            particles,
            springs,
            material,
            voxel_size,
            transform,
            affine: Affine3A::IDENTITY,
            inv_affine: Affine3A::IDENTITY,
            accumulator: 0.0,
        }
    }

    /// Voxelize `mesh` and build the network from its interior cell centers.
    pub fn from_mesh(
        mesh: &TriMesh,
        voxel_size: Real,
        material: MaterialParams,
    ) -> Result<Self, SimError> {
        let bvh = Bvh::build(mesh);
        let grid = voxel::voxelize(mesh, &bvh, voxel_size)?;
        Ok(Self::from_centers(
            &grid.interior_centers(),
            voxel_size,
            material,
        ))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.set_transform(transform);
        self
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.affine = transform.compute_affine();
        self.inv_affine = self.affine.inverse();
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn material(&self) -> &MaterialParams {
        &self.material
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// World-space particle positions, in arena order. This is what an
    /// external skinning stage consumes each tick.
    pub fn world_positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.particles
            .iter()
            .map(|p| self.affine.transform_point3(p.position))
    }

    /// Accumulate `elapsed` and run as many whole fixed steps as fit. The
    /// remainder carries over, decoupling the physical rate from caller
    /// cadence.
    pub fn advance(&mut self, elapsed: Real, params: &SolverParams) {
        self.accumulator += elapsed;
        while self.accumulator >= params.fixed_dt {
            self.step(params);
            self.accumulator -= params.fixed_dt;
        }
    }

    /// One discrete step: force accumulation, semi-implicit Euler, then
    /// position-based relaxation of spring and ground constraints.
    pub fn step(&mut self, params: &SolverParams) {
        let dt = params.fixed_dt;
        // Gravity is a world-space quantity; particles integrate in local
        // space, so map it through the inverse linear part.
        let local_gravity = self.inv_affine.transform_vector3(params.gravity);

        for particle in &mut self.particles {
            particle.force = zero_vector();
            particle.force += particle.mass * local_gravity;
            particle.force += -particle.damping * particle.velocity;
        }

        self.accumulate_spring_forces();

        for particle in &mut self.particles {
            particle.velocity += particle.force * particle.inverse_mass() * dt;
            particle.position += particle.velocity * dt;
        }

        for _ in 0..params.relaxation_iterations {
            self.relax_springs();
            self.collide_ground(params.ground_height);
        }
    }

    /// Elastic + damping force per spring, applied equally and oppositely,
    /// so the net internal contribution is exactly zero. Near-zero-length
    /// springs are skipped (undefined direction).
    fn accumulate_spring_forces(&mut self) {
        for spring in &self.springs {
            let (a, b) = (spring.a as usize, spring.b as usize);
            let delta = self.particles[b].position - self.particles[a].position;
            let length = delta.length();
            if length < MIN_SPRING_LENGTH {
                continue;
            }
            let direction = delta / length;
            let elastic = spring.stiffness * (length - spring.rest_length);
            let relative_velocity =
                (self.particles[b].velocity - self.particles[a].velocity).dot(direction);
            let magnitude = elastic + spring.damping * relative_velocity;
            let force = direction * magnitude;
            self.particles[a].force += force;
            self.particles[b].force -= force;
        }
    }

    /// Gauss-Seidel style projection in spring insertion order: move each
    /// endpoint by half the length residual along the spring axis. The
    /// sequential order is part of the contract; it keeps stiff lattices
    /// stable without shrinking the timestep and stays deterministic.
    fn relax_springs(&mut self) {
        for spring in &self.springs {
            let (a, b) = (spring.a as usize, spring.b as usize);
            let delta = self.particles[b].position - self.particles[a].position;
            let length = delta.length();
            if length < MIN_SPRING_LENGTH {
                continue;
            }
            let correction = delta / length * (0.5 * (length - spring.rest_length));
            self.particles[a].position += correction;
            self.particles[b].position -= correction;
        }
    }

    /// Clamp particles below the ground plane and reflect the vertical
    /// velocity component scaled by the material restitution.
    fn collide_ground(&mut self, ground_height: Real) {
        let restitution = self.material.restitution;
        for particle in &mut self.particles {
            let mut world = self.affine.transform_point3(particle.position);
            if world.y >= ground_height {
                continue;
            }
            world.y = ground_height;
            particle.position = self.inv_affine.transform_point3(world);

            let mut world_velocity = self.affine.transform_vector3(particle.velocity);
            if world_velocity.y < 0.0 {
                world_velocity.y = -world_velocity.y * restitution;
                particle.velocity = self.inv_affine.transform_vector3(world_velocity);
            }
        }
    }
}

impl CollisionObject for SoftBody {
    fn world_aabb(&self) -> Aabb {
        Aabb::from_points(self.world_positions()).padded(self.voxel_size * 0.5)
    }

    fn voxel_size(&self) -> Real {
        self.voxel_size
    }

    fn hardness(&self) -> Real {
        self.material.hardness
    }

    fn restitution(&self) -> Real {
        self.material.restitution
    }

    fn sample_count(&self) -> usize {
        self.particles.len()
    }

    fn sample_position(&self, index: usize) -> Point {
        self.affine.transform_point3(self.particles[index].position)
    }

    fn sample_velocity(&self, index: usize) -> Vector {
        self.affine.transform_vector3(self.particles[index].velocity)
    }

    fn inverse_mass(&self, index: usize) -> Real {
        self.particles[index].inverse_mass()
    }

    fn apply_correction(&mut self, index: usize, delta: Vector) {
        let local = self.inv_affine.transform_vector3(delta);
        self.particles[index].position += local;
    }

    fn apply_impulse(&mut self, index: usize, delta_velocity: Vector) {
        let local = self.inv_affine.transform_vector3(delta_velocity);
        self.particles[index].velocity += local;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants;

    fn block_centers(n: usize, spacing: Real) -> Vec<Point> {
        let mut centers = Vec::new();
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    centers.push(Point::new(
                        i as Real * spacing,
                        j as Real * spacing,
                        k as Real * spacing,
                    ));
                }
            }
        }
        centers
    }

    #[test]
    fn rest_lengths_match_build_distances() {
        let body = SoftBody::from_centers(&block_centers(3, 0.5), 0.5, MaterialParams::firm());
        assert!(!body.springs().is_empty());
        for spring in body.springs() {
            let a = body.particles()[spring.a as usize].position;
            let b = body.particles()[spring.b as usize].position;
            let distance = (b - a).length();
            assert!(spring.rest_length > 0.0);
            assert!((spring.rest_length - distance).abs() < 1e-6);
        }
    }

    #[test]
    fn squishy_lattice_links_faces_only() {
        let body = SoftBody::from_centers(&block_centers(2, 0.5), 0.5, MaterialParams::squishy());
        // 2x2x2 block: 12 edges, no diagonals at radius 1.1 * voxel.
        assert_eq!(body.springs().len(), 12);

        let braced = SoftBody::from_centers(&block_centers(2, 0.5), 0.5, MaterialParams::firm());
        // Firm adds 12 face diagonals and 4 cube diagonals.
        assert_eq!(braced.springs().len(), 28);
    }

    #[test]
    fn each_pair_links_at_most_once() {
        let body = SoftBody::from_centers(&block_centers(3, 0.5), 0.5, MaterialParams::firm());
        let mut pairs: Vec<(u32, u32)> = body
            .springs()
            .iter()
            .map(|s| (s.a.min(s.b), s.a.max(s.b)))
            .collect();
        let before = pairs.len();
        pairs.sort_unstable();
        pairs.dedup();
        assert_eq!(before, pairs.len());
    }

    #[test]
    fn internal_spring_forces_sum_to_zero() {
        let mut body =
            SoftBody::from_centers(&block_centers(3, 0.5), 0.5, MaterialParams::squishy());
        // Perturb so springs are strained, then accumulate spring forces only.
        for (index, particle) in body.particles_mut().iter_mut().enumerate() {
            particle.position += Point::new(0.01, -0.02, 0.005) * index as Real;
            particle.velocity = Point::new(0.1, 0.0, -0.1) * (index % 3) as Real;
            particle.force = zero_vector();
        }
        body.accumulate_spring_forces();
        let total: Vector = body.particles().iter().map(|p| p.force).sum();
        assert!(total.length() < 1e-3, "net internal force {total:?}");
    }

    #[test]
    fn lone_particle_free_falls() {
        let params = SolverParams::default().with_ground_height(-1.0e9);
        let mut body = SoftBody::from_centers(
            &[Point::ZERO],
            0.5,
            MaterialParams::squishy().with_particle_damping(0.0),
        );
        let steps = 60;
        for _ in 0..steps {
            body.step(&params);
        }
        let t = steps as Real * params.fixed_dt;
        let g = constants::GRAVITY.y;
        let particle = body.particles()[0];
        assert!((particle.velocity.y - g * t).abs() < 1e-3);
        // Semi-implicit Euler lands within one step's worth of g*t of the
        // analytic half g t^2.
        let expected = 0.5 * g * t * t;
        assert!((particle.position.y - expected).abs() < g.abs() * t * params.fixed_dt + 1e-3);
    }

    #[test]
    fn accumulator_only_steps_on_whole_intervals() {
        let params = SolverParams::default().with_ground_height(-1.0e9);
        let mut body = SoftBody::from_centers(
            &[Point::ZERO],
            0.5,
            MaterialParams::squishy().with_particle_damping(0.0),
        );
        body.advance(params.fixed_dt * 0.5, &params);
        assert_eq!(body.particles()[0].velocity.y, 0.0);
        body.advance(params.fixed_dt * 0.5, &params);
        assert!(body.particles()[0].velocity.y < 0.0);
    }

    #[test]
    fn ground_clamps_and_reflects() {
        let params = SolverParams::default();
        let mut body = SoftBody::from_centers(
            &[Point::new(0.0, 0.05, 0.0)],
            0.5,
            MaterialParams::squishy().with_particle_damping(0.0),
        );
        for _ in 0..120 {
            body.step(&params);
        }
        let world_y = body.sample_position(0).y;
        assert!(world_y >= params.ground_height - 1e-4);
    }

    #[test]
    fn zero_forces_at_step_start() {
        // A spring-free single particle: after a step the only accumulated
        // force is gravity plus drag from that same step.
        let params = SolverParams::default().with_ground_height(-1.0e9);
        let mut body = SoftBody::from_centers(
            &[Point::ZERO],
            0.5,
            MaterialParams::squishy().with_particle_damping(0.0),
        );
        body.particles_mut()[0].force = Vector::splat(999.0);
        body.step(&params);
        let expected = body.particles()[0].mass * constants::GRAVITY;
        assert!((body.particles()[0].force - expected).length() < 1e-3);
    }
}
