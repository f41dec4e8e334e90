// Drop two soft cubes onto a rigid slab and render the particles.
use bevy::prelude::*;
use rand::Rng;
use softvox::{
    BodyId, MaterialParams, RigidBody, SimState, SoftBody, SoftVoxPlugin, TriMesh,
};

const VOXEL_SIZE: f32 = 0.15;

#[derive(Component)]
struct ParticleVisual {
    body: BodyId,
    index: usize,
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut state: ResMut<SimState>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(4.0, 3.5, 6.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight::default(),
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));

    let slab = TriMesh::cuboid(Vec3::new(-3.0, -0.4, -3.0), Vec3::new(3.0, 0.0, 3.0));
    match RigidBody::from_mesh(&slab, VOXEL_SIZE, 0.2) {
        Ok(body) => {
            state.add_rigid_body(body);
        }
        Err(error) => error!("slab voxelization failed: {error}"),
    }

    let cube = TriMesh::cuboid(Vec3::splat(-0.5), Vec3::splat(0.5));
    let mut rng = rand::rng();
    let presets = [MaterialParams::squishy(), MaterialParams::firm()];
    let colors = [
        Color::srgb(0.9, 0.4, 0.3),
        Color::srgb(0.3, 0.5, 0.9),
    ];

    for (slot, material) in presets.into_iter().enumerate() {
        let mut body = match SoftBody::from_mesh(&cube, VOXEL_SIZE, material) {
            Ok(body) => body,
            Err(error) => {
                error!("cube voxelization failed: {error}");
                continue;
            }
        };
        body.set_transform(Transform::from_xyz(
            slot as f32 * 1.4 - 0.7,
            2.0 + slot as f32 * 0.8,
            0.0,
        ));
        for particle in body.particles_mut() {
            particle.velocity = Vec3::new(
                rng.random_range(-0.2..0.2),
                0.0,
                rng.random_range(-0.2..0.2),
            );
        }
        let count = body.particles().len();
        let id = state.add_soft_body(body);

        let sphere = meshes.add(Sphere::new(VOXEL_SIZE * 0.45));
        let color = materials.add(colors[slot]);
        for index in 0..count {
            commands.spawn((
                ParticleVisual { body: id, index },
                Mesh3d(sphere.clone()),
                MeshMaterial3d(color.clone()),
                Transform::default(),
            ));
        }
    }
}

fn sync_visuals(
    state: Res<SimState>,
    mut visuals: Query<(&ParticleVisual, &mut Transform)>,
) {
    for (visual, mut transform) in &mut visuals {
        if let Some(body) = state.soft_body(visual.body) {
            if let Some(position) = body.world_positions().nth(visual.index) {
                transform.translation = position;
            }
        }
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(SoftVoxPlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, sync_visuals.after(softvox::advance_simulation))
        .run();
}
