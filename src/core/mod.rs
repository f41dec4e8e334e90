pub mod material;
pub mod particle;
pub mod rigid_body;
pub mod sim_state;
pub mod soft_body;
pub mod spring;

pub use material::{MaterialKind, MaterialParams};
pub use particle::Particle;
pub use rigid_body::RigidBody;
pub use sim_state::{Body, SimState};
pub use soft_body::SoftBody;
pub use spring::Spring;
