pub mod broad;
pub mod narrow;
pub mod registry;

pub use broad::sweep_pairs;
pub use narrow::resolve_pair;
pub use registry::{BodyId, CollisionObject, CollisionRegistry};
