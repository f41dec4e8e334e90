pub mod constants;
pub mod solver_params;

pub use solver_params::SolverParams;
