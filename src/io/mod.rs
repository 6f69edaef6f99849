//! I/O layer: the level-file reader and the handle on the external solver
//! project (configuration header, build and run).
pub mod instance;
pub use instance::{InstanceDescriptor, InstanceError, parse_instance, parse_instance_str};

pub mod solver;
pub use solver::{BuildOutput, BuildRequest, MakeProject, SolverBackend, SolverRun};
