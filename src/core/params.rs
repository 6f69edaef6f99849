use serde::{Deserialize, Serialize};

use crate::types::{Algorithm, Heuristic, PdbStrategy, RandomStaticPdb, TieBreaking};

/// Options as the user spelled them. Also the on-disk preset format, so every
/// field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOptions {
    /// Memory limit in MB
    pub memory: u32,
    /// Time limit in seconds
    pub time: u32,
    pub alg: String,
    pub heu: String,
    pub tb: String,
    pub pdb: String,
    /// Negative lets the solver pick a seed
    pub seed: i64,
    pub numstatic: u32,
    pub randomstatic: String,
    pub silent: bool,
    pub path: bool,
    pub initial: bool,
    pub build: bool,
    pub ndebug: bool,
    /// Build parallelism; 0 means half of the logical processors
    pub nproc: usize,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            memory: 500,
            time: 30,
            alg: "peastar".to_string(),
            heu: "afs".to_string(),
            tb: "gc".to_string(),
            pdb: "static".to_string(),
            seed: -1,
            numstatic: 5,
            randomstatic: "greedy".to_string(),
            silent: false,
            path: false,
            initial: false,
            build: false,
            ndebug: false,
            nproc: 0,
        }
    }
}

/// Canonical, validated options shared read-only by every instance of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    pub memory_limit_mb: u32,
    pub time_limit_secs: u32,
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,
    pub tie_breaking: TieBreaking,
    pub pdb: PdbStrategy,
    pub random_static_pdb: RandomStaticPdb,
    pub seed: i64,
    pub num_random_static_pdbs: u32,
    pub silent: bool,
    pub print_path: bool,
    pub print_initial_heuristic: bool,
    /// Compile only, never run the solver
    pub build_only: bool,
    pub jobs: usize,
    pub ndebug: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            memory_limit_mb: 500,
            time_limit_secs: 30,
            algorithm: Algorithm::PeaStar,
            heuristic: Heuristic::AllFinalStates,
            tie_breaking: TieBreaking::GoalCount,
            pdb: PdbStrategy::Static,
            random_static_pdb: RandomStaticPdb::Greedy,
            seed: -1,
            num_random_static_pdbs: 5,
            silent: false,
            print_path: false,
            print_initial_heuristic: false,
            build_only: false,
            jobs: 0,
            ndebug: false,
        }
    }
}
