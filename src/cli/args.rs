use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use atomix_batch::io::solver::DEFAULT_SOLVER_DIR;
use atomix_batch::types::{
    AliasTable, Algorithm, Heuristic, PdbStrategy, RandomStaticPdb, TieBreaking,
};
use atomix_batch::RawOptions;

#[derive(Parser)]
#[command(
    name = "atomix-batch",
    version,
    about = "Compute exact and heuristic solutions for Atomix",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input file or glob pattern (e.g. 'Levels/*.in')
    #[arg(short = 'i', long = "in", required = true)]
    pub input: Option<String>,

    /// Output file, or a directory receiving one `<level>.out` per instance
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Replace output files that already exist instead of skipping their instance
    #[arg(long, default_value_t = false)]
    pub overrideoutfiles: bool,

    /// Memory limit in MB [default: 500]
    #[arg(short, long)]
    pub memory: Option<u32>,

    /// Time limit in seconds [default: 30]
    #[arg(short, long)]
    pub time: Option<u32>,

    /// Search algorithm [default: peastar]
    #[arg(long, value_parser = PossibleValuesParser::new(Algorithm::aliases()))]
    pub alg: Option<String>,

    /// Heuristic [default: afs]
    #[arg(long, value_parser = PossibleValuesParser::new(Heuristic::aliases()))]
    pub heu: Option<String>,

    /// Tie breaking rule [default: gc]
    #[arg(long, value_parser = PossibleValuesParser::new(TieBreaking::aliases()))]
    pub tb: Option<String>,

    /// Pattern database [default: static]
    #[arg(long, value_parser = PossibleValuesParser::new(PdbStrategy::aliases()))]
    pub pdb: Option<String>,

    /// Random seed; negative lets the solver pick one [default: -1]
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Number of random static PDBs [default: 5]
    #[arg(long)]
    pub numstatic: Option<u32>,

    /// Randomization of static PDBs. 'greedy': random partitions minimizing
    /// inter-group distance; 'random': one greedy partition, the rest fully
    /// random [default: greedy]
    #[arg(long, value_parser = PossibleValuesParser::new(RandomStaticPdb::aliases()))]
    pub randomstatic: Option<String>,

    /// The solver will not print to stdout
    #[arg(long, default_value_t = false)]
    pub silent: bool,

    /// Print the solution path when one is found
    #[arg(long, default_value_t = false)]
    pub path: bool,

    /// Only print the initial heuristic value
    #[arg(long, default_value_t = false)]
    pub initial: bool,

    /// Only compile the solver, do not run it
    #[arg(long, default_value_t = false)]
    pub build: bool,

    /// Number of processors to build with [default: half of the logical processors]
    #[arg(long)]
    pub nproc: Option<usize>,

    /// Compile with NDEBUG defined
    #[arg(long, default_value_t = false)]
    pub ndebug: bool,

    /// Solver project directory (holds the Makefile and Parameters.h)
    #[arg(long, default_value = DEFAULT_SOLVER_DIR)]
    pub solver_dir: PathBuf,

    /// JSON preset with default option values; explicit flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Remove the solver's build products (`make clean`)
    Clean,
}

impl CliArgs {
    /// Layer the explicit flags over `preset`.
    pub fn raw_options(&self, preset: RawOptions) -> RawOptions {
        RawOptions {
            memory: self.memory.unwrap_or(preset.memory),
            time: self.time.unwrap_or(preset.time),
            alg: self.alg.clone().unwrap_or(preset.alg),
            heu: self.heu.clone().unwrap_or(preset.heu),
            tb: self.tb.clone().unwrap_or(preset.tb),
            pdb: self.pdb.clone().unwrap_or(preset.pdb),
            seed: self.seed.unwrap_or(preset.seed),
            numstatic: self.numstatic.unwrap_or(preset.numstatic),
            randomstatic: self.randomstatic.clone().unwrap_or(preset.randomstatic),
            silent: self.silent || preset.silent,
            path: self.path || preset.path,
            initial: self.initial || preset.initial,
            build: self.build || preset.build,
            ndebug: self.ndebug || preset.ndebug,
            nproc: self.nproc.unwrap_or(preset.nproc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("atomix-batch").chain(args.iter().copied()))
    }

    #[test]
    fn flags_override_preset() {
        let args = parse(&["-i", "Levels/*.in", "--alg", "ida", "--seed", "-3", "--path"]).unwrap();
        let preset = RawOptions {
            alg: "astar".into(),
            time: 90,
            silent: true,
            ..RawOptions::default()
        };
        let raw = args.raw_options(preset);
        assert_eq!(raw.alg, "ida");
        assert_eq!(raw.seed, -3);
        assert_eq!(raw.time, 90);
        assert!(raw.silent);
        assert!(raw.path);
        assert_eq!(raw.heu, "afs");
    }

    #[test]
    fn unknown_alias_is_rejected_at_parse_time() {
        assert!(parse(&["-i", "x.in", "--tb", "random"]).is_err());
        assert!(parse(&["-i", "x.in", "--alg", "AStar"]).is_err());
        assert!(parse(&["-i", "x.in", "--randomstatic", "random"]).is_ok());
    }

    #[test]
    fn input_is_required_outside_clean() {
        assert!(parse(&[]).is_err());
        let clean = parse(&["clean"]).unwrap();
        assert!(matches!(clean.command, Some(Command::Clean)));
        assert!(clean.input.is_none());
    }
}
