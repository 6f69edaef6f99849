//! Crate-level error type and `Result` alias.
//! Configuration errors are raised before any side effect; instance-level
//! parse errors are wrapped from [`crate::io::InstanceError`]; external build
//! and run failures carry enough context to report them to the operator.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No input instances found for pattern: {pattern}")]
    NoMatchingInstances { pattern: String },

    #[error("An input file does not exist, or is not a valid file: {}", .path.display())]
    InvalidInstancePath { path: PathBuf },

    #[error("Invalid input pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("{heuristic} heuristic only admits IDA* or Layered A* as algorithm, got {algorithm}")]
    InvalidOptionCombination {
        heuristic: &'static str,
        algorithm: &'static str,
    },

    #[error("Unknown value for --{category}: {alias}")]
    UnknownAlias {
        category: &'static str,
        alias: String,
    },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Malformed instance: {0}")]
    MalformedInstance(#[from] crate::io::InstanceError),

    #[error("Solver build failed:\n{output}")]
    BuildFailed { output: String },

    #[error("Solver exited with {}", describe_exit(.code))]
    SolverFailed { code: Option<i32> },

    #[error("Could not invoke {program}: {source}")]
    ExternalProcess {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

impl Error {
    pub fn external_process(program: impl Into<String>, source: std::io::Error) -> Self {
        Error::ExternalProcess {
            program: program.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_failure_shows_the_raw_log() {
        let err = Error::BuildFailed {
            output: "g++ -c main.cpp\nmain.cpp:1: error\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Solver build failed:\ng++ -c main.cpp\nmain.cpp:1: error\n"
        );
    }

    #[test]
    fn solver_exit_is_described() {
        assert_eq!(
            Error::SolverFailed { code: Some(3) }.to_string(),
            "Solver exited with status 3"
        );
        assert_eq!(
            Error::SolverFailed { code: None }.to_string(),
            "Solver exited with a signal"
        );
    }
}
