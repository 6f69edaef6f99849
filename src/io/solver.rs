//! Handle on the external solver project: where its configuration header
//! lives, how it is built and how the resulting binary is run.
//!
//! The project owns a single header and a single binary, so a batch borrows
//! the backend mutably for its whole duration and processes one instance at a
//! time.
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, info, warn};

use crate::core::artifact::ConfigurationArtifact;
use crate::error::{Error, Result};

pub const DEFAULT_SOLVER_DIR: &str = "src";
pub const ARTIFACT_FILE: &str = "Parameters.h";
pub const BINARY: &str = "./atomix";
const BUILD_TOOL: &str = "make";
const FAILURE_KEYWORD: &str = "failed";

/// Build settings passed through to the build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRequest {
    pub jobs: usize,
    /// Compile with `-DNDEBUG`
    pub ndebug: bool,
}

impl BuildRequest {
    /// `hint` when positive, otherwise half of the logical processors (at least one).
    pub fn new(hint: usize, ndebug: bool) -> Self {
        let jobs = if hint > 0 { hint } else { default_jobs() };
        Self { jobs, ndebug }
    }

    pub fn make_args(&self) -> Vec<String> {
        let mut args = vec!["-j".to_string(), self.jobs.to_string()];
        if self.ndebug {
            args.push("CFLAGS=-DNDEBUG".to_string());
        }
        args
    }
}

pub fn default_jobs() -> usize {
    let logical = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (logical / 2).max(1)
}

/// Captured result of one build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// `None` when the process was terminated without an exit code.
    pub code: Option<i32>,
    /// Standard output followed by standard error.
    pub log: String,
}

impl BuildOutput {
    fn from_output(output: &Output) -> Self {
        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&output.stderr));
        Self {
            code: output.status.code(),
            log,
        }
    }

    fn mentions_failure(&self) -> bool {
        self.log.to_lowercase().contains(FAILURE_KEYWORD)
    }

    /// Exit status decides; the keyword scan is only consulted when there is no exit code.
    pub fn failed(&self) -> bool {
        match self.code {
            Some(code) => code != 0,
            None => self.mentions_failure(),
        }
    }

    /// Successful exit status whose output still mentions a failure.
    pub fn suspicious(&self) -> bool {
        self.code == Some(0) && self.mentions_failure()
    }
}

/// Captured result of one solver execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverRun {
    pub code: Option<i32>,
    pub stdout: String,
}

impl SolverRun {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// The seam between the batch and the external solver project.
pub trait SolverBackend {
    /// Replace the configuration header read by the next build.
    fn write_artifact(&mut self, artifact: &ConfigurationArtifact) -> Result<()>;

    /// Rebuild the solver against the current header.
    fn build(&mut self, request: &BuildRequest) -> Result<BuildOutput>;

    /// Run the freshly built solver and capture its standard output.
    fn run(&mut self) -> Result<SolverRun>;
}

/// A make-based solver project directory.
#[derive(Debug, Clone)]
pub struct MakeProject {
    dir: PathBuf,
}

impl MakeProject {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join(ARTIFACT_FILE)
    }

    /// Run `make clean` and return what it printed.
    pub fn clean(&self) -> Result<String> {
        let output = self.invoke(BUILD_TOOL, &["clean".to_string()])?;
        let build = BuildOutput::from_output(&output);
        if build.failed() {
            return Err(Error::BuildFailed { output: build.log });
        }
        Ok(build.log)
    }

    fn invoke(&self, program: &str, args: &[String]) -> Result<Output> {
        debug!("Running {} {} in {:?}", program, args.join(" "), self.dir);
        Command::new(program)
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(|e| Error::external_process(program, e))
    }
}

impl SolverBackend for MakeProject {
    fn write_artifact(&mut self, artifact: &ConfigurationArtifact) -> Result<()> {
        let path = self.artifact_path();
        artifact.write_to(&path)?;
        debug!("Wrote {:?}", path);
        Ok(())
    }

    fn build(&mut self, request: &BuildRequest) -> Result<BuildOutput> {
        let args = request.make_args();
        info!("{} {}", BUILD_TOOL, args.join(" "));
        let output = self.invoke(BUILD_TOOL, &args)?;
        Ok(BuildOutput::from_output(&output))
    }

    fn run(&mut self) -> Result<SolverRun> {
        let output = self.invoke(BINARY, &[])?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!("Solver stderr: {}", stderr.trim_end());
        }
        Ok(SolverRun {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
