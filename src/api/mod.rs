//! High-level batch API: expand a glob into level files, decide where each
//! solver report goes, and drive header -> build -> run for every instance.
//!
//! Instances are processed strictly one after another. The solver project has
//! a single configuration header and a single binary, which is why the backend
//! is borrowed mutably for the whole batch.
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::core::artifact::emit;
use crate::core::params::RunOptions;
use crate::core::resolve::check_compatibility;
use crate::error::{Error, Result};
use crate::io::solver::{BuildRequest, SolverBackend};
use crate::io::parse_instance;
use crate::types::AliasTable;

pub const INSTANCE_SUFFIX: &str = ".in";
pub const OUTPUT_SUFFIX: &str = ".out";

/// Where solver reports go, decided once from the `--out` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// An existing file shared by every instance of the batch.
    ExplicitFile(PathBuf),
    /// An existing directory; each instance writes `<stem>.out` into it.
    DirectoryDerived(PathBuf),
    /// No usable target; the solver decides.
    Unspecified,
}

impl OutputTarget {
    /// Classify the user-supplied output argument. Paths are made absolute
    /// because the solver runs from its own project directory.
    pub fn classify(arg: Option<&Path>) -> Result<Self> {
        let Some(path) = arg else {
            return Ok(OutputTarget::Unspecified);
        };
        if path.as_os_str().is_empty() {
            return Ok(OutputTarget::Unspecified);
        }
        if path.is_file() {
            Ok(OutputTarget::ExplicitFile(std::path::absolute(path)?))
        } else if path.is_dir() {
            Ok(OutputTarget::DirectoryDerived(std::path::absolute(path)?))
        } else {
            warn!(
                "Output path {:?} is neither a file nor a directory; leaving output to the solver",
                path
            );
            Ok(OutputTarget::Unspecified)
        }
    }

    /// Output destination for `input`, if any.
    pub fn destination(&self, input: &Path) -> Option<PathBuf> {
        match self {
            OutputTarget::ExplicitFile(file) => Some(file.clone()),
            OutputTarget::DirectoryDerived(dir) => Some(dir.join(derived_file_name(input))),
            OutputTarget::Unspecified => None,
        }
    }
}

/// `foo.in` -> `foo.out`.
fn derived_file_name(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(INSTANCE_SUFFIX).unwrap_or(&name);
    format!("{stem}{OUTPUT_SUFFIX}")
}

/// What to do about an output file left over from an earlier run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Proceed,
    Replace,
    Skip,
}

/// One input file with its resolved destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub collision: Collision,
}

impl BatchItem {
    /// Only per-instance (directory-derived) outputs are subject to the
    /// collision policy; an explicit file is shared on purpose.
    pub fn plan(input: PathBuf, target: &OutputTarget, override_existing: bool) -> Self {
        let output = target.destination(&input);
        let collision = match (target, &output) {
            (OutputTarget::DirectoryDerived(_), Some(out)) if out.is_file() => {
                if override_existing {
                    Collision::Replace
                } else {
                    Collision::Skip
                }
            }
            _ => Collision::Proceed,
        };
        Self {
            input,
            output,
            collision,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Expand `pattern` and keep the level files, in expansion order.
pub fn collect_instances(pattern: &str) -> Result<Vec<PathBuf>> {
    let invalid = |reason: String| Error::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    };

    let mut instances = Vec::new();
    for entry in glob::glob(pattern).map_err(|e| invalid(e.to_string()))? {
        let path = entry.map_err(|e| invalid(e.to_string()))?;
        if path.to_string_lossy().ends_with(INSTANCE_SUFFIX) {
            instances.push(path);
        }
    }

    if let Some(bad) = instances.iter().find(|p| !p.is_file()) {
        return Err(Error::InvalidInstancePath { path: bad.clone() });
    }
    if instances.is_empty() {
        return Err(Error::NoMatchingInstances {
            pattern: pattern.to_string(),
        });
    }
    Ok(instances)
}

/// Parse, configure, build and (unless build-only) run a single planned item.
/// Solver output is written to `out` verbatim.
pub fn process_instance<S, W>(
    item: &BatchItem,
    options: &RunOptions,
    build: &BuildRequest,
    solver: &mut S,
    out: &mut W,
) -> Result<()>
where
    S: SolverBackend + ?Sized,
    W: Write + ?Sized,
{
    let instance = parse_instance(&item.input)?;

    if let (Collision::Replace, Some(existing)) = (item.collision, &item.output) {
        std::fs::remove_file(existing)?;
        info!("Removed existing output file {:?}", existing);
    }

    let artifact = emit(&instance, options, item.output.as_deref());
    solver.write_artifact(&artifact)?;

    let outcome = solver.build(build)?;
    if outcome.failed() {
        error!("Build failed while preparing {:?}", item.input);
        return Err(Error::BuildFailed {
            output: outcome.log,
        });
    }
    if outcome.suspicious() {
        warn!("Build succeeded but its output mentions a failure; continuing");
    }
    debug!("Build output:\n{}", outcome.log);

    if options.build_only {
        info!("Successful build");
        return Ok(());
    }

    let run = solver.run()?;
    out.write_all(run.stdout.as_bytes())?;
    out.flush()?;
    if !run.success() {
        return Err(Error::SolverFailed { code: run.code });
    }
    Ok(())
}

/// Run every instance matching `pattern`.
///
/// Fails before touching anything when no instance matches, when a match is
/// not a regular file, or when `options` are incompatible. An instance whose
/// output already exists is skipped unless `override_existing` is set; a
/// malformed level file is logged and counted, and the batch moves on. Build,
/// spawn and solver failures stop the whole batch.
pub fn run_batch<S, W>(
    pattern: &str,
    target: &OutputTarget,
    options: &RunOptions,
    override_existing: bool,
    solver: &mut S,
    out: &mut W,
) -> Result<BatchReport>
where
    S: SolverBackend + ?Sized,
    W: Write + ?Sized,
{
    let instances = collect_instances(pattern)?;
    check_compatibility(options)?;

    info!(
        "Found {} instance(s); algorithm {}, heuristic {}, tie breaking {}, PDB {}",
        instances.len(),
        options.algorithm.label(),
        options.heuristic.label(),
        options.tie_breaking.label(),
        options.pdb.label()
    );

    let build = BuildRequest::new(options.jobs, options.ndebug);
    let mut report = BatchReport::default();

    for input in instances {
        let item = BatchItem::plan(input, target, override_existing);
        if item.collision == Collision::Skip {
            warn!(
                "Ignoring input file {:?} because output file {:?} already exists",
                item.input,
                item.output.as_deref().unwrap_or(Path::new(""))
            );
            report.skipped += 1;
            continue;
        }

        info!("Processing: {:?} -> {:?}", item.input, item.output);
        match process_instance(&item, options, &build, solver, out) {
            Ok(()) => report.processed += 1,
            Err(Error::MalformedInstance(e)) => {
                error!("Skipping {:?}: {}", item.input, e);
                report.errors += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!("Batch processing complete!");
    info!("Processed: {}", report.processed);
    info!("Skipped: {}", report.skipped);
    info!("Errors: {}", report.errors);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::artifact::ConfigurationArtifact;
    use crate::io::solver::{BuildOutput, SolverRun};
    use crate::types::{Algorithm, Heuristic};
    use tempfile::TempDir;

    const LEVEL: &str = "sample\n2\n2 2\nAA\nBB\n1 1\nA\n1\n0\n";

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Artifact(String),
        Build(BuildRequest),
        Run,
    }

    #[derive(Default)]
    struct FakeSolver {
        calls: Vec<Call>,
        fail_build: bool,
        exit_code: i32,
        runs: usize,
    }

    impl FakeSolver {
        fn artifacts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Artifact(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, call: fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| call(c)).count()
        }
    }

    impl SolverBackend for FakeSolver {
        fn write_artifact(&mut self, artifact: &ConfigurationArtifact) -> Result<()> {
            self.calls.push(Call::Artifact(artifact.text().to_string()));
            Ok(())
        }

        fn build(&mut self, request: &BuildRequest) -> Result<BuildOutput> {
            self.calls.push(Call::Build(*request));
            Ok(BuildOutput {
                code: Some(if self.fail_build { 2 } else { 0 }),
                log: String::new(),
            })
        }

        fn run(&mut self) -> Result<SolverRun> {
            self.calls.push(Call::Run);
            self.runs += 1;
            Ok(SolverRun {
                code: Some(self.exit_code),
                stdout: format!("solution {}\n", self.runs),
            })
        }
    }

    fn levels(names: &[(&str, &str)]) -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        for (name, text) in names {
            std::fs::write(dir.path().join(name), text).unwrap();
        }
        let pattern = dir.path().join("*.in").to_string_lossy().into_owned();
        (dir, pattern)
    }

    fn options() -> RunOptions {
        RunOptions {
            jobs: 3,
            ..RunOptions::default()
        }
    }

    #[test]
    fn classify_distinguishes_file_dir_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.out");
        std::fs::write(&file, "").unwrap();

        assert_eq!(OutputTarget::classify(None).unwrap(), OutputTarget::Unspecified);
        assert_eq!(
            OutputTarget::classify(Some(Path::new(""))).unwrap(),
            OutputTarget::Unspecified
        );
        assert_eq!(
            OutputTarget::classify(Some(file.as_path())).unwrap(),
            OutputTarget::ExplicitFile(file.clone())
        );
        assert_eq!(
            OutputTarget::classify(Some(dir.path())).unwrap(),
            OutputTarget::DirectoryDerived(dir.path().to_path_buf())
        );
        assert_eq!(
            OutputTarget::classify(Some(dir.path().join("nope").as_path())).unwrap(),
            OutputTarget::Unspecified
        );
    }

    #[test]
    fn derived_destination_swaps_suffix() {
        let target = OutputTarget::DirectoryDerived(PathBuf::from("/results"));
        assert_eq!(
            target.destination(Path::new("Levels/atomix_01.in")),
            Some(PathBuf::from("/results/atomix_01.out"))
        );
        assert_eq!(
            target.destination(Path::new("a.input.in")),
            Some(PathBuf::from("/results/a.input.out"))
        );
        assert_eq!(OutputTarget::Unspecified.destination(Path::new("a.in")), None);
    }

    #[test]
    fn explicit_file_is_never_a_collision() {
        let target = OutputTarget::ExplicitFile(PathBuf::from("/tmp/shared.out"));
        let item = BatchItem::plan(PathBuf::from("a.in"), &target, false);
        assert_eq!(item.collision, Collision::Proceed);
        assert_eq!(item.output, Some(PathBuf::from("/tmp/shared.out")));
    }

    #[test]
    fn directory_at_derived_path_is_not_a_collision() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a.out")).unwrap();
        let target = OutputTarget::DirectoryDerived(dir.path().to_path_buf());
        let item = BatchItem::plan(PathBuf::from("a.in"), &target, false);
        assert_eq!(item.collision, Collision::Proceed);
    }

    #[test]
    fn collect_keeps_only_level_files() {
        let (dir, _) = levels(&[("b.in", LEVEL), ("a.in", LEVEL), ("notes.txt", "")]);
        let pattern = dir.path().join("*").to_string_lossy().into_owned();
        let found = collect_instances(&pattern).unwrap();
        assert_eq!(found, vec![dir.path().join("a.in"), dir.path().join("b.in")]);
    }

    #[test]
    fn collect_rejects_directories_named_like_levels() {
        let (dir, pattern) = levels(&[("a.in", LEVEL)]);
        std::fs::create_dir(dir.path().join("b.in")).unwrap();
        assert!(matches!(
            collect_instances(&pattern).unwrap_err(),
            Error::InvalidInstancePath { .. }
        ));
    }

    #[test]
    fn collect_rejects_bad_patterns() {
        assert!(matches!(
            collect_instances("Levels/[").unwrap_err(),
            Error::InvalidPattern { .. }
        ));
    }

    #[test]
    fn empty_match_builds_nothing() {
        let (_dir, pattern) = levels(&[("readme.txt", "")]);
        let mut solver = FakeSolver::default();
        let err = run_batch(
            &pattern,
            &OutputTarget::Unspecified,
            &options(),
            false,
            &mut solver,
            &mut std::io::sink(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoMatchingInstances { .. }));
        assert!(solver.calls.is_empty());
    }

    #[test]
    fn incompatible_options_touch_nothing() {
        let (_dir, pattern) = levels(&[("a.in", LEVEL)]);
        let mut solver = FakeSolver::default();
        let opts = RunOptions {
            algorithm: Algorithm::AStar,
            heuristic: Heuristic::OneFinalState,
            ..options()
        };
        let err = run_batch(
            &pattern,
            &OutputTarget::Unspecified,
            &opts,
            false,
            &mut solver,
            &mut std::io::sink(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidOptionCombination { .. }));
        assert!(solver.calls.is_empty());
    }

    #[test]
    fn runs_each_instance_and_relays_output() {
        let (_dir, pattern) = levels(&[("a.in", LEVEL), ("b.in", LEVEL)]);
        let mut solver = FakeSolver::default();
        let mut out: Vec<u8> = Vec::new();
        let report = run_batch(
            &pattern,
            &OutputTarget::Unspecified,
            &options(),
            false,
            &mut solver,
            &mut out,
        )
        .unwrap();

        assert_eq!(report, BatchReport { processed: 2, skipped: 0, errors: 0 });
        assert_eq!(String::from_utf8(out).unwrap(), "solution 1\nsolution 2\n");
        let request = BuildRequest { jobs: 3, ndebug: false };
        assert_eq!(solver.calls.len(), 6);
        assert_eq!(solver.calls[1], Call::Build(request));
        assert_eq!(solver.calls[2], Call::Run);
        let artifacts = solver.artifacts();
        assert!(artifacts[0].contains("a.in\""));
        assert!(artifacts[1].contains("b.in\""));
    }

    #[test]
    fn existing_output_is_skipped_without_override() {
        let (dir, pattern) = levels(&[("a.in", LEVEL), ("b.in", LEVEL)]);
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        std::fs::write(out_dir.join("a.out"), "old").unwrap();
        let target = OutputTarget::classify(Some(out_dir.as_path())).unwrap();

        let mut solver = FakeSolver::default();
        let report =
            run_batch(&pattern, &target, &options(), false, &mut solver, &mut std::io::sink()).unwrap();

        assert_eq!(report, BatchReport { processed: 1, skipped: 1, errors: 0 });
        let artifacts = solver.artifacts();
        assert_eq!(artifacts.len(), 1);
        assert!(artifacts[0].contains("b.out\""));
        assert_eq!(solver.count(|c| matches!(c, Call::Build(_))), 1);
        assert_eq!(std::fs::read_to_string(out_dir.join("a.out")).unwrap(), "old");
    }

    #[test]
    fn existing_output_is_removed_with_override() {
        let (dir, pattern) = levels(&[("a.in", LEVEL)]);
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();
        std::fs::write(out_dir.join("a.out"), "old").unwrap();
        let target = OutputTarget::classify(Some(out_dir.as_path())).unwrap();

        let mut solver = FakeSolver::default();
        let report =
            run_batch(&pattern, &target, &options(), true, &mut solver, &mut std::io::sink()).unwrap();

        assert_eq!(report.processed, 1);
        assert!(!out_dir.join("a.out").exists());
        assert_eq!(solver.count(|c| matches!(c, Call::Run)), 1);
    }

    #[test]
    fn explicit_file_is_shared_by_every_instance() {
        let (dir, pattern) = levels(&[("a.in", LEVEL), ("b.in", LEVEL)]);
        let shared = dir.path().join("all.txt");
        std::fs::write(&shared, "old").unwrap();
        let target = OutputTarget::classify(Some(shared.as_path())).unwrap();

        let mut solver = FakeSolver::default();
        let report =
            run_batch(&pattern, &target, &options(), false, &mut solver, &mut std::io::sink()).unwrap();

        assert_eq!(report, BatchReport { processed: 2, skipped: 0, errors: 0 });
        let line = format!("#define ParamOutputFile \"{}\"", shared.to_string_lossy());
        let artifacts = solver.artifacts();
        assert_eq!(artifacts.len(), 2);
        assert!(artifacts.iter().all(|a| a.lines().any(|l| l == line)));
        assert_eq!(std::fs::read_to_string(&shared).unwrap(), "old");
    }

    #[test]
    fn build_failure_stops_the_batch() {
        let (_dir, pattern) = levels(&[("a.in", LEVEL), ("b.in", LEVEL)]);
        let mut solver = FakeSolver {
            fail_build: true,
            ..FakeSolver::default()
        };
        let err = run_batch(
            &pattern,
            &OutputTarget::Unspecified,
            &options(),
            false,
            &mut solver,
            &mut std::io::sink(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::BuildFailed { .. }));
        assert_eq!(solver.artifacts().len(), 1);
        assert_eq!(solver.count(|c| matches!(c, Call::Run)), 0);
    }

    #[test]
    fn build_only_never_runs() {
        let (_dir, pattern) = levels(&[("a.in", LEVEL)]);
        let mut solver = FakeSolver::default();
        let mut out: Vec<u8> = Vec::new();
        let opts = RunOptions {
            build_only: true,
            ndebug: true,
            ..options()
        };
        run_batch(&pattern, &OutputTarget::Unspecified, &opts, false, &mut solver, &mut out)
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(
            solver.calls[1],
            Call::Build(BuildRequest { jobs: 3, ndebug: true })
        );
        assert_eq!(solver.count(|c| matches!(c, Call::Run)), 0);
    }

    #[test]
    fn malformed_instance_is_counted_and_skipped() {
        let (_dir, pattern) = levels(&[("a.in", "broken\n1\n3 3\n"), ("b.in", LEVEL)]);
        let mut solver = FakeSolver::default();
        let report = run_batch(
            &pattern,
            &OutputTarget::Unspecified,
            &options(),
            false,
            &mut solver,
            &mut std::io::sink(),
        )
        .unwrap();
        assert_eq!(report, BatchReport { processed: 1, skipped: 0, errors: 1 });
        assert_eq!(solver.artifacts().len(), 1);
    }

    #[test]
    fn solver_failure_relays_output_then_stops() {
        let (_dir, pattern) = levels(&[("a.in", LEVEL), ("b.in", LEVEL)]);
        let mut solver = FakeSolver {
            exit_code: 1,
            ..FakeSolver::default()
        };
        let mut out: Vec<u8> = Vec::new();
        let err = run_batch(
            &pattern,
            &OutputTarget::Unspecified,
            &options(),
            false,
            &mut solver,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, Error::SolverFailed { code: Some(1) }));
        assert_eq!(String::from_utf8(out).unwrap(), "solution 1\n");
        assert_eq!(solver.runs, 1);
    }
}
