#![doc = r#"
atomix-batch prepares, builds and runs an external Atomix solver over a
batch of level files.

The search itself (A*, IDA*, PEA*, Layered A*, pattern databases) lives in a
separate C++ project that is configured at compile time through a generated
`Parameters.h`. This crate parses the level files, resolves the solver options,
renders that header, rebuilds the solver for every instance and relays what it
prints.

Quick start: run a batch
------------------------
```rust,no_run
use std::path::Path;
use atomix_batch::{api::{run_batch, OutputTarget}, io::MakeProject, resolve, RawOptions};

fn main() -> atomix_batch::Result<()> {
    let options = resolve(&RawOptions {
        alg: "ida".into(),
        heu: "ofs".into(),
        ..RawOptions::default()
    })?;
    let target = OutputTarget::classify(Some(Path::new("results")))?;
    let mut solver = MakeProject::new("src");

    let report = run_batch(
        "Levels/*.in",
        &target,
        &options,
        false, // keep existing outputs, skip their instances
        &mut solver,
        &mut std::io::stdout(),
    )?;
    println!("processed={} skipped={} errors={}", report.processed, report.skipped, report.errors);
    Ok(())
}
```

Render a header without building
--------------------------------
```rust,no_run
use std::path::Path;
use atomix_batch::{emit, parse_instance, RunOptions};

fn main() -> atomix_batch::Result<()> {
    let instance = parse_instance(Path::new("Levels/atomix_01.in"))?;
    let artifact = emit(&instance, &RunOptions::default(), None);
    print!("{}", artifact.text());
    Ok(())
}
```

Useful modules
--------------
- [`api`]: batch orchestration and output-path decisions.
- [`types`]: option enums and their alias tables.
- [`core`]: option resolution and header rendering.
- [`io`]: level-file reader and the solver project handle.
- [`error`]: crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

pub use crate::core::artifact::{ConfigurationArtifact, emit};
pub use crate::core::params::{RawOptions, RunOptions};
pub use crate::core::resolve::{check_compatibility, resolve};
pub use error::{Error, Result};
pub use io::{InstanceDescriptor, InstanceError, parse_instance, parse_instance_str};
pub use types::{AliasTable, Algorithm, Heuristic, PdbStrategy, RandomStaticPdb, TieBreaking};

pub use api::{BatchItem, BatchReport, Collision, OutputTarget, collect_instances, run_batch};
