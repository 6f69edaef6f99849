use std::path::Path;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use atomix_batch::api::{OutputTarget, run_batch};
use atomix_batch::io::MakeProject;
use atomix_batch::{RawOptions, resolve};

use super::args::{CliArgs, Command};
use super::errors::AppError;

/// INFO by default, DEBUG with `--log`; `RUST_LOG` overrides both. Logs go to
/// stderr so stdout only carries solver output.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_preset(path: Option<&Path>) -> Result<RawOptions, AppError> {
    let Some(path) = path else {
        return Ok(RawOptions::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| AppError::PresetRead {
        path: path.to_path_buf(),
        source,
    })?;
    let preset = serde_json::from_str(&text).map_err(|source| AppError::PresetParse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded option preset from {:?}", path);
    Ok(preset)
}

pub fn run(args: CliArgs) -> Result<(), AppError> {
    init_logging(args.log);

    let mut project = MakeProject::new(&args.solver_dir);

    if let Some(Command::Clean) = args.command {
        info!("Cleaning solver build in {:?}", project.dir());
        print!("{}", project.clean()?);
        return Ok(());
    }

    let pattern = args.input.clone().ok_or(AppError::MissingArgument {
        arg: "--in".to_string(),
    })?;

    let preset = load_preset(args.config.as_deref())?;
    let options = resolve(&args.raw_options(preset))?;
    if let Ok(json) = serde_json::to_string(&options) {
        debug!("Effective options: {}", json);
    }
    info!(
        "Invocation: {}",
        std::env::args().collect::<Vec<_>>().join(" ")
    );

    let target = OutputTarget::classify(args.out.as_deref())?;
    debug!("Output target: {:?}", target);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_batch(
        &pattern,
        &target,
        &options,
        args.overrideoutfiles,
        &mut project,
        &mut out,
    )?;

    Ok(())
}
