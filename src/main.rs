//! atomix-batch CLI entrypoint.
//!
//! Parse args, dispatch to the batch or `clean` mode, and exit with an
//! appropriate status. For programmatic use, prefer `atomix_batch::api`.

use clap::Parser;

mod cli;

fn main() {
    let args = cli::CliArgs::parse();
    if let Err(e) = cli::run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
