//! Renders the solver's compile-time configuration (`Parameters.h`).
//!
//! The header is a pure projection of one instance, the batch options and the
//! resolved output path. Nothing else (time, environment, previous runs) leaks
//! into it, so identical inputs always produce identical bytes.
use std::path::Path;

use crate::core::params::RunOptions;
use crate::io::InstanceDescriptor;
use crate::types::AliasTable;

/// Directory prefix stripped from instance paths before they are embedded.
pub const LEVELS_DIR: &str = "Levels";

/// Rendered `Parameters.h` contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationArtifact {
    text: String,
}

impl ConfigurationArtifact {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.as_bytes())
    }
}

/// Render the artifact for `instance`. `output` is the path the solver should
/// write its report to; `None` leaves that choice to the solver.
pub fn emit(
    instance: &InstanceDescriptor,
    options: &RunOptions,
    output: Option<&Path>,
) -> ConfigurationArtifact {
    let input = c_string(&display_instance_path(&instance.source));
    let output = output.map(|p| c_string(&portable(p))).unwrap_or_default();

    ConfigurationArtifact {
        text: render_header(instance, options, &input, &output),
    }
}

fn render_header(
    inst: &InstanceDescriptor,
    opts: &RunOptions,
    input: &str,
    output: &str,
) -> String {
    let lines = [
        "#pragma once".to_string(),
        "#include \"Definitions.h\"".to_string(),
        format!("#define InstanceName \"{input}\""),
        format!("#define NumAtoms {}", inst.num_atoms),
        format!("#define NumFinalStates {}", inst.num_final_states),
        format!("#define BoardWidth {}", inst.board_width),
        format!("#define BoardHeight {}", inst.board_height),
        format!("#define BoardSize {}", inst.board_size()),
        format!("#define MoleWidth {}", inst.mole_width),
        format!("#define MoleHeight {}", inst.mole_height),
        format!("#define MoleSize {}", inst.mole_size()),
        format!("#define NumFreePositions {}", inst.num_free_positions),
        String::new(),
        format!("const char ParamBoard[] = \"{}\";", c_string(&inst.board)),
        format!("const char ParamMole[] = \"{}\";", c_string(&inst.mole)),
        String::new(),
        "// Runtime parameters".to_string(),
        String::new(),
        format!("#define ParamInputFile \"{input}\""),
        format!("#define ParamOutputFile \"{output}\""),
        format!("#define ParamTimeLimit {}", opts.time_limit_secs),
        format!("#define ParamMemoryLimit {}", opts.memory_limit_mb),
        format!("#define ParamAlgorithm {}", opts.algorithm.symbol()),
        format!("#define ParamHeuristic {}", opts.heuristic.symbol()),
        format!("#define ParamTieBreaking {}", opts.tie_breaking.symbol()),
        format!("#define ParamPDB {}", opts.pdb.symbol()),
        format!("#define ParamSilent {}", opts.silent),
        format!("#define ParamPrintOutputPath {}", opts.print_path),
        format!("#define ParamPrintInitialHeuristic {}", opts.print_initial_heuristic),
        format!("#define ParamNumRandomStaticPDBs {}", opts.num_random_static_pdbs),
        format!("#define ParamRandomSeed {}", opts.seed),
        format!("#define ParamRandomStaticPDB {}", opts.random_static_pdb.symbol()),
    ];
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Instance path as the solver reports it: forward slashes, a leading
/// `Levels/` (optionally behind `./`) dropped.
fn display_instance_path(path: &Path) -> String {
    let path = path.strip_prefix(".").unwrap_or(path);
    portable(path.strip_prefix(LEVELS_DIR).unwrap_or(path))
}

fn portable(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Escape for use inside a C string literal.
fn c_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}
