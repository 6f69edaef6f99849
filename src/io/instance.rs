//! Reader for Atomix level files (`*.in`).
//!
//! The format is purely positional: there are no delimiters or length
//! prefixes, every field's line is derived from the dimensions read before it.
//!
//! ```text
//! <name>
//! <number of atoms>
//! <board width> <board height>
//! <board row 1>
//! ...                      (board height rows)
//! <mole width> <mole height>
//! <mole row 1>
//! ...                      (mole height rows)
//! <number of final states>
//! <number of free positions>
//! ```
//!
//! The reader checks that enough lines remain before it reads each block, so a
//! short file is reported at the line that is missing instead of silently
//! shifting every later field.
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: expected {expected} at line {line}, but the file has only {available} lines", .path.display())]
    Truncated {
        path: PathBuf,
        expected: &'static str,
        line: usize,
        available: usize,
    },

    #[error("{}:{line}: {field} must be {kind}, got {value:?}", .path.display())]
    BadNumber {
        path: PathBuf,
        line: usize,
        field: &'static str,
        kind: NumberKind,
        value: String,
    },

    #[error("{}:{line}: {block} row has {actual} cells, expected {expected}", .path.display())]
    RowWidth {
        path: PathBuf,
        line: usize,
        block: &'static str,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Positive,
    NonNegative,
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberKind::Positive => write!(f, "a positive integer"),
            NumberKind::NonNegative => write!(f, "a non-negative integer"),
        }
    }
}

/// One parsed level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescriptor {
    /// Path the level was read from.
    pub source: PathBuf,
    pub name: String,
    pub num_atoms: u32,
    pub board_width: u32,
    pub board_height: u32,
    /// Row-major board cells, `board_width * board_height` characters.
    pub board: String,
    pub mole_width: u32,
    pub mole_height: u32,
    /// Row-major target pattern, `mole_width * mole_height` characters.
    pub mole: String,
    pub num_final_states: u32,
    pub num_free_positions: u32,
}

impl InstanceDescriptor {
    pub fn board_size(&self) -> u64 {
        u64::from(self.board_width) * u64::from(self.board_height)
    }

    pub fn mole_size(&self) -> u64 {
        u64::from(self.mole_width) * u64::from(self.mole_height)
    }
}

/// Read and parse the level file at `path`.
pub fn parse_instance(path: &Path) -> Result<InstanceDescriptor, InstanceError> {
    let text = std::fs::read_to_string(path).map_err(|source| InstanceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_instance_str(path, &text)
}

/// Parse level text that was already loaded; `source` is only used for
/// diagnostics and is stored on the descriptor.
pub fn parse_instance_str(source: &Path, text: &str) -> Result<InstanceDescriptor, InstanceError> {
    let lines: Vec<&str> = text.lines().collect();
    let cursor = Cursor {
        source,
        lines: &lines,
    };

    // Header: name, atoms, board dimensions.
    cursor.require(3, "the board dimensions")?;
    let name = strip_cr(lines[0]);
    let num_atoms = cursor.number(1, "number of atoms", NumberKind::Positive)?;
    let (board_width, board_height) = cursor.dimensions(2, ("board width", "board height"))?;

    let board_start = 3;
    let mole_header = board_start + board_height as usize;
    cursor.require(mole_header + 1, "the mole dimensions")?;
    let board = cursor.block(board_start, board_width, board_height, "board")?;

    let (mole_width, mole_height) = cursor.dimensions(mole_header, ("mole width", "mole height"))?;
    let mole_start = mole_header + 1;
    let final_states_line = mole_start + mole_height as usize;
    cursor.require(final_states_line + 2, "the final state and free position counts")?;
    let mole = cursor.block(mole_start, mole_width, mole_height, "mole")?;

    let num_final_states =
        cursor.number(final_states_line, "number of final states", NumberKind::NonNegative)?;
    let num_free_positions = cursor.number(
        final_states_line + 1,
        "number of free positions",
        NumberKind::NonNegative,
    )?;

    debug!(
        "Parsed {:?}: board {}x{}, mole {}x{}, {} atoms",
        source, board_width, board_height, mole_width, mole_height, num_atoms
    );

    Ok(InstanceDescriptor {
        source: source.to_path_buf(),
        name,
        num_atoms,
        board_width,
        board_height,
        board,
        mole_width,
        mole_height,
        mole,
        num_final_states,
        num_free_positions,
    })
}

fn strip_cr(line: &str) -> String {
    line.chars().filter(|c| *c != '\r').collect()
}

/// Line-indexed view over the file. Indices are 0-based; errors report 1-based lines.
struct Cursor<'a> {
    source: &'a Path,
    lines: &'a [&'a str],
}

impl Cursor<'_> {
    fn require(&self, count: usize, expected: &'static str) -> Result<(), InstanceError> {
        if self.lines.len() < count {
            return Err(InstanceError::Truncated {
                path: self.source.to_path_buf(),
                expected,
                line: count,
                available: self.lines.len(),
            });
        }
        Ok(())
    }

    fn parse_token(
        &self,
        index: usize,
        token: &str,
        field: &'static str,
        kind: NumberKind,
    ) -> Result<u32, InstanceError> {
        let bad = || InstanceError::BadNumber {
            path: self.source.to_path_buf(),
            line: index + 1,
            field,
            kind,
            value: token.to_string(),
        };
        let value: u32 = token.parse().map_err(|_| bad())?;
        if kind == NumberKind::Positive && value == 0 {
            return Err(bad());
        }
        Ok(value)
    }

    fn number(
        &self,
        index: usize,
        field: &'static str,
        kind: NumberKind,
    ) -> Result<u32, InstanceError> {
        self.parse_token(index, self.lines[index].trim(), field, kind)
    }

    fn dimensions(
        &self,
        index: usize,
        fields: (&'static str, &'static str),
    ) -> Result<(u32, u32), InstanceError> {
        let mut tokens = self.lines[index].split_whitespace();
        let width = self.parse_token(index, tokens.next().unwrap_or(""), fields.0, NumberKind::Positive)?;
        let height =
            self.parse_token(index, tokens.next().unwrap_or(""), fields.1, NumberKind::Positive)?;
        Ok((width, height))
    }

    /// Concatenate `height` rows starting at `start`; every row must be exactly `width` cells.
    fn block(
        &self,
        start: usize,
        width: u32,
        height: u32,
        block: &'static str,
    ) -> Result<String, InstanceError> {
        let width = width as usize;
        let mut cells = String::new();
        for index in start..start + height as usize {
            let row = strip_cr(self.lines[index]);
            let actual = row.chars().count();
            if actual != width {
                return Err(InstanceError::RowWidth {
                    path: self.source.to_path_buf(),
                    line: index + 1,
                    block,
                    expected: width,
                    actual,
                });
            }
            cells.push_str(&row);
        }
        Ok(cells)
    }
}
