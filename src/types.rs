//! This module defines the core data structures and types used throughout the simulator,
//! including tape symbols, head directions, transition records, machine definitions and
//! error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::table::TransitionTable;

/// The glyph used to render a blank tape cell.
pub const BLANK_GLYPH: char = '□';
/// The glyph used to render an empty memory register.
pub const EMPTY_MEMORY_GLYPH: char = '∅';
/// The default number of successful steps a single run may execute.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// A tape (or memory) symbol.
///
/// Absence of a symbol is the blank, which is a value of its own rather than a missing one,
/// so every read and write site has to handle it explicitly.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<char>", into = "Option<char>")]
pub enum Symbol {
    /// The designated "no symbol present" value.
    #[default]
    Blank,
    /// A concrete alphabet character.
    Char(char),
}

impl Symbol {
    /// Returns `true` if this is the blank symbol.
    pub fn is_blank(self) -> bool {
        matches!(self, Symbol::Blank)
    }

    /// Returns the single glyph used to render this symbol on a tape.
    pub fn glyph(self) -> char {
        match self {
            Symbol::Blank => BLANK_GLYPH,
            Symbol::Char(c) => c,
        }
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::Char(c)
    }
}

impl From<Option<char>> for Symbol {
    fn from(value: Option<char>) -> Self {
        value.map_or(Symbol::Blank, Symbol::Char)
    }
}

impl From<Symbol> for Option<char> {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::Blank => None,
            Symbol::Char(c) => Some(c),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Represents the possible directions the head can move after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left (clamped at cell 0).
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl FromStr for Direction {
    type Err = MachineError;

    /// Parses the displacement notation used in machine files: `L`, `R`, `S`
    /// (case-insensitive) or the full `Left`, `Right`, `Stay`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Ok(Direction::Left),
            "r" | "right" => Ok(Direction::Right),
            "s" | "stay" => Ok(Direction::Stay),
            other => Err(MachineError::ValidationError(format!(
                "Invalid tape displacement '{}', expected one of L, R, S",
                other
            ))),
        }
    }
}

/// A single transition rule.
///
/// When the machine is in `state`, holds `memory` in its register and reads `read` under
/// the head, it writes `write`, stores `next_memory`, enters `next_state` and moves the
/// head in `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub state: String,
    pub memory: Symbol,
    pub read: Symbol,
    pub next_state: String,
    pub next_memory: Symbol,
    pub write: Symbol,
    pub direction: Direction,
}

/// Everything the execution engine needs to know about a machine.
///
/// The transition table is immutable once built and is shared behind an [`Arc`], so
/// cloning a definition (or handing it to several engines) never copies the rules.
#[derive(Debug, Clone)]
pub struct MachineDefinition {
    /// A human readable name, taken from the machine file when present.
    pub name: String,
    /// The declared state labels.
    pub states: Vec<String>,
    /// The state every run starts in.
    pub initial_state: String,
    /// The single accepting state.
    pub final_state: String,
    /// The declared tape alphabet; the blank is listed as [`Symbol::Blank`].
    pub alphabet: Vec<Symbol>,
    /// The transition rules.
    pub table: Arc<TransitionTable>,
}

impl MachineDefinition {
    /// Builds a definition, inserting `transitions` into a fresh table in order.
    pub fn new(
        name: impl Into<String>,
        states: Vec<String>,
        initial_state: impl Into<String>,
        final_state: impl Into<String>,
        alphabet: Vec<Symbol>,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Self {
        Self {
            name: name.into(),
            states,
            initial_state: initial_state.into(),
            final_state: final_state.into(),
            alphabet,
            table: Arc::new(TransitionTable::new(transitions)),
        }
    }

    /// Returns the blank symbol of this machine.
    ///
    /// Machines have no way to redefine the blank: a declared blank in the alphabet and an
    /// undeclared one are the same universal [`Symbol::Blank`].
    pub fn blank(&self) -> Symbol {
        Symbol::Blank
    }
}

/// Represents the errors that can occur while loading a machine.
///
/// The execution engine itself never fails: a missing transition is a normal halt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates that a machine file is not valid YAML or lacks a required key.
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
    /// Indicates a value that is well-formed YAML but cannot describe a machine.
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}
