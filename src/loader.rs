//! This module provides the `MachineLoader` struct, responsible for reading machine
//! descriptions from YAML documents and turning them into a [`MachineDefinition`] plus the
//! list of input strings to simulate.
//!
//! A machine file looks like this:
//!
//! ```yaml
//! name: Unary increment
//! q_states:
//!   q_list: [q0, qf]
//!   initial: q0
//!   final: qf
//! tape_alphabet: ["1", ~]
//! delta:
//!   - params: { initial_state: q0, tape_input: "1" }
//!     output: { final_state: q0, tape_output: "1", tape_displacement: R }
//!   - params: { initial_state: q0, tape_input: ~ }
//!     output: { final_state: qf, tape_output: "1", tape_displacement: S }
//! simulation_strings: ["11", ""]
//! ```
//!
//! Missing or null `mem_cache_value`, `tape_input` and `tape_output` values stand for the
//! blank symbol.

use crate::analyzer::analyze;
use crate::types::{Direction, MachineDefinition, MachineError, Symbol, Transition};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_NAME: &str = "Unnamed machine";

/// A scalar YAML value used where the machine expects text.
///
/// YAML reads `1` as a number and `yes` or `true` as a boolean; machine files are written by
/// hand, so those are accepted and turned back into their text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MachineFile {
    #[serde(default)]
    name: Option<String>,
    q_states: StatesSection,
    tape_alphabet: Vec<Option<Scalar>>,
    delta: Vec<DeltaEntry>,
    #[serde(default)]
    simulation_strings: Vec<Scalar>,
}

#[derive(Debug, Deserialize)]
struct StatesSection {
    q_list: Vec<Scalar>,
    initial: Scalar,
    #[serde(rename = "final")]
    final_state: Scalar,
}

#[derive(Debug, Deserialize)]
struct DeltaEntry {
    params: Params,
    output: Output,
}

#[derive(Debug, Deserialize)]
struct Params {
    initial_state: Scalar,
    #[serde(default)]
    mem_cache_value: Option<Scalar>,
    #[serde(default)]
    tape_input: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
struct Output {
    final_state: Scalar,
    #[serde(default)]
    mem_cache_value: Option<Scalar>,
    #[serde(default)]
    tape_output: Option<Scalar>,
    tape_displacement: Scalar,
}

/// A machine together with the inputs its file asks to simulate.
#[derive(Debug, Clone)]
pub struct LoadedMachine {
    pub definition: MachineDefinition,
    pub inputs: Vec<String>,
}

/// `MachineLoader` is a utility struct for loading machines.
/// It provides methods to load machines from individual files, from string content,
/// and to discover and load all YAML files within a directory.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a single machine from the specified file path.
    ///
    /// When the file does not name the machine, the file stem is used.
    ///
    /// # Returns
    ///
    /// * `Ok(LoadedMachine)` if the file is successfully read and converted.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::ParseError)` if the file is not a valid machine document.
    /// * `Err(MachineError::ValidationError)` if a value cannot be used by the machine.
    pub fn load_file(path: &Path) -> Result<LoadedMachine, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let fallback_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        Self::load(&content, &fallback_name)
    }

    /// Loads a single machine from the provided YAML content.
    pub fn load_str(content: &str) -> Result<LoadedMachine, MachineError> {
        Self::load(content, DEFAULT_NAME)
    }

    /// Loads every `.yaml` and `.yml` file found in `directory`.
    ///
    /// Subdirectories and other files are skipped. Each loaded file yields one result, so a
    /// broken file does not prevent the others from loading.
    pub fn load_dir(directory: &Path) -> Vec<Result<(PathBuf, LoadedMachine), MachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let path = match entry {
                    Ok(entry) => entry.path(),
                    Err(e) => {
                        return Some(Err(MachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let is_yaml = path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml");
                if path.is_dir() || !is_yaml {
                    return None;
                }

                Some(Self::load_file(&path).map(|machine| (path, machine)))
            })
            .collect()
    }

    fn load(content: &str, fallback_name: &str) -> Result<LoadedMachine, MachineError> {
        let file: MachineFile = serde_yaml::from_str(content)
            .map_err(|e| MachineError::ParseError(e.to_string()))?;

        let loaded = convert(file, fallback_name)?;

        for warning in analyze(&loaded.definition) {
            warn!(machine = %loaded.definition.name, "{}", warning);
        }
        info!(
            machine = %loaded.definition.name,
            states = loaded.definition.states.len(),
            transitions = loaded.definition.table.len(),
            inputs = loaded.inputs.len(),
            "loaded machine"
        );

        Ok(loaded)
    }
}

fn convert(file: MachineFile, fallback_name: &str) -> Result<LoadedMachine, MachineError> {
    let states: Vec<String> = file
        .q_states
        .q_list
        .into_iter()
        .map(Scalar::into_text)
        .collect();
    if states.is_empty() {
        return Err(MachineError::ValidationError(
            "q_states.q_list must declare at least one state".to_string(),
        ));
    }

    let alphabet = file
        .tape_alphabet
        .into_iter()
        .map(|value| parse_symbol(value, "tape_alphabet"))
        .collect::<Result<Vec<_>, _>>()?;

    let transitions = file
        .delta
        .into_iter()
        .map(parse_transition)
        .collect::<Result<Vec<_>, _>>()?;

    let definition = MachineDefinition::new(
        file.name.unwrap_or_else(|| fallback_name.to_string()),
        states,
        file.q_states.initial.into_text(),
        file.q_states.final_state.into_text(),
        alphabet,
        transitions,
    );

    Ok(LoadedMachine {
        definition,
        inputs: file
            .simulation_strings
            .into_iter()
            .map(Scalar::into_text)
            .collect(),
    })
}

fn parse_transition(entry: DeltaEntry) -> Result<Transition, MachineError> {
    let DeltaEntry { params, output } = entry;

    Ok(Transition {
        state: params.initial_state.into_text(),
        memory: parse_symbol(params.mem_cache_value, "params.mem_cache_value")?,
        read: parse_symbol(params.tape_input, "params.tape_input")?,
        next_state: output.final_state.into_text(),
        next_memory: parse_symbol(output.mem_cache_value, "output.mem_cache_value")?,
        write: parse_symbol(output.tape_output, "output.tape_output")?,
        direction: output.tape_displacement.into_text().parse::<Direction>()?,
    })
}

/// Converts an optional scalar into a symbol. Null and the empty string are the blank.
fn parse_symbol(value: Option<Scalar>, field: &str) -> Result<Symbol, MachineError> {
    let Some(text) = value.map(Scalar::into_text) else {
        return Ok(Symbol::Blank);
    };

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(Symbol::Blank),
        (Some(c), None) => Ok(Symbol::Char(c)),
        _ => Err(MachineError::ValidationError(format!(
            "{} must be a single character, got '{}'",
            field, text
        ))),
    }
}
