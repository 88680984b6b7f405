//! This module inspects a machine definition for references the engine will never check:
//! states and symbols used by transitions but missing from the declarations. Findings are
//! warnings only; the engine runs whatever table it is given.

use crate::types::{MachineDefinition, Symbol};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// A suspicious spot in a machine definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisWarning {
    /// The initial state is not in the declared state list.
    UndeclaredInitialState(String),
    /// The final state is not in the declared state list.
    UndeclaredFinalState(String),
    /// Transitions mention states that are not declared.
    UndeclaredStates(Vec<String>),
    /// Transitions read or write tape symbols that are not in the alphabet.
    UndeclaredSymbols(Vec<char>),
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::UndeclaredInitialState(state) => {
                write!(f, "Initial state '{}' is not declared", state)
            }
            AnalysisWarning::UndeclaredFinalState(state) => {
                write!(f, "Final state '{}' is not declared", state)
            }
            AnalysisWarning::UndeclaredStates(states) => {
                write!(f, "Transitions reference undeclared states: {:?}", states)
            }
            AnalysisWarning::UndeclaredSymbols(symbols) => write!(
                f,
                "Transitions use symbols outside the tape alphabet: {:?}",
                symbols
            ),
        }
    }
}

/// Analyzes a machine definition and returns every warning found, in a stable order.
pub fn analyze(definition: &MachineDefinition) -> Vec<AnalysisWarning> {
    let declared: HashSet<&str> = definition.states.iter().map(String::as_str).collect();
    let mut warnings = Vec::new();

    if !declared.contains(definition.initial_state.as_str()) {
        warnings.push(AnalysisWarning::UndeclaredInitialState(
            definition.initial_state.clone(),
        ));
    }
    if !declared.contains(definition.final_state.as_str()) {
        warnings.push(AnalysisWarning::UndeclaredFinalState(
            definition.final_state.clone(),
        ));
    }

    let undeclared_states: BTreeSet<&str> = definition
        .table
        .iter()
        .flat_map(|t| [t.state.as_str(), t.next_state.as_str()])
        .filter(|state| !declared.contains(state))
        .collect();
    if !undeclared_states.is_empty() {
        warnings.push(AnalysisWarning::UndeclaredStates(
            undeclared_states.into_iter().map(String::from).collect(),
        ));
    }

    // The blank is always part of the alphabet, declared or not.
    let undeclared_symbols: BTreeSet<char> = definition
        .table
        .iter()
        .flat_map(|t| [t.read, t.write])
        .filter_map(|symbol| match symbol {
            Symbol::Char(c) if !definition.alphabet.contains(&symbol) => Some(c),
            _ => None,
        })
        .collect();
    if !undeclared_symbols.is_empty() {
        warnings.push(AnalysisWarning::UndeclaredSymbols(
            undeclared_symbols.into_iter().collect(),
        ));
    }

    warnings
}
