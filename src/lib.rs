//! This crate provides the core logic for a single-tape Turing Machine simulator whose
//! machines carry a one-symbol memory register next to the tape.
//! It includes modules for loading machine descriptions from YAML, executing them step by
//! step, tracing instantaneous descriptions, and a set of built-in sample machines.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod table;
pub mod trace;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisWarning` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisWarning};
/// Re-exports the loader types.
pub use loader::{LoadedMachine, MachineLoader};
/// Re-exports the execution engine and its tape.
pub use machine::{Tape, TuringMachine};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the transition table types.
pub use table::{TransitionKey, TransitionTable};
/// Re-exports the trace types.
pub use trace::{JsonTracer, NoTrace, Snapshot, TextTracer, Tracer};
/// Re-exports the types describing machines and their symbols.
pub use types::{
    Direction, MachineDefinition, MachineError, Symbol, Transition, MAX_EXECUTION_STEPS,
};
