//! This module defines the `TuringMachine` struct, the execution engine of a single-tape
//! Turing Machine with a one-symbol memory register. It owns the run state (current state,
//! memory, tape and head) and drives it through the shared transition table.

use crate::trace::{Snapshot, Tracer};
use crate::types::{Direction, MachineDefinition, Symbol};
use tracing::{debug, info, trace};

/// A tape that is conceptually infinite to the right.
///
/// Cells that were never written read as blank. The tape grows on demand and never shrinks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
}

impl Tape {
    /// Creates a tape holding one cell per character of `input`.
    pub fn from_input(input: &str) -> Self {
        Self {
            cells: input.chars().map(Symbol::Char).collect(),
        }
    }

    /// Returns the symbol at `index`, or blank if the tape has not grown that far.
    pub fn read(&self, index: usize) -> Symbol {
        self.cells.get(index).copied().unwrap_or(Symbol::Blank)
    }

    /// Writes `symbol` at `index`.
    ///
    /// Writing past the end first fills every new cell with blank, so the tape ends up with
    /// exactly `index + 1` cells.
    pub fn write(&mut self, index: usize, symbol: Symbol) {
        if index >= self.cells.len() {
            self.cells.resize(index + 1, Symbol::Blank);
        }
        self.cells[index] = symbol;
    }

    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A single-tape Turing Machine with a memory register.
///
/// One machine can be reused for any number of inputs: every call to [`TuringMachine::run`]
/// starts from a fresh configuration.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    definition: MachineDefinition,
    state: String,
    memory: Symbol,
    tape: Tape,
    head: usize,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a new machine in its initial configuration.
    pub fn new(definition: MachineDefinition) -> Self {
        Self {
            state: definition.initial_state.clone(),
            memory: Symbol::Blank,
            tape: Tape::default(),
            head: 0,
            step_count: 0,
            definition,
        }
    }

    /// Resets the machine to the initial state with an empty memory, an empty tape and the
    /// head on cell 0.
    pub fn reset(&mut self) {
        self.state.clone_from(&self.definition.initial_state);
        self.memory = Symbol::Blank;
        self.tape = Tape::default();
        self.head = 0;
        self.step_count = 0;
    }

    /// Places `input` on the tape, one cell per character, and rewinds the head and memory.
    ///
    /// The current state is left alone, so this is meant to follow [`TuringMachine::reset`].
    pub fn load_input(&mut self, input: &str) {
        self.tape = Tape::from_input(input);
        self.head = 0;
        self.memory = Symbol::Blank;
    }

    /// Executes a single transition.
    ///
    /// Returns `false` and leaves the configuration untouched when no transition matches the
    /// current state, memory and symbol under the head. This is how the machine halts.
    pub fn step(&mut self) -> bool {
        let read = self.tape.read(self.head);

        let Some(transition) = self.definition.table.lookup(&self.state, self.memory, read)
        else {
            debug!(
                state = %self.state,
                memory = %self.memory,
                symbol = %read,
                "no transition, halting"
            );
            return false;
        };

        self.tape.write(self.head, transition.write);
        self.state.clone_from(&transition.next_state);
        self.memory = transition.next_memory;
        self.head = match transition.direction {
            Direction::Left => self.head.saturating_sub(1),
            Direction::Right => self.head + 1,
            Direction::Stay => self.head,
        };
        self.step_count += 1;

        trace!(
            step = self.step_count,
            state = %self.state,
            memory = %self.memory,
            head = self.head,
            "step"
        );

        true
    }

    /// Runs the machine on `input` until it halts or `max_steps` steps have been executed.
    ///
    /// The tracer sees the initial configuration, every configuration after a successful
    /// step, and finally the verdict. The input is accepted when the machine sits in the
    /// final state once the loop stops, whichever way it stopped.
    pub fn run<T: Tracer + ?Sized>(
        &mut self,
        input: &str,
        max_steps: usize,
        tracer: &mut T,
    ) -> bool {
        self.reset();
        self.load_input(input);

        tracer.begin(input);
        tracer.record(&self.snapshot());

        let mut steps = 0;
        while steps < max_steps {
            if !self.step() {
                break;
            }
            tracer.record(&self.snapshot());
            steps += 1;
        }

        let accepted = self.is_accepting();
        if steps == max_steps {
            debug!(input, max_steps, "step budget exhausted");
        }
        info!(input, steps, accepted, "run finished");

        tracer.verdict(input, accepted);
        accepted
    }

    /// Returns `true` when the current state is the final state.
    pub fn is_accepting(&self) -> bool {
        self.state == self.definition.final_state
    }

    /// Captures the current configuration.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            memory: self.memory,
            tape: self.tape.cells().to_vec(),
            head: self.head,
        }
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the value held in the memory register.
    pub fn memory(&self) -> Symbol {
        self.memory
    }

    /// Returns the written part of the tape.
    pub fn tape(&self) -> &[Symbol] {
        self.tape.cells()
    }

    /// Returns the head position.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> Symbol {
        self.tape.read(self.head)
    }

    /// Returns the number of steps executed since the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn definition(&self) -> &MachineDefinition {
        &self.definition
    }
}
