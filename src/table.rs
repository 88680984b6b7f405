//! The transition table: an immutable mapping from `(state, memory, tape symbol)` to the
//! transition that fires on it.

use crate::types::{Symbol, Transition};
use std::collections::HashMap;
use tracing::trace;

/// The lookup key of a transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitionKey {
    pub state: String,
    pub memory: Symbol,
    pub read: Symbol,
}

impl TransitionKey {
    pub fn new(state: impl Into<String>, memory: Symbol, read: Symbol) -> Self {
        Self {
            state: state.into(),
            memory,
            read,
        }
    }
}

impl Transition {
    /// Returns the key this transition is stored under.
    pub fn key(&self) -> TransitionKey {
        TransitionKey::new(self.state.clone(), self.memory, self.read)
    }
}

/// A deterministic transition table.
///
/// At most one transition exists per key. The table is built once and never mutated, so
/// it can be shared freely between machines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTable {
    rules: HashMap<TransitionKey, Transition>,
}

impl TransitionTable {
    /// Builds a table from transitions in declaration order.
    ///
    /// When two transitions share a key the later one replaces the earlier one.
    pub fn new(transitions: impl IntoIterator<Item = Transition>) -> Self {
        let mut rules = HashMap::new();

        for transition in transitions {
            if let Some(previous) = rules.insert(transition.key(), transition) {
                trace!(state = %previous.state, "replaced transition with duplicate key");
            }
        }

        Self { rules }
    }

    /// Finds the transition for the given state, memory value and symbol under the head.
    ///
    /// A blank memory or tape symbol is a key component like any other.
    pub fn lookup(&self, state: &str, memory: Symbol, read: Symbol) -> Option<&Transition> {
        self.rules.get(&TransitionKey::new(state, memory, read))
    }

    /// Returns the number of distinct keys in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over all transitions in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.rules.values()
    }
}

impl FromIterator<Transition> for TransitionTable {
    fn from_iter<I: IntoIterator<Item = Transition>>(iter: I) -> Self {
        Self::new(iter)
    }
}
