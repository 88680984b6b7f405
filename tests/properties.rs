//! Property-based tests for the transition table and the execution engine.
//!
//! Machines are drawn from a small pool of states and symbols so that generated transitions
//! collide and match often.

use memtur::{
    Direction, MachineDefinition, NoTrace, Snapshot, Symbol, Transition, TransitionTable,
    TuringMachine,
};
use proptest::prelude::*;
use std::collections::HashMap;

const STATES: [&str; 3] = ["q0", "q1", "qf"];

prop_compose! {
    fn arbitrary_symbol()(variant in 0..3u8) -> Symbol {
        match variant {
            0 => Symbol::Blank,
            1 => Symbol::Char('a'),
            _ => Symbol::Char('b'),
        }
    }
}

prop_compose! {
    fn arbitrary_state()(index in 0..STATES.len()) -> String {
        STATES[index].to_string()
    }
}

prop_compose! {
    fn arbitrary_direction()(variant in 0..3u8) -> Direction {
        match variant {
            0 => Direction::Left,
            1 => Direction::Right,
            _ => Direction::Stay,
        }
    }
}

prop_compose! {
    fn arbitrary_transition()(
        state in arbitrary_state(),
        memory in arbitrary_symbol(),
        read in arbitrary_symbol(),
        next_state in arbitrary_state(),
        next_memory in arbitrary_symbol(),
        write in arbitrary_symbol(),
        direction in arbitrary_direction(),
    ) -> Transition {
        Transition { state, memory, read, next_state, next_memory, write, direction }
    }
}

fn arbitrary_input() -> impl Strategy<Value = String> {
    "[ab]{0,6}"
}

fn machine(transitions: Vec<Transition>) -> TuringMachine {
    TuringMachine::new(MachineDefinition::new(
        "generated",
        STATES.iter().map(|s| s.to_string()).collect(),
        "q0",
        "qf",
        vec![Symbol::Char('a'), Symbol::Char('b'), Symbol::Blank],
        transitions,
    ))
}

proptest! {
    #[test]
    fn lookup_is_deterministic(
        transitions in prop::collection::vec(arbitrary_transition(), 0..20),
        state in arbitrary_state(),
        memory in arbitrary_symbol(),
        read in arbitrary_symbol(),
    ) {
        let table = TransitionTable::new(transitions);
        prop_assert_eq!(
            table.lookup(&state, memory, read),
            table.lookup(&state, memory, read)
        );
    }

    #[test]
    fn table_keeps_last_transition_per_key(
        transitions in prop::collection::vec(arbitrary_transition(), 0..30),
    ) {
        let mut expected = HashMap::new();
        for transition in &transitions {
            expected.insert(transition.key(), transition.clone());
        }

        let table = TransitionTable::new(transitions);
        prop_assert_eq!(table.len(), expected.len());
        for (key, transition) in &expected {
            prop_assert_eq!(
                table.lookup(&key.state, key.memory, key.read),
                Some(transition)
            );
        }
    }

    #[test]
    fn failed_step_changes_nothing(
        transitions in prop::collection::vec(arbitrary_transition(), 0..20),
        input in arbitrary_input(),
    ) {
        let mut machine = machine(transitions);
        machine.load_input(&input);

        for _ in 0..50 {
            let before = machine.snapshot();
            if !machine.step() {
                prop_assert_eq!(machine.snapshot(), before);
                break;
            }
        }
    }

    #[test]
    fn successful_step_applies_transition(
        transitions in prop::collection::vec(arbitrary_transition(), 1..20),
        input in arbitrary_input(),
    ) {
        let mut machine = machine(transitions);
        machine.load_input(&input);

        for _ in 0..50 {
            let before = machine.snapshot();
            let expected = machine
                .definition()
                .table
                .lookup(machine.state(), machine.memory(), machine.symbol())
                .cloned();

            let Some(transition) = expected else {
                prop_assert!(!machine.step());
                break;
            };

            prop_assert!(machine.step());
            prop_assert_eq!(machine.state(), transition.next_state.as_str());
            prop_assert_eq!(machine.memory(), transition.next_memory);
            prop_assert_eq!(machine.tape()[before.head], transition.write);
            prop_assert!(machine.tape().len() >= before.head + 1);

            let expected_head = match transition.direction {
                Direction::Left => before.head.saturating_sub(1),
                Direction::Right => before.head + 1,
                Direction::Stay => before.head,
            };
            prop_assert_eq!(machine.head(), expected_head);
        }
    }

    #[test]
    fn run_respects_step_budget(
        transitions in prop::collection::vec(arbitrary_transition(), 0..20),
        input in arbitrary_input(),
        max_steps in 0usize..40,
    ) {
        let mut machine = machine(transitions);
        let mut trace: Vec<Snapshot> = Vec::new();

        let accepted = machine.run(&input, max_steps, &mut trace);

        prop_assert!(machine.step_count() <= max_steps);
        prop_assert_eq!(trace.len(), machine.step_count() + 1);
        prop_assert_eq!(accepted, machine.state() == "qf");
    }

    #[test]
    fn run_is_idempotent(
        transitions in prop::collection::vec(arbitrary_transition(), 0..20),
        input in arbitrary_input(),
    ) {
        let mut machine = machine(transitions);
        let mut first: Vec<Snapshot> = Vec::new();
        let mut second: Vec<Snapshot> = Vec::new();

        let verdict1 = machine.run(&input, 100, &mut first);
        machine.run("ba", 100, &mut NoTrace);
        let verdict2 = machine.run(&input, 100, &mut second);

        prop_assert_eq!(verdict1, verdict2);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn trace_starts_from_input(
        transitions in prop::collection::vec(arbitrary_transition(), 0..20),
        input in arbitrary_input(),
    ) {
        let mut machine = machine(transitions);
        let mut trace: Vec<Snapshot> = Vec::new();
        machine.run(&input, 20, &mut trace);

        let initial = &trace[0];
        prop_assert_eq!(initial.state.as_str(), "q0");
        prop_assert_eq!(initial.memory, Symbol::Blank);
        prop_assert_eq!(initial.head, 0);
        prop_assert_eq!(initial.render_tape(), input);
    }
}
