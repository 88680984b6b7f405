use crate::loader::{LoadedMachine, MachineLoader};
use crate::types::MachineError;
use tracing::error;

// Machines embedded in the binary
const PROGRAM_TEXTS: [&str; 4] = [
    include_str!("../machines/unary-increment.yaml"),
    include_str!("../machines/even-ones.yaml"),
    include_str!("../machines/first-last-match.yaml"),
    include_str!("../machines/copy-first.yaml"),
];

lazy_static::lazy_static! {
    /// The built-in machines, paired with their source text. Machines that fail to load are
    /// logged and left out.
    pub static ref PROGRAMS: Vec<(&'static str, LoadedMachine)> = PROGRAM_TEXTS
        .iter()
        .filter_map(|text| match MachineLoader::load_str(text) {
            Ok(machine) => Some((*text, machine)),
            Err(e) => {
                error!("Failed to load built-in machine: {}", e);
                None
            }
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_by_index(index: usize) -> Result<LoadedMachine, MachineError> {
        PROGRAMS
            .get(index)
            .map(|(_, machine)| machine.clone())
            .ok_or_else(|| {
                MachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name, ignoring case
    pub fn get_by_name(name: &str) -> Result<LoadedMachine, MachineError> {
        Self::position(name)
            .and_then(|index| Self::get_by_index(index).ok())
            .ok_or_else(|| MachineError::ValidationError(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_names() -> Vec<String> {
        PROGRAMS
            .iter()
            .map(|(_, machine)| machine.definition.name.clone())
            .collect()
    }

    /// Get the YAML source of a program by its name
    pub fn get_text_by_name(name: &str) -> Result<&'static str, MachineError> {
        Self::position(name)
            .map(|index| PROGRAMS[index].0)
            .ok_or_else(|| MachineError::ValidationError(format!("Program '{}' not found", name)))
    }

    /// Get information about a program by its index
    pub fn get_info(index: usize) -> Result<ProgramInfo, MachineError> {
        let machine = Self::get_by_index(index)?;
        let definition = &machine.definition;

        Ok(ProgramInfo {
            index,
            name: definition.name.clone(),
            initial_state: definition.initial_state.clone(),
            final_state: definition.final_state.clone(),
            state_count: definition.states.len(),
            transition_count: definition.table.len(),
            input_count: machine.inputs.len(),
        })
    }

    fn position(name: &str) -> Option<usize> {
        PROGRAMS
            .iter()
            .position(|(_, machine)| machine.definition.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub final_state: String,
    pub state_count: usize,
    pub transition_count: usize,
    pub input_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::TuringMachine;
    use crate::trace::{NoTrace, Snapshot};
    use crate::types::MAX_EXECUTION_STEPS;

    fn verdicts(name: &str) -> Vec<(String, bool)> {
        let loaded = ProgramManager::get_by_name(name).unwrap();
        let mut machine = TuringMachine::new(loaded.definition);

        loaded
            .inputs
            .into_iter()
            .map(|input| {
                let accepted = machine.run(&input, MAX_EXECUTION_STEPS, &mut NoTrace);
                (input, accepted)
            })
            .collect()
    }

    fn accepted(results: &[(String, bool)]) -> Vec<&str> {
        results
            .iter()
            .filter(|(_, accepted)| *accepted)
            .map(|(input, _)| input.as_str())
            .collect()
    }

    #[test]
    fn test_all_programs_load() {
        assert_eq!(ProgramManager::count(), PROGRAM_TEXTS.len());
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_names();
        assert!(names.contains(&"Unary increment".to_string()));
        assert!(names.contains(&"Even ones".to_string()));
        assert!(names.contains(&"First and last match".to_string()));
        assert!(names.contains(&"Copy first symbol".to_string()));
    }

    #[test]
    fn test_get_program_by_index() {
        assert!(ProgramManager::get_by_index(0).is_ok());
        assert!(ProgramManager::get_by_index(999).is_err());
    }

    #[test]
    fn test_get_program_by_name() {
        let program = ProgramManager::get_by_name("unary INCREMENT").unwrap();
        assert_eq!(program.definition.final_state, "qf");

        assert!(ProgramManager::get_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_get_text_by_name() {
        let text = ProgramManager::get_text_by_name("Even ones").unwrap();
        assert!(text.contains("name: Even ones"));
    }

    #[test]
    fn test_get_program_info() {
        let info = ProgramManager::get_info(0).unwrap();

        assert_eq!(info.index, 0);
        assert_eq!(info.name, "Unary increment");
        assert_eq!(info.state_count, 2);
        assert_eq!(info.transition_count, 2);
        assert_eq!(info.input_count, 3);

        assert!(ProgramManager::get_info(999).is_err());
    }

    #[test]
    fn test_unary_increment_accepts_everything() {
        let results = verdicts("Unary increment");
        assert!(results.iter().all(|(_, accepted)| *accepted));
    }

    #[test]
    fn test_even_ones() {
        assert_eq!(accepted(&verdicts("Even ones")), vec!["", "11", "1111"]);
    }

    #[test]
    fn test_first_last_match() {
        assert_eq!(
            accepted(&verdicts("First and last match")),
            vec!["a", "abba", "bab"]
        );
    }

    #[test]
    fn test_copy_first_appends_first_symbol() {
        let loaded = ProgramManager::get_by_name("Copy first symbol").unwrap();
        let mut machine = TuringMachine::new(loaded.definition);
        let mut trace: Vec<Snapshot> = Vec::new();

        assert!(machine.run("0110", MAX_EXECUTION_STEPS, &mut trace));
        assert_eq!(trace.last().unwrap().render_tape(), "01100");
        assert!(!machine.run("", MAX_EXECUTION_STEPS, &mut NoTrace));
    }
}
