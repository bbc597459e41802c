//! Built-in example machines, embedded as machine documents and exposed
//! through a process-wide registry.

use crate::machine::TuringMachine;
use crate::serializer::MachineFile;
use crate::types::MachineError;

use std::sync::RwLock;

// Default embedded machine documents
const PRESET_TEXTS: [&str; 3] = [
    include_str!("../presets/flip-and-accept.json"),
    include_str!("../presets/binary-increment.json"),
    include_str!("../presets/tape-eraser.json"),
];

lazy_static::lazy_static! {
    pub static ref PRESETS: RwLock<Vec<MachineFile>> = RwLock::new(Vec::new());
}

pub struct PresetManager;

impl PresetManager {
    /// Initialize the registry with the embedded preset documents.
    pub fn load() -> Result<(), MachineError> {
        let mut presets = Vec::new();

        for text in PRESET_TEXTS {
            if let Ok(document) = MachineFile::from_json(text) {
                presets.push(document);
            } else {
                eprintln!("Failed to parse embedded preset");
            }
        }

        if let Ok(mut write_guard) = PRESETS.write() {
            *write_guard = presets;
        } else {
            return Err(MachineError::FileError(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the number of available presets
    pub fn get_preset_count() -> usize {
        // Initialize with embedded presets if not already initialized
        let _ = Self::load();

        PRESETS.read().map(|presets| presets.len()).unwrap_or(0)
    }

    /// Get a preset document by its index
    pub fn get_preset_by_index(index: usize) -> Result<MachineFile, MachineError> {
        // Initialize with embedded presets if not already initialized
        let _ = Self::load();

        PRESETS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                MachineError::ValidationError(format!("Preset index {} out of range", index))
            })
    }

    /// Get a preset document by its name
    pub fn get_preset_by_name(name: &str) -> Result<MachineFile, MachineError> {
        // Initialize with embedded presets if not already initialized
        let _ = Self::load();

        PRESETS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|preset| preset.name == name)
            .cloned()
            .ok_or_else(|| MachineError::ValidationError(format!("Preset '{}' not found", name)))
    }

    /// Build a runnable machine from a preset by index
    pub fn get_machine_by_index(index: usize) -> Result<TuringMachine, MachineError> {
        Self::get_preset_by_index(index)?.to_machine()
    }

    /// List all preset names
    pub fn list_preset_names() -> Vec<String> {
        // Initialize with embedded presets if not already initialized
        let _ = Self::load();

        PRESETS
            .read()
            .map(|presets| presets.iter().map(|preset| preset.name.clone()).collect())
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get information about a preset by its index
    pub fn get_preset_info(index: usize) -> Result<PresetInfo, MachineError> {
        let document = Self::get_preset_by_index(index)?;
        let machine = document.to_machine()?;

        Ok(PresetInfo {
            index,
            name: document.name.clone(),
            state_count: machine.states().len(),
            transition_count: machine.transitions().len(),
            tape_cell_count: document.tape.cells.len(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PresetInfo {
    pub index: usize,
    pub name: String,
    pub state_count: usize,
    pub transition_count: usize,
    pub tape_cell_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::ExecutionValidator;

    #[test]
    fn test_preset_manager_initialization() {
        let result = PresetManager::load();
        assert!(result.is_ok());

        assert_eq!(PresetManager::get_preset_count(), 3);
    }

    #[test]
    fn test_all_presets_are_valid() {
        let count = PresetManager::get_preset_count();
        for i in 0..count {
            let machine = PresetManager::get_machine_by_index(i).unwrap();
            let result = ExecutionValidator::validate(&machine);
            assert!(
                result.is_valid(),
                "Preset {} is invalid: {:?}",
                i,
                result.errors
            );
        }
    }

    #[test]
    fn test_preset_names() {
        let names = PresetManager::list_preset_names();

        assert!(names.contains(&"Flip and accept".to_string()));
        assert!(names.contains(&"Binary increment".to_string()));
        assert!(names.contains(&"Tape eraser".to_string()));
    }

    #[test]
    fn test_presets_run_to_acceptance() {
        let count = PresetManager::get_preset_count();
        for i in 0..count {
            let mut machine = PresetManager::get_machine_by_index(i).unwrap();

            // Every embedded preset accepts within a modest number of steps.
            for _ in 0..100 {
                if machine.is_accepting() {
                    break;
                }
                machine.step().unwrap();
            }
            assert!(machine.is_accepting(), "Preset {} did not accept", i);
        }
    }

    #[test]
    fn test_binary_increment_result() {
        let mut machine = PresetManager::get_preset_by_name("Binary increment")
            .unwrap()
            .to_machine()
            .unwrap();

        for _ in 0..100 {
            if machine.is_accepting() {
                break;
            }
            machine.step().unwrap();
        }

        // 1011 + 1 = 1100
        let symbols: String = machine.tape().cells().map(|(_, s)| s).collect();
        assert_eq!(symbols, "1100");
    }

    #[test]
    fn test_get_preset_by_index_out_of_range() {
        let result = PresetManager::get_preset_by_index(999);
        assert!(result.is_err());
    }

    #[test]
    fn test_get_preset_by_name_unknown() {
        let result = PresetManager::get_preset_by_name("Nonexistent");
        assert!(result.is_err());
    }

    #[test]
    fn test_get_preset_info() {
        let info = PresetManager::get_preset_info(0).unwrap();

        assert_eq!(info.index, 0);
        assert_eq!(info.name, "Flip and accept");
        assert_eq!(info.state_count, 3);
        assert_eq!(info.transition_count, 2);
        assert_eq!(info.tape_cell_count, 2);
    }
}
