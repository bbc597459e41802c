//! This module defines the persisted shape of a machine document and the
//! conversions between it and the live model. The on-disk form is JSON:
//! a versioned record holding the machine definition (unconnected states and
//! transitions) and the tape state (head position plus non-blank cells).

use crate::machine::TuringMachine;
use crate::tape::Tape;
use crate::types::{Direction, MachineError, State, StateRole};
use serde::{Deserialize, Serialize};

/// Document format version written by this crate.
pub const DOCUMENT_VERSION: &str = "1.0";

/// Persisted form of a transition. Symbols serialize as 1-character strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDef {
    pub from: State,
    #[serde(rename = "readSymbol")]
    pub read_symbol: char,
    pub to: State,
    #[serde(rename = "writeSymbol")]
    pub write_symbol: char,
    pub direction: Direction,
}

/// Persisted form of the finite control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineDef {
    #[serde(rename = "unconnectedStates")]
    pub unconnected_states: Vec<State>,
    pub transitions: Vec<TransitionDef>,
}

/// One populated tape cell. Blank cells are omitted from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDef {
    pub index: i64,
    pub symbol: char,
}

/// Persisted form of the tape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeDef {
    #[serde(rename = "headPosition")]
    pub head_position: i64,
    pub cells: Vec<CellDef>,
}

/// A complete saved machine document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineFile {
    pub version: String,
    pub name: String,
    #[serde(rename = "turingMachine")]
    pub machine: MachineDef,
    pub tape: TapeDef,
}

impl MachineFile {
    /// Captures a live machine (and its tape) into a document.
    ///
    /// Fails if any state carries the transient `Temp` role, which must
    /// never be persisted.
    pub fn from_machine(name: &str, tm: &TuringMachine) -> Result<Self, MachineError> {
        for state in tm.states() {
            if state.role() == StateRole::Temp {
                return Err(MachineError::SerializationError(format!(
                    "Transient state '{}' cannot be persisted",
                    state.name()
                )));
            }
        }

        Ok(Self {
            version: DOCUMENT_VERSION.to_string(),
            name: name.to_string(),
            machine: MachineDef {
                unconnected_states: tm.unconnected_states().to_vec(),
                transitions: tm
                    .transitions()
                    .iter()
                    .map(|t| TransitionDef {
                        from: t.from.clone(),
                        read_symbol: t.read_symbol,
                        to: t.to.clone(),
                        write_symbol: t.write_symbol,
                        direction: t.direction,
                    })
                    .collect(),
            },
            tape: TapeDef {
                head_position: tm.tape().head_position(),
                cells: tm
                    .tape()
                    .cells()
                    .map(|(index, symbol)| CellDef { index, symbol })
                    .collect(),
            },
        })
    }

    /// Rebuilds a live machine from this document.
    ///
    /// Transition identities are regenerated; the machine is reset so its
    /// current state is the first start state. Fails if the document
    /// contains a `Temp` state.
    pub fn to_machine(&self) -> Result<TuringMachine, MachineError> {
        let temp = self
            .machine
            .unconnected_states
            .iter()
            .chain(
                self.machine
                    .transitions
                    .iter()
                    .flat_map(|t| [&t.from, &t.to]),
            )
            .find(|s| s.role() == StateRole::Temp);
        if let Some(state) = temp {
            return Err(MachineError::SerializationError(format!(
                "Transient state '{}' cannot be loaded",
                state.name()
            )));
        }

        let mut tm = TuringMachine::new();
        for state in &self.machine.unconnected_states {
            tm.add_unconnected_state(state.clone());
        }
        for def in &self.machine.transitions {
            tm.add_transition(
                def.from.clone(),
                def.read_symbol,
                def.to.clone(),
                def.write_symbol,
                def.direction,
            );
        }

        let tape = tm.tape_mut();
        for cell in &self.tape.cells {
            tape.write_at(cell.index, cell.symbol);
        }
        tape.set_head_position(self.tape.head_position);

        tm.reset();
        Ok(tm)
    }

    /// Renders the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, MachineError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MachineError::SerializationError(e.to_string()))
    }

    /// Parses a document from JSON.
    pub fn from_json(content: &str) -> Result<Self, MachineError> {
        serde_json::from_str(content).map_err(|e| MachineError::SerializationError(e.to_string()))
    }
}

/// Captures just the tape, for hosts that persist it separately.
pub fn tape_to_def(tape: &Tape) -> TapeDef {
    TapeDef {
        head_position: tape.head_position(),
        cells: tape
            .cells()
            .map(|(index, symbol)| CellDef { index, symbol })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn create_sample_machine() -> TuringMachine {
        let q0 = State::new("q0", StateRole::Start);
        let q1 = State::normal("q1");
        let q_accept = State::new("qAccept", StateRole::Accept);

        let mut tm = TuringMachine::new();
        tm.add_transition(q0.clone(), '0', q1.clone(), '1', Direction::Right);
        tm.add_transition(q1, '1', q_accept, '1', Direction::Right);
        tm.add_unconnected_state(State::new("qReject", StateRole::Reject));
        tm.tape_mut().load_str("01");
        tm.tape_mut().set_head_position(1);
        tm.reset();
        tm
    }

    #[test]
    fn test_round_trip_preserves_model() {
        let original = create_sample_machine();

        let doc = MachineFile::from_machine("Sample", &original).unwrap();
        let json = doc.to_json().unwrap();
        let restored = MachineFile::from_json(&json).unwrap().to_machine().unwrap();

        // States are set-equal (order-independent by name).
        let original_names: BTreeSet<String> = original
            .states()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        let restored_names: BTreeSet<String> = restored
            .states()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(original_names, restored_names);

        // Transitions are order-preserving.
        let original_keys: Vec<String> = original.transitions().iter().map(|t| t.key()).collect();
        let restored_keys: Vec<String> = restored.transitions().iter().map(|t| t.key()).collect();
        assert_eq!(original_keys, restored_keys);

        // Tape contents and head survive.
        assert_eq!(
            original.tape().cells().collect::<Vec<_>>(),
            restored.tape().cells().collect::<Vec<_>>()
        );
        assert_eq!(restored.tape().head_position(), 1);
    }

    #[test]
    fn test_loaded_machine_starts_at_start_state() {
        let doc = MachineFile::from_machine("Sample", &create_sample_machine()).unwrap();

        let tm = doc.to_machine().unwrap();

        assert_eq!(tm.current_state().unwrap().name(), "q0");
        assert!(tm.last_executed_transition().is_none());
    }

    #[test]
    fn test_document_field_names() {
        let doc = MachineFile::from_machine("Sample", &create_sample_machine()).unwrap();
        let json = doc.to_json().unwrap();

        assert!(json.contains("\"unconnectedStates\""));
        assert!(json.contains("\"readSymbol\""));
        assert!(json.contains("\"writeSymbol\""));
        assert!(json.contains("\"headPosition\""));
        assert!(json.contains("\"START\""));
        assert!(json.contains("\"RIGHT\""));
        assert!(json.contains("\"type\""));
    }

    #[test]
    fn test_blank_cells_are_omitted() {
        let mut tm = create_sample_machine();
        tm.tape_mut().write_at(5, ' ');

        let doc = MachineFile::from_machine("Sample", &tm).unwrap();

        assert_eq!(doc.tape.cells.len(), 2);
        assert!(doc.tape.cells.iter().all(|c| c.symbol != ' '));
    }

    #[test]
    fn test_temp_state_is_refused_on_save() {
        let mut tm = create_sample_machine();
        tm.add_unconnected_state(State::new("drag", StateRole::Temp));

        let result = MachineFile::from_machine("Sample", &tm);

        assert!(matches!(
            result,
            Err(MachineError::SerializationError(_))
        ));
    }

    #[test]
    fn test_temp_state_is_refused_on_load() {
        let mut doc = MachineFile::from_machine("Sample", &create_sample_machine()).unwrap();
        doc.machine
            .unconnected_states
            .push(State::new("drag", StateRole::Temp));

        let result = doc.to_machine();

        assert!(matches!(
            result,
            Err(MachineError::SerializationError(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let result = MachineFile::from_json("not a machine document");
        assert!(matches!(
            result,
            Err(MachineError::SerializationError(_))
        ));
    }

    #[test]
    fn test_tape_to_def() {
        let mut tape = Tape::new();
        tape.write_at(-2, 'a');
        tape.write_at(3, 'b');
        tape.set_head_position(-2);

        let def = tape_to_def(&tape);

        assert_eq!(def.head_position, -2);
        assert_eq!(
            def.cells,
            vec![
                CellDef {
                    index: -2,
                    symbol: 'a'
                },
                CellDef {
                    index: 3,
                    symbol: 'b'
                }
            ]
        );
    }
}
