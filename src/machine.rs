//! This module defines the `TuringMachine` struct, which owns the finite
//! control (states and transitions) and the tape, exposes the deterministic
//! step function, and provides the model-mutation operations used by editors.

use crate::tape::Tape;
use crate::types::{
    Direction, HaltReason, MachineError, State, StateRole, StepOutcome, Transition, TransitionId,
};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// A single-tape deterministic Turing Machine.
///
/// The machine owns an ordered list of transitions and an ordered list of
/// "unconnected" states (states placed by an editor that have no transitions
/// yet). The full state set is derived as the union of every transition
/// endpoint and every unconnected state, deduplicated by name and ordered by
/// name.
#[derive(Debug, Clone, Default)]
pub struct TuringMachine {
    unconnected_states: Vec<State>,
    transitions: Vec<Transition>,
    tape: Tape,
    current_state: Option<State>,
    last_executed_transition: Option<TransitionId>,
    halt: Option<HaltReason>,
    // Tape snapshot captured lazily on the first step after a reset,
    // consumed exactly once by the next reset.
    tape_checkpoint: Option<Tape>,
    next_transition_id: u64,
}

impl TuringMachine {
    /// Creates an empty machine: no states, no transitions, empty tape with
    /// the head at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a single step: reads the symbol under the head, linearly
    /// scans the transitions in stored order for the first whose
    /// `(from, read_symbol)` matches the current state and symbol, and on a
    /// match applies it (enter the target state, write, then move the head).
    ///
    /// On the very first step since the last reset a tape checkpoint is
    /// captured so the run can be rewound.
    ///
    /// # Returns
    ///
    /// * `Ok(StepOutcome::Transitioned)` if a transition was applied.
    /// * `Ok(StepOutcome::Halted(_))` if no transition matched; the machine
    ///   reports `is_rejecting()` from then on, but no synthetic state is
    ///   added to the machine's collections.
    /// * `Err(MachineError::InvalidState)` if the current state carries the
    ///   transient `Temp` role, which must never execute.
    pub fn step(&mut self) -> Result<StepOutcome, MachineError> {
        if self.tape_checkpoint.is_none() {
            self.tape_checkpoint = Some(self.tape.clone());
        }

        if let Some(reason) = self.halt {
            return Ok(StepOutcome::Halted(reason));
        }

        let current = match &self.current_state {
            Some(state) => state.clone(),
            None => {
                self.halt = Some(HaltReason::NoMatchingTransition);
                return Ok(StepOutcome::Halted(HaltReason::NoMatchingTransition));
            }
        };

        if current.role() == StateRole::Temp {
            return Err(MachineError::InvalidState(current.name().to_string()));
        }

        let symbol = self.tape.read();
        let matched = self
            .transitions
            .iter()
            .find(|t| t.from.name() == current.name() && t.read_symbol == symbol)
            .cloned();

        match matched {
            Some(transition) => {
                self.current_state = Some(transition.to.clone());
                self.last_executed_transition = Some(transition.id);
                self.tape.write(transition.write_symbol);
                self.tape.move_head(transition.direction);
                Ok(StepOutcome::Transitioned)
            }
            None => {
                self.halt = Some(HaltReason::NoMatchingTransition);
                Ok(StepOutcome::Halted(HaltReason::NoMatchingTransition))
            }
        }
    }

    /// Rewinds the machine to its pre-run configuration: restores the tape
    /// from the checkpoint (if one was captured) and clears it, clears the
    /// halt marker, and enters the first state with the `Start` role in
    /// [`TuringMachine::states`] order.
    pub fn reset(&mut self) {
        if let Some(checkpoint) = self.tape_checkpoint.take() {
            self.tape = checkpoint;
        }
        self.last_executed_transition = None;
        self.halt = None;

        if let Some(start) = self
            .states()
            .into_iter()
            .find(|s| s.role() == StateRole::Start)
        {
            self.current_state = Some(start);
        }
    }

    /// Whether the machine is in an accept-role state.
    pub fn is_accepting(&self) -> bool {
        self.halt.is_none()
            && self
                .current_state
                .as_ref()
                .is_some_and(|s| s.role() == StateRole::Accept)
    }

    /// Whether the machine is in a reject-role state, or halted with no
    /// applicable transition.
    pub fn is_rejecting(&self) -> bool {
        self.halt.is_some()
            || self
                .current_state
                .as_ref()
                .is_some_and(|s| s.role() == StateRole::Reject)
    }

    pub fn current_state(&self) -> Option<&State> {
        self.current_state.as_ref()
    }

    /// Why the machine halted, if it has.
    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.halt
    }

    /// The identity of the most recently executed transition, for UI
    /// highlighting. Cleared by [`TuringMachine::reset`].
    pub fn last_executed_transition(&self) -> Option<TransitionId> {
        self.last_executed_transition
    }

    /// The full state set: every transition endpoint plus every unconnected
    /// state, deduplicated by name (first occurrence wins) and ordered by
    /// name.
    pub fn states(&self) -> Vec<State> {
        let mut by_name: BTreeMap<String, State> = BTreeMap::new();
        let occurrences = self
            .transitions
            .iter()
            .flat_map(|t| [&t.from, &t.to])
            .chain(self.unconnected_states.iter());

        for state in occurrences {
            if let Entry::Vacant(e) = by_name.entry(state.name().to_string()) {
                e.insert(state.clone());
            }
        }

        by_name.into_values().collect()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn unconnected_states(&self) -> &[State] {
        &self.unconnected_states
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id == id)
    }

    /// Appends a state that has no transitions yet. If the state has the
    /// `Start` role it immediately becomes the current state.
    pub fn add_unconnected_state(&mut self, state: State) {
        if state.role() == StateRole::Start {
            self.current_state = Some(state.clone());
        }
        self.unconnected_states.push(state);
    }

    /// Removes a state: every transition touching it is dropped, and it is
    /// removed from the unconnected list. The current state is left as-is
    /// even if it names the removed state.
    pub fn remove_state(&mut self, state: &State) {
        self.transitions
            .retain(|t| t.from != *state && t.to != *state);
        self.unconnected_states.retain(|s| s != state);
    }

    /// Renames/retypes a state globally and atomically: every transition
    /// endpoint equal to `old` is rewritten to `new`, and the unconnected
    /// list entry is replaced if present. Silently succeeds when `old` is
    /// unknown.
    pub fn update_state(&mut self, old: &State, new: &State) {
        for transition in &mut self.transitions {
            if transition.from == *old {
                transition.from = new.clone();
            }
            if transition.to == *old {
                transition.to = new.clone();
            }
        }
        for state in &mut self.unconnected_states {
            if state == old {
                *state = new.clone();
            }
        }
        if self.current_state.as_ref() == Some(old) {
            self.current_state = Some(new.clone());
        }
    }

    /// Appends a transition and returns its machine-assigned stable identity.
    pub fn add_transition(
        &mut self,
        from: State,
        read_symbol: char,
        to: State,
        write_symbol: char,
        direction: Direction,
    ) -> TransitionId {
        let id = TransitionId(self.next_transition_id);
        self.next_transition_id += 1;
        self.transitions.push(Transition {
            id,
            from,
            read_symbol,
            to,
            write_symbol,
            direction,
        });
        id
    }

    /// Removes the transition with the given identity, if present.
    pub fn remove_transition(&mut self, id: TransitionId) {
        self.transitions.retain(|t| t.id != id);
    }

    /// Replaces the fields of the transition with the given identity, keeping
    /// its identity and position in the scan order. Silently no-ops when the
    /// identity is unknown.
    pub fn update_transition(
        &mut self,
        id: TransitionId,
        from: State,
        read_symbol: char,
        to: State,
        write_symbol: char,
        direction: Direction,
    ) {
        if let Some(transition) = self.transitions.iter_mut().find(|t| t.id == id) {
            transition.from = from;
            transition.read_symbol = read_symbol;
            transition.to = to;
            transition.write_symbol = write_symbol;
            transition.direction = direction;
        }
    }

    /// The lexicographically smallest `qN` (N = 0, 1, 2, ...) not already
    /// used by any existing state name.
    pub fn next_unique_state_name(&self) -> String {
        let names: Vec<String> = self
            .states()
            .into_iter()
            .map(|s| s.name().to_string())
            .collect();

        (0..)
            .map(|n| format!("q{}", n))
            .find(|candidate| !names.contains(candidate))
            .unwrap_or_default()
    }

    /// Whether any transition leaves the given state.
    pub fn has_transitions_from(&self, state: &State) -> bool {
        self.transitions.iter().any(|t| t.from == *state)
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Mutable tape access for direct editor cell edits.
    pub fn tape_mut(&mut self) -> &mut Tape {
        &mut self.tape
    }
}
