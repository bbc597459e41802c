//! This module provides the pre-run structural validation of a Turing
//! Machine: every check runs over a machine snapshot and contributes zero or
//! more user-facing error or warning strings, with no short-circuiting.
//! Errors refuse a run; warnings never affect validity.

use crate::machine::TuringMachine;
use crate::types::{State, StateRole};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// The outcome of validating a machine: ordered error and warning strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// True iff no errors were found. Warnings do not affect validity.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Static, pre-run structural checker over a [`TuringMachine`]. Owns no
/// state; [`ExecutionValidator::validate`] is a pure function of the machine
/// snapshot.
pub struct ExecutionValidator;

impl ExecutionValidator {
    /// Runs every check and collects their findings.
    pub fn validate(tm: &TuringMachine) -> ValidationResult {
        let mut result = ValidationResult::default();

        check_has_transitions(tm, &mut result);
        check_start_states(tm, &mut result);
        check_unique_names(tm, &mut result);
        check_unreachable_states(tm, &mut result);
        check_determinism(tm, &mut result);

        result
    }
}

/// Error if the machine defines no transitions at all.
fn check_has_transitions(tm: &TuringMachine, result: &mut ValidationResult) {
    if tm.transitions().is_empty() {
        result.errors.push("No transitions defined".to_string());
    }
}

/// Error if there is no start state, or one error per start state beyond the
/// first.
fn check_start_states(tm: &TuringMachine, result: &mut ValidationResult) {
    let starts: Vec<State> = tm
        .states()
        .into_iter()
        .filter(|s| s.role() == StateRole::Start)
        .collect();

    match starts.len() {
        0 => result.errors.push("No start state defined".to_string()),
        1 => {}
        _ => {
            for extra in &starts[1..] {
                result
                    .errors
                    .push(format!("Multiple start states: '{}'", extra.name()));
            }
        }
    }
}

/// Error, one per offending name, when the same name appears with more than
/// one role, or more than once in the unconnected list. Since state equality
/// is by name only, such occurrences denote one state with conflicting
/// definitions.
fn check_unique_names(tm: &TuringMachine, result: &mut ValidationResult) {
    let mut roles_by_name: BTreeMap<&str, BTreeSet<StateRole>> = BTreeMap::new();
    let occurrences = tm
        .transitions()
        .iter()
        .flat_map(|t| [&t.from, &t.to])
        .chain(tm.unconnected_states().iter());

    for state in occurrences {
        roles_by_name
            .entry(state.name())
            .or_default()
            .insert(state.role());
    }

    let mut offenders: BTreeSet<&str> = roles_by_name
        .iter()
        .filter(|(_, roles)| roles.len() > 1)
        .map(|(&name, _)| name)
        .collect();

    // A name listed twice among the unconnected states is duplicated even
    // when both entries agree on the role.
    let mut seen = HashSet::new();
    for state in tm.unconnected_states() {
        if !seen.insert(state.name()) {
            offenders.insert(state.name());
        }
    }

    for name in offenders {
        result
            .errors
            .push(format!("State name '{}' is not unique", name));
    }
}

/// Warning per state not reachable from the start state by following
/// transitions forward (breadth-first).
fn check_unreachable_states(tm: &TuringMachine, result: &mut ValidationResult) {
    let states = tm.states();
    let start = match states.iter().find(|s| s.role() == StateRole::Start) {
        Some(start) => start,
        // Absence of a start state is already an error; nothing to walk from.
        None => return,
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue = vec![start.name()];

    while let Some(name) = queue.pop() {
        if !visited.insert(name) {
            continue;
        }
        for transition in tm.transitions() {
            if transition.from.name() == name && !visited.contains(transition.to.name()) {
                queue.push(transition.to.name());
            }
        }
    }

    for state in &states {
        if !visited.contains(state.name()) {
            result.warnings.push(format!(
                "State '{}' is unreachable from the start state",
                state.name()
            ));
        }
    }
}

/// Warning per `(state, read symbol)` pair claimed by more than one
/// transition; only the first in scan order can ever fire.
fn check_determinism(tm: &TuringMachine, result: &mut ValidationResult) {
    let mut groups: BTreeMap<(&str, char), usize> = BTreeMap::new();
    for transition in tm.transitions() {
        *groups
            .entry((transition.from.name(), transition.read_symbol))
            .or_default() += 1;
    }

    for ((name, symbol), count) in groups {
        if count > 1 {
            result.warnings.push(format!(
                "Nondeterministic transitions from state '{}' on '{}'",
                name, symbol
            ));
        }
    }
}
