//! This module defines the core data structures and types used throughout the Turing Machine
//! engine, including states, transitions, step outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The reserved blank symbol held by every tape cell that was never written.
pub const BLANK_SYMBOL: char = ' ';
/// The maximum number of steps permitted in one run before it is treated as non-terminating.
pub const MAX_EXECUTION_STEPS: usize = 10000;
/// The base delay between automatic steps, in milliseconds, before speed scaling.
pub const DEFAULT_STEP_DELAY_MS: u64 = 500;

/// The role a state plays in the finite control.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateRole {
    /// The state the machine starts in after a reset.
    Start,
    /// Reaching this state accepts the input.
    Accept,
    /// Reaching this state rejects the input.
    Reject,
    /// An ordinary intermediate state.
    #[default]
    Normal,
    /// Transient role used by an editor while a transition endpoint is being
    /// reconnected to a not-yet-committed target. Must never appear in a
    /// persisted or validated model.
    Temp,
}

/// A named state of the finite control.
///
/// Equality, ordering, and hashing are by `name` only: two states with the
/// same name are the same state regardless of role. Renaming a state must
/// therefore be global and atomic across the owning machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    name: String,
    #[serde(rename = "type")]
    role: StateRole,
}

impl State {
    pub fn new(name: impl Into<String>, role: StateRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    /// Creates a state with the `Normal` role.
    pub fn normal(name: impl Into<String>) -> Self {
        Self::new(name, StateRole::Normal)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> StateRole {
        self.role
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl std::hash::Hash for State {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Represents the possible directions a tape head can move after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
            Direction::Stay => "STAY",
        })
    }
}

/// Stable identity of a transition within its owning machine.
///
/// Assigned once when the transition is added and never derived from the
/// transition's fields, so external tables keyed by it survive field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionId(pub(crate) u64);

/// A single transition rule: in state `from`, reading `read_symbol`, go to
/// state `to`, write `write_symbol`, and move the head in `direction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub(crate) id: TransitionId,
    pub from: State,
    pub read_symbol: char,
    pub to: State,
    pub write_symbol: char,
    pub direction: Direction,
}

impl Transition {
    /// The stable identity assigned when this transition was added.
    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// The human-readable tuple key of this transition's current field
    /// values. Purely informational; identity is [`Transition::id`].
    pub fn key(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            self.from.name(),
            self.read_symbol,
            self.to.name(),
            self.write_symbol,
            self.direction
        )
    }
}

/// The reason a machine halted without an applicable transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// No transition matched the current state and the symbol under the head.
    NoMatchingTransition,
}

/// The outcome of a single [`crate::TuringMachine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A transition matched and was applied.
    Transitioned,
    /// The machine halted; see [`HaltReason`].
    Halted(HaltReason),
}

/// Represents various errors that can occur during Turing Machine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// Indicates an attempt to execute from a state that must never run,
    /// such as a transient `Temp` state left behind by an editor.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// Indicates an error during the validation of a machine's structure.
    #[error("Machine validation error: {0}")]
    ValidationError(String),
    /// Indicates an error while encoding or decoding a machine document.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Indicates an error related to file system operations, such as reading
    /// or writing machine document files.
    #[error("File error: {0}")]
    FileError(String),
}
