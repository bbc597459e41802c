//! This crate provides the core logic for a single-tape deterministic Turing
//! Machine simulator: the tape abstraction, the state/transition data model,
//! the deterministic step function, pre-run validation, and a host-driven
//! timed execution loop with run instrumentation. GUI editors sit on top of
//! the public model and mutation API; no visual concern lives here.

pub mod executor;
pub mod loader;
pub mod machine;
pub mod presets;
pub mod serializer;
pub mod tape;
pub mod types;
pub mod validator;

/// Re-exports the `MachineExecutor` and `ExecutionState` types from the executor module.
pub use executor::{ExecutionState, MachineExecutor};
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports `PresetInfo`, `PresetManager`, and `PRESETS` from the presets module.
pub use presets::{PresetInfo, PresetManager, PRESETS};
/// Re-exports the machine document types from the serializer module.
pub use serializer::{MachineDef, MachineFile, TapeDef};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Direction, HaltReason, MachineError, State, StateRole, StepOutcome, Transition, TransitionId,
    BLANK_SYMBOL, MAX_EXECUTION_STEPS,
};
/// Re-exports the `ExecutionValidator` and its `ValidationResult` from the validator module.
pub use validator::{ExecutionValidator, ValidationResult};
