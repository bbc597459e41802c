//! This module defines the `MachineExecutor`, which drives a `TuringMachine`
//! through a host-controlled, speed-scaled timed run loop. The executor owns
//! the execution-state machine, the step budget, and run instrumentation
//! (step count, elapsed wall time, tape-space usage).
//!
//! The executor never reads the clock itself: the host passes the current
//! `Instant` into every time-sensitive operation, and elapsed-time accounting
//! happens in an explicit `tick`, so `elapsed_time()` is a pure read.

use crate::machine::TuringMachine;
use crate::types::{DEFAULT_STEP_DELAY_MS, MAX_EXECUTION_STEPS};
use crate::validator::{ExecutionValidator, ValidationResult};
use std::time::{Duration, Instant};

/// The run-loop phase of a [`MachineExecutor`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    /// Not running; the initial state and the result of `stop`.
    #[default]
    Stopped,
    /// Stepping automatically as wall-clock time elapses.
    Running,
    /// Frozen mid-run; `start` resumes without clearing instrumentation.
    Paused,
    /// Advancing only through explicit `step_once` calls.
    StepMode,
    /// The machine reached an accepting or rejecting configuration.
    Finished,
    /// Validation failed, the step budget ran out without a verdict, or a
    /// step failed.
    Error,
}

impl std::fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExecutionState::Stopped => "STOPPED",
            ExecutionState::Running => "RUNNING",
            ExecutionState::Paused => "PAUSED",
            ExecutionState::StepMode => "STEP_MODE",
            ExecutionState::Finished => "FINISHED",
            ExecutionState::Error => "ERROR",
        })
    }
}

/// Drives a [`TuringMachine`] on the host's tick loop.
///
/// The host calls [`MachineExecutor::update`] once per render/tick iteration;
/// the executor decides whether enough scaled wall-clock time has elapsed to
/// invoke [`TuringMachine::step`]. Correctness depends only on elapsed-time
/// comparisons, never on call frequency.
#[derive(Debug, Clone)]
pub struct MachineExecutor {
    state: ExecutionState,
    step_delay: Duration,
    speed_factor: f32,
    step_count: usize,
    // Wall-clock bookkeeping. `fold_anchor` marks the instant up to which
    // running time has been folded into `accumulated`; `last_step_at` is the
    // anchor for the next automatic step.
    accumulated: Duration,
    fold_anchor: Option<Instant>,
    last_step_at: Option<Instant>,
    // Space-usage extrema observed while running.
    min_head_position: i64,
    max_head_position: i64,
    max_cells_used: usize,
}

impl Default for MachineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineExecutor {
    pub fn new() -> Self {
        Self {
            state: ExecutionState::Stopped,
            step_delay: Duration::from_millis(DEFAULT_STEP_DELAY_MS),
            speed_factor: 1.0,
            step_count: 0,
            accumulated: Duration::ZERO,
            fold_anchor: None,
            last_step_at: None,
            min_head_position: 0,
            max_head_position: 0,
            max_cells_used: 0,
        }
    }

    /// Validates the machine and, if it passes, enters `Running`.
    ///
    /// Starting from `Stopped` zeroes the step count, the elapsed-time
    /// accumulator, and the space-usage extrema; starting from any other
    /// state (resume) keeps them. A failed validation moves to `Error` and
    /// the run is refused.
    pub fn start(&mut self, tm: &TuringMachine, now: Instant) -> ValidationResult {
        let result = ExecutionValidator::validate(tm);
        if !result.is_valid() {
            self.state = ExecutionState::Error;
            return result;
        }

        if self.state == ExecutionState::Stopped {
            self.step_count = 0;
            self.accumulated = Duration::ZERO;
            self.min_head_position = 0;
            self.max_head_position = 0;
            self.max_cells_used = 0;
        }

        self.state = ExecutionState::Running;
        self.fold_anchor = Some(now);
        self.last_step_at = Some(now);
        result
    }

    /// Freezes the run. Elapsed time up to `now` is folded first.
    pub fn pause(&mut self, now: Instant) {
        self.tick(now);
        self.state = ExecutionState::Paused;
    }

    /// Stops the run and rewinds the machine to its pre-run configuration.
    /// Instrumentation keeps its final values until the next cold start.
    pub fn stop(&mut self, tm: &mut TuringMachine, now: Instant) {
        self.tick(now);
        self.state = ExecutionState::Stopped;
        tm.reset();
    }

    /// Forces `StepMode` and, if the machine can still advance, executes
    /// exactly one step.
    pub fn step_once(&mut self, tm: &mut TuringMachine) {
        self.state = ExecutionState::StepMode;
        if self.can_step(tm) {
            self.execute_step(tm);
        }
    }

    /// One host tick: a no-op unless `Running`.
    ///
    /// Updates space-usage tracking from the tape, folds elapsed time, and
    /// when the scaled step delay has passed either executes a step or, if
    /// the machine can no longer advance, settles into `Finished` (accepting
    /// or rejecting) or `Error` (out of budget without a verdict).
    pub fn update(&mut self, tm: &mut TuringMachine, now: Instant) {
        if self.state != ExecutionState::Running {
            return;
        }

        let tape = tm.tape();
        self.min_head_position = self.min_head_position.min(tape.head_position());
        self.max_head_position = self.max_head_position.max(tape.head_position());
        self.max_cells_used = self.max_cells_used.max(tape.non_blank_cell_count());

        self.tick(now);

        let due = self
            .last_step_at
            .map(|anchor| now.duration_since(anchor) >= self.effective_step_delay())
            .unwrap_or(true);
        if !due {
            return;
        }

        if self.can_step(tm) {
            self.execute_step(tm);
            self.last_step_at = Some(now);
        } else if tm.is_accepting() || tm.is_rejecting() {
            self.state = ExecutionState::Finished;
        } else {
            self.state = ExecutionState::Error;
        }
    }

    /// Whether another step may run: the step budget is not exhausted, the
    /// machine has no verdict yet, and the executor is not in `Error`.
    pub fn can_step(&self, tm: &TuringMachine) -> bool {
        self.step_count < MAX_EXECUTION_STEPS
            && !tm.is_accepting()
            && !tm.is_rejecting()
            && self.state != ExecutionState::Error
    }

    fn execute_step(&mut self, tm: &mut TuringMachine) {
        match tm.step() {
            Ok(_) => self.step_count += 1,
            // Step failures never cross the public boundary; they surface as
            // executor state. No step-count increment on failure.
            Err(_) => self.state = ExecutionState::Error,
        }
    }

    /// Folds running wall-clock time up to `now` into the accumulator.
    /// A no-op unless `Running`.
    pub fn tick(&mut self, now: Instant) {
        if self.state != ExecutionState::Running {
            return;
        }
        if let Some(anchor) = self.fold_anchor {
            self.accumulated += now.duration_since(anchor);
        }
        self.fold_anchor = Some(now);
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Accumulated run time. A pure read: call [`MachineExecutor::tick`]
    /// (or `update`) first to fold in time elapsed since the last tick.
    pub fn elapsed_time(&self) -> Duration {
        self.accumulated
    }

    /// Accumulated run time rendered as `MM:SS.mmm`.
    pub fn formatted_time(&self) -> String {
        let total_ms = self.accumulated.as_millis();
        let minutes = total_ms / 60_000;
        let seconds = (total_ms % 60_000) / 1000;
        let millis = total_ms % 1000;
        format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
    }

    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    /// Sets the stepping-rate multiplier. Values that are not strictly
    /// positive are ignored.
    pub fn set_speed_factor(&mut self, factor: f32) {
        if factor > 0.0 {
            self.speed_factor = factor;
        }
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub fn set_step_delay(&mut self, delay: Duration) {
        self.step_delay = delay;
    }

    fn effective_step_delay(&self) -> Duration {
        self.step_delay.div_f32(self.speed_factor)
    }

    /// The largest number of populated tape cells observed during the run.
    pub fn cells_used(&self) -> usize {
        self.max_cells_used
    }

    /// The extreme head positions observed during the run.
    pub fn head_range(&self) -> (i64, i64) {
        (self.min_head_position, self.max_head_position)
    }
}
