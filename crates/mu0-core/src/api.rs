//! Host-facing contracts: configuration, step outcomes, snapshots and trace
//! hooks.

use std::fmt;

use crate::{Address, FaultCode, Instruction, MachineState, Memory, RuntimeError, Value};

/// Run-loop configuration consumed by [`crate::Controller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct EngineConfig {
    /// Maximum number of executed steps per bounded run; `None` is unbounded.
    pub step_limit: Option<u64>,
    /// Enables trace callback dispatch to the controller's sink.
    pub tracing_enabled: bool,
}

impl EngineConfig {
    /// Configuration bounded to `limit` executed steps per run.
    #[must_use]
    pub const fn with_step_limit(limit: u64) -> Self {
        Self {
            step_limit: Some(limit),
            tracing_enabled: false,
        }
    }
}

/// Result of one fetch-decode-execute attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StepOutcome {
    /// Instruction executed; registers reflect the post-step state.
    Continued {
        /// The executed instruction, comment included.
        executed: Instruction,
        /// Program position the instruction was fetched from.
        position: usize,
        /// Program counter after the step.
        program_counter: usize,
        /// Accumulator after the step.
        accumulator: Value,
    },
    /// `STOP` was fetched. The program counter is not advanced.
    Halted {
        /// Source line of the `STOP`.
        line: u32,
    },
    /// The program counter is past the last instruction.
    Completed,
    /// The instruction could not execute; no state was changed.
    Fault {
        /// Fault kind.
        cause: FaultCode,
        /// Operand address of the faulting instruction.
        address: Address,
        /// Source line of the faulting instruction.
        line: u32,
    },
}

impl StepOutcome {
    /// Returns `true` for `Halted`, `Completed` and `Fault`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continued { .. })
    }

    /// Fault details, when this outcome is a fault.
    #[must_use]
    pub const fn fault(&self) -> Option<RuntimeError> {
        match self {
            Self::Fault {
                cause,
                address,
                line,
            } => Some(RuntimeError {
                cause: *cause,
                address: *address,
                line: *line,
            }),
            Self::Continued { .. } | Self::Halted { .. } | Self::Completed => None,
        }
    }

    /// Converts a fault into an error so callers can use `?`.
    ///
    /// # Errors
    ///
    /// Returns the [`RuntimeError`] carried by a `Fault` outcome.
    pub fn into_result(self) -> Result<Self, RuntimeError> {
        match self.fault() {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}

/// Aggregated outcome of a bounded run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RunOutcome {
    /// Number of instructions executed during this run.
    pub steps: u64,
    /// Last outcome observed; `Continued` when the step limit was reached.
    pub final_step: StepOutcome,
}

impl RunOutcome {
    /// Returns `true` when the run ended on a terminal outcome.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.final_step.is_terminal()
    }
}

/// Copy of the architectural state for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineSnapshot {
    /// Accumulator.
    pub accumulator: Value,
    /// Program counter (program position).
    pub program_counter: usize,
    /// Populated memory cells.
    pub memory: Memory,
}

impl From<&MachineState> for MachineSnapshot {
    fn from(state: &MachineState) -> Self {
        Self {
            accumulator: state.accumulator(),
            program_counter: state.program_counter(),
            memory: state.memory().clone(),
        }
    }
}

/// Trace events emitted in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TraceEvent {
    /// An instruction was fetched.
    InstructionStart {
        /// Program position of the fetch.
        position: usize,
        /// Source line of the fetched instruction.
        line: u32,
    },
    /// A data cell was read or written.
    MemoryAccess {
        /// Cell address.
        address: Address,
        /// Value read or written.
        value: Value,
        /// `true` for writes.
        is_write: bool,
    },
    /// An instruction finished executing.
    InstructionRetired {
        /// Program position of the retired instruction.
        position: usize,
        /// Program counter after retirement.
        program_counter: usize,
        /// Accumulator after retirement.
        accumulator: Value,
    },
    /// A fault was raised.
    FaultRaised {
        /// Fault kind.
        cause: FaultCode,
        /// Operand address.
        address: Address,
        /// Source line.
        line: u32,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstructionStart { position, line } => {
                write!(f, "fetch {position:#05x} (line {line})")
            }
            Self::MemoryAccess {
                address,
                value,
                is_write,
            } => {
                let kind = if *is_write { "write" } else { "read" };
                write!(f, "{kind} [{address}] = {value}")
            }
            Self::InstructionRetired {
                position,
                program_counter,
                accumulator,
            } => write!(
                f,
                "retire {position:#05x}: pc={program_counter:#05x} acc={accumulator}"
            ),
            Self::FaultRaised {
                cause,
                address,
                line,
            } => write!(f, "fault at line {line}: {cause} at address {address}"),
        }
    }
}

/// Receiver for trace events.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn on_event(&mut self, _event: TraceEvent) {}
}

/// Sink that keeps every event in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceLog {
    /// Recorded events, oldest first.
    pub events: Vec<TraceEvent>,
}

impl TraceSink for TraceLog {
    fn on_event(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn on_event(&mut self, event: TraceEvent) {
        (**self).on_event(event);
    }
}
