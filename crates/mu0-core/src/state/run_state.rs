use crate::{FaultCode, StepOutcome};

/// Execution-state machine for host-observable controller flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// `STOP` was reached.
    Halted,
    /// The program counter ran past the last instruction.
    Completed,
    /// A fault is latched; nothing more runs until reset.
    Faulted(FaultCode),
}

impl RunState {
    /// State a controller is in after observing `outcome`.
    #[must_use]
    pub const fn after(outcome: &StepOutcome) -> Self {
        match outcome {
            StepOutcome::Continued { .. } => Self::Running,
            StepOutcome::Halted { .. } => Self::Halted,
            StepOutcome::Completed => Self::Completed,
            StepOutcome::Fault { cause, .. } => Self::Faulted(*cause),
        }
    }

    /// Returns `true` once no further instruction can run without a reset.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Returns the latched fault, if this state is faulted.
    #[must_use]
    pub const fn latched_fault(self) -> Option<FaultCode> {
        match self {
            Self::Faulted(cause) => Some(cause),
            Self::Running | Self::Halted | Self::Completed => None,
        }
    }
}
