//! Core execution engine for the MU0 accumulator machine.

/// 12-bit words, addresses and two's-complement conversion.
pub mod word;
pub use word::{
    decode, encode, Address, AddressOutOfRange, Value, WORD_BITS, WORD_MASK, WORD_MAX_POSITIVE,
    WORD_MAX_SIGNED, WORD_MIN_SIGNED, WORD_MODULUS,
};

/// Opcode set and classification table.
pub mod opcode;
pub use opcode::{Opcode, OperandForm, OPCODE_TABLE};

/// Decoded instruction record.
pub mod instruction;
pub use instruction::Instruction;

/// Sparse data memory.
pub mod memory;
pub use memory::Memory;

/// Assembled program image.
pub mod program;
pub use program::Program;

/// Fault taxonomy for runtime errors.
pub mod fault;
pub use fault::{FaultCode, RuntimeError};

/// Architectural machine state and run-state model.
pub mod state;
pub use state::{MachineState, RunState};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    EngineConfig, MachineSnapshot, NullTraceSink, RunOutcome, StepOutcome, TraceEvent, TraceLog,
    TraceSink,
};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{
    commit_execution, execute_instruction, run_to_completion, run_until, step, step_traced,
    ExecuteState,
};

/// Stepping controller for CLI and interactive hosts.
pub mod controller;
pub use controller::Controller;

/// Text rendering for dumps and step reports.
pub mod diag;
pub use diag::{format_position, format_word, step_report, terminal_message, MemoryDump};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
