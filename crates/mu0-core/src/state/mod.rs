//! Machine state owned by a single run.

/// Accumulator, program counter and data memory.
pub mod machine;
/// Host-observable run-state machine.
pub mod run_state;

pub use machine::MachineState;
pub use run_state::RunState;
