//! Fetch-decode-execute engine.
//!
//! One step is:
//! 1. Fetch the instruction at `PC`, or report `Completed` past the end
//! 2. Report `Halted` for `STOP` without advancing `PC`
//! 3. Read the memory operand for `LOAD`/`ADD`/`SUB`
//! 4. Compute the accumulator, memory write and next `PC`
//! 5. Commit all of them together
//!
//! Faults are precise: a faulting instruction commits nothing.

mod helpers;

pub use helpers::{apply_arithmetic, branch_taken};

use crate::{
    Address, FaultCode, Instruction, MachineState, NullTraceSink, Opcode, RunOutcome,
    StepOutcome, TraceEvent, TraceSink, Value,
};

/// Side effects of one instruction, computed before anything is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteState {
    /// Value read from memory for `LOAD`/`ADD`/`SUB`.
    pub memory_read: Option<(Address, Value)>,
    /// Accumulator after the instruction.
    pub accumulator: Value,
    /// Cell written by `STORE`.
    pub memory_write: Option<(Address, Value)>,
    /// Program counter after the instruction.
    pub next_pc: usize,
}

/// Computes the effects of a non-`STOP` instruction without mutating state.
///
/// # Errors
///
/// Returns a [`FaultCode`] when the operand cell is absent or the
/// accumulator leaves the host range.
pub fn execute_instruction(
    instruction: &Instruction,
    state: &MachineState,
) -> Result<ExecuteState, FaultCode> {
    let opcode = instruction.opcode();
    let address = instruction.target();
    let accumulator = state.accumulator();
    let fall_through = state.program_counter() + 1;

    let mut effects = ExecuteState {
        memory_read: None,
        accumulator,
        memory_write: None,
        next_pc: fall_through,
    };

    if opcode.reads_memory() {
        let operand = state.memory().read(address)?;
        effects.memory_read = Some((address, operand));
        effects.accumulator = apply_arithmetic(opcode, accumulator, operand)?;
    } else if opcode == Opcode::Store {
        effects.memory_write = Some((address, accumulator));
    } else if branch_taken(opcode, accumulator) {
        effects.next_pc = address.as_position();
    }

    Ok(effects)
}

/// Applies precomputed effects to the machine state.
pub fn commit_execution<S: TraceSink + ?Sized>(
    effects: &ExecuteState,
    state: &mut MachineState,
    sink: &mut S,
) {
    if let Some((address, value)) = effects.memory_read {
        sink.on_event(TraceEvent::MemoryAccess {
            address,
            value,
            is_write: false,
        });
    }
    if let Some((address, value)) = effects.memory_write {
        state.memory_mut().write(address, value);
        sink.on_event(TraceEvent::MemoryAccess {
            address,
            value,
            is_write: true,
        });
    }
    state.set_accumulator(effects.accumulator);
    state.set_program_counter(effects.next_pc);
}

/// Executes one instruction.
pub fn step(instructions: &[Instruction], state: &mut MachineState) -> StepOutcome {
    step_traced(instructions, state, &mut NullTraceSink)
}

/// Executes one instruction, reporting trace events to `sink`.
pub fn step_traced<S: TraceSink + ?Sized>(
    instructions: &[Instruction],
    state: &mut MachineState,
    sink: &mut S,
) -> StepOutcome {
    let position = state.program_counter();
    let Some(instruction) = instructions.get(position) else {
        return StepOutcome::Completed;
    };
    let line = instruction.source_line();

    sink.on_event(TraceEvent::InstructionStart { position, line });

    if instruction.opcode() == Opcode::Stop {
        return StepOutcome::Halted { line };
    }

    let effects = match execute_instruction(instruction, state) {
        Ok(effects) => effects,
        Err(cause) => {
            let address = instruction.target();
            sink.on_event(TraceEvent::FaultRaised {
                cause,
                address,
                line,
            });
            return StepOutcome::Fault {
                cause,
                address,
                line,
            };
        }
    };

    commit_execution(&effects, state, &mut *sink);

    sink.on_event(TraceEvent::InstructionRetired {
        position,
        program_counter: state.program_counter(),
        accumulator: state.accumulator(),
    });

    StepOutcome::Continued {
        executed: instruction.clone(),
        position,
        program_counter: state.program_counter(),
        accumulator: state.accumulator(),
    }
}

/// Steps until a terminal outcome and returns it.
///
/// Does not return for programs that loop forever; use [`run_until`] with a
/// step limit when that matters.
pub fn run_to_completion(instructions: &[Instruction], state: &mut MachineState) -> StepOutcome {
    run_until(instructions, state, None, &mut NullTraceSink).final_step
}

/// Steps until a terminal outcome or until `step_limit` instructions ran.
///
/// At least one step is always attempted, so a limit of zero behaves like one.
pub fn run_until<S: TraceSink + ?Sized>(
    instructions: &[Instruction],
    state: &mut MachineState,
    step_limit: Option<u64>,
    sink: &mut S,
) -> RunOutcome {
    let mut steps = 0u64;
    loop {
        let outcome = step_traced(instructions, state, &mut *sink);
        if outcome.is_terminal() {
            return RunOutcome {
                steps,
                final_step: outcome,
            };
        }
        steps += 1;
        if step_limit.is_some_and(|limit| steps >= limit) {
            return RunOutcome {
                steps,
                final_step: outcome,
            };
        }
    }
}
