//! Helper functions for instruction execution.

use crate::{FaultCode, Opcode, Value};

/// Applies an arithmetic opcode to the accumulator.
///
/// `LOAD` replaces, `ADD`/`SUB` accumulate. The result is not wrapped to 12
/// bits; only leaving the host `i64` range is reported.
///
/// # Errors
///
/// Returns [`FaultCode::AccumulatorOverflow`] when `ADD`/`SUB` leaves the
/// `i64` range.
pub const fn apply_arithmetic(
    opcode: Opcode,
    accumulator: Value,
    operand: Value,
) -> Result<Value, FaultCode> {
    let result = match opcode {
        Opcode::Add => accumulator.checked_add(operand),
        Opcode::Sub => accumulator.checked_sub(operand),
        Opcode::Load
        | Opcode::Store
        | Opcode::Jump
        | Opcode::Jge
        | Opcode::Jne
        | Opcode::Stop => Some(operand),
    };
    match result {
        Some(value) => Ok(value),
        None => Err(FaultCode::AccumulatorOverflow),
    }
}

/// Returns `true` when a branch opcode transfers control for `accumulator`.
///
/// `JGE` includes zero; `JNE` excludes it. Non-branch opcodes never branch.
#[must_use]
pub const fn branch_taken(opcode: Opcode, accumulator: Value) -> bool {
    match opcode {
        Opcode::Jump => true,
        Opcode::Jge => accumulator >= 0,
        Opcode::Jne => accumulator != 0,
        Opcode::Load | Opcode::Store | Opcode::Add | Opcode::Sub | Opcode::Stop => false,
    }
}
