//! Text rendering of words, memory dumps and step reports.
//!
//! Signed values are shown as their raw 12-bit two's-complement token
//! followed by the decimal value, e.g. `0xffe (dec: -2)`.

use std::fmt;

use crate::{encode, Memory, StepOutcome, Value};

/// Formats a signed value as a `0x`-prefixed, at least three-digit raw word.
///
/// Accumulator values outside the 12-bit range are rendered as-is rather
/// than wrapped.
#[must_use]
pub fn format_word(value: Value) -> String {
    let raw = encode(value);
    if raw < 0 {
        format!("-{:#05x}", raw.unsigned_abs())
    } else {
        format!("{raw:#05x}")
    }
}

/// Formats a program position as a `0x`-prefixed, three-digit token.
#[must_use]
pub fn format_position(position: usize) -> String {
    format!("{position:#05x}")
}

/// Displays one line per populated cell: `  @0x010: 0x005 (dec: 5)`.
#[derive(Debug, Clone, Copy)]
pub struct MemoryDump<'a>(pub &'a Memory);

impl fmt::Display for MemoryDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (address, value)) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "  @{address}: {} (dec: {value})", format_word(value))?;
        }
        Ok(())
    }
}

/// Multi-line report of one executed instruction and the state after it.
///
/// Returns `None` for terminal outcomes; see [`terminal_message`].
#[must_use]
pub fn step_report(outcome: &StepOutcome, memory: &Memory) -> Option<String> {
    let StepOutcome::Continued {
        executed,
        position,
        program_counter,
        accumulator,
    } = outcome
    else {
        return None;
    };

    let mut report = format!(
        "Executed line {}, instr. {}: {executed}\n",
        executed.source_line(),
        format_position(*position),
    );
    report.push_str(&format!(
        "Comment: {}\n",
        executed.comment().unwrap_or("None")
    ));
    report.push_str(&format!(
        "  Current PC value:  {}\n",
        format_position(*program_counter)
    ));
    report.push_str(&format!(
        "  Current ACC value: {} (dec: {accumulator})\n",
        format_word(*accumulator)
    ));
    report.push_str("Memory dump after instruction execution:");
    if !memory.is_empty() {
        report.push('\n');
        report.push_str(&MemoryDump(memory).to_string());
    }
    Some(report)
}

/// One-line description of a terminal outcome.
///
/// Returns `None` for `Continued`.
#[must_use]
pub fn terminal_message(outcome: &StepOutcome) -> Option<String> {
    match outcome {
        StepOutcome::Continued { .. } => None,
        StepOutcome::Halted { line } => Some(format!("Reached STOP instruction at line {line}.")),
        StepOutcome::Completed => Some("Reached end of instructions.".to_string()),
        StepOutcome::Fault {
            cause,
            address,
            line,
        } => Some(format!("Error at line {line}: {cause} at address {address}.")),
    }
}
