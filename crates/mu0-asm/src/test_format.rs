//! Parsing for inline test assertion syntax.
//!
//! This module parses `mu0test` block content into structured assertions.
//!
//! ## Supported Syntax
//!
//! - Accumulator: `ACC == 10`, `ACC != 0xFFE`
//! - Program counter: `PC == 4`
//! - Memory: `[0x10] == 5`, `[0x20] != -1`
//! - Terminal outcome: `END == halted`, `END != fault`
//! - Comments: `;` to end of line
//!
//! Values are decimal (optionally negative) or `0x` hex. Hex accumulator and
//! memory values are 12-bit words decoded as two's complement, so `0xFFE`
//! means -2. Program counter values are plain positions.

#![allow(clippy::option_if_let_else)]

use std::fmt;

use mu0_core::{decode, Address, Value};

/// A parsed assertion from a `mu0test` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    /// Compare the accumulator.
    Accumulator {
        /// The comparison operator.
        operator: ComparisonOp,
        /// The expected signed value.
        expected: Value,
    },
    /// Compare the program counter.
    ProgramCounter {
        /// The comparison operator.
        operator: ComparisonOp,
        /// The expected program position.
        expected: usize,
    },
    /// Compare a memory cell. An absent cell never equals anything.
    Memory {
        /// The cell to check.
        address: Address,
        /// The comparison operator.
        operator: ComparisonOp,
        /// The expected signed value.
        expected: Value,
    },
    /// Compare how the run ended.
    End {
        /// The comparison operator.
        operator: ComparisonOp,
        /// The expected terminal outcome.
        expected: EndState,
    },
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accumulator { operator, expected } => write!(f, "ACC {operator} {expected}"),
            Self::ProgramCounter { operator, expected } => write!(f, "PC {operator} {expected}"),
            Self::Memory {
                address,
                operator,
                expected,
            } => write!(f, "[{address}] {operator} {expected}"),
            Self::End { operator, expected } => write!(f, "END {operator} {expected}"),
        }
    }
}

/// Comparison operator for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// Assert equality (`==`).
    Equal,
    /// Assert inequality (`!=`).
    NotEqual,
}

impl ComparisonOp {
    /// Applies the operator to an equality result.
    #[must_use]
    pub const fn holds(self, equal: bool) -> bool {
        match self {
            Self::Equal => equal,
            Self::NotEqual => !equal,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
        }
    }
}

/// How a run ended, as named in `END` assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndState {
    /// A `STOP` instruction was reached.
    Halted,
    /// The program counter ran past the last instruction.
    Completed,
    /// An instruction faulted.
    Fault,
}

impl fmt::Display for EndState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halted => write!(f, "halted"),
            Self::Completed => write!(f, "completed"),
            Self::Fault => write!(f, "fault"),
        }
    }
}

/// A parsed test block with its assertions and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTestBlock {
    /// The parsed assertions in order.
    pub assertions: Vec<Assertion>,
    /// 1-indexed line number where the block starts.
    pub start_line: u32,
    /// 1-indexed line number where the block ends.
    pub end_line: u32,
}

/// Error parsing an assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAssertionError {
    /// The line number (1-indexed) within the test block.
    pub line_in_block: usize,
    /// The problematic text.
    pub text: String,
    /// Description of the error.
    pub message: String,
}

impl fmt::Display for ParseAssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} (in '{}')",
            self.line_in_block, self.message, self.text
        )
    }
}

impl std::error::Error for ParseAssertionError {}

/// Parses a test block's content into structured assertions.
///
/// Each non-empty, non-comment line is one assertion.
///
/// # Errors
///
/// Returns the first [`ParseAssertionError`] encountered.
pub fn parse_test_block(
    content: &str,
    start_line: u32,
    end_line: u32,
) -> Result<ParsedTestBlock, ParseAssertionError> {
    let mut assertions = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let stripped = strip_comment(line).trim();
        if stripped.is_empty() {
            continue;
        }

        let assertion = parse_assertion(stripped).map_err(|message| ParseAssertionError {
            line_in_block: idx + 1,
            text: stripped.to_string(),
            message,
        })?;
        assertions.push(assertion);
    }

    Ok(ParsedTestBlock {
        assertions,
        start_line,
        end_line,
    })
}

fn strip_comment(line: &str) -> &str {
    line.split_once(';').map_or(line, |(before, _)| before)
}

/// Parses a single assertion line.
fn parse_assertion(text: &str) -> Result<Assertion, String> {
    let (subject, rest) = split_subject(text.trim())?;
    let (operator, rest) = parse_comparison_op(rest)?;
    let value = rest.trim();

    if let Some(address) = subject
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
    {
        return Ok(Assertion::Memory {
            address: parse_address(address.trim())?,
            operator,
            expected: parse_value(value)?,
        });
    }

    match subject.to_ascii_uppercase().as_str() {
        "ACC" => Ok(Assertion::Accumulator {
            operator,
            expected: parse_value(value)?,
        }),
        "PC" => Ok(Assertion::ProgramCounter {
            operator,
            expected: parse_position(value)?,
        }),
        "END" => Ok(Assertion::End {
            operator,
            expected: parse_end_state(value)?,
        }),
        _ => Err(format!("unknown assertion subject '{subject}'")),
    }
}

/// Splits `subject op value` at the operator.
fn split_subject(text: &str) -> Result<(&str, &str), String> {
    let at = text
        .find(['=', '!'])
        .ok_or_else(|| "expected '==' or '!='".to_string())?;
    let (subject, rest) = text.split_at(at);
    let subject = subject.trim();
    if subject.is_empty() {
        return Err("expected 'ACC', 'PC', 'END' or '[address]'".to_string());
    }
    Ok((subject, rest))
}

fn parse_comparison_op(text: &str) -> Result<(ComparisonOp, &str), String> {
    if let Some(rest) = text.strip_prefix("==") {
        Ok((ComparisonOp::Equal, rest))
    } else if let Some(rest) = text.strip_prefix("!=") {
        Ok((ComparisonOp::NotEqual, rest))
    } else {
        Err("expected '==' or '!='".to_string())
    }
}

fn hex_digits(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

fn parse_hex_word(digits: &str) -> Result<u16, String> {
    if digits.is_empty() || digits.len() > 3 {
        return Err(format!("hex literal '0x{digits}' must have 1-3 digits"));
    }
    u16::from_str_radix(digits, 16).map_err(|_| format!("invalid hex literal '0x{digits}'"))
}

/// Parses a signed value: decimal, or a 12-bit two's-complement hex word.
fn parse_value(text: &str) -> Result<Value, String> {
    if text.is_empty() {
        return Err("expected a value".to_string());
    }
    if let Some(digits) = hex_digits(text) {
        return parse_hex_word(digits).map(decode);
    }
    text.parse::<Value>()
        .map_err(|_| format!("invalid value '{text}'"))
}

fn parse_position(text: &str) -> Result<usize, String> {
    if text.is_empty() {
        return Err("expected a program position".to_string());
    }
    let parsed = hex_digits(text).map_or_else(
        || text.parse::<usize>(),
        |digits| usize::from_str_radix(digits, 16),
    );
    parsed.map_err(|_| format!("invalid program position '{text}'"))
}

fn parse_address(text: &str) -> Result<Address, String> {
    let raw = hex_digits(text).map_or_else(
        || {
            text.parse::<u16>()
                .map_err(|_| format!("invalid address '{text}'"))
        },
        parse_hex_word,
    )?;
    Address::new(raw).ok_or_else(|| format!("address '{text}' exceeds 0xFFF"))
}

fn parse_end_state(text: &str) -> Result<EndState, String> {
    match text.to_ascii_lowercase().as_str() {
        "halted" | "stop" => Ok(EndState::Halted),
        "completed" | "end" => Ok(EndState::Completed),
        "fault" | "faulted" => Ok(EndState::Fault),
        _ => Err(format!(
            "unknown end state '{text}', expected halted, completed or fault"
        )),
    }
}

#[cfg(test)]
mod tests {
    use mu0_core::Address;

    use super::{parse_assertion, parse_test_block, Assertion, ComparisonOp, EndState};

    fn addr(raw: u16) -> Address {
        Address::new(raw).expect("test address fits in 12 bits")
    }

    #[test]
    fn parse_accumulator_decimal_and_hex() {
        assert_eq!(
            parse_assertion("ACC == 10"),
            Ok(Assertion::Accumulator {
                operator: ComparisonOp::Equal,
                expected: 10,
            })
        );
        assert_eq!(
            parse_assertion("acc != 0xFFE"),
            Ok(Assertion::Accumulator {
                operator: ComparisonOp::NotEqual,
                expected: -2,
            })
        );
        assert_eq!(
            parse_assertion("ACC == -5000"),
            Ok(Assertion::Accumulator {
                operator: ComparisonOp::Equal,
                expected: -5000,
            })
        );
    }

    #[test]
    fn parse_program_counter() {
        assert_eq!(
            parse_assertion("PC == 0x3"),
            Ok(Assertion::ProgramCounter {
                operator: ComparisonOp::Equal,
                expected: 3,
            })
        );
    }

    #[test]
    fn parse_memory() {
        assert_eq!(
            parse_assertion("[0x10] == 5"),
            Ok(Assertion::Memory {
                address: addr(0x10),
                operator: ComparisonOp::Equal,
                expected: 5,
            })
        );
        assert_eq!(
            parse_assertion("[ 16 ]!=0xFFF"),
            Ok(Assertion::Memory {
                address: addr(0x10),
                operator: ComparisonOp::NotEqual,
                expected: -1,
            })
        );
    }

    #[test]
    fn parse_end_states() {
        assert_eq!(
            parse_assertion("END == halted"),
            Ok(Assertion::End {
                operator: ComparisonOp::Equal,
                expected: EndState::Halted,
            })
        );
        assert_eq!(
            parse_assertion("end != FAULT"),
            Ok(Assertion::End {
                operator: ComparisonOp::NotEqual,
                expected: EndState::Fault,
            })
        );
    }

    #[test]
    fn rejects_malformed_assertions() {
        assert!(parse_assertion("ACC 10").is_err());
        assert!(parse_assertion("R0 == 1").is_err());
        assert!(parse_assertion("ACC ==").is_err());
        assert!(parse_assertion("[0x1000] == 1").is_err());
        assert!(parse_assertion("ACC == 0x1000").is_err());
        assert!(parse_assertion("END == running").is_err());
    }

    #[test]
    fn block_skips_comments_and_reports_line_in_block() {
        let block = parse_test_block("; header\nACC == 1 ; trailing\n\nEND == halted", 3, 8)
            .expect("block parses");
        assert_eq!(block.assertions.len(), 2);
        assert_eq!(block.start_line, 3);
        assert_eq!(block.end_line, 8);

        let error = parse_test_block("ACC == 1\nBOGUS", 1, 4).expect_err("bad line");
        assert_eq!(error.line_in_block, 2);
        assert_eq!(error.text, "BOGUS");
    }

    #[test]
    fn assertions_display_in_source_form() {
        let assertion = parse_assertion("[0x10] != 5").expect("parses");
        assert_eq!(assertion.to_string(), "[0x010] != 5");
    }
}
