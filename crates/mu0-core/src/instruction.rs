//! Decoded instruction record produced by the assembler.

use std::fmt;

use crate::{Address, Opcode};

/// A single decoded instruction with its source provenance.
///
/// Instructions are immutable once built; the constructor guarantees that
/// `STOP` has no operand and every other opcode has exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "InstructionRecord"))]
pub struct Instruction {
    opcode: Opcode,
    operand: Option<Address>,
    comment: Option<String>,
    source_line: u32,
}

impl Instruction {
    /// Builds an instruction, returning `None` when the operand presence does
    /// not match the opcode.
    #[must_use]
    pub const fn new(opcode: Opcode, operand: Option<Address>, source_line: u32) -> Option<Self> {
        if opcode.takes_operand() != operand.is_some() {
            return None;
        }
        Some(Self {
            opcode,
            operand,
            comment: None,
            source_line,
        })
    }

    /// Builds an operand-carrying instruction. `STOP` ignores the address.
    #[must_use]
    pub const fn with_operand(opcode: Opcode, operand: Address, source_line: u32) -> Self {
        Self {
            opcode,
            operand: if opcode.takes_operand() {
                Some(operand)
            } else {
                None
            },
            comment: None,
            source_line,
        }
    }

    /// Builds a `STOP` instruction.
    #[must_use]
    pub const fn stop(source_line: u32) -> Self {
        Self {
            opcode: Opcode::Stop,
            operand: None,
            comment: None,
            source_line,
        }
    }

    /// Attaches a trailing source comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The operation.
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The address operand; `None` only for `STOP`.
    #[must_use]
    pub const fn operand(&self) -> Option<Address> {
        self.operand
    }

    /// Operand address, or `0x000` for `STOP`.
    #[must_use]
    pub const fn target(&self) -> Address {
        match self.operand {
            Some(address) => address,
            None => Address::MIN,
        }
    }

    /// Trailing comment captured from source, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// 1-based source line the instruction was parsed from.
    #[must_use]
    pub const fn source_line(&self) -> u32 {
        self.source_line
    }
}

/// Unchecked wire form; deserialization goes through [`Instruction::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct InstructionRecord {
    opcode: Opcode,
    operand: Option<Address>,
    comment: Option<String>,
    source_line: u32,
}

#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
#[error("operand does not match opcode {0}")]
struct OperandShapeError(Opcode);

#[cfg(feature = "serde")]
impl TryFrom<InstructionRecord> for Instruction {
    type Error = OperandShapeError;

    fn try_from(record: InstructionRecord) -> Result<Self, Self::Error> {
        let instruction = Self::new(record.opcode, record.operand, record.source_line)
            .ok_or(OperandShapeError(record.opcode))?;
        Ok(match record.comment {
            Some(comment) => instruction.with_comment(comment),
            None => instruction,
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Some(address) => write!(f, "{} {address}", self.opcode),
            None => write!(f, "{}", self.opcode),
        }
    }
}
