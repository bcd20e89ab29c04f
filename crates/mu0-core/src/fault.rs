use thiserror::Error;

use crate::Address;

/// Runtime fault taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// `LOAD`/`ADD`/`SUB` read a cell that was never initialized or written.
    #[error("invalid memory access")]
    InvalidMemoryAccess = 0x01,
    /// `ADD`/`SUB` produced a result outside the host accumulator range.
    #[error("accumulator overflow")]
    AccumulatorOverflow = 0x02,
}

impl FaultCode {
    /// Stable numeric code.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable numeric code back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::InvalidMemoryAccess),
            0x02 => Some(Self::AccumulatorOverflow),
            _ => None,
        }
    }
}

/// A fault together with where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[error("line {line}: {cause} at address {address}")]
pub struct RuntimeError {
    /// What went wrong.
    pub cause: FaultCode,
    /// Operand address of the faulting instruction.
    pub address: Address,
    /// 1-based source line of the faulting instruction.
    pub line: u32,
}
