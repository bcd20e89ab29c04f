//! Immutable assembled program: initial memory image plus instruction
//! sequence.

use crate::{Instruction, Memory};

/// Output of the assembler and input of every run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Program {
    initial_memory: Memory,
    instructions: Vec<Instruction>,
}

impl Program {
    /// Bundles an initial memory image with its instruction sequence.
    #[must_use]
    pub const fn new(initial_memory: Memory, instructions: Vec<Instruction>) -> Self {
        Self {
            initial_memory,
            instructions,
        }
    }

    /// Memory image every run starts from.
    #[must_use]
    pub const fn initial_memory(&self) -> &Memory {
        &self.initial_memory
    }

    /// Instructions indexed by program position.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Instruction at a program position.
    #[must_use]
    pub fn instruction(&self, position: usize) -> Option<&Instruction> {
        self.instructions.get(position)
    }

    /// Number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` for a program with no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Splits the program back into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Memory, Vec<Instruction>) {
        (self.initial_memory, self.instructions)
    }
}
