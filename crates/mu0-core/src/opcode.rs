//! Opcode set and per-opcode classification table.

use std::fmt;

/// The eight MU0 operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Opcode {
    /// `ACC = mem[addr]`.
    Load = 0x0,
    /// `mem[addr] = ACC`.
    Store = 0x1,
    /// `ACC += mem[addr]`.
    Add = 0x2,
    /// `ACC -= mem[addr]`.
    Sub = 0x3,
    /// Unconditional jump to a program position.
    Jump = 0x4,
    /// Jump when `ACC >= 0`.
    Jge = 0x5,
    /// Jump when `ACC != 0`.
    Jne = 0x6,
    /// Halt execution.
    Stop = 0x7,
}

/// How an opcode uses its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandForm {
    /// Operand is a data address that is read.
    MemoryRead,
    /// Operand is a data address that is written.
    MemoryWrite,
    /// Operand is a program position.
    Branch,
    /// No operand.
    None,
}

/// Canonical mnemonic and operand form for every opcode, in opcode order.
pub const OPCODE_TABLE: &[(Opcode, &str, OperandForm)] = &[
    (Opcode::Load, "LOAD", OperandForm::MemoryRead),
    (Opcode::Store, "STORE", OperandForm::MemoryWrite),
    (Opcode::Add, "ADD", OperandForm::MemoryRead),
    (Opcode::Sub, "SUB", OperandForm::MemoryRead),
    (Opcode::Jump, "JUMP", OperandForm::Branch),
    (Opcode::Jge, "JGE", OperandForm::Branch),
    (Opcode::Jne, "JNE", OperandForm::Branch),
    (Opcode::Stop, "STOP", OperandForm::None),
];

impl Opcode {
    /// Every opcode in table order.
    pub const ALL: [Self; 8] = [
        Self::Load,
        Self::Store,
        Self::Add,
        Self::Sub,
        Self::Jump,
        Self::Jge,
        Self::Jne,
        Self::Stop,
    ];

    /// Canonical upper-case mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        OPCODE_TABLE[self as usize].1
    }

    /// Operand usage for this opcode.
    #[must_use]
    pub const fn operand_form(self) -> OperandForm {
        OPCODE_TABLE[self as usize].2
    }

    /// Returns `true` when the opcode requires an address operand.
    #[must_use]
    pub const fn takes_operand(self) -> bool {
        !matches!(self.operand_form(), OperandForm::None)
    }

    /// Returns `true` for `LOAD`, `ADD` and `SUB`.
    #[must_use]
    pub const fn reads_memory(self) -> bool {
        matches!(self.operand_form(), OperandForm::MemoryRead)
    }

    /// Returns `true` for `JUMP`, `JGE` and `JNE`.
    #[must_use]
    pub const fn is_branch(self) -> bool {
        matches!(self.operand_form(), OperandForm::Branch)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
