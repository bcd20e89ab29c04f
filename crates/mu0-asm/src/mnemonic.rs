//! Mnemonic resolution derived from the core opcode table.

use std::sync::OnceLock;

use mu0_core::{Opcode, OPCODE_TABLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MnemonicEntry {
    name: &'static str,
    opcode: Opcode,
}

/// Accepted spellings, canonical names first. `LDA`, `STO` and `JMP` are
/// aliases that collapse onto the same opcode.
const MNEMONIC_ENTRIES: &[MnemonicEntry] = &[
    MnemonicEntry {
        name: "LOAD",
        opcode: Opcode::Load,
    },
    MnemonicEntry {
        name: "STORE",
        opcode: Opcode::Store,
    },
    MnemonicEntry {
        name: "ADD",
        opcode: Opcode::Add,
    },
    MnemonicEntry {
        name: "SUB",
        opcode: Opcode::Sub,
    },
    MnemonicEntry {
        name: "JUMP",
        opcode: Opcode::Jump,
    },
    MnemonicEntry {
        name: "JGE",
        opcode: Opcode::Jge,
    },
    MnemonicEntry {
        name: "JNE",
        opcode: Opcode::Jne,
    },
    MnemonicEntry {
        name: "STOP",
        opcode: Opcode::Stop,
    },
    MnemonicEntry {
        name: "LDA",
        opcode: Opcode::Load,
    },
    MnemonicEntry {
        name: "STO",
        opcode: Opcode::Store,
    },
    MnemonicEntry {
        name: "JMP",
        opcode: Opcode::Jump,
    },
];

/// Keyword introducing a memory initializer line.
pub const INITIALIZER_KEYWORD: &str = "INI";

fn entries_verified_against_core() -> &'static [MnemonicEntry] {
    static VERIFIED_ENTRIES: OnceLock<Vec<MnemonicEntry>> = OnceLock::new();
    VERIFIED_ENTRIES.get_or_init(|| {
        for (opcode, canonical, _) in OPCODE_TABLE {
            let covered = MNEMONIC_ENTRIES
                .iter()
                .any(|entry| entry.opcode == *opcode && entry.name == *canonical);
            assert!(covered, "mnemonic table diverged from mu0-core table");
        }
        MNEMONIC_ENTRIES.to_vec()
    })
}

/// Resolves a mnemonic or alias to its opcode.
///
/// Matching is ASCII case-insensitive.
#[must_use]
pub fn resolve_mnemonic(name: &str) -> Option<Opcode> {
    entries_verified_against_core()
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
        .map(|entry| entry.opcode)
}

/// Returns `true` for the initializer keyword in any letter case.
#[must_use]
pub fn is_initializer_keyword(word: &str) -> bool {
    word.eq_ignore_ascii_case(INITIALIZER_KEYWORD)
}
