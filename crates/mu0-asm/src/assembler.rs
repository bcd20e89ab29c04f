//! Program assembly pipeline.
//!
//! 1. **Load**: read the file and extract program lines (`source`)
//! 2. **Parse**: recognize every line, stopping at the first rejected one
//! 3. **Collect**: initializers fill the memory image, instructions are
//!    appended in order
//!
//! [`parse`] is the in-memory entry point used by front-ends; [`assemble_file`]
//! adds file loading and literate extraction for the command line.

use std::path::Path;

use mu0_core::{Memory, Program};

use crate::errors::{AssembleError, SyntaxError};
use crate::parser::{parse_line, ParsedLine};
use crate::source::{
    extract_plain_source, extract_source, read_source, SourceContent, SourceLine, TestBlock,
};

/// Assembled program plus the metadata the command line reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// The immutable program image.
    pub program: Program,
    /// Lines that produced an initializer or instruction, in order.
    pub recognized: Vec<SourceLine>,
    /// `mu0test` blocks from literate sources.
    pub test_blocks: Vec<TestBlock>,
}

/// Parses plain program text.
///
/// # Errors
///
/// Returns the first [`SyntaxError`]; no partial program is produced.
pub fn parse(text: &str) -> Result<Program, SyntaxError> {
    assemble_lines(&extract_plain_source(text)).map(|assembly| assembly.program)
}

/// Assembles already-extracted source lines.
///
/// Duplicate initializers for the same address are not rejected; the last
/// one wins.
///
/// # Errors
///
/// Returns the first [`SyntaxError`]; no partial program is produced.
pub fn assemble_lines(lines: &[SourceLine]) -> Result<Assembly, SyntaxError> {
    let mut memory = Memory::new();
    let mut instructions = Vec::new();
    let mut recognized = Vec::new();

    for line in lines {
        match parse_line(&line.text, line.original_line)? {
            ParsedLine::Blank => continue,
            ParsedLine::Initializer { address, value } => {
                memory.write(address, value);
            }
            ParsedLine::Instruction(instruction) => instructions.push(instruction),
        }
        recognized.push(line.clone());
    }

    Ok(Assembly {
        program: Program::new(memory, instructions),
        recognized,
        test_blocks: Vec::new(),
    })
}

/// Assembles extracted source content, keeping its test blocks.
///
/// # Errors
///
/// Returns the first [`SyntaxError`].
pub fn assemble_source(content: SourceContent) -> Result<Assembly, SyntaxError> {
    let mut assembly = assemble_lines(&content.lines)?;
    assembly.test_blocks = content.test_blocks;
    Ok(assembly)
}

/// Reads, extracts and assembles a source file.
///
/// # Errors
///
/// Returns [`AssembleError::Source`] when the file cannot be read and
/// [`AssembleError::Syntax`] when a line is rejected.
pub fn assemble_file(path: &Path) -> Result<Assembly, AssembleError> {
    let text = read_source(path)?;
    assemble_source(extract_source(path, &text)).map_err(|error| AssembleError::Syntax {
        file: path.to_path_buf(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use mu0_core::{Address, Opcode};

    use super::{assemble_file, parse};
    use crate::errors::{AssembleError, SourceError, SyntaxErrorKind};

    fn addr(raw: u16) -> Address {
        Address::new(raw).expect("test address fits in 12 bits")
    }

    #[test]
    fn parse_builds_memory_and_instructions() {
        let program = parse("INI 0x10 0x005\n\n; double it\nLOAD 0x10\nADD 0x10\nSTOP\n")
            .expect("program parses");

        assert_eq!(program.initial_memory().get(addr(0x10)), Some(5));
        let shape: Vec<_> = program
            .instructions()
            .iter()
            .map(|instruction| (instruction.opcode(), instruction.source_line()))
            .collect();
        assert_eq!(
            shape,
            vec![(Opcode::Load, 4), (Opcode::Add, 5), (Opcode::Stop, 6)]
        );
    }

    #[test]
    fn syntax_error_discards_everything() {
        let error = parse("INI 0x10 0x005\nLOAD 0x10\nXYZ 0x1\nSTOP").expect_err("rejected");

        assert_eq!(error.line, 3);
        assert_eq!(error.text, "XYZ 0x1");
        assert_eq!(
            error.kind,
            SyntaxErrorKind::UnknownMnemonic("XYZ".to_string())
        );
    }

    #[test]
    fn duplicate_initializer_last_wins() {
        let program = parse("INI 0x1 0x001\nINI 0x1 0x002\n").expect("program parses");

        assert_eq!(program.initial_memory().get(addr(0x1)), Some(2));
        assert!(program.is_empty());
    }

    #[test]
    fn empty_text_is_an_empty_program() {
        let program = parse("").expect("program parses");
        assert!(program.is_empty());
        assert!(program.initial_memory().is_empty());
    }

    #[test]
    fn assemble_file_reports_recognized_lines_and_tests() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("prog.md");
        fs::write(
            &path,
            "# Prog\n\n```mu0\nINI 0x1 0x002\n; note\nLOAD 0x1\n```\n\n```mu0test\nACC == 2\n```\n",
        )
        .expect("write source");

        let assembly = assemble_file(&path).expect("assembles");

        let recognized: Vec<_> = assembly
            .recognized
            .iter()
            .map(|line| line.original_line)
            .collect();
        assert_eq!(recognized, vec![4, 6]);
        assert_eq!(assembly.test_blocks.len(), 1);
        assert_eq!(assembly.program.len(), 1);
    }

    #[test]
    fn assemble_file_wraps_errors_with_the_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("missing.mu0");
        assert_eq!(
            assemble_file(&missing),
            Err(AssembleError::Source(SourceError::NotFound(missing.clone())))
        );

        let bad = dir.path().join("bad.mu0");
        fs::write(&bad, "LOAD\n").expect("write source");
        let Err(AssembleError::Syntax { file, error }) = assemble_file(&bad) else {
            panic!("expected a syntax error");
        };
        assert_eq!(file, bad);
        assert_eq!(error.kind, SyntaxErrorKind::MissingOperand);
    }
}
