//! MU0 source parser, literate-source loader and inline test runner.

use mu0_core as _;
#[cfg(test)]
use tempfile as _;

/// Program assembly from source lines and files.
pub mod assembler;
/// Structured syntax and source-loading error types.
pub mod errors;
/// Mnemonic resolution against the core opcode table.
pub mod mnemonic;
/// Line scanner for initializers, instructions and comments.
pub mod parser;
/// Source loading and literate Markdown extraction.
pub mod source;
/// Parsing for `mu0test` assertion blocks.
pub mod test_format;
/// Evaluation of `mu0test` assertions against a finished run.
pub mod test_runner;

pub use assembler::{assemble_file, assemble_source, parse, Assembly};
pub use errors::{AssembleError, SourceError, SyntaxError, SyntaxErrorKind};
