//! Structured error reporting for source loading and parsing.
//!
//! All errors format to stderr in the assembler's usual style:
//! ```text
//! program.mu0:3: error: unknown mnemonic `XYZ` in "XYZ 0x1"
//! ```

use std::fmt;
use std::path::PathBuf;

/// A rejected source line.
///
/// Parsing stops at the first rejected line; no partial program is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// 1-indexed line number in the original file.
    pub line: u32,
    /// The raw line text.
    pub text: String,
    /// What was wrong with the line.
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    /// Creates a syntax error for `text` at `line`.
    #[must_use]
    pub fn new(line: u32, text: impl Into<String>, kind: SyntaxErrorKind) -> Self {
        Self {
            line,
            text: text.into(),
            kind,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} in {:?}", self.line, self.kind, self.text)
    }
}

impl std::error::Error for SyntaxError {}

/// Classification of syntax errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// First word is neither `INI` nor a known mnemonic.
    UnknownMnemonic(String),
    /// Operand required but the line ended or a comment started.
    MissingOperand,
    /// `STOP` followed by something other than a comment.
    UnexpectedOperand,
    /// Operand is not `0x` followed by 1-3 hex digits.
    MalformedLiteral(String),
    /// Text after the operand that is not a `;` comment.
    TrailingInput(String),
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMnemonic(word) => write!(f, "unknown mnemonic `{word}`"),
            Self::MissingOperand => write!(f, "missing operand"),
            Self::UnexpectedOperand => write!(f, "unexpected operand"),
            Self::MalformedLiteral(token) => write!(f, "malformed literal `{token}`"),
            Self::TrailingInput(rest) => write!(f, "unexpected trailing input `{rest}`"),
        }
    }
}

/// Failure to obtain source text from a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Nothing exists at the path.
    NotFound(PathBuf),
    /// The path exists but is not a regular file.
    NotAFile(PathBuf),
    /// The file exists but could not be read as text.
    Unreadable {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error message.
        message: String,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "source file not found: {}", path.display()),
            Self::NotAFile(path) => write!(f, "source path is not a file: {}", path.display()),
            Self::Unreadable { path, message } => {
                write!(f, "error opening source file {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// Any failure on the way from a source path to a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    /// The source could not be read.
    Source(SourceError),
    /// The source was read but a line was rejected.
    Syntax {
        /// File the line came from.
        file: PathBuf,
        /// The rejected line.
        error: SyntaxError,
    },
}

impl AssembleError {
    /// Formats the error for stderr output.
    #[must_use]
    pub fn format_for_stderr(&self) -> String {
        match self {
            Self::Source(error) => format!("error: {error}"),
            Self::Syntax { file, error } => format!(
                "{}:{}: error: {} in {:?}",
                file.display(),
                error.line,
                error.kind,
                error.text
            ),
        }
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(error) => write!(f, "{error}"),
            Self::Syntax { file, error } => write!(f, "{}: {error}", file.display()),
        }
    }
}

impl std::error::Error for AssembleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(error) => Some(error),
            Self::Syntax { error, .. } => Some(error),
        }
    }
}

impl From<SourceError> for AssembleError {
    fn from(error: SourceError) -> Self {
        Self::Source(error)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{AssembleError, SourceError, SyntaxError, SyntaxErrorKind};

    #[test]
    fn syntax_error_names_line_and_text() {
        let error = SyntaxError::new(
            3,
            "XYZ 0x1",
            SyntaxErrorKind::UnknownMnemonic("XYZ".to_string()),
        );
        assert_eq!(
            error.to_string(),
            "line 3: unknown mnemonic `XYZ` in \"XYZ 0x1\""
        );
    }

    #[test]
    fn stderr_format_prefixes_file_and_line() {
        let error = AssembleError::Syntax {
            file: PathBuf::from("prog.mu0"),
            error: SyntaxError::new(7, "LOAD", SyntaxErrorKind::MissingOperand),
        };
        assert_eq!(
            error.format_for_stderr(),
            "prog.mu0:7: error: missing operand in \"LOAD\""
        );
    }

    #[test]
    fn source_errors_are_distinguishable() {
        let missing = AssembleError::from(SourceError::NotFound(PathBuf::from("a.mu0")));
        assert_eq!(
            missing.format_for_stderr(),
            "error: source file not found: a.mu0"
        );

        let directory = SourceError::NotAFile(PathBuf::from("dir"));
        assert!(directory.to_string().contains("not a file"));
    }
}
