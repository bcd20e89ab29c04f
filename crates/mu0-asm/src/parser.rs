//! Source line parser for initializers, instructions and comments.
//!
//! Each line is recognized by an explicit scanner keyed on its first word, in
//! precedence order:
//!
//! 1. `INI <addr> <value> [; comment]` memory initializer
//! 2. `<mnemonic> [<addr>] [; comment]` instruction
//! 3. `; comment` or blank line
//!
//! Whitespace around every token is optional, so `LOAD0x10` is accepted.
//! Literals are `0x` followed by one to three hex digits and must end at
//! whitespace, a comment or the end of the line.

use mu0_core::{decode, Address, Instruction, Value};

use crate::errors::{SyntaxError, SyntaxErrorKind};
use crate::mnemonic::{is_initializer_keyword, resolve_mnemonic};

const COMMENT_MARKER: char = ';';
/// Only spaces and tabs separate tokens; any other character is content.
const BLANKS: [char; 2] = [' ', '\t'];
const MAX_LITERAL_DIGITS: usize = 3;

/// A single parsed source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Empty or comment-only line.
    Blank,
    /// `INI` memory initializer.
    Initializer {
        /// Cell to initialize.
        address: Address,
        /// Signed value decoded from the 12-bit literal.
        value: Value,
    },
    /// Instruction line.
    Instruction(Instruction),
}

impl ParsedLine {
    /// Returns `true` for lines that contribute to the program.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Blank)
    }
}

/// Result of parsing a single line.
pub type ParseResult = Result<ParsedLine, SyntaxError>;

/// Parses one source line.
///
/// # Errors
///
/// Returns a [`SyntaxError`] carrying `line_number` and the raw text when the
/// line is neither an initializer, an instruction, a comment nor blank.
pub fn parse_line(text: &str, line_number: u32) -> ParseResult {
    let fail = |kind| SyntaxError::new(line_number, text, kind);

    let mut scanner = Scanner::new(text);
    scanner.skip_blanks();
    if scanner.at_end_or_comment() {
        return Ok(ParsedLine::Blank);
    }

    let word = scanner.word();
    if word.is_empty() {
        return Err(fail(SyntaxErrorKind::UnknownMnemonic(
            scanner.token().to_string(),
        )));
    }

    if is_initializer_keyword(word) {
        return parse_initializer(&mut scanner).map_err(fail);
    }

    let opcode = resolve_mnemonic(word)
        .ok_or_else(|| fail(SyntaxErrorKind::UnknownMnemonic(word.to_string())))?;

    scanner.skip_blanks();
    let mut instruction = if opcode.takes_operand() {
        let operand = scanner.address().map_err(fail)?;
        Instruction::with_operand(opcode, operand, line_number)
    } else {
        if !scanner.at_end_or_comment() {
            return Err(fail(SyntaxErrorKind::UnexpectedOperand));
        }
        Instruction::stop(line_number)
    };

    if let Some(comment) = scanner.comment().map_err(fail)? {
        instruction = instruction.with_comment(comment);
    }
    Ok(ParsedLine::Instruction(instruction))
}

fn parse_initializer(scanner: &mut Scanner<'_>) -> Result<ParsedLine, SyntaxErrorKind> {
    scanner.skip_blanks();
    let address = scanner.address()?;
    scanner.skip_blanks();
    let value = decode(scanner.literal()?);
    scanner.comment()?;
    Ok(ParsedLine::Initializer { address, value })
}

/// Cursor over the unconsumed tail of a line.
struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    const fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn skip_blanks(&mut self) {
        self.rest = self.rest.trim_start_matches(BLANKS);
    }

    fn at_end_or_comment(&self) -> bool {
        self.rest.trim_end_matches(BLANKS).is_empty() || self.rest.starts_with(COMMENT_MARKER)
    }

    /// Consumes a run of ASCII letters.
    fn word(&mut self) -> &'a str {
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(self.rest.len());
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        word
    }

    /// The text up to the next blank or comment, without consuming it.
    fn token(&self) -> &'a str {
        let end = self
            .rest
            .find(|c: char| BLANKS.contains(&c) || c == COMMENT_MARKER)
            .unwrap_or(self.rest.len());
        &self.rest[..end]
    }

    /// Consumes a `0x` literal of one to three hex digits.
    fn literal(&mut self) -> Result<u16, SyntaxErrorKind> {
        if self.at_end_or_comment() {
            return Err(SyntaxErrorKind::MissingOperand);
        }

        let token = self.token();
        let malformed = || SyntaxErrorKind::MalformedLiteral(token.to_string());

        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .ok_or_else(malformed)?;
        if digits.is_empty()
            || digits.len() > MAX_LITERAL_DIGITS
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(malformed());
        }

        let value = u16::from_str_radix(digits, 16).map_err(|_| malformed())?;
        self.rest = &self.rest[token.len()..];
        Ok(value)
    }

    fn address(&mut self) -> Result<Address, SyntaxErrorKind> {
        let token = self.token();
        let raw = self.literal()?;
        Address::new(raw).ok_or_else(|| SyntaxErrorKind::MalformedLiteral(token.to_string()))
    }

    /// Consumes the rest of the line, which must be blank or a comment.
    ///
    /// The leading run of `;` and the blanks after it are dropped; an empty
    /// comment is reported as `None`.
    fn comment(&mut self) -> Result<Option<String>, SyntaxErrorKind> {
        self.skip_blanks();
        let rest = std::mem::take(&mut self.rest);
        let Some(body) = rest.strip_prefix(COMMENT_MARKER) else {
            let trailing = rest.trim_end_matches(BLANKS);
            return if trailing.is_empty() {
                Ok(None)
            } else {
                Err(SyntaxErrorKind::TrailingInput(trailing.to_string()))
            };
        };

        let body = body
            .trim_start_matches(COMMENT_MARKER)
            .trim_start_matches(BLANKS)
            .trim_end_matches(BLANKS);
        Ok((!body.is_empty()).then(|| body.to_string()))
    }
}
