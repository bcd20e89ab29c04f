//! Source ingestion for plain and literate program formats.
//!
//! - **Literate** (`.md`): Markdown where fenced code blocks tagged `mu0`
//!   hold the program and blocks tagged `mu0test` hold assertions. Everything
//!   else is prose.
//! - **Plain** (any other extension): the entire file is program source.
//!
//! Lines keep their original file line numbers so diagnostics point at the
//! file the user edits.

use std::fs;
use std::path::Path;

use crate::errors::SourceError;

const PROGRAM_TAG: &str = "mu0";
const TEST_TAG: &str = "mu0test";

/// A line of extracted source with its original location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// The source text (without trailing newline).
    pub text: String,
    /// 1-indexed line number in the original file.
    pub original_line: u32,
}

/// Raw content of a `mu0test` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBlock {
    /// Lines between the fences, newline-joined.
    pub content: String,
    /// 1-indexed line of the opening fence.
    pub start_line: u32,
    /// 1-indexed line of the closing fence (last line if unterminated).
    pub end_line: u32,
}

/// Extracted source content from an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContent {
    /// Program lines in document order.
    pub lines: Vec<SourceLine>,
    /// Test blocks in document order; always empty for plain files.
    pub test_blocks: Vec<TestBlock>,
    /// The file path (for error reporting).
    pub file_path: String,
}

/// Reads a source file as text.
///
/// # Errors
///
/// Returns [`SourceError::NotFound`] when nothing exists at `path`,
/// [`SourceError::NotAFile`] for directories and other non-files, and
/// [`SourceError::Unreadable`] when reading fails.
pub fn read_source(path: &Path) -> Result<String, SourceError> {
    if !path.exists() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(SourceError::NotAFile(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|error| SourceError::Unreadable {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}

/// Extracts program source from file content.
///
/// For `.md` files, extracts content from fenced code blocks tagged `mu0`
/// and collects `mu0test` blocks. For all other files, treats the entire
/// content as program source.
#[must_use]
pub fn extract_source(file_path: &Path, content: &str) -> SourceContent {
    let literate = is_literate_file(file_path);
    let file_path = file_path.to_string_lossy().to_string();

    if literate {
        let (lines, test_blocks) = extract_literate_source(content);
        SourceContent {
            lines,
            test_blocks,
            file_path,
        }
    } else {
        SourceContent {
            lines: extract_plain_source(content),
            test_blocks: Vec::new(),
            file_path,
        }
    }
}

fn is_literate_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Extracts source lines from plain text, one per line.
#[must_use]
pub fn extract_plain_source(content: &str) -> Vec<SourceLine> {
    (1u32..)
        .zip(content.lines())
        .map(|(original_line, text)| SourceLine {
            text: text.to_string(),
            original_line,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Prose,
    Other { fence_len: usize },
    Program { fence_len: usize },
    Test { fence_len: usize, start_line: u32 },
}

impl Block {
    const fn fence_len(self) -> Option<usize> {
        match self {
            Self::Prose => None,
            Self::Other { fence_len }
            | Self::Program { fence_len }
            | Self::Test { fence_len, .. } => Some(fence_len),
        }
    }
}

fn extract_literate_source(content: &str) -> (Vec<SourceLine>, Vec<TestBlock>) {
    let mut lines = Vec::new();
    let mut test_blocks = Vec::new();
    let mut test_lines: Vec<&str> = Vec::new();
    let mut block = Block::Prose;
    let mut last_line = 0;

    for (line_num, line) in (1u32..).zip(content.lines()) {
        last_line = line_num;
        let fence = fence_length(line);

        match (block.fence_len(), fence) {
            (None, Some(fence_len)) => {
                block = match fence_tag(line, fence_len) {
                    PROGRAM_TAG => Block::Program { fence_len },
                    TEST_TAG => Block::Test {
                        fence_len,
                        start_line: line_num,
                    },
                    _ => Block::Other { fence_len },
                };
            }
            (Some(open_len), Some(close_len)) if close_len >= open_len => {
                if let Block::Test { start_line, .. } = block {
                    test_blocks.push(TestBlock {
                        content: test_lines.join("\n"),
                        start_line,
                        end_line: line_num,
                    });
                    test_lines.clear();
                }
                block = Block::Prose;
            }
            _ => match block {
                Block::Program { .. } => lines.push(SourceLine {
                    text: line.to_string(),
                    original_line: line_num,
                }),
                Block::Test { .. } => test_lines.push(line),
                Block::Prose | Block::Other { .. } => {}
            },
        }
    }

    if let Block::Test { start_line, .. } = block {
        test_blocks.push(TestBlock {
            content: test_lines.join("\n"),
            start_line,
            end_line: last_line,
        });
    }

    (lines, test_blocks)
}

/// Number of backticks when the line is a fence (3 or more), else `None`.
fn fence_length(line: &str) -> Option<usize> {
    let count = line
        .trim_start()
        .chars()
        .take_while(|&c| c == '`')
        .count();
    (count >= 3).then_some(count)
}

/// First word of the info string after the fence.
fn fence_tag(line: &str, fence_len: usize) -> &str {
    line.trim_start()[fence_len..]
        .split_whitespace()
        .next()
        .unwrap_or("")
}
