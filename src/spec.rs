//! Lexer-specification reader.
//!
//! A specification is a plain-text file. The first line declares the token
//! names, separated by spaces; a token's position in the list is its integer
//! code in the emitted scanner. Every later non-blank line declares one rule:
//!
//! ```text
//! IF ID NUMBER
//! "if"      {return IF;}
//! "[a-z]+"  {return ID;}
//! "\d+"     {return NUMBER;}
//! ```
//!
//! The pattern runs from the first `"` to the next unescaped `"` (a backslash
//! escapes the byte after it; the reader does not care which escapes the
//! regex parser accepts). The action runs from the first `{` after the closing
//! quote to the *last* `}` on the line, so actions may contain nested braces.
//! Rule declaration order is rule priority.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One lexing rule: a regex pattern and the action text to inline on match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexRule {
    /// Raw pattern text, still carrying its backslash escapes.
    pub pattern: String,
    /// Opaque Rust statement text, inlined verbatim into the scanner.
    pub action: String,
}

/// A parsed lexer specification: the declared tokens and the rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexSpec {
    /// Token names in declaration order; index = token code.
    pub tokens: Vec<String>,
    /// Rules in declaration order; index = rule priority (lower wins).
    pub rules: Vec<LexRule>,
}

/// Error from reading a specification file.
#[derive(Debug)]
pub enum SpecError {
    /// A rule line is missing one of its four delimiters, or the braces are
    /// out of order.
    InvalidLine { line: usize },
    /// A declared token name is not a valid identifier.
    InvalidToken { line: usize, name: String },
    /// The same token name was declared twice.
    DuplicateToken { line: usize, name: String },
    /// The specification file could not be opened.
    CannotOpenFile { path: PathBuf, source: std::io::Error },
    /// An I/O failure while reading lines.
    Io { line: usize, source: std::io::Error },
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::InvalidLine { line } => {
                write!(f, "line {line}: invalid rule line (expected \"pattern\" {{action}})")
            },
            SpecError::InvalidToken { line, name } => {
                write!(f, "line {line}: '{name}' is not a valid token name")
            },
            SpecError::DuplicateToken { line, name } => {
                write!(f, "line {line}: token '{name}' declared twice")
            },
            SpecError::CannotOpenFile { path, source } => {
                write!(f, "cannot open {}: {source}", path.display())
            },
            SpecError::Io { line, source } => write!(f, "line {line}: {source}"),
        }
    }
}

impl std::error::Error for SpecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpecError::CannotOpenFile { source, .. } | SpecError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl LexSpec {
    /// Read a specification from a file.
    ///
    /// # Errors
    ///
    /// Returns `SpecError::CannotOpenFile` if the file cannot be opened, or
    /// any error from [`LexSpec::read`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<LexSpec, SpecError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SpecError::CannotOpenFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read(BufReader::new(file))
    }

    /// Read a specification from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns `SpecError` when the token line or a rule line is malformed.
    pub fn read(reader: impl BufRead) -> Result<LexSpec, SpecError> {
        let mut lines = reader.lines();

        let first = match lines.next() {
            Some(line) => line.map_err(|source| SpecError::Io { line: 1, source })?,
            None => String::new(),
        };
        let tokens = parse_token_line(&first)?;

        let mut rules = Vec::new();
        let mut line_num = 1;
        for line in lines {
            line_num += 1;
            let line = line.map_err(|source| SpecError::Io { line: line_num, source })?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            rules.push(parse_rule_line(line, line_num)?);
        }

        Ok(LexSpec { tokens, rules })
    }
}

/// Split the first line into token names, validating each.
///
/// Names become `const` items in the emitted scanner, so they must have
/// identifier shape; duplicates would emit two constants with one name.
fn parse_token_line(line: &str) -> Result<Vec<String>, SpecError> {
    let mut tokens: Vec<String> = Vec::new();
    for name in line.trim_end_matches('\r').split_whitespace() {
        if !is_token_name(name) {
            return Err(SpecError::InvalidToken { line: 1, name: name.to_string() });
        }
        if tokens.iter().any(|t| t == name) {
            return Err(SpecError::DuplicateToken { line: 1, name: name.to_string() });
        }
        tokens.push(name.to_string());
    }
    Ok(tokens)
}

fn is_token_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split one rule line into pattern and action text.
///
/// Fails with `InvalidLine` when any of the four delimiters is missing or the
/// braces are out of order. The pattern keeps its escapes; legality of the
/// escape set is the regex parser's concern.
fn parse_rule_line(line: &str, line_num: usize) -> Result<LexRule, SpecError> {
    let bytes = line.as_bytes();
    let invalid = || SpecError::InvalidLine { line: line_num };

    let pattern_left = bytes.iter().position(|&b| b == b'"').ok_or_else(invalid)?;

    // Closing quote: the next '"' not consumed by a backslash escape.
    let mut pattern_right = None;
    let mut i = pattern_left + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => {
                pattern_right = Some(i);
                break;
            },
            _ => i += 1,
        }
    }
    let pattern_right = pattern_right.ok_or_else(invalid)?;

    let action_left = bytes[pattern_right + 1..]
        .iter()
        .position(|&b| b == b'{')
        .map(|offset| pattern_right + 1 + offset)
        .ok_or_else(invalid)?;
    // Greedy to end of line: the last '}' closes the action.
    let action_right = bytes.iter().rposition(|&b| b == b'}').ok_or_else(invalid)?;
    if action_left >= action_right {
        return Err(invalid());
    }

    Ok(LexRule {
        pattern: line[pattern_left + 1..pattern_right].to_string(),
        action: line[action_left + 1..action_right].to_string(),
    })
}
