//! Rendering errors against their source text
//!
//! A [`Diagnostic`] is the report a host shows for a failed run: the phase
//! that failed, the message, the line and column of the offending token,
//! that line of source with a caret under the column, and for evaluation
//! errors one line per live frame.

use std::fmt;

use crate::error::{RuntimeError, SprigError};

/// Compute 1-based (line, column) from a byte offset.
///
/// The column counts characters (not bytes) from the start of the line.
/// Offsets past the end of `source` are clamped to its end.
pub fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = floor_char_boundary(source, offset);
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Text of the 1-based `line` of `source`, without its line terminator.
pub fn source_line(source: &str, line: usize) -> &str {
    source
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or_default()
}

fn floor_char_boundary(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// The stage of running a program that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Tokenizing
    Lex,
    /// Building the tree
    Parse,
    /// Evaluating
    Eval,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Lex => "tokenization",
            Phase::Parse => "parsing",
            Phase::Eval => "evaluation",
        })
    }
}

/// One traceback line: a live frame and where it was when the error hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    /// Frame label
    pub label: String,
    /// 1-based line of the frame's last inspected token
    pub line: usize,
    /// That line of source
    pub source_line: String,
}

/// A fully resolved error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Which stage failed
    pub phase: Phase,
    /// Human-readable description
    pub message: String,
    /// 1-based line of the offending token
    pub line: usize,
    /// 1-based character column of the offending token (the caret position)
    pub column: usize,
    /// The offending line of source
    pub source_line: String,
    /// Live frames at the point of failure, innermost first (evaluation only)
    pub traceback: Vec<TraceLine>,
}

impl Diagnostic {
    /// Resolve `err` against the source it was raised for.
    pub fn from_error(err: &SprigError, source: &str) -> Self {
        match err {
            SprigError::Lex(e) => Self::at(Phase::Lex, e.to_string(), e.offset, source),
            SprigError::Parse(e) => Self::at(Phase::Parse, e.to_string(), e.offset, source),
            SprigError::Eval(e) => Self::from_runtime(e, source),
        }
    }

    /// Resolve an evaluation error, including its traceback.
    pub fn from_runtime(err: &RuntimeError, source: &str) -> Self {
        let mut diagnostic =
            Self::at(Phase::Eval, err.to_string(), err.offset.unwrap_or(0), source);
        diagnostic.traceback = err
            .traceback
            .iter()
            .map(|entry| {
                let line = entry
                    .offset
                    .map_or(1, |offset| offset_to_line_col(source, offset).0);
                TraceLine {
                    label: entry.label.clone(),
                    line,
                    source_line: source_line(source, line).to_string(),
                }
            })
            .collect();
        diagnostic
    }

    fn at(phase: Phase, message: String, offset: usize, source: &str) -> Self {
        let (line, column) = offset_to_line_col(source, offset);
        Self {
            phase,
            message,
            line,
            column,
            source_line: source_line(source, line).to_string(),
            traceback: Vec::new(),
        }
    }

    /// Number of characters before the caret on the caret line.
    pub fn caret_offset(&self) -> usize {
        self.column - 1
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error during {}: {}", self.phase, self.message)?;
        writeln!(f, "  at line {} character {}", self.line, self.column)?;
        writeln!(f, "  | {}", self.source_line)?;
        write!(f, "  | {}^", " ".repeat(self.caret_offset()))?;
        if !self.traceback.is_empty() {
            write!(f, "\ntraceback (innermost first):")?;
            for entry in &self.traceback {
                write!(f, "\n  in {} at line {}", entry.label, entry.line)?;
                write!(f, "\n  | {}", entry.source_line)?;
            }
        }
        Ok(())
    }
}
