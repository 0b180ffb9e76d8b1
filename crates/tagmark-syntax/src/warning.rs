//! Non-fatal diagnostics.
//!
//! Scanning never fails. Whenever a construct is malformed the handler
//! degrades it to text and records exactly one [`Warning`] describing what
//! went wrong and where, so a caller can underline the offending span.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::token::TokenKind;

/// Longest snippet (in scalar values) attached to a warning.
pub const SNIPPET_CHARS: usize = 16;

/// The closed set of problems the scanner reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueKind {
    UnclosedTag,
    MisNestedTag,
    RedundantEscape,
    MalformedLink,
    MalformedCodeSequence,
    UnexpectedEndOfInput,
    UnexpectedSymbol,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueKind::UnclosedTag => "unclosed tag",
            IssueKind::MisNestedTag => "mis-nested tag",
            IssueKind::RedundantEscape => "redundant escape",
            IssueKind::MalformedLink => "malformed link",
            IssueKind::MalformedCodeSequence => "malformed code sequence",
            IssueKind::UnexpectedEndOfInput => "unexpected end of input",
            IssueKind::UnexpectedSymbol => "unexpected symbol",
        };
        f.write_str(name)
    }
}

/// A recoverable problem found while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{issue} at byte {byte_index}: {description}")]
pub struct Warning {
    /// Kind of the construct the handler was trying to produce.
    pub related_kind: TokenKind,
    pub byte_index: usize,
    /// Input text starting at `byte_index`, truncated to [`SNIPPET_CHARS`].
    pub near: Option<String>,
    pub issue: IssueKind,
    pub description: String,
    pub suggestion: Option<String>,
}

impl Warning {
    pub fn new(
        related_kind: TokenKind,
        issue: IssueKind,
        input: &str,
        byte_index: usize,
        description: impl Into<String>,
    ) -> Self {
        Self {
            related_kind,
            byte_index,
            near: snippet(input, byte_index),
            issue,
            description: description.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

fn snippet(input: &str, byte_index: usize) -> Option<String> {
    let rest = input.get(byte_index..)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.chars().take(SNIPPET_CHARS).collect())
}
