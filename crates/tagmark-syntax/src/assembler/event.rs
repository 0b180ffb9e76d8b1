//! # Assembler Events
//!
//! Besides building the [`Ast`](crate::ast::Ast), the assembler records a
//! **flat sequence** of events describing the lossless syntax tree:
//!
//! ```text
//! Start(BOLD)            ← a matched `**…**`
//!   Token(BOLD_DELIM)
//!   Token(TEXT)
//!   Token(BOLD_DELIM)
//! Finish
//! ```
//!
//! An opening delimiter reserves a `Placeholder`. If the tag is closed the
//! placeholder becomes a `Start`; if the tag is demoted to text it stays a
//! placeholder, which the sink skips, so the delimiter ends up as a plain
//! token of the enclosing node.

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a node of the given kind.
    Start { kind: SyntaxKind },

    /// Add the next scanner token, labelled with `kind`.
    Token { kind: SyntaxKind },

    /// Finish the current node. Paired with a preceding `Start`.
    Finish,

    /// Reserved by an opening delimiter; replaced by `Start` when the tag
    /// closes, ignored by the sink otherwise.
    Placeholder,
}

impl Event {
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start { kind }
    }

    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }
}
