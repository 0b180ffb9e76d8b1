//! # Tag handlers
//!
//! One handler per trigger byte. Every handler has the same contract:
//!
//! - it receives the whole input, the byte index of its trigger and a
//!   warning sink,
//! - it returns exactly one token and a stride of at least one byte,
//! - it never fails. Malformed syntax degrades to a [`TokenKind::Text`]
//!   token covering the trigger (or the trigger plus minimal lookahead) and
//!   pushes exactly one [`Warning`].
//!
//! Since handlers always succeed the scanner can advance unconditionally,
//! and half-written documents stay usable.

mod code;
mod emphasis;
mod escape;
mod link;

use crate::classifier::Trigger;
use crate::token::{Token, TokenKind};
use crate::warning::{IssueKind, Warning};

pub use code::{BLOCK_FENCE, run_length, scan_code};
pub use emphasis::{scan_star, scan_tilde, scan_underscore, underline_allowed};
pub use escape::scan_escape;
pub use link::{
    address_of, scan_bang, scan_close_bracket, scan_close_bracket_before, scan_open_bracket,
};

/// What a handler produced: one token, and how far to advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned<'a> {
    pub token: Token<'a>,
    pub stride: usize,
}

impl<'a> Scanned<'a> {
    fn new(kind: TokenKind, input: &'a str, at: usize, len: usize) -> Self {
        Self {
            token: Token::new(kind, input, at, len),
            stride: len,
        }
    }

    /// A degraded trigger: `len` bytes of plain text.
    fn text(input: &'a str, at: usize, len: usize) -> Self {
        Self::new(TokenKind::Text, input, at, len)
    }
}

/// Signature shared by all handlers.
pub type Handler = for<'a> fn(&'a str, usize, &mut Vec<Warning>) -> Scanned<'a>;

impl Trigger {
    /// The handler owning this trigger byte.
    pub fn handler(self) -> Handler {
        match self {
            Trigger::Star => scan_star,
            Trigger::Tilde => scan_tilde,
            Trigger::Backtick => scan_code,
            Trigger::Backslash => scan_escape,
            Trigger::Underscore => scan_underscore,
            Trigger::Bang => scan_bang,
            Trigger::OpenBracket => scan_open_bracket,
            Trigger::CloseBracket => scan_close_bracket,
        }
    }
}

/// Scalar value starting at `at`, if any.
fn char_at(input: &str, at: usize) -> Option<char> {
    input.get(at..)?.chars().next()
}

/// Warning for a trigger that needed a specific follower and got `found`
/// (or the end of input).
fn unexpected(
    related: TokenKind,
    input: &str,
    at: usize,
    expected: &str,
    found: Option<char>,
) -> Warning {
    match found {
        None => Warning::new(
            related,
            IssueKind::UnexpectedEndOfInput,
            input,
            at,
            format!("expected {expected}, found end of input"),
        ),
        Some(ch) => Warning::new(
            related,
            IssueKind::UnexpectedSymbol,
            input,
            at,
            format!("expected {expected}, found `{ch}`"),
        ),
    }
}
