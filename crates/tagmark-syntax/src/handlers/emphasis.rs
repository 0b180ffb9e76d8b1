//! `*`, `~` and `_`.

use super::{Scanned, char_at, unexpected};
use crate::token::TokenKind;
use crate::warning::Warning;

/// `**` is bold, a lone `*` is italic.
///
/// Only one byte of lookahead: a run like `***` comes back here on the
/// next iteration for its remaining byte.
pub fn scan_star<'a>(input: &'a str, at: usize, _warnings: &mut Vec<Warning>) -> Scanned<'a> {
    if input.as_bytes().get(at + 1) == Some(&b'*') {
        Scanned::new(TokenKind::Bold, input, at, 2)
    } else {
        Scanned::new(TokenKind::Italic, input, at, 1)
    }
}

/// Strikethrough needs exactly `~~`.
pub fn scan_tilde<'a>(input: &'a str, at: usize, warnings: &mut Vec<Warning>) -> Scanned<'a> {
    if input.as_bytes().get(at + 1) == Some(&b'~') {
        return Scanned::new(TokenKind::Strikethrough, input, at, 2);
    }
    warnings.push(
        unexpected(
            TokenKind::Strikethrough,
            input,
            at,
            "`~~`",
            char_at(input, at + 1),
        )
        .with_suggestion("use `~~` for strikethrough or escape the tilde as `\\~`"),
    );
    Scanned::text(input, at, 1)
}

/// Eligibility is decided beforehand by [`underline_allowed`].
pub fn scan_underscore<'a>(
    input: &'a str,
    at: usize,
    _warnings: &mut Vec<Warning>,
) -> Scanned<'a> {
    Scanned::new(TokenKind::Underline, input, at, 1)
}

/// Intra-word rule for `_`.
///
/// A neighbouring `_` always makes it plain text, so doubled runs are never
/// split into two single tags. Otherwise it is a tag unless it sits between
/// two alphanumerics (`hello_world`).
pub fn underline_allowed(prev: Option<char>, next: Option<char>) -> bool {
    if prev == Some('_') || next == Some('_') {
        return false;
    }
    let left_is_alnum = prev.is_some_and(char::is_alphanumeric);
    let right_is_alnum = next.is_some_and(char::is_alphanumeric);
    !left_is_alnum || !right_is_alnum
}
