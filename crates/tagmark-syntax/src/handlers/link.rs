//! `!`, `[` and `]`: links and images.
//!
//! A link is scanned as three pieces. `[` opens the link text, whatever
//! follows is scanned normally, and `](url)` closes it with the address.
//! Images are the same with `![` as the opener.

use super::{Scanned, char_at, unexpected};
use crate::token::TokenKind;
use crate::warning::{IssueKind, Warning};

pub fn scan_bang<'a>(input: &'a str, at: usize, warnings: &mut Vec<Warning>) -> Scanned<'a> {
    let next = char_at(input, at + 1);
    if next == Some('[') {
        return Scanned::new(TokenKind::ImageTextStart, input, at, 2);
    }
    warnings.push(
        unexpected(TokenKind::ImageTextStart, input, at, "`[` after `!`", next)
            .with_suggestion("start an image with `![` or escape the mark as `\\!`"),
    );
    Scanned::text(input, at, 1)
}

pub fn scan_open_bracket<'a>(
    input: &'a str,
    at: usize,
    warnings: &mut Vec<Warning>,
) -> Scanned<'a> {
    if at + 1 < input.len() {
        return Scanned::new(TokenKind::LinkTextStart, input, at, 1);
    }
    warnings.push(unexpected(
        TokenKind::LinkTextStart,
        input,
        at,
        "link text after `[`",
        None,
    ));
    Scanned::text(input, at, 1)
}

pub fn scan_close_bracket<'a>(
    input: &'a str,
    at: usize,
    warnings: &mut Vec<Warning>,
) -> Scanned<'a> {
    scan_close_bracket_before(input, at, input.rfind(')'), warnings)
}

/// [`scan_close_bracket`] given the offset of the last `)` in `input`.
///
/// The scanner computes that offset once, so an address that is never
/// closed is rejected without searching the rest of the input again.
pub fn scan_close_bracket_before<'a>(
    input: &'a str,
    at: usize,
    last_paren: Option<usize>,
    warnings: &mut Vec<Warning>,
) -> Scanned<'a> {
    let bytes = input.as_bytes();
    match bytes.get(at + 1) {
        Some(b'(') => {}
        Some(_) => {
            warnings.push(
                unexpected(
                    TokenKind::LinkAddress,
                    input,
                    at,
                    "`(` after `]`",
                    char_at(input, at + 1),
                )
                .with_suggestion("follow the link text with `(url)` or escape it as `\\]`"),
            );
            return Scanned::text(input, at, 1);
        }
        None => {
            warnings.push(unexpected(
                TokenKind::LinkAddress,
                input,
                at,
                "`(` after `]`",
                None,
            ));
            return Scanned::text(input, at, 1);
        }
    }

    let url_start = at + 2;
    let closing = last_paren
        .filter(|&last| last >= url_start)
        .and_then(|last| bytes[url_start..=last].iter().position(|&b| b == b')'));
    let Some(offset) = closing else {
        warnings.push(
            unexpected(TokenKind::LinkAddress, input, at, "`)` closing the address", None)
                .with_suggestion("close the link address with `)`"),
        );
        return Scanned::text(input, at, 2);
    };

    if offset == 0 {
        warnings.push(
            Warning::new(
                TokenKind::LinkAddress,
                IssueKind::MalformedLink,
                input,
                at + 1,
                "link address is empty",
            )
            .with_suggestion("put the target between the parentheses"),
        );
    }
    Scanned::new(TokenKind::LinkAddress, input, at, offset + 3)
}

/// The URL inside a `](url)` token.
pub fn address_of(raw: &str) -> &str {
    raw.strip_prefix("](")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or_default()
}
