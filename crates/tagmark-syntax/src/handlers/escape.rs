//! Backslash escapes.

use super::{Scanned, char_at};
use crate::classifier::is_trigger_char;
use crate::token::TokenKind;
use crate::warning::{IssueKind, Warning};

/// `\` plus the following scalar value.
///
/// Escaping a trigger character is the point of the construct. Escaping
/// anything else still produces an escape token, but also a
/// [`IssueKind::RedundantEscape`] warning.
pub fn scan_escape<'a>(input: &'a str, at: usize, warnings: &mut Vec<Warning>) -> Scanned<'a> {
    let Some(escaped) = char_at(input, at + 1) else {
        warnings.push(
            Warning::new(
                TokenKind::EscapeSequence,
                IssueKind::RedundantEscape,
                input,
                at,
                "backslash at end of input escapes nothing",
            )
            .with_suggestion("remove the trailing backslash or write `\\\\`"),
        );
        return Scanned::text(input, at, 1);
    };

    if !is_trigger_char(escaped) {
        warnings.push(
            Warning::new(
                TokenKind::EscapeSequence,
                IssueKind::RedundantEscape,
                input,
                at,
                format!("`{escaped}` has no special meaning and does not need escaping"),
            )
            .with_suggestion(format!("write `{escaped}` without the backslash")),
        );
    }
    Scanned::new(
        TokenKind::EscapeSequence,
        input,
        at,
        1 + escaped.len_utf8(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("\\*")]
    #[case("\\_")]
    #[case("\\`")]
    #[case("\\\\")]
    #[case("\\[")]
    #[case("\\]")]
    #[case("\\!")]
    #[case("\\~")]
    fn escaping_a_trigger_is_silent(#[case] input: &str) {
        let mut warnings = Vec::new();
        let scanned = scan_escape(input, 0, &mut warnings);
        assert_eq!(scanned.token.kind, TokenKind::EscapeSequence);
        assert_eq!(scanned.token.raw, input);
        assert_eq!(scanned.stride, 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn escaping_plain_text_is_redundant() {
        let mut warnings = Vec::new();
        let scanned = scan_escape("\\a", 0, &mut warnings);
        assert_eq!(scanned.token.kind, TokenKind::EscapeSequence);
        assert_eq!(scanned.stride, 2);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].issue, IssueKind::RedundantEscape);
    }

    #[test]
    fn escape_spans_the_full_multibyte_scalar() {
        let mut warnings = Vec::new();
        let scanned = scan_escape("\\日本", 0, &mut warnings);
        assert_eq!(scanned.token.raw, "\\日");
        assert_eq!(scanned.stride, 4);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn trailing_backslash_is_text() {
        let mut warnings = Vec::new();
        let scanned = scan_escape("a\\", 1, &mut warnings);
        assert_eq!(scanned.token.kind, TokenKind::Text);
        assert_eq!(scanned.token.raw, "\\");
        assert_eq!(scanned.stride, 1);
        assert_eq!(warnings[0].issue, IssueKind::RedundantEscape);
        assert_eq!(warnings[0].byte_index, 1);
    }
}
