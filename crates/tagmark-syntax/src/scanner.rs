//! # Scanner - Tokenizing Inline Markdown
//!
//! A single left-to-right pass over the input bytes. At each position the
//! [classifier](crate::classifier) decides whether the byte is a trigger. If
//! it is, the pending run of plain text is flushed as a [`TokenKind::Text`]
//! token and the trigger's [handler](crate::handlers) produces the next token
//! and a stride. Otherwise one Unicode scalar value is consumed and the text
//! run grows.
//!
//! ## The Lossless Guarantee
//!
//! Every byte of the input lands in exactly one token. Tokens are contiguous
//! and their lengths add up to the input length:
//!
//! ```
//! use tagmark_syntax::tokenize;
//!
//! let input = "**bold** and `code` [link](url)";
//! let scanned = tokenize(input);
//!
//! let reconstructed: String = scanned.tokens.iter().map(|t| t.raw).collect();
//! assert_eq!(input, reconstructed);
//! assert!(scanned.warnings.is_empty());
//! ```
//!
//! The same input always yields the same tokens and warnings.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::classifier::{Trigger, classify};
use crate::handlers::{Scanned, scan_close_bracket_before, underline_allowed};
use crate::token::{Token, TokenKind};
use crate::warning::Warning;

/// Switches for optional scanner behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Recognise bare `http://` and `https://` addresses as
    /// [`TokenKind::PlainURL`] tokens.
    pub bare_urls: bool,
}

/// Scanner output: the token stream plus every warning raised on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tokenized<'a> {
    pub tokens: Vec<Token<'a>>,
    pub warnings: Vec<Warning>,
}

/// Tokenize with default options.
pub fn tokenize(input: &str) -> Tokenized<'_> {
    tokenize_with(input, &ScanOptions::default())
}

pub fn tokenize_with<'a>(input: &'a str, options: &ScanOptions) -> Tokenized<'a> {
    let bytes = input.as_bytes();
    let mut out = Tokenized::default();
    let mut i = 0;
    let mut text_start = 0;
    let mut prev: Option<char> = None;
    let last_paren = input.rfind(')');

    fn flush_text<'a>(tokens: &mut Vec<Token<'a>>, input: &'a str, start: usize, end: usize) {
        if end > start {
            tokens.push(Token::new(TokenKind::Text, input, start, end - start));
        }
    }

    while i < bytes.len() {
        if let Some(trigger) = classify(bytes[i]) {
            let eligible = trigger != Trigger::Underscore
                || underline_allowed(prev, input[i + 1..].chars().next());
            if eligible {
                flush_text(&mut out.tokens, input, text_start, i);
                let before = out.warnings.len();
                let Scanned { token, stride } = match trigger {
                    Trigger::CloseBracket => {
                        scan_close_bracket_before(input, i, last_paren, &mut out.warnings)
                    }
                    _ => (trigger.handler())(input, i, &mut out.warnings),
                };
                if out.warnings.len() > before {
                    log::trace!("degraded {:?} at byte {i} to {:?}", trigger, token.kind);
                }
                i += stride;
                prev = token.raw.chars().next_back();
                out.tokens.push(token);
                text_start = i;
                continue;
            }
        }

        if options.bare_urls && bytes[i] == b'h' && !prev.is_some_and(char::is_alphanumeric) {
            if let Some(len) = bare_url_len(&input[i..]) {
                flush_text(&mut out.tokens, input, text_start, i);
                let token = Token::new(TokenKind::PlainURL, input, i, len);
                i += len;
                prev = token.raw.chars().next_back();
                out.tokens.push(token);
                text_start = i;
                continue;
            }
        }

        let Some(ch) = input[i..].chars().next() else {
            break;
        };
        i += ch.len_utf8();
        prev = Some(ch);
    }

    flush_text(&mut out.tokens, input, text_start, bytes.len());
    out
}

/// Length of a bare URL at the start of `rest`.
fn bare_url_len(rest: &str) -> Option<usize> {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = URL_REGEX
        .get_or_init(|| Regex::new(r"^https?://[^\s<>\[\]()]+").expect("Invalid URL regex"));
    re.find(rest).map(|m| m.end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warning::IssueKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn token(kind: TokenKind, byte_pos: usize, raw: &str) -> Token<'_> {
        Token {
            kind,
            byte_pos,
            byte_len: raw.len(),
            raw,
        }
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).tokens.iter().map(|t| t.kind).collect()
    }

    /// Tokens must tile the input: contiguous, no gaps, no overlaps.
    fn assert_tiles(input: &str, tokens: &[Token<'_>]) {
        let mut pos = 0;
        for t in tokens {
            assert_eq!(t.byte_pos, pos, "gap or overlap before {t:?} in {input:?}");
            assert_eq!(&input[t.byte_pos..t.end()], t.raw);
            pos = t.end();
        }
        assert_eq!(pos, input.len(), "tokens stop short in {input:?}");
    }

    #[test]
    fn empty_input() {
        let scanned = tokenize("");
        assert_eq!(scanned.tokens, vec![]);
        assert_eq!(scanned.warnings, vec![]);
    }

    #[test]
    fn bold() {
        let scanned = tokenize("**hello**");
        assert_eq!(
            scanned.tokens,
            vec![
                token(TokenKind::Bold, 0, "**"),
                token(TokenKind::Text, 2, "hello"),
                token(TokenKind::Bold, 7, "**"),
            ]
        );
        assert!(scanned.warnings.is_empty());
    }

    #[test]
    fn strikethrough() {
        let scanned = tokenize("~~strike~~");
        assert_eq!(
            scanned.tokens,
            vec![
                token(TokenKind::Strikethrough, 0, "~~"),
                token(TokenKind::Text, 2, "strike"),
                token(TokenKind::Strikethrough, 8, "~~"),
            ]
        );
        assert!(scanned.warnings.is_empty());
    }

    #[test]
    fn triple_star_is_bold_then_italic() {
        assert_eq!(
            kinds("***a"),
            vec![TokenKind::Bold, TokenKind::Italic, TokenKind::Text]
        );
    }

    #[test]
    fn code_fence_n_plus_one() {
        let scanned = tokenize("```print(`````)``` after");
        assert_eq!(
            scanned.tokens,
            vec![
                token(TokenKind::CodeBlock, 0, "```print(`````)```"),
                token(TokenKind::Text, 18, " after"),
            ]
        );
        assert!(scanned.warnings.is_empty());
    }

    #[test]
    fn escapes() {
        let scanned = tokenize("\\*");
        assert_eq!(scanned.tokens, vec![token(TokenKind::EscapeSequence, 0, "\\*")]);
        assert!(scanned.warnings.is_empty());

        let scanned = tokenize("\\a");
        assert_eq!(scanned.tokens, vec![token(TokenKind::EscapeSequence, 0, "\\a")]);
        assert_eq!(scanned.warnings.len(), 1);
        assert_eq!(scanned.warnings[0].issue, IssueKind::RedundantEscape);
    }

    #[test]
    fn escaped_trigger_does_not_trigger() {
        assert_eq!(
            kinds("\\**a"),
            vec![TokenKind::EscapeSequence, TokenKind::Italic, TokenKind::Text]
        );
    }

    #[test]
    fn intra_word_underscore_is_text() {
        let scanned = tokenize("hello_world");
        assert_eq!(scanned.tokens, vec![token(TokenKind::Text, 0, "hello_world")]);
    }

    #[rstest]
    #[case("_hello", vec![TokenKind::Underline, TokenKind::Text])]
    #[case("hello_", vec![TokenKind::Text, TokenKind::Underline])]
    #[case("hello_ world", vec![TokenKind::Text, TokenKind::Underline, TokenKind::Text])]
    #[case(" _hi_ ", vec![
        TokenKind::Text,
        TokenKind::Underline,
        TokenKind::Text,
        TokenKind::Underline,
        TokenKind::Text,
    ])]
    #[case("a__b", vec![TokenKind::Text])]
    #[case("__init__", vec![TokenKind::Text])]
    #[case("é_ß", vec![TokenKind::Text])]
    fn underline_rule(#[case] input: &str, #[case] expected: Vec<TokenKind>) {
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn underscore_after_a_tag_sees_the_tag_character() {
        // The previous scalar is the last byte of the `*` token, not a letter.
        assert_eq!(
            kinds("*_a_*"),
            vec![
                TokenKind::Italic,
                TokenKind::Underline,
                TokenKind::Text,
                TokenKind::Underline,
                TokenKind::Italic,
            ]
        );
    }

    #[test]
    fn multibyte_text_is_one_run() {
        let scanned = tokenize("日本語 **太字**");
        assert_eq!(
            scanned.tokens,
            vec![
                token(TokenKind::Text, 0, "日本語 "),
                token(TokenKind::Bold, 10, "**"),
                token(TokenKind::Text, 12, "太字"),
                token(TokenKind::Bold, 18, "**"),
            ]
        );
    }

    #[test]
    fn link_and_image() {
        assert_eq!(
            kinds("[a](b) ![c](d)"),
            vec![
                TokenKind::LinkTextStart,
                TokenKind::Text,
                TokenKind::LinkAddress,
                TokenKind::Text,
                TokenKind::ImageTextStart,
                TokenKind::Text,
                TokenKind::LinkAddress,
            ]
        );
    }

    #[test]
    fn malformed_link() {
        let scanned = tokenize("x]()tail");
        assert_eq!(
            scanned.tokens,
            vec![
                token(TokenKind::Text, 0, "x"),
                token(TokenKind::LinkAddress, 1, "]()"),
                token(TokenKind::Text, 4, "tail"),
            ]
        );
        assert_eq!(scanned.warnings.len(), 1);
        assert_eq!(scanned.warnings[0].issue, IssueKind::MalformedLink);
        assert_eq!(scanned.warnings[0].byte_index, 2);
    }

    #[test]
    fn bare_urls_are_off_by_default() {
        assert_eq!(kinds("see https://example.com"), vec![TokenKind::Text]);
    }

    #[test]
    fn bare_urls_when_enabled() {
        let options = ScanOptions { bare_urls: true };
        let scanned = tokenize_with("see https://example.com/a_b, ok", &options);
        assert_eq!(
            scanned.tokens,
            vec![
                token(TokenKind::Text, 0, "see "),
                token(TokenKind::PlainURL, 4, "https://example.com/a_b,"),
                token(TokenKind::Text, 28, " ok"),
            ]
        );
    }

    #[test]
    fn bare_url_needs_a_word_start() {
        let options = ScanOptions { bare_urls: true };
        let scanned = tokenize_with("xhttps://example.com", &options);
        assert_eq!(scanned.tokens.len(), 1);
        assert_eq!(scanned.tokens[0].kind, TokenKind::Text);
    }

    #[rstest]
    #[case("")]
    #[case("plain")]
    #[case("**bold** *it* ~~s~~ _u_")]
    #[case("`unclosed")]
    #[case("```unclosed block")]
    #[case("``````")]
    #[case("\\")]
    #[case("\\日本")]
    #[case("~ ~x ~")]
    #[case("! !x ![")]
    #[case("[ ] ](")]
    #[case("x]()tail")]
    #[case("[a **b**](http://x.y) ![i](p.png)")]
    #[case("é_ß _日_ a__b")]
    #[case("mixed ```a``b``` and `c` then ``d`")]
    fn tokens_tile_the_input(#[case] input: &str) {
        let scanned = tokenize(input);
        assert_tiles(input, &scanned.tokens);
        let with_urls = tokenize_with(input, &ScanOptions { bare_urls: true });
        assert_tiles(input, &with_urls.tokens);
    }

    #[test]
    fn unclosed_addresses_scan_in_linear_time() {
        let n = 200_000;
        let input = "](".repeat(n);

        let started = std::time::Instant::now();
        let scanned = tokenize(&input);

        assert!(started.elapsed() < std::time::Duration::from_secs(10));
        assert_eq!(scanned.tokens.len(), n);
        assert!(scanned.tokens.iter().all(|t| t.kind == TokenKind::Text));
        assert_eq!(scanned.warnings.len(), n);
        assert!(
            scanned
                .warnings
                .iter()
                .all(|w| w.issue == IssueKind::UnexpectedEndOfInput)
        );
    }

    #[test]
    fn paren_far_ahead_still_closes_the_first_address() {
        let input = format!("](a{}) ](", "](".repeat(1000));
        let scanned = tokenize(&input);
        assert_eq!(scanned.tokens[0].kind, TokenKind::LinkAddress);
        assert_eq!(scanned.tokens[0].byte_len, input.len() - " ](".len());
        assert_eq!(scanned.warnings.len(), 1);
    }

    #[test]
    fn deterministic() {
        let input = "**a _b_ [c](d) `e` ~f \\g";
        assert_eq!(tokenize(input), tokenize(input));
    }
}
