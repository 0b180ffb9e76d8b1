//! Tokens produced by the scanner.
//!
//! Positions are **byte** offsets into the original input, never codepoint
//! counts. A UI that needs character columns has to convert them itself:
//!
//! ```
//! use tagmark_syntax::tokenize;
//!
//! let scanned = tokenize("é**x**");
//! let bold = &scanned.tokens[1];
//! assert_eq!(bold.byte_pos, 2); // 'é' is two bytes wide
//! assert_eq!("é**x**"[..bold.byte_pos].chars().count(), 1);
//! ```

use serde::Serialize;

/// Every kind of token the scanner can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// `**`
    Bold,
    /// `*`
    Italic,
    /// `~~`
    Strikethrough,
    /// A complete backtick span with a fence shorter than three.
    CodeInline,
    /// A complete (or unterminated) backtick span with a fence of three or more.
    CodeBlock,
    /// `\` followed by one scalar value.
    EscapeSequence,
    /// `_` outside a word.
    Underline,
    /// `[`
    LinkTextStart,
    /// `](url)`
    LinkAddress,
    /// A bare `http(s)://` address, only with [`ScanOptions::bare_urls`].
    ///
    /// [`ScanOptions::bare_urls`]: crate::ScanOptions::bare_urls
    PlainURL,
    /// `![`
    ImageTextStart,
    /// Anything else, including degraded triggers.
    Text,
}

impl TokenKind {
    /// Tokens that open or close a container in the tree.
    pub fn is_delimiter(self) -> bool {
        matches!(
            self,
            TokenKind::Bold
                | TokenKind::Italic
                | TokenKind::Strikethrough
                | TokenKind::Underline
                | TokenKind::LinkTextStart
                | TokenKind::ImageTextStart
                | TokenKind::LinkAddress
        )
    }
}

/// A scanned token borrowing its text from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub byte_pos: usize,
    pub byte_len: usize,
    pub raw: &'a str,
}

impl<'a> Token<'a> {
    /// Build a token covering `input[byte_pos..byte_pos + byte_len]`.
    pub fn new(kind: TokenKind, input: &'a str, byte_pos: usize, byte_len: usize) -> Self {
        Self {
            kind,
            byte_pos,
            byte_len,
            raw: &input[byte_pos..byte_pos + byte_len],
        }
    }

    /// Byte offset one past the end of the token.
    pub fn end(&self) -> usize {
        self.byte_pos + self.byte_len
    }
}
