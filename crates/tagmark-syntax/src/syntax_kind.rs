//! SyntaxKind enum for the lossless syntax tree view.
//!
//! Following the rust-analyzer model, tokens and nodes share a single enum.
//! Token kinds mirror [`TokenKind`] one to one; node kinds exist only for
//! tags that were matched. Every byte of the source appears as a token.

use crate::token::TokenKind;

/// All syntax kinds of the rowan tree.
///
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (scanner output) ===
    /// `**`
    BOLD_DELIM,
    /// `*`
    ITALIC_DELIM,
    /// `~~`
    STRIKE_DELIM,
    /// `_`
    UNDERLINE_DELIM,
    /// A closed backtick span, fence shorter than three
    CODE_INLINE,
    /// A backtick block
    CODE_BLOCK,
    /// `\` and the escaped character
    ESCAPE,
    /// `[`
    LINK_TEXT_START,
    /// `](url)`
    LINK_ADDRESS,
    /// Bare `http(s)://` address
    PLAIN_URL,
    /// `![`
    IMAGE_TEXT_START,
    /// Plain text, including degraded and unmatched delimiters
    TEXT,

    // === Composite Nodes (assembler output) ===
    /// Root node
    ROOT,
    /// `**…**`
    BOLD,
    /// `*…*`
    ITALIC,
    /// `_…_`
    UNDERLINE,
    /// `~~…~~`
    STRIKETHROUGH,
    /// `[…](…)`
    LINK,
    /// `![…](…)`
    IMAGE,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (scanner output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::TEXT as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Bold => SyntaxKind::BOLD_DELIM,
            TokenKind::Italic => SyntaxKind::ITALIC_DELIM,
            TokenKind::Strikethrough => SyntaxKind::STRIKE_DELIM,
            TokenKind::Underline => SyntaxKind::UNDERLINE_DELIM,
            TokenKind::CodeInline => SyntaxKind::CODE_INLINE,
            TokenKind::CodeBlock => SyntaxKind::CODE_BLOCK,
            TokenKind::EscapeSequence => SyntaxKind::ESCAPE,
            TokenKind::LinkTextStart => SyntaxKind::LINK_TEXT_START,
            TokenKind::LinkAddress => SyntaxKind::LINK_ADDRESS,
            TokenKind::PlainURL => SyntaxKind::PLAIN_URL,
            TokenKind::ImageTextStart => SyntaxKind::IMAGE_TEXT_START,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagmarkLang {}

impl rowan::Language for TagmarkLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::IMAGE as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<TagmarkLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<TagmarkLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<TagmarkLang>;
