//! # tagmark-syntax
//!
//! Inline markdown lexing and tree assembly: bold, italic, underline,
//! strikethrough, code spans and blocks, escapes, links and images.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Scanner → Tokens + Warnings → Assembler → Ast
//!               (classifier + handlers)        (open-tag stack)
//!                                              └→ Events → Sink → Rowan Tree
//! ```
//!
//! ### 1. Scanner ([`scanner`] module)
//!
//! A byte-oriented pass driven by a 256-entry [`classifier`] table. Trigger
//! characters are dispatched to their [`handlers`]; everything else
//! accumulates into text. Every byte of the input lands in exactly one
//! [`Token`], and positions are byte offsets. Problems are never fatal: a
//! malformed construct degrades to text and a [`Warning`] is recorded.
//!
//! ### 2. Assembler ([`assembler`] module)
//!
//! Folds the token stream into an arena [`Ast`] using a stack of open tags.
//! Unmatched or mis-nested openers are demoted back to text, so every input
//! produces a tree.
//!
//! ### 3. Syntax tree ([`assembler::sink`] module)
//!
//! The assembler also emits events in the rust-analyzer style, which the
//! sink turns into a lossless [Rowan] tree: its text is always exactly the
//! input, and nodes exist only for tags that were matched.
//!
//! [Rowan]: https://docs.rs/rowan
//!
//! ## Module Structure
//!
//! ```text
//! tagmark-syntax/
//! ├── lib.rs           # This file - public API and tree snapshot tests
//! ├── classifier.rs    # Byte → trigger lookup table
//! ├── handlers/        # One scanning routine per trigger
//! ├── scanner.rs       # tokenize(), the main scanning loop
//! ├── token.rs         # Token and TokenKind
//! ├── warning.rs       # Warning and IssueKind
//! ├── ast.rs           # Arena node model and serialization
//! ├── syntax_kind.rs   # SyntaxKind enum and Rowan integration
//! └── assembler/
//!     ├── mod.rs       # Assembler, Marker system, parse()
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     └── sink.rs      # Converts events to a Rowan GreenNode
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tagmark_syntax::{parse, NodeKind};
//!
//! let parsed = parse("some **bold** and [a link](https://example.com)");
//! let ast = &parsed.ast;
//!
//! assert!(parsed.warnings.is_empty());
//! assert_eq!(ast.display_text(ast.root()), "some bold and a link");
//!
//! let bold = ast.children(ast.root())[1];
//! assert_eq!(ast.kind(bold), NodeKind::Bold);
//! assert_eq!(ast.to_string(), "some **bold** and [a link](https://example.com)");
//! ```

pub mod assembler;
pub mod ast;
pub mod classifier;
pub mod handlers;
pub mod scanner;
pub mod syntax_kind;
pub mod token;
pub mod warning;

pub use assembler::{Parse, assemble, parse, parse_syntax, parse_syntax_with, parse_with};
pub use ast::{Ast, Node, NodeId, NodeKind};
pub use scanner::{ScanOptions, Tokenized, tokenize, tokenize_with};
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, TagmarkLang};
pub use token::{Token, TokenKind};
pub use warning::{IssueKind, Warning};
