//! # Tree Assembler
//!
//! Folds the token stream into an [`Ast`]. The state lives in two parallel
//! stacks:
//!
//! - the **open-tag stack**: tags whose opening delimiter has been seen but
//!   not yet closed,
//! - the **breadcrumb stack**: the container node created for each of them,
//!   i.e. the path from the root to the node currently being filled.
//!
//! Both are kept in one `Vec<Open>` so they cannot drift apart.
//!
//! ## Rules
//!
//! - Text, code, escapes and bare URLs are leaves appended to the innermost
//!   open node (the root when nothing is open). Adjacent text is merged.
//! - `**`, `*`, `_`, `~~` close the matching open tag, or open a new
//!   container when no tag of that kind is open.
//! - `[` and `![` always open; `](url)` closes the nearest link or image.
//! - A closer whose tag is open but not innermost first **demotes** every
//!   tag above it. Demoting replaces the container by a text leaf holding
//!   the opening delimiter, followed by the container's children, in place.
//! - At the end of input every tag still open is demoted.
//! - At most [`MAX_DEPTH`] tags are open at once; further openers are text.
//!
//! Assembly never fails and never adds warnings: diagnosis is the
//! scanner's job, structural recovery is the assembler's.
//!
//! ## Syntax tree events
//!
//! The same pass records [`Event`]s with the rust-analyzer marker system:
//! an opening delimiter calls [`Assembler::start`] to get a [`Marker`], which
//! is completed when the tag closes and abandoned when it is demoted. The
//! [`Sink`] turns the events into a lossless rowan tree.

pub mod event;
pub mod sink;

use crate::ast::{Ast, Node, NodeId, NodeKind};
use crate::handlers::{address_of, run_length};
use crate::scanner::{ScanOptions, tokenize_with};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use crate::token::{Token, TokenKind};
use crate::warning::Warning;
use event::Event;
use sink::Sink;

/// Most tags that can be open at once. Openers beyond this stay text, which
/// keeps the tree, the rowan view and every walk over them shallow.
pub const MAX_DEPTH: usize = 128;

/// Tags that can be open while assembling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Link,
    Image,
}

impl Tag {
    fn opened_by(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Bold => Some(Tag::Bold),
            TokenKind::Italic => Some(Tag::Italic),
            TokenKind::Underline => Some(Tag::Underline),
            TokenKind::Strikethrough => Some(Tag::Strikethrough),
            TokenKind::LinkTextStart => Some(Tag::Link),
            TokenKind::ImageTextStart => Some(Tag::Image),
            _ => None,
        }
    }

    /// Whether the same delimiter both opens and closes the tag.
    fn is_symmetric(self) -> bool {
        !matches!(self, Tag::Link | Tag::Image)
    }

    fn node_kind(self) -> NodeKind {
        match self {
            Tag::Bold => NodeKind::Bold,
            Tag::Italic => NodeKind::Italic,
            Tag::Underline => NodeKind::Underline,
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::Link => NodeKind::Link,
            Tag::Image => NodeKind::Image,
        }
    }

    fn syntax_kind(self) -> SyntaxKind {
        match self {
            Tag::Bold => SyntaxKind::BOLD,
            Tag::Italic => SyntaxKind::ITALIC,
            Tag::Underline => SyntaxKind::UNDERLINE,
            Tag::Strikethrough => SyntaxKind::STRIKETHROUGH,
            Tag::Link => SyntaxKind::LINK,
            Tag::Image => SyntaxKind::IMAGE,
        }
    }
}

/// One entry of the open-tag stack together with its breadcrumb.
struct Open<'a> {
    tag: Tag,
    node: NodeId,
    parent: NodeId,
    delimiter: &'a str,
    marker: Marker,
}

/// The assembler state machine.
pub struct Assembler<'t, 'input> {
    tokens: &'t [Token<'input>],
    ast: Ast,
    stack: Vec<Open<'input>>,
    events: Vec<Event>,
}

impl<'t, 'input> Assembler<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            ast: Ast::new(),
            stack: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Consume every token; returns the finished tree and the event list.
    pub fn run(mut self) -> (Ast, Vec<Event>) {
        self.events.push(Event::start(SyntaxKind::ROOT));
        let tokens = self.tokens;
        for token in tokens {
            self.step(token);
        }
        while let Some(open) = self.stack.pop() {
            self.demote(open);
        }
        self.events.push(Event::Finish);
        (self.ast.compact(), self.events)
    }

    /// Reserve a placeholder event for a node that may or may not complete.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// The node new children attach to.
    fn current(&self) -> NodeId {
        self.stack
            .last()
            .map(|open| open.node)
            .unwrap_or_else(|| self.ast.root())
    }

    fn step(&mut self, token: &Token<'input>) {
        match token.kind {
            TokenKind::Text => self.leaf_text(token, token.raw),
            TokenKind::EscapeSequence => self.leaf_text(token, &token.raw[1..]),
            TokenKind::CodeInline | TokenKind::CodeBlock => self.leaf_code(token),
            TokenKind::PlainURL => {
                let parent = self.current();
                let link = self.ast.add_link(parent, token.raw);
                self.ast.add_text(link, token.raw);
                self.bump(token);
            }
            TokenKind::LinkAddress => self.close_link(token),
            TokenKind::LinkTextStart | TokenKind::ImageTextStart => {
                if let Some(tag) = Tag::opened_by(token.kind) {
                    self.open(tag, token);
                }
            }
            TokenKind::Bold
            | TokenKind::Italic
            | TokenKind::Underline
            | TokenKind::Strikethrough => {
                let Some(tag) = Tag::opened_by(token.kind) else {
                    return;
                };
                match self.stack.iter().rposition(|open| open.tag == tag) {
                    Some(depth) => self.close(depth, token),
                    None => self.open(tag, token),
                }
            }
        }
    }

    /// Record the token in the event stream.
    fn bump(&mut self, token: &Token<'input>) {
        self.events.push(Event::token(token.kind.into()));
    }

    fn leaf_text(&mut self, token: &Token<'input>, text: &str) {
        let parent = self.current();
        self.ast.push_text(parent, text);
        self.bump(token);
    }

    fn leaf_code(&mut self, token: &Token<'input>) {
        let raw = token.raw;
        let fence = run_length(raw.as_bytes(), 0);
        let body = &raw[fence..];
        let trailing = body.bytes().rev().take_while(|&b| b == b'`').count();
        let closed = raw.len() > 2 * fence && trailing == fence;
        let content = if closed { &body[..body.len() - fence] } else { body };

        let parent = self.current();
        self.ast.add_node(
            parent,
            Node::Code {
                fence,
                content: content.to_string(),
            },
        );
        self.bump(token);
    }

    fn open(&mut self, tag: Tag, token: &Token<'input>) {
        if self.stack.len() >= MAX_DEPTH {
            log::debug!(
                "nesting limit {MAX_DEPTH} reached, {:?} at byte {} stays text",
                tag, token.byte_pos
            );
            self.leaf_text(token, token.raw);
            return;
        }
        let parent = self.current();
        let node = self.ast.add_container(parent, tag.node_kind());
        let marker = self.start();
        self.bump(token);
        self.stack.push(Open {
            tag,
            node,
            parent,
            delimiter: token.raw,
            marker,
        });
    }

    /// Close the tag at `depth`, demoting everything opened after it.
    fn close(&mut self, depth: usize, token: &Token<'input>) {
        while self.stack.len() > depth + 1 {
            if let Some(open) = self.stack.pop() {
                self.demote(open);
            }
        }
        let Some(open) = self.stack.pop() else {
            return;
        };
        if !open.tag.is_symmetric() {
            self.ast.set_url(open.node, address_of(token.raw));
        }
        self.bump(token);
        open.marker.complete(self, open.tag.syntax_kind());
    }

    fn close_link(&mut self, token: &Token<'input>) {
        let target = self
            .stack
            .iter()
            .rposition(|open| matches!(open.tag, Tag::Link | Tag::Image));
        match target {
            Some(depth) => self.close(depth, token),
            None => self.leaf_text(token, token.raw),
        }
    }

    fn demote(&mut self, open: Open<'input>) {
        log::debug!(
            "demoting unmatched {:?} opened by {:?} to text",
            open.tag, open.delimiter
        );
        self.ast
            .unwrap_into_text(open.parent, open.node, open.delimiter);
        open.marker.abandon(self);
    }
}

/// A reserved slot for a node that is not finished yet.
///
/// Every marker must be either completed or abandoned; dropping one without
/// doing either is a bug and panics.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Turn the placeholder into `Start(kind)` and close the node here.
    pub fn complete(mut self, a: &mut Assembler<'_, '_>, kind: SyntaxKind) {
        self.completed = true;
        let event_at_pos = &mut a.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::start(kind);
        a.events.push(Event::Finish);
    }

    /// Give up on the node. The placeholder is removed if it is the last
    /// event and left inert otherwise.
    pub fn abandon(mut self, a: &mut Assembler<'_, '_>) {
        self.completed = true;
        if self.pos == a.events.len() - 1 {
            match a.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// Assemble a token stream into a tree.
pub fn assemble(tokens: &[Token<'_>]) -> Ast {
    Assembler::new(tokens).run().0
}

/// Result of [`parse`]: the tree plus every scanner warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub ast: Ast,
    pub warnings: Vec<Warning>,
}

/// Tokenize and assemble with default options.
pub fn parse(input: &str) -> Parse {
    parse_with(input, &ScanOptions::default())
}

pub fn parse_with(input: &str, options: &ScanOptions) -> Parse {
    let scanned = tokenize_with(input, options);
    Parse {
        ast: assemble(&scanned.tokens),
        warnings: scanned.warnings,
    }
}

/// Build the lossless rowan tree. Its text is always exactly `input`.
pub fn parse_syntax(input: &str) -> SyntaxNode {
    parse_syntax_with(input, &ScanOptions::default())
}

pub fn parse_syntax_with(input: &str, options: &ScanOptions) -> SyntaxNode {
    let scanned = tokenize_with(input, options);
    let (_, events) = Assembler::new(&scanned.tokens).run();
    Sink::new(&scanned.tokens, events).finish()
}
