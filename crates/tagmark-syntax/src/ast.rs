//! # Node Model
//!
//! The formatting tree is stored in an arena ([`Ast`]) and addressed by
//! [`NodeId`] handles. Ownership is strictly parent → child: a container
//! lists the ids of its children in insertion order, and no node knows its
//! parent. Every node offers the same capability set:
//!
//! | capability | containers | `Text` | `Code` | `Link` / `Image` |
//! |---|---|---|---|---|
//! | [`display_text`](Ast::display_text) | children, concatenated | content | content | link text |
//! | [`value`](Ast::value) | display text | display text | display text | URL |
//! | [`to_markdown`](Ast::to_markdown) | children wrapped in the tag pair | escaped content | fenced content | `[text](url)` / `![text](url)` |
//! | [`text_len`](Ast::text_len) | scalar values of the display text | | | |
//!
//! An `Image` owns no URL of its own; it wraps a `Link` node, and anything
//! appended to the image lands in that link.
//!
//! ```
//! use tagmark_syntax::ast::{Ast, NodeKind};
//!
//! let mut ast = Ast::new();
//! let root = ast.root();
//! let bold = ast.add_container(root, NodeKind::Bold);
//! ast.add_text(bold, "héllo");
//! let link = ast.add_link(root, "https://example.com");
//! ast.add_text(link, "site");
//!
//! assert_eq!(ast.to_markdown(root), "**héllo**[site](https://example.com)");
//! assert_eq!(ast.text_len(root), 9);
//! assert_eq!(ast.value(link), "https://example.com");
//! ```

use std::fmt;

use serde::Serialize;

use crate::classifier::is_trigger_char;
use crate::handlers::{BLOCK_FENCE, run_length};

/// Handle to a node inside an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Root,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Link,
    Image,
    Text,
}

impl NodeKind {
    /// Opening and closing markup of a formatting container.
    pub fn tag_pair(self) -> Option<(&'static str, &'static str)> {
        match self {
            NodeKind::Bold => Some(("**", "**")),
            NodeKind::Italic => Some(("*", "*")),
            NodeKind::Underline => Some(("_", "_")),
            NodeKind::Strikethrough => Some(("~~", "~~")),
            _ => None,
        }
    }
}

/// A node and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Root(Vec<NodeId>),
    Bold(Vec<NodeId>),
    Italic(Vec<NodeId>),
    Underline(Vec<NodeId>),
    Strikethrough(Vec<NodeId>),
    /// `fence` is the number of backticks on each side.
    Code { fence: usize, content: String },
    Link { url: String, children: Vec<NodeId> },
    /// Wraps a [`Node::Link`].
    Image(NodeId),
    Text(String),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Root(_) => NodeKind::Root,
            Node::Bold(_) => NodeKind::Bold,
            Node::Italic(_) => NodeKind::Italic,
            Node::Underline(_) => NodeKind::Underline,
            Node::Strikethrough(_) => NodeKind::Strikethrough,
            Node::Code { .. } => NodeKind::Code,
            Node::Link { .. } => NodeKind::Link,
            Node::Image(_) => NodeKind::Image,
            Node::Text(_) => NodeKind::Text,
        }
    }
}

/// Arena of nodes rooted at [`Ast::root`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    /// An empty tree holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Root(Vec::new())],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind()
    }

    /// Children in insertion order; empty for leaves.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Node::Root(children)
            | Node::Bold(children)
            | Node::Italic(children)
            | Node::Underline(children)
            | Node::Strikethrough(children)
            | Node::Link { children, .. } => children,
            Node::Image(link) => self.children(*link),
            Node::Code { .. } | Node::Text(_) => &[],
        }
    }

    fn children_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        if let Node::Image(link) = self.nodes[id.index()] {
            return self.children_mut(link);
        }
        match &mut self.nodes[id.index()] {
            Node::Root(children)
            | Node::Bold(children)
            | Node::Italic(children)
            | Node::Underline(children)
            | Node::Strikethrough(children)
            | Node::Link { children, .. } => Some(children),
            Node::Image(_) | Node::Code { .. } | Node::Text(_) => None,
        }
    }

    /// The URL of a link or image.
    pub fn url(&self, id: NodeId) -> Option<&str> {
        match self.node(id) {
            Node::Link { url, .. } => Some(url),
            Node::Image(link) => self.url(*link),
            _ => None,
        }
    }

    pub(crate) fn set_url(&mut self, id: NodeId, new_url: &str) {
        if let Node::Image(link) = self.nodes[id.index()] {
            return self.set_url(link, new_url);
        }
        if let Node::Link { url, .. } = &mut self.nodes[id.index()] {
            *url = new_url.to_string();
        }
    }

    /// Store a node without attaching it anywhere.
    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Attach `child` as the last child of `parent`. Leaves ignore this.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(children) = self.children_mut(parent) {
            children.push(child);
        }
    }

    /// Append `node` under `parent` and return its id.
    pub fn add_node(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.alloc(node);
        self.append_child(parent, id);
        id
    }

    /// Append an empty node of `kind` under `parent`.
    ///
    /// Links and images start with an empty URL, code with an empty body.
    pub fn add_container(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let node = match kind {
            NodeKind::Root => Node::Root(Vec::new()),
            NodeKind::Bold => Node::Bold(Vec::new()),
            NodeKind::Italic => Node::Italic(Vec::new()),
            NodeKind::Underline => Node::Underline(Vec::new()),
            NodeKind::Strikethrough => Node::Strikethrough(Vec::new()),
            NodeKind::Code => Node::Code {
                fence: 1,
                content: String::new(),
            },
            NodeKind::Link => return self.add_link(parent, ""),
            NodeKind::Image => return self.add_image(parent, ""),
            NodeKind::Text => Node::Text(String::new()),
        };
        self.add_node(parent, node)
    }

    pub fn add_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.add_node(parent, Node::Text(text.into()))
    }

    /// Append code, choosing the shortest fence that no backtick run inside
    /// `content` could close early. `block` forces a fence of three or more.
    ///
    /// Content that starts or ends with a backtick cannot be fenced
    /// unambiguously and will not re-parse to the same node.
    pub fn add_code(&mut self, parent: NodeId, content: impl Into<String>, block: bool) -> NodeId {
        let content = content.into();
        let fence = fence_for(&content, if block { BLOCK_FENCE } else { 1 });
        self.add_node(parent, Node::Code { fence, content })
    }

    pub fn add_link(&mut self, parent: NodeId, url: impl Into<String>) -> NodeId {
        self.add_node(
            parent,
            Node::Link {
                url: url.into(),
                children: Vec::new(),
            },
        )
    }

    /// Append an image; the returned id is the image, its text goes under it.
    pub fn add_image(&mut self, parent: NodeId, url: impl Into<String>) -> NodeId {
        let link = self.alloc(Node::Link {
            url: url.into(),
            children: Vec::new(),
        });
        self.add_node(parent, Node::Image(link))
    }

    /// Append text, extending the last child instead when it is text too.
    pub(crate) fn push_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(&last) = self.children(parent).last() {
            if let Node::Text(existing) = &mut self.nodes[last.index()] {
                existing.push_str(text);
                return;
            }
        }
        self.add_text(parent, text);
    }

    /// Replace the container `id` (a child of `parent`) by a text leaf holding
    /// `marker`, followed by the container's former children.
    pub(crate) fn unwrap_into_text(&mut self, parent: NodeId, id: NodeId, marker: &str) {
        let moved = self.children_mut(id).map(std::mem::take).unwrap_or_default();
        let text = self.alloc(Node::Text(marker.to_string()));
        let Some(siblings) = self.children_mut(parent) else {
            return;
        };
        let Some(at) = siblings.iter().position(|&c| c == id) else {
            return;
        };
        siblings.splice(at..=at, std::iter::once(text).chain(moved));
        self.merge_adjacent_text(parent);
    }

    fn merge_adjacent_text(&mut self, parent: NodeId) {
        let Some(children) = self.children_mut(parent).map(std::mem::take) else {
            return;
        };
        let mut merged: Vec<NodeId> = Vec::with_capacity(children.len());
        for child in children {
            if let (Some(&last), Node::Text(next)) = (merged.last(), &self.nodes[child.index()]) {
                if let Node::Text(_) = self.nodes[last.index()] {
                    let next = next.clone();
                    if let Node::Text(existing) = &mut self.nodes[last.index()] {
                        existing.push_str(&next);
                    }
                    continue;
                }
            }
            merged.push(child);
        }
        if let Some(children) = self.children_mut(parent) {
            *children = merged;
        }
    }

    /// A copy holding only the nodes reachable from the root, in pre-order.
    pub(crate) fn compact(&self) -> Ast {
        let mut out = Ast::new();
        let root = out.root();
        let mut pending: Vec<(NodeId, NodeId)> = self
            .children(self.root())
            .iter()
            .rev()
            .map(|&child| (child, root))
            .collect();
        while let Some((id, parent)) = pending.pop() {
            let copy = self.copy_node(&mut out, parent, id);
            pending.extend(self.children(id).iter().rev().map(|&child| (child, copy)));
        }
        out
    }

    /// Copy `id` alone (without its children) under `parent` in `out`.
    fn copy_node(&self, out: &mut Ast, parent: NodeId, id: NodeId) -> NodeId {
        match self.node(id) {
            Node::Link { url, .. } => out.add_link(parent, url.clone()),
            Node::Image(link) => out.add_image(parent, self.url(*link).unwrap_or_default()),
            Node::Code { fence, content } => out.add_node(
                parent,
                Node::Code {
                    fence: *fence,
                    content: content.clone(),
                },
            ),
            Node::Text(text) => out.add_text(parent, text.clone()),
            other => out.add_container(parent, other.kind()),
        }
    }

    /// Pre-order walk of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            ast: self,
            stack: vec![id],
        }
    }

    /// Visible text: what a reader sees once markup is rendered.
    pub fn display_text(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|node| match self.node(node) {
                Node::Text(text) => Some(text.as_str()),
                Node::Code { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Semantic value: the URL for links and images, the display text otherwise.
    pub fn value(&self, id: NodeId) -> String {
        match self.url(id) {
            Some(url) => url.to_string(),
            None => self.display_text(id),
        }
    }

    /// Number of Unicode scalar values in the display text (not bytes).
    pub fn text_len(&self, id: NodeId) -> usize {
        self.display_text(id).chars().count()
    }

    /// Canonical markdown for the subtree at `id`.
    pub fn to_markdown(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markdown(id, &mut out);
        out
    }

    fn write_markdown(&self, id: NodeId, out: &mut String) {
        // Work list instead of recursion: nesting depth is input controlled.
        let mut pending = vec![Emit::Node(id)];
        while let Some(step) = pending.pop() {
            let id = match step {
                Emit::Str(text) => {
                    out.push_str(text);
                    continue;
                }
                Emit::Node(id) => id,
            };
            match self.node(id) {
                Node::Text(text) => escape_text(text, out),
                Node::Code { fence, content } => {
                    let ticks = "`".repeat(*fence);
                    out.push_str(&ticks);
                    out.push_str(content);
                    out.push_str(&ticks);
                }
                Node::Link { url, children } => {
                    out.push('[');
                    pending.extend([Emit::Str(")"), Emit::Str(url.as_str()), Emit::Str("](")]);
                    pending.extend(children.iter().rev().map(|&child| Emit::Node(child)));
                }
                Node::Image(link) => {
                    out.push('!');
                    pending.push(Emit::Node(*link));
                }
                node => {
                    let (open, close) = node.kind().tag_pair().unwrap_or(("", ""));
                    out.push_str(open);
                    pending.push(Emit::Str(close));
                    pending.extend(self.children(id).iter().rev().map(|&child| Emit::Node(child)));
                }
            }
        }
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markdown(self.root()))
    }
}

/// One pending step of [`Ast::to_markdown`].
enum Emit<'a> {
    Node(NodeId),
    Str(&'a str),
}

/// Iterator returned by [`Ast::descendants`].
pub struct Descendants<'a> {
    ast: &'a Ast,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.ast.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Backslash-escape trigger characters so text never turns into markup.
///
/// An underscore between two alphanumerics is already plain text and is
/// left alone.
fn escape_text(text: &str, out: &mut String) {
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        let next = chars.peek().copied();
        let intra_word = ch == '_'
            && prev.is_some_and(char::is_alphanumeric)
            && next.is_some_and(char::is_alphanumeric);
        if is_trigger_char(ch) && !intra_word {
            out.push('\\');
        }
        out.push(ch);
        prev = Some(ch);
    }
}

/// Shortest fence of at least `min` backticks that differs from every run
/// of backticks inside `content`.
fn fence_for(content: &str, min: usize) -> usize {
    let bytes = content.as_bytes();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = run_length(bytes, i);
            runs.push(run);
            i += run;
        } else {
            i += 1;
        }
    }
    (min..).find(|n| !runs.contains(n)).unwrap_or(min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_tree_is_an_empty_root() {
        let ast = Ast::new();
        assert_eq!(ast.kind(ast.root()), NodeKind::Root);
        assert!(ast.children(ast.root()).is_empty());
        assert_eq!(ast.to_markdown(ast.root()), "");
        assert_eq!(ast.text_len(ast.root()), 0);
    }

    #[test]
    fn text_is_a_leaf() {
        let mut ast = Ast::new();
        let root = ast.root();
        let text = ast.add_text(root, "leaf");
        let orphan = ast.add_text(text, "ignored");
        assert!(ast.children(text).is_empty());
        assert_eq!(ast.children(root), &[text]);
        assert_eq!(ast.display_text(root), "leaf");
        assert_eq!(ast.kind(orphan), NodeKind::Text);
    }

    #[test]
    fn formatting_containers_serialize_with_their_tags() {
        let mut ast = Ast::new();
        let root = ast.root();
        for kind in [
            NodeKind::Bold,
            NodeKind::Italic,
            NodeKind::Underline,
            NodeKind::Strikethrough,
        ] {
            let node = ast.add_container(root, kind);
            ast.add_text(node, "x");
        }
        assert_eq!(ast.to_markdown(root), "**x***x*_x_~~x~~");
        assert_eq!(ast.display_text(root), "xxxx");
    }

    #[test]
    fn link_serialization_has_one_bracket_pair() {
        let mut ast = Ast::new();
        let root = ast.root();
        let link = ast.add_link(root, "https://example.com/a_(b");
        ast.add_text(link, "one ");
        let bold = ast.add_container(link, NodeKind::Bold);
        ast.add_text(bold, "two");
        ast.add_code(link, "three", false);

        let md = ast.to_markdown(link);
        assert_eq!(md, "[one **two**`three`](https://example.com/a_(b)");
        assert_eq!(md.matches('[').count(), 1);
        assert_eq!(md.matches(']').count(), 1);
        assert_eq!(ast.display_text(link), "one twothree");
        assert_eq!(ast.value(link), "https://example.com/a_(b");
    }

    #[test]
    fn image_wraps_a_link() {
        let mut ast = Ast::new();
        let root = ast.root();
        let image = ast.add_image(root, "cat.png");
        ast.add_text(image, "a cat");

        assert_eq!(ast.kind(image), NodeKind::Image);
        assert_eq!(ast.to_markdown(image), "![a cat](cat.png)");
        assert_eq!(ast.value(image), "cat.png");
        assert_eq!(ast.display_text(image), "a cat");
        assert_eq!(ast.children(image).len(), 1);
    }

    #[test]
    fn text_len_counts_scalars_not_bytes() {
        let mut ast = Ast::new();
        let root = ast.root();
        ast.add_text(root, "日本語");
        let italic = ast.add_container(root, NodeKind::Italic);
        ast.add_text(italic, "é");
        assert_eq!(ast.text_len(root), 4);
        assert_eq!(ast.display_text(root).len(), 11);
    }

    #[test]
    fn text_escapes_triggers() {
        let mut ast = Ast::new();
        let root = ast.root();
        ast.add_text(root, "2*3 [x] ~ `a` \\ ! snake_case _edge_");
        assert_eq!(
            ast.to_markdown(root),
            "2\\*3 \\[x\\] \\~ \\`a\\` \\\\ \\! snake_case \\_edge\\_"
        );
    }

    #[test]
    fn code_fence_avoids_inner_runs() {
        let mut ast = Ast::new();
        let root = ast.root();
        let inline = ast.add_code(root, "a ` b", false);
        let block = ast.add_code(root, "x ``` y", true);
        assert_eq!(ast.to_markdown(inline), "``a ` b``");
        assert_eq!(ast.to_markdown(block), "````x ``` y````");
        assert_eq!(ast.display_text(block), "x ``` y");
    }

    #[test]
    fn push_text_merges_with_previous_text() {
        let mut ast = Ast::new();
        let root = ast.root();
        ast.push_text(root, "a");
        ast.push_text(root, "b");
        assert_eq!(ast.children(root).len(), 1);
        assert_eq!(ast.display_text(root), "ab");
    }

    #[test]
    fn unwrap_into_text_splices_children_in_place() {
        let mut ast = Ast::new();
        let root = ast.root();
        ast.add_text(root, "before ");
        let bold = ast.add_container(root, NodeKind::Bold);
        ast.add_text(bold, "inner ");
        let italic = ast.add_container(bold, NodeKind::Italic);
        ast.add_text(italic, "it");

        ast.unwrap_into_text(root, bold, "**");

        let kinds: Vec<_> = ast.children(root).iter().map(|&c| ast.kind(c)).collect();
        assert_eq!(kinds, vec![NodeKind::Text, NodeKind::Italic]);
        assert_eq!(ast.display_text(ast.children(root)[0]), "before **inner ");
        assert_eq!(ast.to_markdown(root), "before \\*\\*inner *it*");
    }

    #[test]
    fn compact_drops_unreachable_nodes() {
        let mut ast = Ast::new();
        let root = ast.root();
        let bold = ast.add_container(root, NodeKind::Bold);
        ast.add_text(bold, "x");
        ast.unwrap_into_text(root, bold, "**");
        let compacted = ast.compact();

        assert_eq!(compacted.descendants(compacted.root()).count(), 2);
        assert_eq!(compacted.to_markdown(compacted.root()), ast.to_markdown(root));
    }

    #[test]
    fn deep_trees_are_walked_without_recursion() {
        let depth = 100_000;
        let mut ast = Ast::new();
        let mut parent = ast.root();
        for _ in 0..depth {
            parent = ast.add_link(parent, "u");
        }
        ast.add_text(parent, "x");

        let expected = format!("{}x{}", "[".repeat(depth), "](u)".repeat(depth));
        assert_eq!(ast.to_markdown(ast.root()), expected);
        assert_eq!(ast.display_text(ast.root()), "x");
        assert_eq!(ast.text_len(ast.root()), 1);

        let compacted = ast.compact();
        assert_eq!(compacted.descendants(compacted.root()).count(), depth + 2);
        assert_eq!(compacted, ast);
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut ast = Ast::new();
        let root = ast.root();
        let bold = ast.add_container(root, NodeKind::Bold);
        ast.add_text(bold, "a");
        ast.add_text(root, "b");
        let kinds: Vec<_> = ast.descendants(root).map(|id| ast.kind(id)).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Root, NodeKind::Bold, NodeKind::Text, NodeKind::Text]
        );
    }
}
