use serde::{Deserialize, Serialize};

use crate::attributes::AttrSources;

use super::fragment::Fragment;

/// The kind of a block node.
///
/// Blocks occupy vertical layout space; the ones sitting directly under the
/// document root are the units a drag gesture moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph,
    /// ATX-style heading, level 1..=6
    Heading { level: u8 },
    BulletList,
    OrderedList { start: u32 },
    ListItem,
    Blockquote,
    CodeBlock { language: Option<String> },
    HorizontalRule,
}

impl BlockKind {
    /// Short lowercase name used in logs and the terminal front end.
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Heading { .. } => "heading",
            BlockKind::BulletList => "bullet_list",
            BlockKind::OrderedList { .. } => "ordered_list",
            BlockKind::ListItem => "list_item",
            BlockKind::Blockquote => "blockquote",
            BlockKind::CodeBlock { .. } => "code_block",
            BlockKind::HorizontalRule => "horizontal_rule",
        }
    }

    /// Blocks whose content is inline (text and hard breaks).
    pub fn is_textblock(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph | BlockKind::Heading { .. } | BlockKind::CodeBlock { .. }
        )
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BlockKind::HorizontalRule)
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root. Never appears below depth 0.
    Doc,
    Block(BlockKind),
    Text(String),
    HardBreak,
}

/// One node of the document tree.
///
/// Nodes are immutable values. Every edit builds replacement nodes and a new
/// root; nothing holds a parent link, so ancestry is always recovered by
/// walking down from the root with a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    attrs: AttrSources,
    content: Fragment,
    /// Cached position units occupied by this node, boundary tokens included.
    size: usize,
}

impl Node {
    fn build(kind: NodeKind, attrs: AttrSources, content: Fragment) -> Self {
        let size = match &kind {
            NodeKind::Text(text) => text.chars().count(),
            NodeKind::HardBreak => 1,
            NodeKind::Block(block) if block.is_leaf() => 1,
            NodeKind::Doc | NodeKind::Block(_) => content.size() + 2,
        };
        Self {
            kind,
            attrs,
            content,
            size,
        }
    }

    /// Text node. Callers should not create empty text nodes.
    pub fn text(text: impl Into<String>) -> Self {
        Self::build(
            NodeKind::Text(text.into()),
            AttrSources::default(),
            Fragment::empty(),
        )
    }

    pub fn hard_break() -> Self {
        Self::build(NodeKind::HardBreak, AttrSources::default(), Fragment::empty())
    }

    /// Block node with the given children and no stored attributes.
    pub fn block(kind: BlockKind, children: Vec<Node>) -> Self {
        let content = if kind.is_leaf() {
            Fragment::empty()
        } else {
            Fragment::from_nodes(children)
        };
        Self::build(NodeKind::Block(kind), AttrSources::default(), content)
    }

    pub fn paragraph(text: &str) -> Self {
        Self::block(BlockKind::Paragraph, inline_text(text))
    }

    pub fn heading(level: u8, text: &str) -> Self {
        Self::block(
            BlockKind::Heading {
                level: level.clamp(1, 6),
            },
            inline_text(text),
        )
    }

    pub fn horizontal_rule() -> Self {
        Self::block(BlockKind::HorizontalRule, vec![])
    }

    pub(crate) fn doc(content: Fragment) -> Self {
        Self::build(NodeKind::Doc, AttrSources::default(), content)
    }

    /// Copy of this node carrying different attribute sources.
    pub fn with_attrs(&self, attrs: AttrSources) -> Self {
        Self::build(self.kind.clone(), attrs, self.content.clone())
    }

    /// Copy of this node with its content replaced.
    pub fn with_content(&self, content: Fragment) -> Self {
        Self::build(self.kind.clone(), self.attrs.clone(), content)
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn block_kind(&self) -> Option<&BlockKind> {
        match &self.kind {
            NodeKind::Block(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn attrs(&self) -> &AttrSources {
        &self.attrs
    }

    pub fn content(&self) -> &Fragment {
        &self.content
    }

    /// Position units this node occupies in its parent.
    pub fn node_size(&self) -> usize {
        self.size
    }

    pub fn content_size(&self) -> usize {
        self.content.size()
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, NodeKind::Block(_))
    }

    pub fn is_inline(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_) | NodeKind::HardBreak)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn is_textblock(&self) -> bool {
        self.block_kind().is_some_and(BlockKind::is_textblock)
    }

    /// Leaf nodes have no content and no open/close tokens.
    pub fn is_leaf(&self) -> bool {
        match &self.kind {
            NodeKind::Text(_) | NodeKind::HardBreak => true,
            NodeKind::Block(kind) => kind.is_leaf(),
            NodeKind::Doc => false,
        }
    }

    /// Text of this node's subtree. Hard breaks read as newlines, and blocks
    /// are separated by newlines.
    pub fn text_content(&self) -> String {
        match &self.kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::HardBreak => "\n".to_string(),
            NodeKind::Block(kind) if kind.is_textblock() => self
                .content
                .iter()
                .map(Node::text_content)
                .collect::<String>(),
            NodeKind::Block(_) | NodeKind::Doc => self
                .content
                .iter()
                .map(Node::text_content)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Whether `child` may appear directly inside this node.
    pub fn can_contain(&self, child: &Node) -> bool {
        match &self.kind {
            NodeKind::Text(_) | NodeKind::HardBreak => false,
            NodeKind::Doc => child.is_block() && !is_list_item(child),
            NodeKind::Block(kind) => match kind {
                BlockKind::HorizontalRule => false,
                BlockKind::CodeBlock { .. } => child.is_text(),
                BlockKind::Paragraph | BlockKind::Heading { .. } => child.is_inline(),
                BlockKind::BulletList | BlockKind::OrderedList { .. } => is_list_item(child),
                BlockKind::ListItem | BlockKind::Blockquote => {
                    child.is_block() && !is_list_item(child)
                }
            },
        }
    }

    /// Copy of the part of this node between `from` and `to`, measured in
    /// this node's content coordinates (characters, for text nodes).
    pub(crate) fn cut(&self, from: usize, to: usize) -> Node {
        match &self.kind {
            NodeKind::Text(text) => {
                let piece: String = text.chars().skip(from).take(to - from).collect();
                Node::text(piece)
            }
            _ => self.with_content(self.content.cut(from, to)),
        }
    }
}

fn is_list_item(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Block(BlockKind::ListItem))
}

/// Inline children for a plain string: text separated by hard breaks.
fn inline_text(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            nodes.push(Node::hard_break());
        }
        if !line.is_empty() {
            nodes.push(Node::text(line));
        }
    }
    nodes
}
