//! # Document Tree
//!
//! An ordered tree of block and inline nodes in which every location is an
//! integer position. Walking the tree depth-first, positions increase
//! strictly: a non-leaf node contributes an open token, its content and a
//! close token; a text node contributes one unit per character; leaf nodes
//! contribute one unit.
//!
//! ```text
//! <p>ab</p><hr><p>c</p>
//! 0 1  3  4 5  6 7  8      (document size 8)
//! ```
//!
//! Documents are values. Every edit returns a new [`Document`]; callers must
//! re-resolve positions after each one since nothing about the old tree
//! survives.

pub mod fragment;
pub mod node;
pub mod resolve;

pub use fragment::Fragment;
pub use node::{BlockKind, Node, NodeKind};
pub use resolve::ResolvedPosition;

use crate::error::EngineError;

/// The root of a document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Node,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            root: Node::doc(Fragment::empty()),
        }
    }
}

/// A top-level block with its position range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopLevelBlock<'a> {
    pub start: usize,
    pub end: usize,
    pub node: &'a Node,
}

/// Lazy walk over the depth-1 children of a document, in position order.
///
/// Call [`Document::top_level_blocks`] again for a fresh walk.
#[derive(Debug, Clone)]
pub struct TopLevelBlocks<'a> {
    children: std::slice::Iter<'a, Node>,
    pos: usize,
}

impl<'a> Iterator for TopLevelBlocks<'a> {
    type Item = TopLevelBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.children.next()?;
        let start = self.pos;
        self.pos += node.node_size();
        Some(TopLevelBlock {
            start,
            end: self.pos,
            node,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl ExactSizeIterator for TopLevelBlocks<'_> {}

impl Document {
    /// Build a document from top-level blocks.
    ///
    /// Fails with `InvalidRange` if a node is not allowed at the top level
    /// (inline content or a bare list item).
    pub fn new(blocks: Vec<Node>) -> Result<Self, EngineError> {
        let root = Node::doc(Fragment::empty());
        let mut pos = 0;
        for block in &blocks {
            if !root.can_contain(block) {
                return Err(EngineError::invalid(pos, pos + block.node_size()));
            }
            pos += block.node_size();
        }
        Ok(Self {
            root: Node::doc(Fragment::from_nodes(blocks)),
        })
    }

    /// Wrap blocks the caller has already built to the content rules.
    pub(crate) fn from_valid_blocks(blocks: Vec<Node>) -> Self {
        Self {
            root: Node::doc(Fragment::from_nodes(blocks)),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of positions in the document; valid positions are `0..=size()`.
    pub fn size(&self) -> usize {
        self.root.content_size()
    }

    pub fn is_empty(&self) -> bool {
        self.root.content().is_empty()
    }

    pub fn text_content(&self) -> String {
        self.root.text_content()
    }

    fn check_pos(&self, pos: usize) -> Result<(), EngineError> {
        if pos > self.size() {
            return Err(EngineError::OutOfRange {
                pos,
                size: self.size(),
            });
        }
        Ok(())
    }

    /// Resolve a position into its chain of ancestors.
    pub fn resolve(&self, pos: usize) -> Result<ResolvedPosition<'_>, EngineError> {
        self.check_pos(pos)?;
        Ok(ResolvedPosition::walk(&self.root, pos))
    }

    /// The outermost node whose range starts exactly at `pos`.
    pub fn node_at(&self, pos: usize) -> Option<&Node> {
        let mut node = &self.root;
        let mut offset = pos;
        loop {
            let (index, child_start) = node.content().find_index(offset);
            let child = node.content().child(index)?;
            if child_start == offset {
                return Some(child);
            }
            if child.is_leaf() {
                return None;
            }
            offset -= child_start + 1;
            node = child;
        }
    }

    /// Immutable copy of the content in `[from, to)`.
    pub fn slice(&self, from: usize, to: usize) -> Result<Fragment, EngineError> {
        if from > to {
            return Err(EngineError::invalid(from, to));
        }
        self.check_pos(from)?;
        self.check_pos(to)?;
        Ok(self.root.content().cut(from, to))
    }

    pub fn top_level_blocks(&self) -> TopLevelBlocks<'_> {
        TopLevelBlocks {
            children: self.root.content().iter(),
            pos: 0,
        }
    }

    /// Start position of every top-level block, one drag handle each.
    pub fn drag_handles(&self) -> Vec<usize> {
        self.top_level_blocks().map(|block| block.start).collect()
    }

    /// Replace `[from, to)` with `fragment`, returning the new document.
    ///
    /// Both ends must resolve into the same parent on child boundaries, and
    /// every node of `fragment` must be allowed in that parent; otherwise the
    /// edit fails with `InvalidRange`.
    pub fn replace(&self, from: usize, to: usize, fragment: &Fragment) -> Result<Document, EngineError> {
        if from > to {
            return Err(EngineError::invalid(from, to));
        }
        let rfrom = self.resolve(from)?;
        let rto = self.resolve(to)?;

        let depth = rfrom.depth();
        let same_parent = depth == rto.depth() && rfrom.start(depth) == rto.start(depth);
        if !same_parent || !rfrom.at_boundary() || !rto.at_boundary() {
            return Err(EngineError::invalid(from, to));
        }

        let parent = rfrom.parent();
        if let Some(bad) = fragment.iter().find(|node| !parent.can_contain(node)) {
            log::debug!(
                "rejecting replace {from}..{to}: {:?} not allowed here",
                bad.kind()
            );
            return Err(EngineError::invalid(from, to));
        }

        let start_index = rfrom.index(depth).unwrap_or(0);
        let end_index = rto.index(depth).unwrap_or(start_index);
        let mut replaced = parent.with_content(parent.content().splice(start_index, end_index, fragment));

        // Rebuild the ancestors on the way back up to the root.
        for d in (0..depth).rev() {
            let ancestor = rfrom.node(d).ok_or(EngineError::invalid(from, to))?;
            let index = rfrom.index(d).ok_or(EngineError::invalid(from, to))?;
            replaced = ancestor.with_content(ancestor.content().replace_child(index, replaced));
        }

        Ok(Document { root: replaced })
    }

    pub fn delete(&self, from: usize, to: usize) -> Result<Document, EngineError> {
        self.replace(from, to, &Fragment::empty())
    }

    pub fn insert(&self, pos: usize, fragment: &Fragment) -> Result<Document, EngineError> {
        self.replace(pos, pos, fragment)
    }

    /// Swap the node starting at `pos` for `node`.
    pub fn replace_node_at(&self, pos: usize, node: Node) -> Result<Document, EngineError> {
        let existing = self
            .node_at(pos)
            .ok_or(EngineError::invalid(pos, pos))?;
        let end = pos + existing.node_size();
        self.replace(pos, end, &Fragment::from_nodes(vec![node]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{abc_document, list_document};
    use pretty_assertions::assert_eq;

    #[test]
    fn top_level_blocks_cover_the_document_exactly_once() {
        let doc = list_document();
        let mut expected_start = 0;
        for block in doc.top_level_blocks() {
            assert_eq!(block.start, expected_start);
            assert!(block.end > block.start);
            expected_start = block.end;
        }
        assert_eq!(expected_start, doc.size());
    }

    #[test]
    fn top_level_blocks_is_restartable() {
        let doc = abc_document();
        let first: Vec<_> = doc.top_level_blocks().map(|b| (b.start, b.end)).collect();
        let second: Vec<_> = doc.top_level_blocks().map(|b| (b.start, b.end)).collect();
        assert_eq!(first, vec![(0, 10), (10, 25), (25, 30)]);
        assert_eq!(first, second);
    }

    #[test]
    fn resolve_reports_ancestors_and_before() {
        let doc = list_document();
        // heading "Title" 0..7, list 7..21 with items 8..14 and 14..20
        // position 10 is inside the first item's paragraph, before its text
        let rp = doc.resolve(10).unwrap();
        assert_eq!(rp.depth(), 3);
        assert_eq!(rp.before(1), Some(7));
        assert_eq!(rp.before(2), Some(8));
        assert_eq!(rp.before(3), Some(9));
        assert_eq!(rp.before(0), None);
        assert_eq!(
            rp.node(1).and_then(Node::block_kind),
            Some(&BlockKind::BulletList)
        );
        assert_eq!(rp.after(1), Some(21));
    }

    #[test]
    fn resolve_inside_text_stays_in_the_textblock() {
        let doc = abc_document();
        let rp = doc.resolve(3).unwrap();
        assert_eq!(rp.depth(), 1);
        assert_eq!(rp.parent_offset(), 2);
        assert!(!rp.at_boundary());
    }

    #[test]
    fn resolve_out_of_range() {
        let doc = abc_document();
        assert_eq!(
            doc.resolve(doc.size() + 1).unwrap_err(),
            EngineError::OutOfRange { pos: 31, size: 30 }
        );
        assert!(doc.resolve(doc.size()).is_ok());
    }

    #[test]
    fn node_at_only_matches_exact_starts() {
        let doc = abc_document();
        assert_eq!(doc.node_at(10).map(Node::node_size), Some(15));
        assert!(doc.node_at(11).is_some_and(Node::is_text));
        assert!(doc.node_at(12).is_none());
        assert!(doc.node_at(30).is_none());
    }

    #[test]
    fn slice_validates_bounds() {
        let doc = abc_document();
        assert_eq!(
            doc.slice(12, 4).unwrap_err(),
            EngineError::InvalidRange { from: 12, to: 4 }
        );
        assert!(matches!(
            doc.slice(0, 99),
            Err(EngineError::OutOfRange { pos: 99, .. })
        ));
        assert_eq!(doc.slice(10, 25).unwrap().size(), 15);
    }

    #[test]
    fn slices_are_independent_of_later_edits() {
        let doc = abc_document();
        let slice = doc.slice(0, 10).unwrap();
        let edited = doc.delete(0, 10).unwrap();
        assert_eq!(edited.size(), 20);
        assert_eq!(slice.child(0).map(Node::text_content), Some("aaaaaaaa".to_string()));
    }

    #[test]
    fn replace_rejects_ranges_across_parents_or_inside_text() {
        let doc = list_document();
        // from the heading boundary into the list item
        assert!(doc.delete(0, 9).is_err());
        // inside the heading text
        assert!(doc.delete(2, 4).is_err());
    }

    #[test]
    fn replace_enforces_content_rules() {
        let doc = list_document();
        let para = Fragment::from_nodes(vec![Node::paragraph("x")]);
        // a paragraph cannot go directly into the list
        assert!(doc.insert(8, &para).is_err());
        // but it can go into a list item
        let edited = doc.insert(9, &para).unwrap();
        assert_eq!(edited.size(), doc.size() + 3);
    }

    #[test]
    fn nested_replace_rebuilds_ancestors() {
        let doc = list_document();
        // delete the second list item (14..20)
        let edited = doc.delete(14, 20).unwrap();
        let blocks: Vec<_> = edited.top_level_blocks().map(|b| (b.start, b.end)).collect();
        assert_eq!(blocks, vec![(0, 7), (7, 15)]);
    }

    #[test]
    fn new_rejects_inline_top_level_content() {
        assert!(Document::new(vec![Node::text("x")]).is_err());
        assert!(Document::new(vec![Node::block(BlockKind::ListItem, vec![])]).is_err());
        assert!(Document::new(vec![]).unwrap().is_empty());
    }
}
