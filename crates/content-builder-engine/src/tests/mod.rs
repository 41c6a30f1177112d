//! Shared fixtures for unit tests.

use crate::document::{BlockKind, Document, Node};

/// Three paragraphs: `a` x8 at `0..10`, `b` x13 at `10..25`, `c` x3 at `25..30`.
pub fn abc_document() -> Document {
    Document::new(vec![
        Node::paragraph("aaaaaaaa"),
        Node::paragraph("bbbbbbbbbbbbb"),
        Node::paragraph("ccc"),
    ])
    .expect("valid fixture")
}

/// A heading at `0..7` followed by a bullet list at `7..21` whose items sit
/// at `8..14` and `14..20`.
pub fn list_document() -> Document {
    let item = || Node::block(BlockKind::ListItem, vec![Node::paragraph("ab")]);
    Document::new(vec![
        Node::heading(1, "Title"),
        Node::block(BlockKind::BulletList, vec![item(), item()]),
    ])
    .expect("valid fixture")
}

/// Text of each top-level block, in order.
pub fn block_texts(doc: &Document) -> Vec<String> {
    doc.top_level_blocks()
        .map(|block| block.node.text_content())
        .collect()
}
