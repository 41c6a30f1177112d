use std::ops::Range;

use crate::document::Document;

/// Result of a committed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Document version after the transaction
    pub version: u64,
    /// Range of the new document covering every top-level block that
    /// differs from the old one; empty when nothing changed
    pub changed: Range<usize>,
}

/// Smallest range of top-level blocks in `new` that differs from `old`.
///
/// Compares whole blocks from both ends, so a block whose content or
/// attributes changed counts as changed in full.
pub fn changed_range(old: &Document, new: &Document) -> Range<usize> {
    let old_blocks: Vec<_> = old.top_level_blocks().collect();
    let new_blocks: Vec<_> = new.top_level_blocks().collect();

    let prefix = old_blocks
        .iter()
        .zip(&new_blocks)
        .take_while(|(a, b)| a.node == b.node)
        .count();
    let max_suffix = old_blocks.len().min(new_blocks.len()) - prefix;
    let suffix = old_blocks
        .iter()
        .rev()
        .zip(new_blocks.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a.node == b.node)
        .count();

    let start = new_blocks.get(prefix).map_or(new.size(), |b| b.start);
    let end_index = new_blocks.len() - suffix;
    if end_index <= prefix {
        return start..start;
    }
    start..new_blocks[end_index - 1].end
}
