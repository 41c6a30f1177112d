use std::ops::Range;

use crate::document::Document;
use crate::error::EngineError;

/// Move the content at `source` so it starts at `insert_pos`.
///
/// `insert_pos` is measured in the document before the move. The extracted
/// content is removed first, so a target after the source is shifted back
/// by the removed length; a target inside the source collapses to its start.
/// The intermediate document is never returned.
///
/// Fails with `InvalidRange` when `source` is empty, reversed, or reaches
/// past the end of `doc` (e.g. a range captured before the document
/// changed), and with `OutOfRange` when `insert_pos` does.
pub fn build_move(
    doc: &Document,
    source: Range<usize>,
    insert_pos: usize,
) -> Result<Document, EngineError> {
    let Range { start: from, end: to } = source;
    if from >= to || to > doc.size() {
        return Err(EngineError::invalid(from, to));
    }
    if insert_pos > doc.size() {
        return Err(EngineError::OutOfRange {
            pos: insert_pos,
            size: doc.size(),
        });
    }

    let fragment = doc.slice(from, to)?;
    let removed = doc.delete(from, to)?;

    let adjusted = if insert_pos > to {
        insert_pos - (to - from)
    } else if insert_pos > from {
        from
    } else {
        insert_pos
    };

    let moved = removed.insert(adjusted, &fragment)?;
    log::debug!("moved {from}..{to} to {insert_pos} (inserted at {adjusted})");
    Ok(moved)
}
