use std::collections::VecDeque;

use crate::document::Document;

/// Bounded undo/redo stacks of whole documents.
///
/// Documents are values, so an entry is simply the document as it was
/// before (for undo) or after (for redo) a transaction.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Document>,
    redo: Vec<Document>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Record the document a transaction replaced. Clears redo.
    pub fn record(&mut self, previous: Document) {
        self.redo.clear();
        if self.limit == 0 {
            return;
        }
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(previous);
    }

    /// Step back from `current`, returning the document to restore.
    pub fn undo(&mut self, current: Document) -> Option<Document> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward from `current`, returning the document to restore.
    pub fn redo(&mut self, current: Document) -> Option<Document> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Node;

    fn doc(text: &str) -> Document {
        Document::new(vec![Node::paragraph(text)]).unwrap()
    }

    #[test]
    fn undo_then_redo() {
        let mut history = History::new(10);
        history.record(doc("a"));

        let restored = history.undo(doc("b")).unwrap();
        assert_eq!(restored, doc("a"));
        assert!(history.can_redo());

        let again = history.redo(restored).unwrap();
        assert_eq!(again, doc("b"));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn recording_clears_redo() {
        let mut history = History::new(10);
        history.record(doc("a"));
        history.undo(doc("b"));
        history.record(doc("a"));
        assert!(!history.can_redo());
    }

    #[test]
    fn oldest_entries_fall_off() {
        let mut history = History::new(2);
        for text in ["a", "b", "c"] {
            history.record(doc(text));
        }
        assert_eq!(history.undo(doc("d")), Some(doc("c")));
        assert_eq!(history.undo(doc("c")), Some(doc("b")));
        assert_eq!(history.undo(doc("b")), None);
    }
}
