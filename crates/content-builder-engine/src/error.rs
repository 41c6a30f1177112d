/// Errors raised by the document engine.
///
/// Every variant is recoverable: callers drop the current gesture or
/// operation and return to idle. Nothing here should take down the editing
/// surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("position {pos} is outside the document (size {size})")]
    OutOfRange { pos: usize, size: usize },

    #[error("invalid range {from}..{to}")]
    InvalidRange { from: usize, to: usize },

    #[error("no drop target under the pointer")]
    NoTarget,

    #[error("a drag session is already in progress")]
    SessionActive,

    #[error("drag session {0} is not the active session")]
    UnknownSession(u64),
}

impl EngineError {
    pub(crate) fn invalid(from: usize, to: usize) -> Self {
        EngineError::InvalidRange { from, to }
    }
}
