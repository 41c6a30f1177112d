use std::ops::Range;
use std::time::{Duration, Instant};

use crate::attributes::{AttributePatch, AttributeSet, read_attributes, write_attributes};
use crate::document::Document;
use crate::editing::history::History;
use crate::editing::patch::{Patch, changed_range};
use crate::editing::session::{
    CancelReason, DragContext, DragEffect, DragInput, DragSession,
};
use crate::editing::transaction::build_move;
use crate::error::EngineError;
use crate::geometry::{BlockLayout, DropTarget, IndicatorPlacement, SnapPolicy, locate_drop};

/// Tunables for an [`Editor`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditorOptions {
    pub snap: SnapPolicy,
    /// How long a handle press keeps competing menus hidden
    pub press_suppression: Duration,
    /// Undo entries kept
    pub history_limit: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            snap: SnapPolicy::default(),
            press_suppression: Duration::from_millis(200),
            history_limit: 100,
        }
    }
}

/// Identifies one drag session. Handles are never reused, so a handle kept
/// past the end of its session is rejected instead of steering a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(u64);

impl SessionHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// How a drag gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Moved {
        source: Range<usize>,
        insert_pos: usize,
        patch: Patch,
    },
    Cancelled(CancelReason),
    /// The move was attempted but the document refused it.
    Rejected(EngineError),
}

/// Result of feeding one raw input to [`Editor::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Nothing,
    Indicator(IndicatorPlacement),
    Finished(MoveOutcome),
}

/// Owns a document and the single drag session editing it.
///
/// All mutation goes through [`apply_transaction`](Self::apply_transaction);
/// callers only ever see whole documents before or after a transaction.
pub struct Editor<L: BlockLayout> {
    doc: Document,
    layout: L,
    options: EditorOptions,
    session: DragSession,
    active: Option<SessionHandle>,
    /// Document version when the active session started
    session_version: u64,
    generation: u64,
    version: u64,
    history: History,
}

impl<L: BlockLayout> Editor<L> {
    pub fn new(doc: Document, layout: L, options: EditorOptions) -> Self {
        let history = History::new(options.history_limit);
        Self {
            doc,
            layout,
            options,
            session: DragSession::new(),
            active: None,
            session_version: 0,
            generation: 0,
            version: 0,
            history,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Number of committed transactions, undo and redo included.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn indicator(&self) -> IndicatorPlacement {
        self.session.indicator()
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn active_session(&self) -> Option<SessionHandle> {
        self.active
    }

    /// Drop target under a pointer, without touching the session.
    ///
    /// Fails with `NoTarget` when nothing resolves, which for an empty
    /// document means a drop belongs at the document end.
    pub fn drop_target_at(&self, x: f64, y: f64) -> Result<DropTarget, EngineError> {
        let blocks = self.layout.block_bounds(&self.doc);
        locate_drop(x, y, &blocks, &self.options.snap).ok_or(EngineError::NoTarget)
    }

    /// Whether selection menus must stay hidden at `now`.
    pub fn menus_suppressed(&self, now: Instant) -> bool {
        self.session.suppresses_menus(now)
    }

    /// The only way to change the document.
    ///
    /// `f` builds a new document from the current one; on success it
    /// replaces the current document in one step and the old one goes to
    /// the undo history. On failure nothing changes.
    pub fn apply_transaction<F>(&mut self, f: F) -> Result<Patch, EngineError>
    where
        F: FnOnce(&Document) -> Result<Document, EngineError>,
    {
        let next = f(&self.doc).inspect_err(|err| {
            log::warn!("transaction rejected: {err}");
        })?;
        let changed = changed_range(&self.doc, &next);
        let previous = std::mem::replace(&mut self.doc, next);
        self.history.record(previous);
        Ok(self.bump(changed))
    }

    fn bump(&mut self, changed: Range<usize>) -> Patch {
        self.version += 1;
        Patch {
            version: self.version,
            changed,
        }
    }

    pub fn undo(&mut self) -> Option<Patch> {
        let restored = self.history.undo(self.doc.clone())?;
        let changed = changed_range(&self.doc, &restored);
        self.doc = restored;
        Some(self.bump(changed))
    }

    pub fn redo(&mut self) -> Option<Patch> {
        let restored = self.history.redo(self.doc.clone())?;
        let changed = changed_range(&self.doc, &restored);
        self.doc = restored;
        Some(self.bump(changed))
    }

    /// Resolved attributes of the node starting at `pos`. Positions with no
    /// block there read as an all-default set.
    pub fn read_block_attributes(&self, pos: usize) -> AttributeSet {
        self.doc
            .node_at(pos)
            .map_or_else(|| read_attributes(self.doc.root()), read_attributes)
    }

    pub fn write_block_attributes(
        &mut self,
        pos: usize,
        patch: &AttributePatch,
    ) -> Result<Patch, EngineError> {
        self.apply_transaction(|doc| {
            doc.resolve(pos)?;
            let node = doc.node_at(pos).ok_or(EngineError::invalid(pos, pos))?;
            let replaced = write_attributes(node, patch)
                .ok_or(EngineError::invalid(pos, pos + node.node_size()))?;
            doc.replace_node_at(pos, replaced)
        })
    }

    fn step(&mut self, input: DragInput) -> DragEffect {
        let session = std::mem::take(&mut self.session);
        let ctx = DragContext {
            doc: &self.doc,
            layout: &self.layout,
            policy: &self.options.snap,
            suppression: self.options.press_suppression,
        };
        let (next, effect) = session.step(input, &ctx);
        self.session = next;

        if !self.session.is_active() {
            self.active = None;
        } else if self.active.is_none() {
            self.generation += 1;
            self.active = Some(SessionHandle(self.generation));
            self.session_version = self.version;
        }
        effect
    }

    /// Carry out a terminal effect.
    fn settle(&mut self, effect: DragEffect) -> MoveOutcome {
        match effect {
            DragEffect::Commit { source, insert_pos } => {
                if self.version != self.session_version {
                    log::warn!("document changed during drag; dropping move of {source:?}");
                    return MoveOutcome::Rejected(EngineError::invalid(source.start, source.end));
                }
                let range = source.clone();
                match self.apply_transaction(|doc| build_move(doc, range, insert_pos)) {
                    Ok(patch) => {
                        log::debug!("committed move of {source:?} to {insert_pos}");
                        MoveOutcome::Moved {
                            source,
                            insert_pos,
                            patch,
                        }
                    }
                    Err(err) => MoveOutcome::Rejected(err),
                }
            }
            DragEffect::Cancelled(reason) => MoveOutcome::Cancelled(reason),
            DragEffect::None | DragEffect::ShowIndicator(_) => {
                MoveOutcome::Cancelled(CancelReason::Aborted)
            }
        }
    }

    /// Feed one raw input to the drag session.
    pub fn dispatch(&mut self, input: DragInput) -> DispatchOutcome {
        match self.step(input) {
            DragEffect::None => DispatchOutcome::Nothing,
            DragEffect::ShowIndicator(placement) => DispatchOutcome::Indicator(placement),
            terminal => DispatchOutcome::Finished(self.settle(terminal)),
        }
    }

    fn check_handle(&self, handle: SessionHandle) -> Result<(), EngineError> {
        if self.active == Some(handle) {
            Ok(())
        } else {
            log::warn!("stale drag handle {}", handle.id());
            Err(EngineError::UnknownSession(handle.id()))
        }
    }

    /// Start dragging the top-level block whose handle sits at `pos`.
    pub fn begin_drag(&mut self, pos: usize) -> Result<SessionHandle, EngineError> {
        if self.session.is_active() {
            return Err(EngineError::SessionActive);
        }
        self.doc.resolve(pos)?;
        if !self.doc.top_level_blocks().any(|block| block.start == pos) {
            return Err(EngineError::invalid(pos, pos));
        }

        self.step(DragInput::PointerDown {
            pos,
            at: Instant::now(),
        });
        self.step(DragInput::DragStart);
        self.active.ok_or(EngineError::invalid(pos, pos))
    }

    pub fn update_drag(
        &mut self,
        handle: SessionHandle,
        x: f64,
        y: f64,
    ) -> Result<IndicatorPlacement, EngineError> {
        self.check_handle(handle)?;
        match self.step(DragInput::PointerMove { x, y }) {
            DragEffect::ShowIndicator(placement) => Ok(placement),
            _ => Ok(self.session.indicator()),
        }
    }

    pub fn end_drag(
        &mut self,
        handle: SessionHandle,
        x: f64,
        y: f64,
    ) -> Result<MoveOutcome, EngineError> {
        self.check_handle(handle)?;
        let effect = self.step(DragInput::Drop { x, y });
        Ok(self.settle(effect))
    }

    pub fn cancel_drag(&mut self, handle: SessionHandle) -> Result<(), EngineError> {
        self.check_handle(handle)?;
        self.step(DragInput::Cancel);
        Ok(())
    }
}
