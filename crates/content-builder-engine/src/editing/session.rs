use std::ops::Range;
use std::time::{Duration, Instant};

use crate::document::Document;
use crate::geometry::{BlockLayout, DropSide, IndicatorPlacement, SnapPolicy, place_indicator};

/// Abstract pointer input driving a drag session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragInput {
    /// Press on the drag handle of the top-level block starting at `pos`.
    PointerDown { pos: usize, at: Instant },
    /// The press turned into a drag gesture.
    DragStart,
    PointerMove { x: f64, y: f64 },
    Drop { x: f64, y: f64 },
    /// Pointer left the editing surface.
    Leave,
    /// Explicit abort, e.g. Escape.
    Cancel,
    /// Gesture finished without a drop on the surface.
    DragEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Pressed {
        pos: usize,
    },
    Dragging {
        source: Range<usize>,
        /// Insertion position under the pointer, if one resolved
        target: Option<usize>,
        drop_before: bool,
    },
}

/// Why a session ended without moving anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// No top-level block starts at the pressed handle's position.
    NoNodeAtPress,
    /// Nothing resolved under the pointer at drop time.
    NoTarget,
    /// The insertion point fell inside or on the edges of the dragged block.
    DropOnSelf,
    Left,
    Aborted,
}

/// What the owner of a session must do after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEffect {
    None,
    ShowIndicator(IndicatorPlacement),
    /// Move `source` to `insert_pos`. Terminal; the indicator is hidden.
    Commit {
        source: Range<usize>,
        insert_pos: usize,
    },
    /// Terminal; the indicator is hidden and nothing changes.
    Cancelled(CancelReason),
}

/// Everything a transition may read. The session never mutates any of it.
pub struct DragContext<'a> {
    pub doc: &'a Document,
    pub layout: &'a dyn BlockLayout,
    pub policy: &'a SnapPolicy,
    /// How long a handle press keeps competing menus hidden
    pub suppression: Duration,
}

/// One reorder gesture, passed by value through [`DragSession::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    state: DragState,
    indicator: IndicatorPlacement,
    suppress_until: Option<Instant>,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DragSession {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            indicator: IndicatorPlacement::Hidden,
            suppress_until: None,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn indicator(&self) -> IndicatorPlacement {
        self.indicator
    }

    /// Pressed or dragging.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn source(&self) -> Option<Range<usize>> {
        match &self.state {
            DragState::Dragging { source, .. } => Some(source.clone()),
            _ => None,
        }
    }

    /// Whether selection menus and similar UI must stay hidden at `now`.
    pub fn suppresses_menus(&self, now: Instant) -> bool {
        self.is_dragging() || self.suppress_until.is_some_and(|deadline| now < deadline)
    }

    /// Apply one input and return the successor session with the effect
    /// its owner must carry out.
    pub fn step(self, input: DragInput, ctx: &DragContext<'_>) -> (DragSession, DragEffect) {
        let DragSession {
            state,
            indicator,
            suppress_until,
        } = self;
        let stay = |state: DragState| DragSession {
            state,
            indicator,
            suppress_until,
        };
        let finish = |effect: DragEffect| {
            let session = DragSession {
                state: DragState::Idle,
                indicator: IndicatorPlacement::Hidden,
                suppress_until,
            };
            (session, effect)
        };

        match (state, input) {
            (DragState::Idle, DragInput::PointerDown { pos, at }) => {
                log::debug!("handle pressed at {pos}");
                let session = DragSession {
                    state: DragState::Pressed { pos },
                    indicator: IndicatorPlacement::Hidden,
                    suppress_until: at.checked_add(ctx.suppression),
                };
                (session, DragEffect::None)
            }
            (state @ DragState::Idle, _) => (stay(state), DragEffect::None),

            // One session at a time: a second press waits for this one to end.
            (state, DragInput::PointerDown { .. }) => (stay(state), DragEffect::None),

            // Only top-level blocks are drag units.
            (DragState::Pressed { pos }, DragInput::DragStart) => match ctx
                .doc
                .top_level_blocks()
                .find(|block| block.start == pos)
            {
                Some(block) => {
                    let source = block.start..block.end;
                    log::debug!("drag started for {source:?}");
                    let state = DragState::Dragging {
                        source,
                        target: None,
                        drop_before: false,
                    };
                    (stay(state), DragEffect::None)
                }
                None => {
                    log::debug!("no top-level block at pressed position {pos}");
                    finish(DragEffect::Cancelled(CancelReason::NoNodeAtPress))
                }
            },
            (state @ DragState::Pressed { .. }, DragInput::PointerMove { .. }) => {
                (stay(state), DragEffect::None)
            }
            // A press that never became a drag just ends.
            (DragState::Pressed { .. }, _) => finish(DragEffect::None),

            (DragState::Dragging { source, .. }, DragInput::PointerMove { x, y }) => {
                let (placement, target) = place_indicator(x, y, ctx.doc, ctx.layout, ctx.policy);
                let session = DragSession {
                    state: DragState::Dragging {
                        source,
                        target: placement.insert_pos(),
                        drop_before: target.is_some_and(|t| t.side == DropSide::Before),
                    },
                    indicator: placement,
                    suppress_until,
                };
                (session, DragEffect::ShowIndicator(placement))
            }
            (DragState::Dragging { source, .. }, DragInput::Drop { x, y }) => {
                let (_, target) = place_indicator(x, y, ctx.doc, ctx.layout, ctx.policy);
                let Some(target) = target else {
                    log::debug!("drop at ({x}, {y}) resolved no target");
                    return finish(DragEffect::Cancelled(CancelReason::NoTarget));
                };
                let insert_pos = target.insert_pos();
                if (source.start..=source.end).contains(&insert_pos) {
                    log::debug!("drop at {insert_pos} is on the dragged block {source:?}");
                    return finish(DragEffect::Cancelled(CancelReason::DropOnSelf));
                }
                finish(DragEffect::Commit { source, insert_pos })
            }
            (DragState::Dragging { .. }, DragInput::Leave) => {
                finish(DragEffect::Cancelled(CancelReason::Left))
            }
            (DragState::Dragging { .. }, DragInput::Cancel | DragInput::DragEnd) => {
                finish(DragEffect::Cancelled(CancelReason::Aborted))
            }
            (state @ DragState::Dragging { .. }, DragInput::DragStart) => {
                (stay(state), DragEffect::None)
            }
        }
    }
}
