//! # Drop Geometry
//!
//! Pure functions that turn a pointer coordinate into a drop target:
//! [`resolve_block_at`] picks the top-level block, [`SnapPolicy`] picks the
//! edge, and [`DropTarget::insert_pos`] turns the pair into a document
//! position. Nothing here holds state, so it can run on every pointer move.

pub mod layout;
pub mod resolver;
pub mod snap;

pub use layout::{BlockLayout, LayoutMetrics, StackLayout, parse_px};
pub use resolver::{BlockBounds, resolve_block_at};
pub use snap::{DropSide, SnapPolicy, resolve_drop_side};

use serde::Serialize;

use crate::document::Document;

/// A resolved drop: the target block and the edge the drop lands on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    pub bounds: BlockBounds,
    pub side: DropSide,
}

impl DropTarget {
    /// Document position a dropped block would be inserted at.
    pub fn insert_pos(&self) -> usize {
        match self.side {
            DropSide::Before => self.bounds.start,
            DropSide::After => self.bounds.end,
        }
    }

    /// Y of the edge the drop lands on.
    pub fn edge_y(&self) -> f64 {
        match self.side {
            DropSide::Before => self.bounds.top,
            DropSide::After => self.bounds.bottom,
        }
    }
}

/// Where the live insertion indicator should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum IndicatorPlacement {
    #[default]
    Hidden,
    /// At the edge of a resolved block. `y` is relative to the surface top.
    Line {
        y: f64,
        insert_pos: usize,
        side: DropSide,
    },
    /// No block resolved; the indicator sits after the last block.
    DocumentEnd { y: f64, insert_pos: usize },
}

impl IndicatorPlacement {
    pub fn is_visible(&self) -> bool {
        !matches!(self, IndicatorPlacement::Hidden)
    }

    pub fn insert_pos(&self) -> Option<usize> {
        match self {
            IndicatorPlacement::Hidden => None,
            IndicatorPlacement::Line { insert_pos, .. }
            | IndicatorPlacement::DocumentEnd { insert_pos, .. } => Some(*insert_pos),
        }
    }
}

/// Resolve the drop target under a pointer.
pub fn locate_drop(x: f64, y: f64, blocks: &[BlockBounds], policy: &SnapPolicy) -> Option<DropTarget> {
    let bounds = *resolve_block_at(x, y, blocks)?;
    let side = policy.resolve_drop_side(y, bounds.top, bounds.bottom);
    Some(DropTarget { bounds, side })
}

/// Indicator placement for a pointer over `doc` as laid out by `layout`.
///
/// Returns the target too, so callers committing a drop use exactly what
/// the indicator showed.
pub fn place_indicator(
    x: f64,
    y: f64,
    doc: &Document,
    layout: &dyn BlockLayout,
    policy: &SnapPolicy,
) -> (IndicatorPlacement, Option<DropTarget>) {
    let blocks = layout.block_bounds(doc);
    let surface_top = layout.surface_top();
    match locate_drop(x, y, &blocks, policy) {
        Some(target) => (
            IndicatorPlacement::Line {
                y: target.edge_y() - surface_top,
                insert_pos: target.insert_pos(),
                side: target.side,
            },
            Some(target),
        ),
        None => (
            IndicatorPlacement::DocumentEnd {
                y: layout.document_end(doc) - surface_top,
                insert_pos: doc.size(),
            },
            None,
        ),
    }
}
