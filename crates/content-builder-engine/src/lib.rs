//! # content-builder-engine
//!
//! Position-addressed block documents and drag-based block reordering.
//!
//! ```text
//! pointer events ─► DragSession ─► geometry (resolve block, snap edge)
//!                        │                    │
//!                        ▼                    ▼
//!                     Editor ◄──── IndicatorPlacement
//!                        │
//!                        ▼
//!                   build_move ─► Document (new value) ─► Patch
//! ```
//!
//! Documents are immutable values; [`Editor`] is the single place they are
//! replaced. Markup in and out goes through [`Document::from_markup`] and
//! [`Document::to_markup`].

pub mod attributes;
pub mod document;
pub mod editing;
pub mod error;
pub mod geometry;
pub mod io;
pub mod markup;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use attributes::{
    AttrName, AttrSource, AttrSources, AttrValue, AttributePatch, AttributeSet, read_attributes,
    synthesize_style, write_attributes,
};
pub use document::{BlockKind, Document, Fragment, Node, NodeKind, ResolvedPosition, TopLevelBlock};
pub use editing::{
    CancelReason, DispatchOutcome, DragEffect, DragInput, DragSession, DragState, Editor,
    EditorOptions, MoveOutcome, Patch, SessionHandle, build_move,
};
pub use error::EngineError;
pub use geometry::{
    BlockBounds, BlockLayout, DropSide, DropTarget, IndicatorPlacement, LayoutMetrics, SnapPolicy,
    StackLayout, resolve_block_at, resolve_drop_side,
};
pub use io::{IoError, read_document, write_document};
