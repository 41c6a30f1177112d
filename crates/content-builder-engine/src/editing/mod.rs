/*!
 * # Editing Core
 *
 * Block reordering and the single entry point for document mutation.
 *
 * ## Flow of a drag
 *
 * 1. A press on a block's handle moves the [`DragSession`] from `Idle` to
 *    `Pressed` and opens a short window in which competing menus stay hidden.
 * 2. The drag start captures the source range `[pos, pos + node size)`.
 * 3. Every pointer move resolves the nearest top-level block and snaps to
 *    one of its edges, yielding an [`IndicatorPlacement`](crate::geometry::IndicatorPlacement).
 *    The document is not touched.
 * 4. The drop either commits a move through [`build_move`] or cancels. A
 *    drop inside or on the edges of the dragged block is a no-op.
 *
 * The session is a value: [`DragSession::step`] consumes it and returns its
 * successor together with a [`DragEffect`]. [`Editor`] owns the session and
 * carries out effects, so tests drive the same transitions with synthetic
 * [`DragInput`]s.
 *
 * ## Module Structure
 *
 * - **`session`**: drag state machine and its inputs and effects
 * - **`transaction`**: atomic move construction
 * - **`editor`**: `Editor` facade owning document, session and history
 * - **`history`**: bounded undo/redo of whole documents
 * - **`patch`**: version and changed range reported by each transaction
 */

pub mod editor;
pub mod history;
pub mod patch;
pub mod session;
pub mod transaction;

pub use editor::{DispatchOutcome, Editor, EditorOptions, MoveOutcome, SessionHandle};
pub use history::History;
pub use patch::{Patch, changed_range};
pub use session::{CancelReason, DragContext, DragEffect, DragInput, DragSession, DragState};
pub use transaction::build_move;
