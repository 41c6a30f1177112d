use std::time::{Duration, Instant};

use content_builder_engine::editing::{DragContext, DragInput, DragSession, DragState};
use content_builder_engine::{
    BlockBounds, BlockKind, CancelReason, DispatchOutcome, Document, DragEffect, DropSide, Editor, EditorOptions,
    EngineError, MoveOutcome, Node, SnapPolicy, StackLayout, build_move, resolve_block_at,
    resolve_drop_side,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn abc() -> Document {
    Document::new(vec![
        Node::paragraph("aaaaaaaa"),
        Node::paragraph("bbbbbbbbbbbbb"),
        Node::paragraph("ccc"),
    ])
    .unwrap()
}

fn ranges(doc: &Document) -> Vec<(usize, usize)> {
    doc.top_level_blocks().map(|b| (b.start, b.end)).collect()
}

fn texts(doc: &Document) -> Vec<String> {
    doc.top_level_blocks().map(|b| b.node.text_content()).collect()
}

#[test]
fn move_block_after_the_last_one() {
    let doc = abc();
    assert_eq!(ranges(&doc), vec![(0, 10), (10, 25), (25, 30)]);

    let moved = build_move(&doc, 10..25, 30).unwrap();

    assert_eq!(texts(&moved), vec!["aaaaaaaa", "ccc", "bbbbbbbbbbbbb"]);
    assert_eq!(ranges(&moved), vec![(0, 10), (10, 15), (15, 30)]);
    // the original is untouched
    assert_eq!(texts(&doc), vec!["aaaaaaaa", "bbbbbbbbbbbbb", "ccc"]);
}

#[test]
fn move_block_to_the_front() {
    let moved = build_move(&abc(), 25..30, 0).unwrap();
    assert_eq!(texts(&moved), vec!["ccc", "aaaaaaaa", "bbbbbbbbbbbbb"]);
    assert_eq!(moved.size(), 30);
}

#[test]
fn out_of_range_and_invalid_ranges() {
    let doc = abc();
    assert_eq!(
        doc.resolve(doc.size() + 1).unwrap_err(),
        EngineError::OutOfRange { pos: 31, size: 30 }
    );
    assert_eq!(
        build_move(&doc, 5..5, 0).unwrap_err(),
        EngineError::InvalidRange { from: 5, to: 5 }
    );
    assert_eq!(
        build_move(&doc, 10..25, 31).unwrap_err(),
        EngineError::OutOfRange { pos: 31, size: 30 }
    );
    // a range captured against a longer document
    assert_eq!(
        build_move(&doc, 25..40, 0).unwrap_err(),
        EngineError::InvalidRange { from: 25, to: 40 }
    );
}

#[rstest]
#[case(105.0, DropSide::Before)]
#[case(135.0, DropSide::After)]
#[case(120.0, DropSide::After)]
#[case(119.0, DropSide::Before)]
#[case(100.0, DropSide::Before)]
#[case(140.0, DropSide::After)]
fn edge_snap_on_a_40px_block(#[case] y: f64, #[case] expected: DropSide) {
    assert_eq!(resolve_drop_side(y, 100.0, 140.0), expected);
}

#[rstest]
#[case(4.0, 6.0)]
#[case(24.0, 6.0)]
#[case(40.0, 10.0)]
#[case(64.0, 16.0)]
#[case(400.0, 16.0)]
fn snap_zone_scales_with_height(#[case] height: f64, #[case] zone: f64) {
    assert_eq!(SnapPolicy::default().snap_distance(height), zone);
}

#[rstest]
#[case(5.0, Some(0))] // above the first block
#[case(15.0, Some(0))]
#[case(34.0, Some(0))] // bottom edge of A
#[case(39.0, Some(0))] // middle of the 34..44 gap
#[case(40.0, Some(10))] // closer to B
#[case(500.0, Some(25))]
#[case(f64::NAN, None)]
fn nearest_block_in_gaps(#[case] y: f64, #[case] start: Option<usize>) {
    let blocks = [
        BlockBounds { start: 0, end: 10, top: 10.0, bottom: 34.0 },
        BlockBounds { start: 10, end: 25, top: 44.0, bottom: 68.0 },
        BlockBounds { start: 25, end: 30, top: 78.0, bottom: 102.0 },
    ];
    assert_eq!(resolve_block_at(0.0, y, &blocks).map(|b| b.start), start);
}

#[test]
fn equal_distance_goes_upstream() {
    let blocks = [
        BlockBounds { start: 0, end: 10, top: 0.0, bottom: 10.0 },
        BlockBounds { start: 10, end: 20, top: 20.0, bottom: 30.0 },
    ];
    assert_eq!(resolve_block_at(0.0, 15.0, &blocks).map(|b| b.start), Some(0));
}

#[test]
fn empty_document_resolves_nothing() {
    let blocks: Vec<BlockBounds> = Vec::new();
    assert!(resolve_block_at(0.0, 10.0, &blocks).is_none());
}

#[test]
fn positions_are_monotonic_for_nested_documents() {
    let doc = Document::from_markup(
        "<h1>Title</h1><ul><li><p>one</p></li><li><p>two</p><blockquote><p>q</p></blockquote></li></ul><hr><pre><code>x</code></pre>",
    );
    let mut expected = 0;
    for block in doc.top_level_blocks() {
        assert_eq!(block.start, expected);
        assert!(block.end > block.start);
        expected = block.end;
    }
    assert_eq!(expected, doc.size());
    assert_eq!(doc.drag_handles().len(), 4);
}

#[test]
fn drag_session_drives_a_move_from_synthetic_input() {
    let doc = abc();
    let layout = StackLayout::default();
    let policy = SnapPolicy::default();
    let ctx = DragContext {
        doc: &doc,
        layout: &layout,
        policy: &policy,
        suppression: Duration::from_millis(200),
    };
    let at = Instant::now();

    let (session, _) = DragSession::new().step(DragInput::PointerDown { pos: 10, at }, &ctx);
    assert!(session.suppresses_menus(at + Duration::from_millis(100)));
    assert!(!session.suppresses_menus(at + Duration::from_millis(300)));

    let (session, _) = session.step(DragInput::DragStart, &ctx);
    assert_eq!(session.source(), Some(10..25));

    let (session, effect) = session.step(DragInput::PointerMove { x: 0.0, y: 100.0 }, &ctx);
    assert!(matches!(effect, DragEffect::ShowIndicator(_)));
    assert!(session.indicator().is_visible());

    let (session, effect) = session.step(DragInput::Drop { x: 0.0, y: 100.0 }, &ctx);
    assert_eq!(
        effect,
        DragEffect::Commit {
            source: 10..25,
            insert_pos: 30
        }
    );
    assert_eq!(session.state(), &DragState::Idle);
    assert!(!session.indicator().is_visible());
}

#[test]
fn drop_on_own_edges_is_a_no_op() {
    let mut editor = Editor::new(abc(), StackLayout::default(), EditorOptions::default());
    let before = editor.document().clone();

    // B spans 44..68; its top edge maps to insert position 10, its bottom to 25
    for y in [44.0, 68.0] {
        let handle = editor.begin_drag(10).unwrap();
        assert_eq!(
            editor.end_drag(handle, 0.0, y).unwrap(),
            MoveOutcome::Cancelled(CancelReason::DropOnSelf)
        );
    }
    assert_eq!(editor.document(), &before);
    assert!(editor.active_session().is_none());
}

#[test]
fn editor_commits_and_undoes_a_move() {
    let mut editor = Editor::new(abc(), StackLayout::default(), EditorOptions::default());
    let handle = editor.begin_drag(10).unwrap();
    editor.update_drag(handle, 0.0, 100.0).unwrap();
    let outcome = editor.end_drag(handle, 0.0, 100.0).unwrap();

    assert!(matches!(outcome, MoveOutcome::Moved { insert_pos: 30, .. }));
    assert_eq!(texts(editor.document()), vec!["aaaaaaaa", "ccc", "bbbbbbbbbbbbb"]);

    editor.undo().unwrap();
    assert_eq!(editor.document(), &abc());
}

#[test]
fn dispatch_refuses_to_drag_a_block_out_of_a_list() {
    let item = || Node::block(BlockKind::ListItem, vec![Node::paragraph("ab")]);
    let doc = Document::new(vec![
        Node::heading(1, "Title"),
        Node::block(BlockKind::BulletList, vec![item(), item()]),
    ])
    .unwrap();
    let mut editor = Editor::new(doc.clone(), StackLayout::default(), EditorOptions::default());

    // 9 is the paragraph inside the first list item
    editor.dispatch(DragInput::PointerDown {
        pos: 9,
        at: Instant::now(),
    });
    assert_eq!(
        editor.dispatch(DragInput::DragStart),
        DispatchOutcome::Finished(MoveOutcome::Cancelled(CancelReason::NoNodeAtPress))
    );
    assert_eq!(
        editor.dispatch(DragInput::Drop { x: 0.0, y: 11.0 }),
        DispatchOutcome::Nothing
    );
    assert_eq!(editor.document(), &doc);
    assert!(editor.active_session().is_none());
}
