//! End-to-end pointer gestures through the board.

use kurbo::{Point, Size, Vec2};
use std::time::{Duration, Instant};
use treeboard_core::{
    Board, DrawSession, Modifiers, NodeId, NodeKind, NodeStore, PointerEvent, SessionOutcome,
    ToolKind, path_data, smooth,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "expected {}, got {}", expected, actual);
}

fn assert_point(actual: Point, expected: Point) {
    assert!((actual - expected).hypot() < 1e-6, "expected {:?}, got {:?}", expected, actual);
}

fn drag(board: &mut Board, from: Point, to: Point) -> SessionOutcome {
    board.handle_pointer_event(PointerEvent::down(from));
    board.handle_pointer_event(PointerEvent::moved(to));
    board.handle_pointer_event(PointerEvent::up(to))
}

fn created(outcome: SessionOutcome) -> NodeId {
    match outcome {
        SessionOutcome::Created { node, .. } => node,
        other => panic!("expected a created node, got {:?}", other),
    }
}

#[test]
fn rectangle_resize_then_rotated_resize() {
    init();
    let mut board = Board::new();
    board.set_tool(ToolKind::Rectangle);
    let id = created(drag(&mut board, Point::new(100.0, 100.0), Point::new(200.0, 200.0)));
    let node = board.document().node(id).unwrap();
    assert_point(node.position, Point::new(100.0, 100.0));
    assert_eq!(node.size, Size::new(100.0, 100.0));
    assert_eq!(board.tool(), ToolKind::Select);

    // SE handle +(50, 50)
    drag(&mut board, Point::new(200.0, 200.0), Point::new(250.0, 250.0));
    let node = board.document().node(id).unwrap();
    assert_point(node.position, Point::new(100.0, 100.0));
    assert_close(node.size.width, 150.0);
    assert_close(node.size.height, 150.0);

    // Rotation handle sits 18 above the top edge; sweep it a quarter turn
    drag(&mut board, Point::new(175.0, 82.0), Point::new(268.0, 175.0));
    let node = board.document().node(id).unwrap();
    assert_close(node.rotation, 90.0);
    assert_point(node.center(), Point::new(175.0, 175.0));

    // The SE corner of the rotated box is now at the bottom-left on screen
    let anchor = node.local_to_canvas(Point::ZERO);
    let se = node.local_to_canvas(Point::new(150.0, 150.0));
    assert_point(se, Point::new(100.0, 250.0));
    drag(&mut board, se, se + Vec2::new(50.0, 50.0));

    let node = board.document().node(id).unwrap();
    assert_close(node.size.width, 200.0);
    assert_close(node.size.height, 100.0);
    assert_close(node.rotation, 90.0);
    assert_point(node.local_to_canvas(Point::ZERO), anchor);
}

#[test]
fn line_endpoint_drag() {
    init();
    let mut board = Board::new();
    board.set_tool(ToolKind::Line);
    let id = created(drag(&mut board, Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
    let (start, end) = board.document().node(id).unwrap().line_endpoints();
    assert_point(start, Point::new(0.0, 0.0));
    assert_point(end, Point::new(100.0, 0.0));

    drag(&mut board, Point::new(100.0, 0.0), Point::new(100.0, 100.0));
    let node = board.document().node(id).unwrap();
    assert!((node.size.width - 141.42).abs() < 0.01);
    assert_close(node.rotation, 45.0);
    let (start, end) = node.line_endpoints();
    assert_point(start, Point::new(0.0, 0.0));
    assert_point(end, Point::new(100.0, 100.0));
}

#[test]
fn arrow_created_from_drag_direction() {
    init();
    let mut board = Board::new();
    board.set_tool(ToolKind::Arrow);
    let id = created(drag(&mut board, Point::new(50.0, 50.0), Point::new(50.0, -50.0)));
    let node = board.document().node(id).unwrap();
    assert!(matches!(node.kind, NodeKind::Line { arrow: true, .. }));
    assert_close(node.rotation, 270.0);
    assert_close(node.size.width, 100.0);
}

#[test]
fn freehand_stroke_becomes_node() {
    init();
    let mut board = Board::new();
    board.set_tool(ToolKind::Freehand);
    let stroke = [
        Point::new(10.0, 10.0),
        Point::new(20.0, 30.0),
        Point::new(40.0, 25.0),
        Point::new(60.0, 50.0),
    ];
    board.pointer_down(stroke[0], Modifiers::NONE);
    for p in &stroke[1..] {
        board.pointer_move(*p, Modifiers::NONE);
    }
    let outcome = board.pointer_up(stroke[3]);
    let id = created(outcome);

    let node = board.document().node(id).unwrap();
    assert_eq!(node.position, Point::new(10.0, 10.0));
    assert_eq!(node.size, Size::new(50.0, 40.0));
    let NodeKind::Freehand { points, .. } = &node.kind else {
        panic!("expected a freehand node");
    };
    assert_eq!(points.len(), 4);
    assert_eq!(
        path_data(&smooth(points)),
        "M 0 0 Q 10 20 20 17.5 Q 30 15 40 27.5 L 50 40"
    );
}

#[test]
fn click_with_shape_tool_uses_default_size() {
    init();
    let mut board = Board::new();
    board.set_tool(ToolKind::Rectangle);
    board.pointer_down(Point::new(10.0, 10.0), Modifiers::NONE);
    let id = created(board.pointer_up(Point::new(10.0, 10.0)));
    let node = board.document().node(id).unwrap();
    assert_eq!(node.position, Point::new(10.0, 10.0));
    assert_eq!(node.size, board.config().default_shape_size);
    assert_eq!(board.tool(), ToolKind::Select);
}

#[test]
fn two_point_stroke_is_discarded() {
    init();
    let mut board = Board::new();
    board.set_tool(ToolKind::Freehand);
    board.pointer_down(Point::new(0.0, 0.0), Modifiers::NONE);
    board.pointer_move(Point::new(3.0, 3.0), Modifiers::NONE);
    assert_eq!(board.pointer_up(Point::new(3.0, 3.0)), SessionOutcome::Discarded);
    assert!(board.document().is_empty());
    assert!(!board.history().can_undo());
}

#[test]
fn escape_reverts_resize() {
    init();
    let mut board = Board::new();
    board.set_tool(ToolKind::Rectangle);
    let id = created(drag(&mut board, Point::new(0.0, 0.0), Point::new(100.0, 100.0)));
    let undo_depth = board.history().undo_len();

    board.pointer_down(Point::new(100.0, 100.0), Modifiers::NONE);
    board.pointer_move(Point::new(300.0, 250.0), Modifiers::NONE);
    assert!(board.is_interacting());
    assert!(board.handle_key("Escape", Modifiers::NONE));

    let node = board.document().node(id).unwrap();
    assert_eq!(node.size, Size::new(100.0, 100.0));
    assert!(!board.is_interacting());
    assert_eq!(board.history().undo_len(), undo_depth);
    // The pointer-up after cancelling is a no-op
    assert_eq!(board.pointer_up(Point::new(300.0, 250.0)), SessionOutcome::Ignored);
}

#[test]
fn pointer_leave_commits_last_value() {
    init();
    let mut board = Board::new();
    board.set_tool(ToolKind::Diamond);
    board.pointer_down(Point::new(0.0, 0.0), Modifiers::NONE);
    board.pointer_move(Point::new(60.0, 30.0), Modifiers::NONE);
    let id = created(board.handle_pointer_event(PointerEvent::Leave));
    assert_eq!(board.document().node(id).unwrap().size, Size::new(60.0, 30.0));
    assert_eq!(board.tool(), ToolKind::Select);
    assert!(!board.is_interacting());
}

#[test]
fn stalled_gesture_times_out() {
    init();
    let mut board = Board::new();
    board.set_tool(ToolKind::Rectangle);
    board.pointer_down(Point::new(0.0, 0.0), Modifiers::NONE);
    board.pointer_move(Point::new(40.0, 40.0), Modifiers::NONE);

    assert_eq!(board.tick(Instant::now()), SessionOutcome::Ignored);
    assert!(board.is_interacting());

    let later = Instant::now() + Duration::from_millis(board.config().gesture_timeout_ms + 1);
    let id = created(board.tick(later));
    assert!(!board.is_interacting());
    assert_eq!(board.document().node(id).unwrap().size, Size::new(40.0, 40.0));
}

#[test]
fn second_pointer_down_is_ignored() {
    init();
    let mut board = Board::new();
    board.set_tool(ToolKind::Rectangle);
    board.pointer_down(Point::new(0.0, 0.0), Modifiers::NONE);
    assert_eq!(board.pointer_down(Point::new(500.0, 500.0), Modifiers::NONE), SessionOutcome::Ignored);
    assert!(matches!(board.session().state(), DrawSession::BoxCreate { .. }));
    assert_eq!(board.document().len(), 1);
}

#[test]
fn shift_snaps_rotation() {
    init();
    let mut board = Board::new();
    board.set_tool(ToolKind::Rectangle);
    let id = created(drag(&mut board, Point::new(0.0, 0.0), Point::new(100.0, 100.0)));
    let shift = Modifiers::shift();

    // Rotation handle at (50, -18); center (50, 50)
    board.pointer_down(Point::new(50.0, -18.0), shift);
    let angle = (-90.0_f64 + 20.0).to_radians();
    let pointer = Point::new(50.0, 50.0) + Vec2::new(angle.cos(), angle.sin()) * 68.0;
    board.pointer_move(pointer, shift);
    board.pointer_up(pointer);
    assert_close(board.document().node(id).unwrap().rotation, 15.0);
}

#[test]
fn gestures_respect_camera() {
    init();
    let mut board = Board::new();
    board.camera.zoom = 2.0;
    board.camera.offset = Vec2::new(100.0, 0.0);
    board.set_tool(ToolKind::Rectangle);
    // Screen (100, 0) -> canvas (0, 0); screen (300, 100) -> canvas (100, 50)
    let id = created(drag(&mut board, Point::new(100.0, 0.0), Point::new(300.0, 100.0)));
    let node = board.document().node(id).unwrap();
    assert_eq!(node.position, Point::new(0.0, 0.0));
    assert_eq!(node.size, Size::new(100.0, 50.0));
}
