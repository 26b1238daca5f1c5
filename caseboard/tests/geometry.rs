use caseboard::geometry::anchor::anchor_point;
use caseboard::geometry::rect::{Point, Rect};
use caseboard::geometry::tolerance::{approx_eq, approx_eq_rel};
use caseboard::model::{EdgeSpec, NodeId, NodeSpec};
use caseboard::{Board, Session};
use proptest::prelude::*;
use std::collections::BTreeSet;

#[test]
fn anchors_face_each_other() {
    let a = Rect::from_origin_size(0.0, 0.0, 100.0, 60.0);
    let b = Rect::from_origin_size(200.0, 0.0, 100.0, 60.0);
    assert_eq!(anchor_point(&a, &b), Point::new(100.0, 30.0));
    assert_eq!(anchor_point(&b, &a), Point::new(200.0, 30.0));
}

#[test]
fn board_anchor_follows_collapse() {
    let mut b = Board::new();
    let a = b.create_node(NodeSpec::new("a")).unwrap();
    let c = b.create_node(NodeSpec::new("c").at(600.0, 0.0)).unwrap();
    assert_eq!(b.anchor_point(a, c), Some(Point::new(240.0, 65.0)));
    b.set_collapsed(a, true).unwrap();
    // 60 wide circle at the same top-left
    assert_eq!(b.anchor_point(a, c), Some(Point::new(60.0, 30.0)));
}

#[test]
fn marquee_selects_overlapping_nodes_only() {
    let mut b = Board::new();
    let inside = b.create_node(NodeSpec::new("inside").at(20.0, 20.0)).unwrap();
    let touching = b.create_node(NodeSpec::new("edge").at(150.0, 150.0)).unwrap();
    let _far = b.create_node(NodeSpec::new("far").at(500.0, 500.0)).unwrap();
    let rect = Rect::from_corners(Point::new(10.0, 10.0), Point::new(150.0, 150.0));
    assert_eq!(b.nodes_in_rect(&rect), BTreeSet::from([inside, touching]));
}

fn sample_board() -> (Board, Vec<NodeId>) {
    let mut b = Board::new();
    let ids = vec![
        b.create_node(NodeSpec::new("a").at(-120.0, 30.0)).unwrap(),
        b.create_node(NodeSpec::new("b").at(400.0, 250.0)).unwrap(),
        b.create_node(NodeSpec::new("c").at(75.5, -310.25).collapsed(true)).unwrap(),
    ];
    b.create_edge(ids[0], ids[1], EdgeSpec::default()).unwrap();
    (b, ids)
}

fn geometry(b: &Board) -> Vec<(f64, f64, f64, f64)> {
    b.nodes().map(|n| (n.x, n.y, n.width, n.height)).collect()
}

fn assert_same_geometry(a: &[(f64, f64, f64, f64)], b: &[(f64, f64, f64, f64)]) {
    assert_eq!(a.len(), b.len());
    for (p, q) in a.iter().zip(b) {
        assert!(approx_eq_rel(p.0, q.0, 1e-9), "x {} vs {}", p.0, q.0);
        assert!(approx_eq_rel(p.1, q.1, 1e-9), "y {} vs {}", p.1, q.1);
        assert!(approx_eq_rel(p.2, q.2, 1e-9), "w {} vs {}", p.2, q.2);
        assert!(approx_eq_rel(p.3, q.3, 1e-9), "h {} vs {}", p.3, q.3);
    }
}

#[test]
fn zoom_in_then_out_restores_geometry() {
    let (b, _) = sample_board();
    let before = geometry(&b);
    let mut s = Session::new(b);
    let pivot = Point::new(50.0, 50.0);
    assert!(!s.zoom_at(pivot, 1.1).is_empty());
    assert!(approx_eq(s.viewport().zoom(), 1.1, 1e-12));
    assert!(approx_eq(s.board().scale(), 1.1, 1e-12));
    s.zoom_at(pivot, 1.0 / 1.1);
    assert_same_geometry(&before, &geometry(s.board()));
}

#[test]
fn zoom_keeps_pivot_fixed_and_scales_minimums() {
    let (b, ids) = sample_board();
    let mut s = Session::new(b);
    s.zoom_at(Point::new(-120.0, 30.0), 2.0);
    let n = s.board().node(ids[0]).unwrap();
    assert_eq!((n.x, n.y), (-120.0, 30.0));
    assert_eq!(n.width, 480.0);
    assert_eq!(s.board().min_size(), (360.0, 120.0));
    assert_eq!(s.board().node_bounds(ids[2]).unwrap().width(), 120.0);
}

#[test]
fn zoom_is_clamped_to_range() {
    let (b, _) = sample_board();
    let mut s = Session::new(b);
    s.zoom_at(Point::default(), 100.0);
    assert!(approx_eq(s.viewport().zoom(), 5.0, 1e-12));
    assert!(s.zoom_at(Point::default(), 2.0).is_empty());
    for _ in 0..60 {
        s.zoom_wheel(Point::default(), -1.0);
    }
    assert!(approx_eq(s.viewport().zoom(), 0.2, 1e-12));
    assert!(approx_eq(s.board().scale(), 0.2, 1e-9));
}

#[test]
fn pan_never_touches_the_model() {
    let (b, _) = sample_board();
    let before = geometry(&b);
    let mut s = Session::new(b);
    s.pan_by(35.0, -12.0);
    assert_eq!(geometry(s.board()), before);
    assert_eq!(s.viewport().device_to_model(Point::new(0.0, 0.0)), Point::new(-35.0, 12.0));
}

proptest! {
    #[test]
    fn reciprocal_zoom_round_trips(
        factor in 0.5f64..2.0,
        px in -1000.0f64..1000.0,
        py in -1000.0f64..1000.0,
        pan_x in -300.0f64..300.0,
        pan_y in -300.0f64..300.0,
    ) {
        let (b, _) = sample_board();
        let before = geometry(&b);
        let mut s = Session::new(b);
        s.pan_by(pan_x, pan_y);
        let pivot = Point::new(px, py);
        s.zoom_at(pivot, factor);
        s.zoom_at(pivot, 1.0 / factor);
        assert_same_geometry(&before, &geometry(s.board()));
    }

    #[test]
    fn device_model_transforms_are_inverse(
        steps in prop::collection::vec((-400.0f64..400.0, -400.0f64..400.0, 0.3f64..3.0), 0..8),
        x in -1.0e5f64..1.0e5,
        y in -1.0e5f64..1.0e5,
    ) {
        let mut s = Session::default();
        for (dx, dy, f) in steps {
            s.pan_by(dx, dy);
            s.zoom_at(Point::new(dx, dy), f);
        }
        let p = Point::new(x, y);
        let vp = s.viewport();
        let back = vp.device_to_model(vp.model_to_device(p));
        prop_assert!(approx_eq_rel(back.x, p.x, 1e-12) && approx_eq_rel(back.y, p.y, 1e-12));
        let zoom = vp.zoom();
        prop_assert!((0.2 - 1e-12..=5.0 + 1e-12).contains(&zoom));
    }
}
