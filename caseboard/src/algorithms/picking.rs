use crate::geometry::math::seg_distance_sq;
use crate::geometry::rect::{Point, Rect};
use crate::{Board, Hit};

pub fn hit_test_impl(b: &Board, p: Point) -> Option<Hit> {
    if !p.is_finite() {
        return None;
    }
    // Nodes, most recently created on top
    let handle = b.resize_handle_size();
    for n in b.nodes.values().rev() {
        let r = b.bounds_of(n);
        if n.collapsed {
            let c = r.center();
            let rad = r.width() * 0.5;
            let (dx, dy) = (p.x - c.x, p.y - c.y);
            if dx * dx + dy * dy <= rad * rad {
                return Some(Hit::Node { node: n.id });
            }
            continue;
        }
        let grip = Rect::from_corners(Point::new(r.max_x - handle, r.max_y - handle), Point::new(r.max_x, r.max_y));
        if grip.contains(p) {
            return Some(Hit::ResizeHandle { node: n.id });
        }
        if r.contains(p) {
            return Some(Hit::Node { node: n.id });
        }
    }
    // Edges
    let tol = b.config.edge_pick_tolerance;
    let tol2 = tol * tol;
    let mut best: Option<(u32, f64)> = None;
    for e in b.edges.values() {
        let Some(route) = b.edge_route(e.id) else { continue };
        let (d2, _) = seg_distance_sq(p, route.from, route.to);
        if d2 <= tol2 && best.map_or(true, |(_, bd)| d2 < bd) {
            best = Some((e.id, d2));
        }
    }
    best.map(|(edge, d2)| Hit::Edge { edge, dist: d2.sqrt() })
}

#[cfg(test)]
mod tests {
    use crate::model::{EdgeSpec, NodeSpec};
    use crate::geometry::rect::Point;
    use crate::{Board, Hit};

    #[test]
    fn handle_wins_over_body_and_top_node_wins() {
        let mut b = Board::new();
        let a = b.create_node(NodeSpec::new("under").at(0.0, 0.0)).unwrap();
        let c = b.create_node(NodeSpec::new("over").at(100.0, 50.0)).unwrap();
        assert_eq!(b.hit_test(Point::new(150.0, 100.0)), Some(Hit::Node { node: c }));
        assert_eq!(b.hit_test(Point::new(10.0, 10.0)), Some(Hit::Node { node: a }));
        assert_eq!(b.hit_test(Point::new(335.0, 175.0)), Some(Hit::ResizeHandle { node: c }));
    }

    #[test]
    fn collapsed_node_is_round_and_has_no_handle() {
        let mut b = Board::new();
        let a = b.create_node(NodeSpec::new("pin").collapsed(true)).unwrap();
        assert_eq!(b.hit_test(Point::new(30.0, 30.0)), Some(Hit::Node { node: a }));
        assert_eq!(b.hit_test(Point::new(58.0, 58.0)), None);
    }

    #[test]
    fn edges_picked_within_tolerance() {
        let mut b = Board::new();
        let a = b.create_node(NodeSpec::new("a").at(0.0, 0.0)).unwrap();
        let c = b.create_node(NodeSpec::new("b").at(600.0, 0.0)).unwrap();
        let e = b.create_edge(a, c, EdgeSpec::default()).unwrap();
        // route runs from (240, 65) to (600, 65)
        match b.hit_test(Point::new(400.0, 69.0)) {
            Some(Hit::Edge { edge, dist }) => {
                assert_eq!(edge, e);
                assert!((dist - 4.0).abs() < 1e-9);
            }
            other => panic!("unexpected hit {other:?}"),
        }
        assert_eq!(b.hit_test(Point::new(400.0, 80.0)), None);
        b.set_edge_hidden(e, true).unwrap();
        assert_eq!(b.hit_test(Point::new(400.0, 65.0)), None);
    }
}
