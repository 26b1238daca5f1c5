use caseboard::error::BoardError;
use caseboard::model::{EdgeSpec, NodeSpec};
use caseboard::{Board, PointerEvent, Session};
use std::time::Instant;

const STEP_X: f64 = 300.0;
const STEP_Y: f64 = 200.0;

fn build_grid_board(side: usize) -> Result<Board, BoardError> {
    let mut b = Board::new();
    let mut nodes = Vec::with_capacity(side * side);
    for j in 0..side { for i in 0..side {
        let spec = NodeSpec::new(format!("n{i}-{j}")).at(i as f64 * STEP_X, j as f64 * STEP_Y);
        nodes.push(b.create_node(spec)?);
    } }
    // Right and down neighbours: interior nodes end up with degree 4
    for j in 0..side { for i in 0..side {
        let a = nodes[j * side + i];
        if i + 1 < side { b.create_edge(a, nodes[j * side + i + 1], EdgeSpec::default())?; }
        if j + 1 < side { b.create_edge(a, nodes[(j + 1) * side + i], EdgeSpec::default())?; }
    } }
    Ok(b)
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn main() -> Result<(), BoardError> {
    let args: Vec<String> = std::env::args().collect();
    let mut side = 100usize;
    let mut moves = 10000usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val) = a.strip_prefix("--side=") { if let Ok(v) = val.parse() { side = v; } }
        else if let Some(val) = a.strip_prefix("--moves=") { if let Ok(v) = val.parse() { moves = v; } }
        else if let Some(val) = a.strip_prefix("--assert-ms=") { if let Ok(v) = val.parse() { assert_ms = Some(v); } }
    }
    let side = side.max(2);

    let t_build = Instant::now();
    let board = build_grid_board(side)?;
    let build_ms = t_build.elapsed().as_secs_f64() * 1000.0;
    let (nodes, edges) = (board.node_count(), board.edge_count());
    let mut s = Session::new(board);

    // Grab an interior node near the middle of the grid and wiggle it
    let mid = (side / 2) as f64;
    let (gx, gy) = (mid * STEP_X + 20.0, mid * STEP_Y + 20.0);
    let mut sample = 1u64;
    s.pointer_down(PointerEvent::new(gx, gy, sample));
    let mut times_ms: Vec<f64> = Vec::with_capacity(moves);
    let mut routed = 0usize;
    let start_all = Instant::now();
    for k in 0..moves {
        sample += 1;
        let dx = ((k % 40) as f64 - 20.0) * 1.5;
        let dy = ((k % 30) as f64 - 15.0) * 1.5;
        let t0 = Instant::now();
        let out = s.pointer_move(PointerEvent::new(gx + dx, gy + dy, sample));
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
        routed += out.len();
    }
    sample += 1;
    s.pointer_up(PointerEvent::new(gx, gy, sample));
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;

    times_ms.sort_by(|a, b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p95 = percentile(&times_ms, 0.95);
    let p99 = percentile(&times_ms, 0.99);
    println!("nodes={} edges={} moves={} actions={} build_ms={:.3} total_ms={:.3} median_ms={:.4} p95_ms={:.4} p99_ms={:.4}", nodes, edges, moves, routed, build_ms, dur_all, med, p95, p99);
    if let Some(th) = assert_ms { if p95 > th { eprintln!("FAIL: p95 {:.4} ms > threshold {:.3} ms", p95, th); std::process::exit(1); } }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_links_right_and_down_neighbours() {
        let b = build_grid_board(3).unwrap();
        assert_eq!(b.node_count(), 9);
        assert_eq!(b.edge_count(), 12);
        assert_eq!(b.edges_of(5).len(), 4);
    }
}
