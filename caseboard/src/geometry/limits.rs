// Centralized ingestion limits to harden against untrusted documents

// Board size caps
pub const MAX_NODES: usize = 200_000;
pub const MAX_EDGES: usize = 300_000;
pub const MAX_FIELDS_PER_NODE: usize = 4_096;
pub const MAX_TODOS: usize = 100_000;

// Largest node/edge id accepted from a document; leaves room for new ids
pub const MAX_ID: u32 = u32::MAX / 2;

// Numeric bounds
pub const COORD_MIN: f64 = -10_000_000.0;
pub const COORD_MAX: f64 =  10_000_000.0;
pub const SIZE_MAX: f64 = 1_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_size_bounds(w: f64) -> bool { w.is_finite() && w > 0.0 && w <= SIZE_MAX }
