//! Whole-document persistence on disk.

use crate::config::BoardConfig;
use crate::error::DocumentError;
use crate::{Board, LoadReport};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Writes the board to `path` atomically: the document goes to a temporary
/// file next to the target, which is then renamed over it. A failed save
/// leaves any previous file intact.
pub fn save(path: &Path, board: &Board) -> Result<(), DocumentError> {
    let doc = board.to_json_value()?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut w = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut w, &doc)?;
        w.write_all(b"\n")?;
        w.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| DocumentError::Io(e.error))?;
    info!(path = %path.display(), nodes = board.node_count(), edges = board.edge_count(), "board saved");
    Ok(())
}

/// Reads and repairs a board document.
pub fn load(path: &Path, config: BoardConfig) -> Result<(Board, LoadReport), DocumentError> {
    let text = fs::read_to_string(path)?;
    let result = Board::from_json_str(config, &text)?;
    info!(path = %path.display(), "board read from disk");
    Ok(result)
}
