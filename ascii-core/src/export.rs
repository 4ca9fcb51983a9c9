//! Plain-text serialization of a finished rendering.
//!
//! The file holds `rows` lines of `cols` characters, each line ending in
//! `\n`, with no header.

use crate::{error::Result, layer::Grid};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Directory used when no file name is given.
pub const DEFAULT_DIR: &str = "trees";

/// Writes one line per grid row.
pub fn write_grid<W: Write>(grid: &Grid<char>, out: &mut W) -> io::Result<()> {
    for line in grid.lines() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// `trees/tree-<unix seconds>.txt`.
pub fn default_file_name() -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Path::new(DEFAULT_DIR).join(format!("tree-{secs}.txt"))
}

/// Writes `grid` to `file_name` (or [`default_file_name`]), creating the
/// parent directory if needed, and optionally echoes it to stdout.
///
/// ### Returns
/// The path written.
pub fn export(
    grid: &Grid<char>,
    file_name: Option<&Path>,
    print_to_console: bool,
) -> Result<PathBuf> {
    let path = file_name.map_or_else(default_file_name, Path::to_path_buf);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = BufWriter::new(File::create(&path)?);
    write_grid(grid, &mut file)?;
    file.flush()?;

    if print_to_console {
        let stdout = io::stdout();
        write_grid(grid, &mut stdout.lock())?;
    }

    tracing::info!(path = %path.display(), rows = grid.rows(), cols = grid.cols(), "tree exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_row_ends_with_newline() {
        let grid = Grid::from_text("ab\n c");
        let mut out = Vec::new();
        write_grid(&grid, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ab\n c\n");
    }

    #[test]
    fn default_name_lives_in_trees_dir() {
        let name = default_file_name();
        assert!(name.starts_with(DEFAULT_DIR));
        assert_eq!(name.extension().and_then(|e| e.to_str()), Some("txt"));
    }

    #[test]
    fn export_creates_missing_directories() {
        let dir = std::env::temp_dir().join(format!("ascii-core-export-{}", std::process::id()));
        let path = dir.join("nested").join("out.txt");
        let grid = Grid::from_text("*.\n.*");

        let written = export(&grid, Some(&path), false).unwrap();
        assert_eq!(written, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "*.\n.*\n");

        fs::remove_dir_all(&dir).unwrap();
    }
}
