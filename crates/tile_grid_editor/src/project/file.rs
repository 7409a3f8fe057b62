//! Grid file save/load operations

use super::GRID_FILE_EXTENSION;
use std::path::{Path, PathBuf};
use tile_grid_core::codec::{self, CodecError};
use tile_grid_core::GridModel;

#[derive(Debug)]
pub enum GridFileError {
    Io(String),
    Codec(CodecError),
    EmptyName,
}

impl std::fmt::Display for GridFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridFileError::Io(e) => write!(f, "IO error: {}", e),
            GridFileError::Codec(e) => write!(f, "Invalid grid file: {}", e),
            GridFileError::EmptyName => write!(f, "File name is empty"),
        }
    }
}

impl std::error::Error for GridFileError {}

impl From<CodecError> for GridFileError {
    fn from(e: CodecError) -> Self {
        GridFileError::Codec(e)
    }
}

/// Path of the grid file called `name` inside `dir`.
///
/// The extension is always appended, so `level.txt` becomes `level.txt.txt`.
pub fn grid_file_path(dir: &Path, name: &str) -> Result<PathBuf, GridFileError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GridFileError::EmptyName);
    }
    Ok(dir.join(format!("{}.{}", name, GRID_FILE_EXTENSION)))
}

/// Write every materialized row of `grid` to `<dir>/<name>.txt`
pub fn save_grid(grid: &GridModel, dir: &Path, name: &str) -> Result<PathBuf, GridFileError> {
    let path = grid_file_path(dir, name)?;
    std::fs::create_dir_all(dir).map_err(|e| GridFileError::Io(e.to_string()))?;
    std::fs::write(&path, codec::serialize(grid)).map_err(|e| GridFileError::Io(e.to_string()))?;
    bevy::log::info!("Saved {} rows to {:?}", grid.row_count(), path);
    Ok(path)
}

/// Read a grid file into rows of type indices below `palette_len`
pub fn load_grid(path: &Path, palette_len: usize) -> Result<Vec<Vec<u8>>, GridFileError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| GridFileError::Io(e.to_string()))?;
    let rows = codec::deserialize(&content, palette_len)?;
    bevy::log::info!("Read {} rows from {:?}", rows.len(), path);
    Ok(rows)
}
