//! Grid file management for the editor
//!
//! Grids are saved as plain text, one line per row and one digit per cell,
//! in a file named after the answer to the save prompt.

mod file;

pub use file::*;

/// Extension appended to every saved grid
pub const GRID_FILE_EXTENSION: &str = "txt";
