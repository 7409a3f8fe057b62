//! Row-per-line text format
//!
//! Each materialized row becomes one line and each cell one ASCII digit equal
//! to its type index. There is no header: the column count is the line
//! length.
//!
//! ```text
//! 01
//! 20
//! ```

use crate::{GridModel, MAX_TILE_TYPES};

#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Input has no rows
    Empty,
    /// A character that is not an ASCII digit
    InvalidGlyph {
        line: usize,
        column: usize,
        glyph: char,
    },
    /// A digit outside the palette
    UnknownType {
        line: usize,
        column: usize,
        type_index: u8,
    },
    /// A line whose length differs from the first line
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Empty => write!(f, "Grid file contains no rows"),
            CodecError::InvalidGlyph {
                line,
                column,
                glyph,
            } => write!(
                f,
                "Line {}, column {}: '{}' is not a tile type digit",
                line, column, glyph
            ),
            CodecError::UnknownType {
                line,
                column,
                type_index,
            } => write!(
                f,
                "Line {}, column {}: tile type {} is not in the palette",
                line, column, type_index
            ),
            CodecError::RaggedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "Line {} has {} cells, expected {}",
                line, found, expected
            ),
        }
    }
}

impl std::error::Error for CodecError {}

/// Encode every materialized row, top to bottom
pub fn serialize(grid: &GridModel) -> String {
    let mut text = String::with_capacity(grid.row_count() * (grid.column_count() + 1));
    for row in grid.rows() {
        text.extend(row.iter().map(|&type_index| glyph(type_index)));
        text.push('\n');
    }
    text
}

/// The grid only stores indices below `MAX_TILE_TYPES`, one digit each
fn glyph(type_index: u8) -> char {
    debug_assert!(usize::from(type_index) < MAX_TILE_TYPES);
    char::from(b'0' + type_index)
}

/// Decode text into rows of type indices.
///
/// `palette_len` bounds the accepted digits. Windows line endings and a
/// missing final newline are accepted; blank lines are not.
pub fn deserialize(text: &str, palette_len: usize) -> Result<Vec<Vec<u8>>, CodecError> {
    let mut rows: Vec<Vec<u8>> = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        let mut row = Vec::with_capacity(line.len());
        for (col_idx, ch) in line.chars().enumerate() {
            let Some(digit) = ch.to_digit(10) else {
                return Err(CodecError::InvalidGlyph {
                    line: line_no,
                    column: col_idx + 1,
                    glyph: ch,
                });
            };
            let type_index = digit as u8;
            if usize::from(type_index) >= palette_len {
                return Err(CodecError::UnknownType {
                    line: line_no,
                    column: col_idx + 1,
                    type_index,
                });
            }
            row.push(type_index);
        }
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(CodecError::RaggedRow {
                    line: line_no,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    match rows.first() {
        None => Err(CodecError::Empty),
        Some(first) if first.is_empty() => Err(CodecError::Empty),
        Some(_) => Ok(rows),
    }
}
