//! Grid geometry, cells and the append-only row store

use crate::{Point, Rect, MAX_TILE_TYPES};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Tolerance for float divisions that should land on whole numbers
const GEOMETRY_EPSILON: f32 = 1e-4;

/// Errors raised by grid construction and lookups
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Requested cell is outside the materialized grid
    OutOfRange { col: usize, row: usize },
    /// Division count is zero or larger than the canvas height in pixels
    InvalidDivisions { divisions: u32, canvas_height: u32 },
    /// Canvas has no area
    InvalidCanvas { width: u32, height: u32 },
    /// Loaded rows do not match the grid's column count
    ColumnMismatch { expected: usize, found: usize },
    /// Type index has no digit in the file format
    UnknownType { type_index: u8 },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::OutOfRange { col, row } => {
                write!(f, "Cell ({}, {}) is outside the grid", col, row)
            }
            GridError::InvalidDivisions {
                divisions,
                canvas_height,
            } => write!(
                f,
                "Grid divisions must be between 1 and {}, got {}",
                canvas_height, divisions
            ),
            GridError::InvalidCanvas { width, height } => {
                write!(f, "Invalid canvas size {}x{}", width, height)
            }
            GridError::ColumnMismatch { expected, found } => write!(
                f,
                "Grid has {} columns but the data has {}",
                expected, found
            ),
            GridError::UnknownType { type_index } => write!(
                f,
                "Tile type {} is outside 0..{}",
                type_index, MAX_TILE_TYPES
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Fixed geometry derived once from the canvas size and the grid divisor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    canvas_width: u32,
    canvas_height: u32,
    divisions: u32,
    cell_size: f32,
    columns: usize,
}

impl GridGeometry {
    /// Cell size is `canvas_height / divisions`; column count is however many
    /// whole cells fit across the canvas width.
    pub fn new(canvas_width: u32, canvas_height: u32, divisions: u32) -> Result<Self, GridError> {
        if canvas_width == 0 || canvas_height == 0 {
            return Err(GridError::InvalidCanvas {
                width: canvas_width,
                height: canvas_height,
            });
        }
        if divisions == 0 || divisions > canvas_height {
            return Err(GridError::InvalidDivisions {
                divisions,
                canvas_height,
            });
        }
        let cell_size = canvas_height as f32 / divisions as f32;
        let columns = (canvas_width as f32 / cell_size + GEOMETRY_EPSILON).floor() as usize;
        // Narrower than one cell
        if columns == 0 {
            return Err(GridError::InvalidCanvas {
                width: canvas_width,
                height: canvas_height,
            });
        }
        Ok(Self {
            canvas_width,
            canvas_height,
            divisions,
            cell_size,
            columns,
        })
    }

    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    /// Number of rows that fit in one canvas height
    pub fn divisions(&self) -> u32 {
        self.divisions
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Screen rectangle of a cell given the current vertical scroll offset
    pub fn cell_rect(&self, col: usize, row: usize, vertical_offset: f32) -> Rect {
        Rect::square(
            col as f32 * self.cell_size,
            row as f32 * self.cell_size - vertical_offset,
            self.cell_size,
        )
    }

    /// Map a screen point to grid-space `(col, row)`.
    ///
    /// Only the column bound is checked here; the row bound depends on how
    /// many rows the grid has materialized.
    pub fn resolve(&self, point: Point, vertical_offset: f32) -> Option<(usize, usize)> {
        let col = (point.x / self.cell_size).floor();
        let row = ((point.y + vertical_offset) / self.cell_size).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.columns {
            return None;
        }
        Some((col, row))
    }
}

/// A cell as seen from outside the grid. Position is derived, not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub type_index: u8,
    pub col: usize,
    pub row: usize,
}

/// Contiguous range of rows currently shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewWindow {
    first: usize,
    last: usize,
}

impl ViewWindow {
    /// Window at the top of the grid spanning `divisions` rows
    pub fn new(divisions: u32) -> Self {
        Self {
            first: 0,
            last: divisions.saturating_sub(1) as usize,
        }
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn last(&self) -> usize {
        self.last
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows().contains(&row)
    }

    /// Move both edges by `delta` rows, never above the top row
    pub fn shifted(&self, delta: i64) -> ViewWindow {
        let delta = delta.max(-(self.first as i64));
        let span = self.last - self.first;
        let first = (self.first as i64 + delta) as usize;
        ViewWindow {
            first,
            last: first + span,
        }
    }
}

/// Append-only 2D store of tile type indices
#[derive(Debug, Clone)]
pub struct GridModel {
    geometry: GridGeometry,
    rows: Vec<Vec<u8>>,
}

impl GridModel {
    /// Create a grid with one screenful of empty rows
    pub fn new(geometry: GridGeometry) -> Self {
        let rows = (0..geometry.divisions())
            .map(|_| vec![0; geometry.columns()])
            .collect();
        Self { geometry, rows }
    }

    /// Create a grid from previously saved rows.
    ///
    /// Every row must match the geometry's column count. Short grids are
    /// padded with empty rows so the first screen is always full.
    pub fn from_rows(geometry: GridGeometry, rows: Vec<Vec<u8>>) -> Result<Self, GridError> {
        if let Some(bad) = rows.iter().find(|row| row.len() != geometry.columns()) {
            return Err(GridError::ColumnMismatch {
                expected: geometry.columns(),
                found: bad.len(),
            });
        }
        if let Some(&type_index) = rows
            .iter()
            .flatten()
            .find(|&&type_index| usize::from(type_index) >= MAX_TILE_TYPES)
        {
            return Err(GridError::UnknownType { type_index });
        }
        let mut grid = Self { geometry, rows };
        grid.ensure_rows(geometry.divisions() as usize);
        Ok(grid)
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.geometry.columns()
    }

    /// Get the cell at a position
    pub fn cell_at(&self, col: usize, row: usize) -> Result<Cell, GridError> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|&type_index| Cell {
                type_index,
                col,
                row,
            })
            .ok_or(GridError::OutOfRange { col, row })
    }

    /// Set the type of a cell. Out-of-range positions and type indices
    /// without a digit are ignored.
    ///
    /// Returns true if the cell was written.
    pub fn set_cell_type(&mut self, col: usize, row: usize, type_index: u8) -> bool {
        if usize::from(type_index) >= MAX_TILE_TYPES {
            return false;
        }
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = type_index;
                true
            }
            None => false,
        }
    }

    /// Append one row of empty cells at the bottom
    pub fn append_row(&mut self) {
        self.rows.push(vec![0; self.geometry.columns()]);
    }

    /// Append rows until at least `count` exist. Returns how many were added.
    pub fn ensure_rows(&mut self, count: usize) -> usize {
        let missing = count.saturating_sub(self.rows.len());
        for _ in 0..missing {
            self.append_row();
        }
        missing
    }

    /// Get a row's type indices
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Iterate over all materialized rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Reset every materialized cell to the empty type
    pub fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            row.fill(0);
        }
    }

    /// Resolve a screen point to a materialized cell
    pub fn resolve_cell(&self, point: Point, vertical_offset: f32) -> Option<(usize, usize)> {
        self.geometry
            .resolve(point, vertical_offset)
            .filter(|&(_, row)| row < self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_1000() -> GridModel {
        GridModel::new(GridGeometry::new(1000, 1000, 10).unwrap())
    }

    #[test]
    fn test_geometry_from_divisor() {
        let geometry = GridGeometry::new(1500, 1000, 20).unwrap();
        assert_eq!(geometry.cell_size(), 50.0);
        assert_eq!(geometry.columns(), 30);

        let geometry = GridGeometry::new(1000, 1000, 7).unwrap();
        assert_eq!(geometry.columns(), 7);
    }

    #[test]
    fn test_geometry_rejects_bad_divisions() {
        assert!(matches!(
            GridGeometry::new(1000, 1000, 0),
            Err(GridError::InvalidDivisions { .. })
        ));
        assert!(matches!(
            GridGeometry::new(1000, 1000, 1001),
            Err(GridError::InvalidDivisions { .. })
        ));
        assert!(matches!(
            GridGeometry::new(0, 1000, 10),
            Err(GridError::InvalidCanvas { .. })
        ));
        // One 1000px cell does not fit across 300px
        assert!(matches!(
            GridGeometry::new(300, 1000, 1),
            Err(GridError::InvalidCanvas { .. })
        ));
    }

    #[test]
    fn test_type_index_without_digit_is_ignored() {
        let mut grid = grid_1000();
        assert!(!grid.set_cell_type(0, 0, 12));
        assert_eq!(grid.cell_at(0, 0).unwrap().type_index, 0);
        assert!(grid.set_cell_type(0, 0, 9));
        assert_eq!(grid.cell_at(0, 0).unwrap().type_index, 9);

        let geometry = GridGeometry::new(200, 1000, 10).unwrap();
        assert_eq!(
            GridModel::from_rows(geometry, vec![vec![0, 10]]).unwrap_err(),
            GridError::UnknownType { type_index: 10 }
        );
    }

    #[test]
    fn test_paint_single_cell() {
        let mut grid = grid_1000();
        assert!(grid.set_cell_type(3, 2, 1));
        assert_eq!(grid.cell_at(3, 2).unwrap().type_index, 1);

        for row in 0..grid.row_count() {
            for col in 0..grid.column_count() {
                if (col, row) != (3, 2) {
                    assert_eq!(grid.cell_at(col, row).unwrap().type_index, 0);
                }
            }
        }
    }

    #[test]
    fn test_set_cell_type_is_idempotent() {
        let mut once = grid_1000();
        once.set_cell_type(4, 4, 2);
        let mut twice = grid_1000();
        twice.set_cell_type(4, 4, 2);
        twice.set_cell_type(4, 4, 2);
        assert_eq!(once.rows().collect::<Vec<_>>(), twice.rows().collect::<Vec<_>>());
    }

    #[test]
    fn test_out_of_range() {
        let mut grid = grid_1000();
        assert_eq!(
            grid.cell_at(10, 0),
            Err(GridError::OutOfRange { col: 10, row: 0 })
        );
        assert!(grid.cell_at(0, 10).is_err());
        assert!(!grid.set_cell_type(10, 0, 1));
        assert!(!grid.set_cell_type(0, 99, 1));
    }

    #[test]
    fn test_append_and_ensure_rows() {
        let mut grid = grid_1000();
        assert_eq!(grid.row_count(), 10);
        grid.append_row();
        assert_eq!(grid.row_count(), 11);
        assert_eq!(grid.row(10).unwrap().len(), 10);
        assert_eq!(grid.ensure_rows(5), 0);
        assert_eq!(grid.ensure_rows(13), 2);
        assert_eq!(grid.row_count(), 13);
    }

    #[test]
    fn test_resolve_cell_respects_offset_and_bounds() {
        let grid = grid_1000();
        assert_eq!(grid.resolve_cell(Point::new(350.0, 250.0), 0.0), Some((3, 2)));
        assert_eq!(grid.resolve_cell(Point::new(350.0, 250.0), 100.0), Some((3, 3)));
        // Row 10 does not exist until scrolling creates it
        assert_eq!(grid.resolve_cell(Point::new(350.0, 950.0), 100.0), None);
        assert_eq!(grid.resolve_cell(Point::new(-1.0, 10.0), 0.0), None);
    }

    #[test]
    fn test_cell_rect_scrolls_with_offset() {
        let geometry = GridGeometry::new(1000, 1000, 10).unwrap();
        assert_eq!(geometry.cell_rect(2, 3, 100.0), Rect::square(200.0, 200.0, 100.0));
    }

    #[test]
    fn test_window_shift_clamps_at_top() {
        let window = ViewWindow::new(10);
        assert_eq!((window.first(), window.last()), (0, 9));
        let down = window.shifted(2);
        assert_eq!((down.first(), down.last()), (2, 11));
        let up = down.shifted(-5);
        assert_eq!((up.first(), up.last()), (0, 9));
    }

    #[test]
    fn test_from_rows_validates_and_pads() {
        let geometry = GridGeometry::new(200, 1000, 10).unwrap();
        assert_eq!(geometry.columns(), 2);
        let grid = GridModel::from_rows(geometry, vec![vec![0, 1], vec![2, 0]]).unwrap();
        assert_eq!(grid.row_count(), 10);
        assert_eq!(grid.cell_at(1, 0).unwrap().type_index, 1);

        let err = GridModel::from_rows(geometry, vec![vec![0, 1, 2]]).unwrap_err();
        assert_eq!(
            err,
            GridError::ColumnMismatch {
                expected: 2,
                found: 3
            }
        );
    }
}
