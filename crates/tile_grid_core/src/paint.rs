//! Palette selection and drag painting

use crate::{GridModel, PaletteState, Point, TypePalette};
use std::collections::HashSet;
use tracing::debug;

/// What a pointer event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    /// Pointer was outside the palette and the materialized grid
    Ignored,
    /// A palette swatch was clicked
    SelectedType(usize),
    /// A cell was stamped with the selected type
    Painted { col: usize, row: usize },
}

#[derive(Debug, Clone, Default)]
pub struct PaintController {
    palette_state: PaletteState,
    is_pressed: bool,
    /// Cells stamped since the last erase
    painted: HashSet<(usize, usize)>,
}

impl PaintController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn palette_state(&self) -> &PaletteState {
        &self.palette_state
    }

    pub fn selected_type(&self) -> usize {
        self.palette_state.selected()
    }

    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    pub fn painted_cells(&self) -> &HashSet<(usize, usize)> {
        &self.painted
    }

    /// Pointer pressed. Swatches take priority over the grid underneath them,
    /// and a swatch click never paints in the same gesture.
    pub fn pointer_down(
        &mut self,
        point: Point,
        grid: &mut GridModel,
        palette: &TypePalette,
        vertical_offset: f32,
    ) -> PaintOutcome {
        if let Some(index) = palette.swatch_at(grid.geometry(), point) {
            self.palette_state.select(index, palette);
            debug!("Selected tile type {}", index);
            return PaintOutcome::SelectedType(index);
        }

        let outcome = self.stamp(point, grid, vertical_offset);
        if matches!(outcome, PaintOutcome::Painted { .. }) {
            self.is_pressed = true;
        }
        outcome
    }

    /// Pointer moved. Paints every cell crossed while the button is held.
    pub fn pointer_move(
        &mut self,
        point: Point,
        grid: &mut GridModel,
        vertical_offset: f32,
    ) -> PaintOutcome {
        if !self.is_pressed {
            return PaintOutcome::Ignored;
        }
        self.stamp(point, grid, vertical_offset)
    }

    pub fn pointer_up(&mut self) {
        self.is_pressed = false;
    }

    /// Reset every materialized cell to the empty type
    pub fn erase_all(&mut self, grid: &mut GridModel) {
        grid.clear();
        self.painted.clear();
    }

    /// Forget painted cells without touching the grid (after loading a file)
    pub fn reset_stroke_history(&mut self) {
        self.painted.clear();
        self.is_pressed = false;
    }

    fn stamp(&mut self, point: Point, grid: &mut GridModel, vertical_offset: f32) -> PaintOutcome {
        let Some((col, row)) = grid.resolve_cell(point, vertical_offset) else {
            return PaintOutcome::Ignored;
        };
        grid.set_cell_type(col, row, self.palette_state.selected() as u8);
        self.painted.insert((col, row));
        PaintOutcome::Painted { col, row }
    }
}
