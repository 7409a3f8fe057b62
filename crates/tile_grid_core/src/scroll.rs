//! Key-driven vertical scrolling
//!
//! Holding a scroll key feeds a fixed step into an accumulator every tick.
//! Once a full cell has accumulated the view window moves by whole rows.
//! The controller never touches the grid itself: a commit reports how many
//! rows the new window needs and the caller materializes them.

use crate::{GridGeometry, ViewWindow};
use tracing::debug;

/// Ticks needed to scroll one full cell
pub const SCROLL_STEPS_PER_CELL: f32 = 5.0;

/// Relative slack for float accumulation of fractional steps
const COMMIT_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Result of a tick that moved the view window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollCommit {
    /// Rows moved (negative is up)
    pub delta: i64,
    pub window: ViewWindow,
    /// Minimum row count the grid must have to fill the new window
    pub rows_required: usize,
    /// True when the window reached further down than ever before
    pub extended: bool,
}

/// Rows a grid needs to keep `window` fully materialized
pub fn rows_needed_for_window(window: &ViewWindow) -> usize {
    window.last() + 1
}

#[derive(Debug, Clone)]
pub struct ScrollController {
    cell_size: f32,
    accumulator: f32,
    scrolling_down: bool,
    scrolling_up: bool,
    window: ViewWindow,
    max_row_ever_shown: usize,
}

impl ScrollController {
    pub fn new(geometry: &GridGeometry) -> Self {
        let window = ViewWindow::new(geometry.divisions());
        Self {
            cell_size: geometry.cell_size(),
            accumulator: 0.0,
            scrolling_down: false,
            scrolling_up: false,
            window,
            max_row_ever_shown: window.last(),
        }
    }

    pub fn window(&self) -> ViewWindow {
        self.window
    }

    pub fn first_visible_row(&self) -> usize {
        self.window.first()
    }

    pub fn last_visible_row(&self) -> usize {
        self.window.last()
    }

    pub fn max_row_ever_shown(&self) -> usize {
        self.max_row_ever_shown
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Pixel offset of the first visible row from the top of the grid
    pub fn vertical_offset(&self) -> f32 {
        self.window.first() as f32 * self.cell_size
    }

    pub fn is_scrolling(&self, direction: ScrollDirection) -> bool {
        match direction {
            ScrollDirection::Down => self.scrolling_down,
            ScrollDirection::Up => self.scrolling_up,
        }
    }

    /// Key press. Pressing a key that is already active counts as a release.
    pub fn press(&mut self, direction: ScrollDirection) {
        if self.is_scrolling(direction) {
            self.release(direction);
        } else {
            self.set_scrolling(direction, true);
        }
    }

    /// Key release. Ends scrolling in that direction with a jump of one full
    /// cell, so a short tap still moves the view by one row.
    pub fn release(&mut self, direction: ScrollDirection) {
        if !self.is_scrolling(direction) {
            return;
        }
        match direction {
            ScrollDirection::Down => self.accumulator = self.cell_size,
            ScrollDirection::Up => {
                if self.window.first() > 0 {
                    self.accumulator = -self.cell_size;
                }
            }
        }
        self.set_scrolling(direction, false);
    }

    fn set_scrolling(&mut self, direction: ScrollDirection, active: bool) {
        match direction {
            ScrollDirection::Down => self.scrolling_down = active,
            ScrollDirection::Up => self.scrolling_up = active,
        }
    }

    /// Advance one fixed tick
    pub fn tick(&mut self) -> Option<ScrollCommit> {
        let step = self.cell_size / SCROLL_STEPS_PER_CELL;
        if self.scrolling_down {
            self.accumulator += step;
        } else if self.scrolling_up && self.window.first() > 0 {
            self.accumulator -= step;
        }
        self.commit()
    }

    fn commit(&mut self) -> Option<ScrollCommit> {
        if self.accumulator.abs() < self.cell_size * (1.0 - COMMIT_EPSILON) {
            return None;
        }
        let cells = self.accumulator / self.cell_size;
        self.accumulator = 0.0;

        let delta = ((cells + COMMIT_EPSILON).floor() as i64).max(-(self.window.first() as i64));
        if delta == 0 {
            return None;
        }

        self.window = self.window.shifted(delta);
        let extended = self.window.last() > self.max_row_ever_shown;
        if extended {
            self.max_row_ever_shown = self.window.last();
        }
        debug!(
            "Scrolled {} rows, window now {}..={}",
            delta,
            self.window.first(),
            self.window.last()
        );
        Some(ScrollCommit {
            delta,
            window: self.window,
            rows_required: rows_needed_for_window(&self.window),
            extended,
        })
    }

    /// Stop scrolling in both directions without the release jump
    pub fn halt(&mut self) {
        self.accumulator = 0.0;
        self.scrolling_down = false;
        self.scrolling_up = false;
    }

    /// Return to the top of a grid holding `row_count` rows and stop scrolling
    pub fn reset(&mut self, divisions: u32, row_count: usize) {
        self.halt();
        self.window = ViewWindow::new(divisions);
        self.max_row_ever_shown = row_count.saturating_sub(1).max(self.window.last());
    }
}
