//! Core data model for the scrolling tile grid editor
//!
//! This crate has no engine dependency. It provides:
//! - `GridModel` - Append-only grid of typed cells with its geometry
//! - `ScrollController` - Key-driven vertical scrolling over an unbounded grid
//! - `PaintController` - Palette selection and drag painting
//! - `PlacementEditor` - Free tile drag, snap and drop-to-delete
//! - `codec` - Row-per-line text format for saving and loading grids
//! - `PromptDialog` - Modal text prompt with typed answers
//! - `EditorSession` - Routes abstract input between editing and prompting

pub mod codec;
mod dialog;
mod geometry;
mod grid;
mod input;
mod paint;
mod palette;
mod placement;
mod scroll;
mod session;

pub use codec::CodecError;
pub use dialog::{parse_answers, Answer, DialogStatus, PromptDialog, PromptField, ValueKind};
pub use geometry::{snap_offset, Point, Rect};
pub use grid::{Cell, GridError, GridGeometry, GridModel, ViewWindow};
pub use input::{InputEvent, Key};
pub use paint::{PaintController, PaintOutcome};
pub use palette::{PaletteError, PaletteState, Rgb, TileType, TypePalette, MAX_TILE_TYPES};
pub use placement::{DropOutcome, FreeTile, PlacementEditor, PlacementState};
pub use scroll::{rows_needed_for_window, ScrollCommit, ScrollController, ScrollDirection};
pub use session::{
    Document, EditorSession, Mode, PromptPurpose, SessionConfig, SessionEffect, Tool,
};
