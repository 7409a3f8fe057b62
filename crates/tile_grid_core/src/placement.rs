//! Free tile placement
//!
//! A template tile near the bottom-left of the canvas spawns new tiles when
//! pressed. Tiles move freely while dragged and snap to the nearest grid
//! lines on release. Dropping a tile onto the template deletes it.

use crate::{snap_offset, GridGeometry, Point, Rect};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A tile placed freely on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeTile {
    pub id: u32,
    pub rect: Rect,
}

/// Interaction state of the placement tool
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PlacementState {
    #[default]
    Idle,
    Dragging {
        tile_id: u32,
        /// Where the tile was when the drag started
        origin: Point,
        /// Tile was spawned from the template by this drag
        spawned: bool,
    },
}

/// Result of releasing the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    /// Nothing was being dragged
    NoSelection,
    /// Tile settled at its snapped position
    Placed { id: u32, rect: Rect },
    /// Tile was dropped on the template and removed
    Deleted { id: u32 },
    /// Snapped position overlapped another tile; tile went back to its origin
    Reverted { id: u32, rect: Rect },
    /// A freshly spawned tile collided and was thrown away
    Discarded { id: u32 },
}

#[derive(Debug, Clone)]
pub struct PlacementEditor {
    template: Rect,
    cell_size: f32,
    tiles: Vec<FreeTile>,
    next_id: u32,
    /// A tile was already spawned during the current press
    created: bool,
    state: PlacementState,
    last_pointer: Point,
}

impl PlacementEditor {
    pub fn new(geometry: &GridGeometry) -> Self {
        let template = Rect::square(
            geometry.canvas_width() as f32 * 0.1,
            geometry.canvas_height() as f32 * 0.8,
            geometry.cell_size(),
        );
        Self {
            template,
            cell_size: geometry.cell_size(),
            tiles: Vec::new(),
            next_id: 0,
            created: false,
            state: PlacementState::Idle,
            last_pointer: Point::default(),
        }
    }

    pub fn template(&self) -> Rect {
        self.template
    }

    pub fn tiles(&self) -> &[FreeTile] {
        &self.tiles
    }

    pub fn tile(&self, id: u32) -> Option<&FreeTile> {
        self.tiles.iter().find(|tile| tile.id == id)
    }

    pub fn state(&self) -> PlacementState {
        self.state
    }

    pub fn selected_tile(&self) -> Option<&FreeTile> {
        match self.state {
            PlacementState::Dragging { tile_id, .. } => self.tile(tile_id),
            PlacementState::Idle => None,
        }
    }

    /// Pointer pressed: spawn from the template, then pick up the topmost
    /// tile under the pointer.
    pub fn pointer_down(&mut self, point: Point) -> Option<u32> {
        self.last_pointer = point;

        let mut spawned_id = None;
        if self.template.contains(point) && !self.created {
            self.created = true;
            let id = self.next_id;
            self.next_id += 1;
            self.tiles.push(FreeTile {
                id,
                rect: self.template,
            });
            spawned_id = Some(id);
            debug!("Spawned free tile {}", id);
        }

        if matches!(self.state, PlacementState::Idle) {
            let hit = *self.tiles.iter().rev().find(|tile| tile.rect.contains(point))?;
            self.state = PlacementState::Dragging {
                tile_id: hit.id,
                origin: hit.rect.origin(),
                spawned: spawned_id == Some(hit.id),
            };
            return Some(hit.id);
        }
        None
    }

    /// Pointer moved: the dragged tile follows the raw motion, unsnapped
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let (dx, dy) = point.delta_from(self.last_pointer);
        self.last_pointer = point;
        let PlacementState::Dragging { tile_id, .. } = self.state else {
            return false;
        };
        match self.tiles.iter_mut().find(|tile| tile.id == tile_id) {
            Some(tile) => {
                tile.rect = tile.rect.translated(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Pointer released: snap, check collisions, then delete, keep or revert
    pub fn pointer_up(&mut self) -> DropOutcome {
        self.created = false;
        let PlacementState::Dragging {
            tile_id,
            origin,
            spawned,
        } = std::mem::take(&mut self.state)
        else {
            return DropOutcome::NoSelection;
        };
        let Some(position) = self.tiles.iter().position(|tile| tile.id == tile_id) else {
            return DropOutcome::NoSelection;
        };

        let rect = self.tiles[position].rect;
        let snapped = rect.translated(
            self.fit_to_grid(rect.x),
            self.fit_to_grid(rect.y),
        );
        self.tiles[position].rect = snapped;

        if self.colliding_with_other_tiles(tile_id) {
            if spawned {
                self.tiles.remove(position);
                debug!("Discarded free tile {} after collision", tile_id);
                return DropOutcome::Discarded { id: tile_id };
            }
            let reverted = snapped.with_origin(origin);
            self.tiles[position].rect = reverted;
            debug!("Reverted free tile {} after collision", tile_id);
            return DropOutcome::Reverted {
                id: tile_id,
                rect: reverted,
            };
        }

        if snapped.intersects(&self.template) {
            self.tiles.remove(position);
            debug!("Deleted free tile {}", tile_id);
            return DropOutcome::Deleted { id: tile_id };
        }

        DropOutcome::Placed {
            id: tile_id,
            rect: snapped,
        }
    }

    /// Offset that moves one axis of a position onto the nearest grid line
    pub fn fit_to_grid(&self, axis: f32) -> f32 {
        snap_offset(axis, self.cell_size)
    }

    /// Whether a tile overlaps any other tile
    pub fn colliding_with_other_tiles(&self, id: u32) -> bool {
        let Some(tile) = self.tile(id) else {
            return false;
        };
        self.tiles
            .iter()
            .any(|other| other.id != id && other.rect.intersects(&tile.rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> PlacementEditor {
        // Template at (100, 800), cells of 100px
        PlacementEditor::new(&GridGeometry::new(1000, 1000, 10).unwrap())
    }

    /// Spawn from the template and drag by (dx, dy) before releasing
    fn spawn_and_drag(editor: &mut PlacementEditor, dx: f32, dy: f32) -> DropOutcome {
        let start = Point::new(150.0, 850.0);
        editor.pointer_down(start);
        editor.pointer_move(Point::new(start.x + dx, start.y + dy));
        editor.pointer_up()
    }

    #[test]
    fn test_template_position() {
        assert_eq!(editor().template(), Rect::square(100.0, 800.0, 100.0));
    }

    #[test]
    fn test_spawn_drag_and_snap() {
        let mut editor = editor();
        let outcome = spawn_and_drag(&mut editor, 230.0, -370.0);
        // Raw (330, 430) snaps to (300, 400)
        assert_eq!(
            outcome,
            DropOutcome::Placed {
                id: 0,
                rect: Rect::square(300.0, 400.0, 100.0)
            }
        );
        assert_eq!(editor.state(), PlacementState::Idle);
        assert_eq!(editor.tiles().len(), 1);
    }

    #[test]
    fn test_snap_rounds_up_past_half_cell() {
        let mut editor = editor();
        let outcome = spawn_and_drag(&mut editor, 270.0, -360.0);
        assert_eq!(
            outcome,
            DropOutcome::Placed {
                id: 0,
                rect: Rect::square(400.0, 400.0, 100.0)
            }
        );
    }

    #[test]
    fn test_drop_on_template_deletes() {
        let mut editor = editor();
        spawn_and_drag(&mut editor, 300.0, -300.0);
        assert_eq!(editor.tiles().len(), 1);

        // Pick up the placed tile and bring it back onto the template
        editor.pointer_down(Point::new(450.0, 550.0));
        editor.pointer_move(Point::new(170.0, 840.0));
        let outcome = editor.pointer_up();
        assert_eq!(outcome, DropOutcome::Deleted { id: 0 });
        assert!(editor.tiles().is_empty());
    }

    #[test]
    fn test_releasing_on_template_without_moving_deletes_spawn() {
        let mut editor = editor();
        let outcome = spawn_and_drag(&mut editor, 0.0, 0.0);
        assert_eq!(outcome, DropOutcome::Deleted { id: 0 });
        assert!(editor.tiles().is_empty());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut editor = editor();
        spawn_and_drag(&mut editor, 300.0, -300.0);
        spawn_and_drag(&mut editor, 0.0, 0.0);
        spawn_and_drag(&mut editor, 500.0, -300.0);
        let ids: Vec<u32> = editor.tiles().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn test_collision_reverts_existing_tile() {
        let mut editor = editor();
        spawn_and_drag(&mut editor, 300.0, -300.0); // tile 0 at (400, 500)
        spawn_and_drag(&mut editor, 500.0, -300.0); // tile 1 at (600, 500)

        editor.pointer_down(Point::new(650.0, 550.0));
        editor.pointer_move(Point::new(460.0, 540.0));
        let outcome = editor.pointer_up();
        assert_eq!(
            outcome,
            DropOutcome::Reverted {
                id: 1,
                rect: Rect::square(600.0, 500.0, 100.0)
            }
        );
        assert!(!editor.colliding_with_other_tiles(1));
        assert_eq!(editor.state(), PlacementState::Idle);
    }

    #[test]
    fn test_collision_discards_fresh_spawn() {
        let mut editor = editor();
        spawn_and_drag(&mut editor, 300.0, -300.0); // tile 0 at (400, 500)
        let outcome = spawn_and_drag(&mut editor, 310.0, -290.0);
        assert_eq!(outcome, DropOutcome::Discarded { id: 1 });
        assert_eq!(editor.tiles().len(), 1);
    }

    #[test]
    fn test_one_spawn_per_press() {
        let mut editor = editor();
        editor.pointer_down(Point::new(150.0, 850.0));
        editor.pointer_down(Point::new(150.0, 850.0));
        assert_eq!(editor.tiles().len(), 1);
        editor.pointer_up();
        assert_eq!(editor.tiles().len(), 0);
    }

    #[test]
    fn test_motion_without_selection_is_ignored() {
        let mut editor = editor();
        assert!(!editor.pointer_move(Point::new(10.0, 10.0)));
        assert_eq!(editor.pointer_up(), DropOutcome::NoSelection);
    }
}
