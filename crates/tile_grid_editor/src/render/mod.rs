//! Sprite rendering of the editor canvas
//!
//! The session is drawn as a flat list of colored rectangles in canvas
//! coordinates (origin top-left, y down). Whenever the session revision
//! changes the previous sprites are despawned and the list is spawned again.

use bevy::prelude::*;
use tile_grid_core::{EditorSession, Rect, Rgb, Tool};

use crate::ActiveSession;

/// Border width of a bordered rectangle
const BORDER_EDGE: f32 = 2.0;
/// Thickness of placement grid lines
const GRID_LINE_THICKNESS: f32 = 1.0;
/// Depth step between consecutive shapes
const Z_STEP: f32 = 0.001;

pub const FREE_TILE_FILL: Rgb = Rgb(255, 0, 0);
pub const FREE_TILE_HIGHLIGHT: Rgb = Rgb(180, 0, 0);

/// Plugin for canvas rendering
pub struct GridRenderPlugin;

impl Plugin for GridRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RenderState>()
            .insert_resource(ClearColor(to_color(Rgb::CANVAS)))
            .add_systems(Update, sync_grid_rendering);
    }
}

/// Tracks what is currently on screen
#[derive(Resource, Default)]
pub struct RenderState {
    /// Session revision the sprites were built from
    pub rendered_revision: Option<u64>,
    pub entities: Vec<Entity>,
}

/// Marker component for canvas sprites
#[derive(Component)]
pub struct CanvasShape;

/// One filled rectangle in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneRect {
    pub rect: Rect,
    pub color: Rgb,
}

fn push_bordered(shapes: &mut Vec<SceneRect>, rect: Rect, fill: Rgb) {
    shapes.push(SceneRect {
        rect,
        color: Rgb::BLACK,
    });
    shapes.push(SceneRect {
        rect: rect.inset(BORDER_EDGE),
        color: fill,
    });
}

/// Everything the session shows, back to front
pub fn build_scene(session: &EditorSession) -> Vec<SceneRect> {
    let mut shapes = Vec::new();
    let Some(document) = session.document() else {
        return shapes;
    };
    let geometry = document.geometry();
    let palette = session.palette();

    match session.tool() {
        Tool::Paint => {
            let offset = document.vertical_offset();
            for row in document.scroll().window().rows() {
                let Some(cells) = document.grid().row(row) else {
                    continue;
                };
                for (col, &type_index) in cells.iter().enumerate() {
                    push_bordered(
                        &mut shapes,
                        geometry.cell_rect(col, row, offset),
                        palette.fill_color(type_index),
                    );
                }
            }

            let palette_state = document.paint().palette_state();
            for (index, rect) in palette.swatch_rects(geometry).into_iter().enumerate() {
                push_bordered(&mut shapes, rect, palette_state.swatch_color(palette, index));
            }
        }
        Tool::Place => {
            let cell = geometry.cell_size();
            let width = geometry.canvas_width() as f32;
            let height = geometry.canvas_height() as f32;
            for col in 0..=geometry.columns() {
                shapes.push(SceneRect {
                    rect: Rect::new(col as f32 * cell, 0.0, GRID_LINE_THICKNESS, height),
                    color: Rgb::BLACK,
                });
            }
            for row in 0..=geometry.divisions() {
                shapes.push(SceneRect {
                    rect: Rect::new(0.0, row as f32 * cell, width, GRID_LINE_THICKNESS),
                    color: Rgb::BLACK,
                });
            }

            let placement = document.placement();
            push_bordered(&mut shapes, placement.template(), FREE_TILE_FILL);
            let selected = placement.selected_tile().map(|tile| tile.id);
            for tile in placement.tiles() {
                if Some(tile.id) != selected {
                    push_bordered(&mut shapes, tile.rect, FREE_TILE_FILL);
                }
            }
            if let Some(tile) = placement.selected_tile() {
                push_bordered(&mut shapes, tile.rect, FREE_TILE_HIGHLIGHT);
            }
        }
    }
    shapes
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::srgb_u8(rgb.0, rgb.1, rgb.2)
}

/// Transform placing a canvas rectangle in a world centered on the canvas
pub fn canvas_transform(rect: Rect, canvas: Vec2, z: f32) -> Transform {
    let center = rect.center();
    Transform::from_xyz(center.x - canvas.x / 2.0, canvas.y / 2.0 - center.y, z)
}

fn sync_grid_rendering(
    mut commands: Commands,
    mut render_state: ResMut<RenderState>,
    session: Res<ActiveSession>,
) {
    let revision = session.revision();
    if render_state.rendered_revision == Some(revision) {
        return;
    }
    render_state.rendered_revision = Some(revision);

    for entity in render_state.entities.drain(..) {
        let _ = commands.get_entity(entity).map(|mut e| e.despawn());
    }

    let config = session.config();
    let canvas = Vec2::new(config.canvas_width as f32, config.canvas_height as f32);
    for (index, shape) in build_scene(&session).into_iter().enumerate() {
        let entity = commands
            .spawn((
                Sprite {
                    color: to_color(shape.color),
                    custom_size: Some(Vec2::new(shape.rect.width, shape.rect.height)),
                    ..default()
                },
                canvas_transform(shape.rect, canvas, index as f32 * Z_STEP),
                CanvasShape,
            ))
            .id();
        render_state.entities.push(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_grid_core::{InputEvent, Key, Point, SessionConfig, TypePalette};

    fn session() -> EditorSession {
        let mut session = EditorSession::new(SessionConfig {
            canvas_width: 1000,
            canvas_height: 1000,
            default_divisions: 10,
            palette: TypePalette::default(),
        });
        session.handle_event(InputEvent::KeyDown(Key::Escape));
        session
    }

    #[test]
    fn test_nothing_drawn_before_grid_exists() {
        let session = EditorSession::new(SessionConfig::default());
        assert!(build_scene(&session).is_empty());
    }

    #[test]
    fn test_paint_scene_draws_window_then_swatches() {
        let session = session();
        let scene = build_scene(&session);
        // 100 cells and 3 swatches, two rectangles each
        assert_eq!(scene.len(), (100 + 3) * 2);
        assert_eq!(scene[0].color, Rgb::BLACK);
        assert_eq!(scene[1].rect, Rect::new(2.0, 2.0, 96.0, 96.0));
        assert_eq!(scene[1].color, Rgb(200, 200, 200));

        // The selected swatch (type 0) is drawn with its highlight
        let first_swatch_fill = scene[201];
        assert_eq!(first_swatch_fill.color, Rgb(150, 150, 150));
        assert_eq!(scene.last().unwrap().color, Rgb(0, 0, 255));
    }

    #[test]
    fn test_place_scene_draws_selected_tile_last() {
        let mut session = session();
        session.handle_event(InputEvent::KeyDown(Key::Tab));
        session.handle_event(InputEvent::PointerDown(Point::new(150.0, 850.0)));
        let scene = build_scene(&session);
        // 11 vertical and 11 horizontal lines, template, spawned tile
        assert_eq!(scene.len(), 22 + 2 + 2);
        let last = scene.last().unwrap();
        assert_eq!(last.color, FREE_TILE_HIGHLIGHT);
        assert_eq!(last.rect, Rect::new(102.0, 802.0, 96.0, 96.0));
    }

    #[test]
    fn test_canvas_transform() {
        let canvas = Vec2::new(1000.0, 1000.0);
        let transform = canvas_transform(Rect::square(0.0, 0.0, 100.0), canvas, 1.0);
        assert_eq!(transform.translation, Vec3::new(-450.0, 450.0, 1.0));
    }
}
