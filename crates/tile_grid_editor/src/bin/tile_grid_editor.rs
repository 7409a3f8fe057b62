//! Standalone tile grid editor binary
//!
//! Run with: tile_grid_editor

use bevy::prelude::*;
use bevy::window::WindowResolution;
use tile_grid_editor::preferences::EditorPreferences;
use tile_grid_editor::EditorPlugin;

fn main() {
    let preferences = EditorPreferences::load();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Tile Grid Editor".to_string(),
                // Canvas pixels map one to one onto window pixels
                resolution: WindowResolution::new(
                    preferences.canvas_width,
                    preferences.canvas_height,
                )
                .with_scale_factor_override(1.0),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EditorPlugin::new().with_preferences(preferences))
        .run();
}
