//! tile_grid_editor - Scrolling tile grid editor built on Bevy
//!
//! The editor state machine lives in `tile_grid_core`. This crate wires it
//! to a Bevy window:
//! - Keyboard and mouse input become abstract `InputEvent`s
//! - Scrolling integrates on a fixed 60 Hz schedule
//! - The grid, palette and free tiles are drawn with sprites
//! - Prompts and errors are drawn with egui
//! - Grid files are saved and loaded as text
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tile_grid_editor::EditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(EditorPlugin::new().with_default_divisions(10))
//!         .run();
//! }
//! ```

pub mod input;
pub mod preferences;
pub mod project;
pub mod render;
pub mod ui;

pub use tile_grid_core;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use tile_grid_core::EditorSession;

use input::EditorInputPlugin;
use preferences::EditorPreferences;
use render::GridRenderPlugin;
use ui::{EditorUiPlugin, PendingAction};

/// Rate of the scroll integration
pub const TICK_HZ: f64 = 60.0;

/// The running editor session
#[derive(Resource, Deref, DerefMut)]
pub struct ActiveSession(pub EditorSession);

/// Editor state outside the session: errors and work queued for the frame
#[derive(Resource, Default)]
pub struct EditorState {
    pub error_message: Option<String>,
    /// Carried out in arrival order
    pub pending_actions: Vec<PendingAction>,
}

/// Main editor plugin
///
/// # Example
///
/// ```rust,ignore
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(
///         EditorPlugin::new()
///             .with_canvas_size(1000, 1000)
///             .with_default_divisions(10)
///     )
///     .run();
/// ```
#[derive(Default)]
pub struct EditorPlugin {
    /// Preferences to start from. Loaded from disk if None.
    pub preferences: Option<EditorPreferences>,
    /// Canvas size override in pixels
    pub canvas_size: Option<(u32, u32)>,
    /// Fallback grid size override
    pub default_divisions: Option<u32>,
}

impl EditorPlugin {
    /// Create an editor plugin with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Use already loaded preferences instead of reading them again
    pub fn with_preferences(mut self, preferences: EditorPreferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Set the canvas size in pixels. Should match the window size.
    pub fn with_canvas_size(mut self, width: u32, height: u32) -> Self {
        self.canvas_size = Some((width, height));
        self
    }

    /// Set the grid size used when the startup prompt has no valid answer
    pub fn with_default_divisions(mut self, divisions: u32) -> Self {
        self.default_divisions = Some(divisions);
        self
    }

    /// Preferences with the plugin overrides applied
    fn resolve_preferences(&self) -> EditorPreferences {
        let mut preferences = self
            .preferences
            .clone()
            .unwrap_or_else(EditorPreferences::load);
        if let Some((width, height)) = self.canvas_size {
            preferences.canvas_width = width;
            preferences.canvas_height = height;
        }
        if let Some(divisions) = self.default_divisions {
            preferences.default_grid_divisions = divisions;
        }
        preferences
    }
}

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        let preferences = self.resolve_preferences();
        bevy::log::info!(
            "EditorPlugin: {}x{} canvas, default grid size {}",
            preferences.canvas_width,
            preferences.canvas_height,
            preferences.default_grid_divisions
        );

        let session = EditorSession::new(preferences.session_config());

        app.add_plugins(EguiPlugin::default())
            .add_plugins(EditorInputPlugin)
            .add_plugins(GridRenderPlugin)
            .add_plugins(EditorUiPlugin)
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .insert_resource(preferences)
            .insert_resource(ActiveSession(session))
            .init_resource::<EditorState>()
            .add_systems(Startup, setup_editor_camera)
            .add_systems(FixedUpdate, tick_session);
    }
}

/// Advance scrolling by one fixed step
fn tick_session(mut session: ResMut<ActiveSession>) {
    session.tick();
}

/// Spawns the editor camera if one doesn't exist
fn setup_editor_camera(mut commands: Commands, camera_query: Query<&Camera2d>) {
    if camera_query.is_empty() {
        commands.spawn(Camera2d);
    }
}
