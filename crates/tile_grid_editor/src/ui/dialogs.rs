//! File actions requested by the session

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use std::path::Path;
use tile_grid_core::EditorSession;

use crate::preferences::EditorPreferences;
use crate::project::{load_grid, save_grid};
use crate::{ActiveSession, EditorState};

/// Work queued by input handling and carried out once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Save { file_name: String },
    Open,
    Exit,
}

/// Carry out the queued actions in order. Nothing after an exit runs.
pub fn process_pending_actions(
    mut editor_state: ResMut<EditorState>,
    mut session: ResMut<ActiveSession>,
    preferences: Res<EditorPreferences>,
    mut exit: MessageWriter<AppExit>,
) {
    let actions = std::mem::take(&mut editor_state.pending_actions);
    for action in actions {
        let exiting = run_action(action, &mut editor_state, &mut session.0, &preferences);
        if exiting {
            exit.write(AppExit::Success);
            break;
        }
    }
}

/// Returns true when the editor should exit
fn run_action(
    action: PendingAction,
    editor_state: &mut EditorState,
    session: &mut EditorSession,
    preferences: &EditorPreferences,
) -> bool {
    match action {
        PendingAction::Exit => {
            info!("Exiting editor");
            true
        }
        PendingAction::Save { file_name } => {
            let Some(document) = session.document() else {
                return false;
            };
            match save_grid(document.grid(), &preferences.save_dir(), &file_name) {
                Ok(_) if preferences.exit_after_save => {
                    info!("Grid saved, exiting editor");
                    true
                }
                Ok(_) => false,
                Err(e) => {
                    error!("Failed to save grid: {}", e);
                    editor_state.error_message = Some(format!("Failed to save grid: {}", e));
                    false
                }
            }
        }
        PendingAction::Open => {
            #[cfg(feature = "native")]
            {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Tile Grid", &[crate::project::GRID_FILE_EXTENSION])
                    .set_directory(preferences.save_dir())
                    .pick_file()
                {
                    if let Err(e) = load_into_session(session, &path) {
                        error!("{}", e);
                        editor_state.error_message = Some(e);
                    }
                }
            }
            #[cfg(not(feature = "native"))]
            {
                warn!("Opening grid files requires the native feature");
            }
            false
        }
    }
}

/// Read a grid file and replace the session's grid with it
pub fn load_into_session(session: &mut EditorSession, path: &Path) -> Result<(), String> {
    let rows = load_grid(path, session.palette().len())
        .map_err(|e| format!("Failed to load grid: {}", e))?;
    session
        .load_rows(rows)
        .map_err(|e| format!("Failed to load grid: {}", e))?;
    info!("Loaded grid from {:?}", path);
    Ok(())
}
