//! User preferences for the grid editor
//!
//! Stored as JSON in the platform config directory. Missing fields fall back
//! to their defaults so older files keep loading.

mod file;

pub use file::*;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tile_grid_core::{SessionConfig, TypePalette};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Grid size used when the startup prompt gets no usable answer
    pub default_grid_divisions: u32,
    /// Close the editor after a successful save
    pub exit_after_save: bool,
    /// Where grid files are written. Current directory if unset.
    pub save_directory: Option<PathBuf>,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            canvas_width: 1500,
            canvas_height: 1000,
            default_grid_divisions: 20,
            exit_after_save: true,
            save_directory: None,
        }
    }
}

impl EditorPreferences {
    /// Session settings derived from these preferences
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            default_divisions: self.default_grid_divisions,
            palette: TypePalette::default(),
        }
    }

    /// Directory grid files are saved into
    pub fn save_dir(&self) -> PathBuf {
        match &self.save_directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}
