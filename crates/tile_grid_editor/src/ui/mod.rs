//! Egui overlays: the prompt dialog and the error window

mod dialogs;

pub use dialogs::*;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use tile_grid_core::{PromptDialog, Rect};

use crate::input::ForwardInput;
use crate::{ActiveSession, EditorState};

const FONT_SIZE: f32 = 24.0;
const DIALOG_FILL: egui::Color32 = egui::Color32::from_rgb(20, 20, 20);
const TEXT_COLOR: egui::Color32 = egui::Color32::WHITE;
const FIELD_BORDER: egui::Color32 = egui::Color32::from_rgb(38, 38, 38);
const ACTIVE_FIELD_BORDER: egui::Color32 = egui::Color32::from_rgb(141, 182, 205);

/// Main UI plugin
pub struct EditorUiPlugin;

impl Plugin for EditorUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, process_pending_actions.after(ForwardInput))
            .add_systems(EguiPrimaryContextPass, render_ui);
    }
}

fn render_ui(
    mut contexts: EguiContexts,
    session: Res<ActiveSession>,
    mut editor_state: ResMut<EditorState>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    if let Some(dialog) = session.prompt() {
        render_prompt_dialog(ctx, dialog);
    }
    render_error_dialog(ctx, &mut editor_state);
}

fn to_egui_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x, rect.y),
        egui::vec2(rect.width, rect.height),
    )
}

/// Draw the session's prompt. Layout and hit testing come from the core
/// dialog; only text boxes grow to fit what was typed.
fn render_prompt_dialog(ctx: &egui::Context, dialog: &PromptDialog) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("prompt_dialog"),
    ));
    let font = egui::FontId::proportional(FONT_SIZE);

    painter.rect_filled(to_egui_rect(dialog.frame()), 0.0, DIALOG_FILL);

    for field in dialog.fields() {
        let label = field.label_position();
        painter.text(
            egui::pos2(label.x, label.y),
            egui::Align2::LEFT_TOP,
            format!("{}:", field.label),
            font.clone(),
            TEXT_COLOR,
        );

        let galley = painter.layout_no_wrap(field.answer.clone(), font.clone(), TEXT_COLOR);
        let mut rect = to_egui_rect(field.rect);
        rect.set_width(rect.width().max(galley.size().x + 10.0));
        let text_pos = egui::pos2(
            rect.min.x + 5.0,
            rect.center().y - galley.size().y / 2.0,
        );
        painter.galley(text_pos, galley, TEXT_COLOR);

        let border = if field.active {
            ACTIVE_FIELD_BORDER
        } else {
            FIELD_BORDER
        };
        painter.rect_stroke(
            rect,
            0.0,
            egui::Stroke::new(2.0, border),
            egui::StrokeKind::Inside,
        );
    }
}

fn render_error_dialog(ctx: &egui::Context, editor_state: &mut EditorState) {
    let Some(error_msg) = editor_state.error_message.clone() else {
        return;
    };

    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(&error_msg);
            ui.separator();
            if ui.button("OK").clicked() {
                editor_state.error_message = None;
            }
        });
}
