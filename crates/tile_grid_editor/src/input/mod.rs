//! Translates window input into session events
//!
//! Keyboard and mouse input are read every frame and forwarded to the
//! session as `InputEvent`s. Effects the session returns are queued on
//! `EditorState` for the UI systems to carry out.

use bevy::ecs::message::MessageReader;
use bevy::input::keyboard::KeyboardInput;
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};
use bevy_egui::EguiContexts;
use tile_grid_core::{InputEvent, Key, Point, SessionEffect};

use crate::ui::PendingAction;
use crate::{ActiveSession, EditorState};

/// Plugin for keyboard and mouse input
pub struct EditorInputPlugin;

impl Plugin for EditorInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (forward_keyboard_input, forward_pointer_input)
                .chain()
                .in_set(ForwardInput),
        );
    }
}

/// Systems that feed input into the session
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForwardInput;

/// Session key for a non-text key
pub fn named_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Return),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Tab => Some(Key::Tab),
        _ => None,
    }
}

/// Session keys for typed text, skipping control characters
pub fn text_keys(text: &str) -> impl Iterator<Item = Key> + '_ {
    text.chars().filter(|ch| !ch.is_control()).map(Key::Char)
}

/// Held keys that should not retrigger. A repeated scroll press would
/// count as a release.
fn ignores_repeat(key: Key) -> bool {
    !matches!(key, Key::Backspace | Key::Char(_))
}

/// Queue the work a session effect asks for
pub fn queue_effect(effect: SessionEffect, editor_state: &mut EditorState) {
    let action = match effect {
        SessionEffect::None => return,
        SessionEffect::Quit => PendingAction::Exit,
        SessionEffect::Save { file_name } => PendingAction::Save { file_name },
        SessionEffect::Load => PendingAction::Open,
    };
    editor_state.pending_actions.push(action);
}

fn forward_keyboard_input(
    mut keyboard_events: MessageReader<KeyboardInput>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<ActiveSession>,
    mut editor_state: ResMut<EditorState>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);

    for event in keyboard_events.read() {
        let pressed = event.state == ButtonState::Pressed;

        // Ctrl+Q - Quit
        if ctrl && pressed && event.key_code == KeyCode::KeyQ {
            let effect = session.handle_event(InputEvent::Quit);
            queue_effect(effect, &mut editor_state);
            continue;
        }

        let keys: Vec<Key> = match (named_key(event.key_code), &event.text) {
            (Some(key), _) => vec![key],
            (None, Some(text)) if pressed && !ctrl => text_keys(text.as_str()).collect(),
            _ => Vec::new(),
        };

        for key in keys {
            if event.repeat && ignores_repeat(key) {
                continue;
            }
            let input = if pressed {
                InputEvent::KeyDown(key)
            } else {
                InputEvent::KeyUp(key)
            };
            let effect = session.handle_event(input);
            queue_effect(effect, &mut editor_state);
        }
    }
}

fn forward_pointer_input(
    mut contexts: EguiContexts,
    mut cursor_moves: MessageReader<CursorMoved>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut session: ResMut<ActiveSession>,
    mut editor_state: ResMut<EditorState>,
) {
    // Egui windows (the error dialog) take the pointer while it is over them
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.is_using_pointer() || ctx.is_pointer_over_area())
        .unwrap_or(false);
    let blocked = egui_wants_pointer || editor_state.error_message.is_some();

    let mut events = Vec::new();
    for moved in cursor_moves.read() {
        if !blocked {
            events.push(InputEvent::PointerMove(Point::new(
                moved.position.x,
                moved.position.y,
            )));
        }
    }

    if !blocked && mouse_buttons.just_pressed(MouseButton::Left) {
        let cursor = windows.iter().next().and_then(Window::cursor_position);
        if let Some(cursor) = cursor {
            events.push(InputEvent::PointerDown(Point::new(cursor.x, cursor.y)));
        }
    }

    // Always deliver releases so a drag never stays stuck
    if mouse_buttons.just_released(MouseButton::Left) {
        events.push(InputEvent::PointerUp);
    }

    for event in events {
        let effect = session.handle_event(event);
        queue_effect(effect, &mut editor_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys() {
        assert_eq!(named_key(KeyCode::ArrowDown), Some(Key::Down));
        assert_eq!(named_key(KeyCode::NumpadEnter), Some(Key::Return));
        assert_eq!(named_key(KeyCode::KeyR), None);
    }

    #[test]
    fn test_text_keys_skip_control_characters() {
        let keys: Vec<Key> = text_keys("a\u{8}1").collect();
        assert_eq!(keys, vec![Key::Char('a'), Key::Char('1')]);
    }

    #[test]
    fn test_repeats() {
        assert!(ignores_repeat(Key::Down));
        assert!(ignores_repeat(Key::Return));
        assert!(!ignores_repeat(Key::Backspace));
        assert!(!ignores_repeat(Key::Char('x')));
    }

    #[test]
    fn test_effects_become_pending_actions() {
        let mut state = EditorState::default();
        queue_effect(SessionEffect::None, &mut state);
        assert!(state.pending_actions.is_empty());

        queue_effect(SessionEffect::Load, &mut state);
        assert_eq!(state.pending_actions, vec![PendingAction::Open]);
    }

    #[test]
    fn test_effects_in_one_frame_are_all_kept() {
        let mut state = EditorState::default();
        queue_effect(
            SessionEffect::Save {
                file_name: "level".to_string(),
            },
            &mut state,
        );
        queue_effect(SessionEffect::Quit, &mut state);
        assert_eq!(
            state.pending_actions,
            vec![
                PendingAction::Save {
                    file_name: "level".to_string()
                },
                PendingAction::Exit,
            ]
        );
    }
}
