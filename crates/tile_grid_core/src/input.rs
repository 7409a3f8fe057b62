//! Abstract input events fed to the session by the windowing layer

use crate::Point;

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Return,
    Backspace,
    Escape,
    Tab,
    /// Printable character, as typed
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    /// Primary button pressed at a screen position
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
}
