// Core input types shared by the desktop shell, window chrome, and paint canvas

use serde::{Deserialize, Serialize};

/// Which pointer button triggered an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    /// Left button / primary touch
    Primary,
    /// Right button
    Secondary,
}

/// Keyboard input after the host has translated raw key events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Enter,
    Backspace,
    Escape,
    Undo,
    Save,
    New,
}
