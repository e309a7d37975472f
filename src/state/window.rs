use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::geometry::{Position, Rect, Size};

/// How a window is currently displayed.
///
/// The restore rectangle only exists in the maximized variants, so a saved
/// rectangle can never outlive the maximize that produced it.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DisplayState {
    /// Drawn at its own position and size
    Normal,
    /// Hidden from the desktop, still listed in the taskbar
    Minimized,
    /// Fills the desktop; `restore` is the rectangle to return to
    Maximized { restore: Rect },
    /// Hidden, and returns to the maximized layout when restored
    MinimizedWhileMaximized { restore: Rect },
}

impl DisplayState {
    pub fn is_minimized(&self) -> bool {
        matches!(
            self,
            DisplayState::Minimized | DisplayState::MinimizedWhileMaximized { .. }
        )
    }

    pub fn is_maximized(&self) -> bool {
        matches!(
            self,
            DisplayState::Maximized { .. } | DisplayState::MinimizedWhileMaximized { .. }
        )
    }

    pub fn restore_rect(&self) -> Option<Rect> {
        match self {
            DisplayState::Maximized { restore }
            | DisplayState::MinimizedWhileMaximized { restore } => Some(*restore),
            DisplayState::Normal | DisplayState::Minimized => None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    pub id: String,             // Stable identity, one entry per id
    pub title: String,          // Shown in the title bar and taskbar
    pub component_key: String,  // What to mount in the body (e.g. "gallery")
    pub props: Option<Value>,   // Opaque payload for the content renderer
    pub position: Position,     // Last restored top-left corner
    pub size: Size,             // Last restored size
    pub z_index: u32,           // Stacking order, higher is more recent
    pub display: DisplayState,  // Normal, Minimized, Maximized, ...
}

impl WindowState {
    pub fn is_minimized(&self) -> bool {
        self.display.is_minimized()
    }

    pub fn is_maximized(&self) -> bool {
        self.display.is_maximized()
    }

    /// Rectangle saved by the last maximize, if the window is maximized
    pub fn pre_maximize_rect(&self) -> Option<Rect> {
        self.display.restore_rect()
    }

    /// Current restored rectangle (what a maximize would save)
    pub fn rect(&self) -> Rect {
        Rect {
            position: self.position,
            size: self.size,
        }
    }
}
