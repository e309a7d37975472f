use serde_json::Value;
use tracing::{debug, info};

use self::geometry::{Position, Size};
use self::window::{DisplayState, WindowState};
use crate::config::{CascadeConfig, DesktopConfig};

pub mod geometry;
pub mod window;

/// Owns every open window and the stacking counter for one desktop session.
///
/// Commands are total: an unknown id leaves the state untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowManager {
    windows: Vec<WindowState>, // Open order; z_index governs stacking
    next_z_index: u32,
    cascade_offset: u32,
    cascade: CascadeConfig,
    default_size: Size,
}

impl WindowManager {
    pub fn new(config: &DesktopConfig) -> Self {
        Self {
            windows: Vec::new(),
            next_z_index: config.first_z_index,
            cascade_offset: 0,
            cascade: config.cascade,
            default_size: config.default_window_size,
        }
    }

    /// Open a window, or bring an existing one with the same id to the front.
    ///
    /// A repeat open never changes title, component key, props or size.
    pub fn open_window(
        &mut self,
        id: &str,
        title: &str,
        component_key: &str,
        props: Option<Value>,
        size: Option<Size>,
    ) -> &WindowState {
        let z_index = self.take_z_index();

        if let Some(index) = self.index_of(id) {
            let win = &mut self.windows[index];
            win.z_index = z_index;
            win.display = match win.display {
                DisplayState::Minimized => DisplayState::Normal,
                DisplayState::MinimizedWhileMaximized { restore } => {
                    DisplayState::Maximized { restore }
                }
                other => other,
            };
            debug!("[WM] Re-opened {} (z={})", id, z_index);
            return &self.windows[index];
        }

        let position = self.next_cascade_position();
        let window = WindowState {
            id: id.to_string(),
            title: title.to_string(),
            component_key: component_key.to_string(),
            props,
            position,
            size: size.unwrap_or(self.default_size),
            z_index,
            display: DisplayState::Normal,
        };
        info!(
            "[WM] Opened {} ({}) at ({}, {})",
            id, component_key, position.x, position.y
        );

        self.windows.push(window);
        &self.windows[self.windows.len() - 1]
    }

    /// Remove a window entirely. Returns the removed entry.
    pub fn close_window(&mut self, id: &str) -> Option<WindowState> {
        let index = self.index_of(id)?;
        let removed = self.windows.remove(index);
        info!("[WM] Closed {}", id);
        Some(removed)
    }

    /// Raise a window without touching its display state
    pub fn focus_window(&mut self, id: &str) -> Option<&WindowState> {
        let index = self.index_of(id)?;
        let z_index = self.take_z_index();
        let win = &mut self.windows[index];
        win.z_index = z_index;
        Some(&*win)
    }

    pub fn minimize_window(&mut self, id: &str) -> Option<&WindowState> {
        let index = self.index_of(id)?;
        let win = &mut self.windows[index];
        win.display = match win.display {
            DisplayState::Normal => DisplayState::Minimized,
            DisplayState::Maximized { restore } => {
                DisplayState::MinimizedWhileMaximized { restore }
            }
            already => already,
        };
        Some(&*win)
    }

    /// Un-minimize and raise. Restoring always focuses.
    pub fn restore_window(&mut self, id: &str) -> Option<&WindowState> {
        let index = self.index_of(id)?;
        let z_index = self.take_z_index();
        let win = &mut self.windows[index];
        win.display = match win.display {
            DisplayState::Minimized => DisplayState::Normal,
            DisplayState::MinimizedWhileMaximized { restore } => {
                DisplayState::Maximized { restore }
            }
            other => other,
        };
        win.z_index = z_index;
        Some(&*win)
    }

    /// Toggle maximize. Un-maximizing returns exactly to the saved rectangle.
    pub fn maximize_window(&mut self, id: &str) -> Option<&WindowState> {
        let index = self.index_of(id)?;
        let z_index = self.take_z_index();
        let win = &mut self.windows[index];
        let current = win.rect();
        let display = win.display;

        win.display = match display {
            DisplayState::Normal => DisplayState::Maximized { restore: current },
            DisplayState::Minimized => DisplayState::MinimizedWhileMaximized { restore: current },
            DisplayState::Maximized { restore } => {
                win.position = restore.position;
                win.size = restore.size;
                DisplayState::Normal
            }
            DisplayState::MinimizedWhileMaximized { restore } => {
                win.position = restore.position;
                win.size = restore.size;
                DisplayState::Minimized
            }
        };
        win.z_index = z_index;
        debug!("[WM] {} maximized={}", id, win.is_maximized());
        Some(&*win)
    }

    /// Overwrite a window's position. The caller clamps; ignored while maximized.
    pub fn move_window(&mut self, id: &str, position: Position) -> Option<&WindowState> {
        let index = self.index_of(id)?;
        let win = &mut self.windows[index];
        if win.is_maximized() {
            debug!("[WM] Ignoring move of maximized window {}", id);
            return Some(&*win);
        }
        win.position = position;
        Some(&*win)
    }

    /// Overwrite a window's size. The caller clamps; ignored while maximized.
    pub fn resize_window(&mut self, id: &str, size: Size) -> Option<&WindowState> {
        let index = self.index_of(id)?;
        let win = &mut self.windows[index];
        if win.is_maximized() {
            debug!("[WM] Ignoring resize of maximized window {}", id);
            return Some(&*win);
        }
        win.size = size;
        Some(&*win)
    }

    pub fn get(&self, id: &str) -> Option<&WindowState> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// All windows in the order they were opened
    pub fn windows(&self) -> &[WindowState] {
        &self.windows
    }

    /// Non-minimized windows, bottom of the stack first
    pub fn visible_windows(&self) -> Vec<&WindowState> {
        let mut visible: Vec<_> = self.windows.iter().filter(|w| !w.is_minimized()).collect();
        visible.sort_by_key(|w| w.z_index);
        visible
    }

    /// The topmost non-minimized window
    pub fn active_window(&self) -> Option<&WindowState> {
        self.windows
            .iter()
            .filter(|w| !w.is_minimized())
            .max_by_key(|w| w.z_index)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn next_z_index(&self) -> u32 {
        self.next_z_index
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.windows.iter().position(|w| w.id == id)
    }

    fn take_z_index(&mut self) -> u32 {
        let z_index = self.next_z_index;
        self.next_z_index += 1;
        z_index
    }

    fn next_cascade_position(&mut self) -> Position {
        self.cascade_offset = (self.cascade_offset + 1) % self.cascade.cycle.max(1);
        let step = self.cascade_offset as i32 * self.cascade.step;
        self.cascade.origin.offset(step, step)
    }
}
