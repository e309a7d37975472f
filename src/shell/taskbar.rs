// Taskbar along the bottom edge: start button, one button per open window,
// and a clock at the right.

use tracing::debug;

use crate::state::geometry::{Position, Rect, Size};
use crate::state::WindowManager;

pub const START_BUTTON_WIDTH: u32 = 80;
pub const TASK_BUTTON_WIDTH: u32 = 160;
pub const TASK_BUTTON_GAP: u32 = 8;
pub const CLOCK_WIDTH: u32 = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskButton {
    pub window_id: String,
    pub title: String,
    /// Pressed-in look: the window is not minimized
    pub active: bool,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskbarHit {
    Start,
    Window(String),
    Clock,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Taskbar {
    bar: Rect,
}

impl Taskbar {
    pub fn new(viewport: Size, height: u32) -> Self {
        let height = height.min(viewport.height);
        Self {
            bar: Rect::new(
                0,
                (viewport.height - height) as i32,
                viewport.width,
                height,
            ),
        }
    }

    pub fn bar(&self) -> Rect {
        self.bar
    }

    pub fn top(&self) -> i32 {
        self.bar.y()
    }

    pub fn start_button(&self) -> Rect {
        Rect::new(
            self.bar.x(),
            self.bar.y(),
            START_BUTTON_WIDTH.min(self.bar.size.width),
            self.bar.size.height,
        )
    }

    pub fn clock(&self) -> Rect {
        let width = CLOCK_WIDTH.min(self.bar.size.width);
        Rect::new(
            self.bar.right() - width as i32,
            self.bar.y(),
            width,
            self.bar.size.height,
        )
    }

    /// Buttons in open order; ones that would run into the clock are dropped
    pub fn buttons(&self, wm: &WindowManager) -> Vec<TaskButton> {
        let limit = self.clock().x();
        let mut x = self.start_button().right() + TASK_BUTTON_GAP as i32;
        let mut out = Vec::new();

        for window in wm.windows() {
            if x + TASK_BUTTON_WIDTH as i32 > limit {
                break;
            }
            out.push(TaskButton {
                window_id: window.id.clone(),
                title: window.title.clone(),
                active: !window.is_minimized(),
                rect: Rect::new(x, self.bar.y(), TASK_BUTTON_WIDTH, self.bar.size.height),
            });
            x += (TASK_BUTTON_WIDTH + TASK_BUTTON_GAP) as i32;
        }
        out
    }

    pub fn hit(&self, wm: &WindowManager, point: Position) -> Option<TaskbarHit> {
        if !self.bar.contains(point) {
            return None;
        }
        if self.start_button().contains(point) {
            return Some(TaskbarHit::Start);
        }
        if self.clock().contains(point) {
            return Some(TaskbarHit::Clock);
        }
        let hit = self
            .buttons(wm)
            .into_iter()
            .find(|b| b.rect.contains(point))
            .map_or(TaskbarHit::Empty, |b| TaskbarHit::Window(b.window_id));
        Some(hit)
    }
}

/// Taskbar button click: bring a minimized window back, otherwise minimize it
pub fn toggle_window(wm: &mut WindowManager, id: &str) {
    let Some(window) = wm.get(id) else {
        return;
    };
    if window.is_minimized() {
        debug!("[Taskbar] Restoring {}", id);
        wm.restore_window(id);
    } else {
        debug!("[Taskbar] Minimizing {}", id);
        wm.minimize_window(id);
    }
}
