// Window chrome: frame geometry, hit-testing, and the pointer session that turns
// title-bar drags, grip drags, and control-button clicks into window manager commands.

use tracing::debug;

use crate::config::DesktopConfig;
use crate::state::geometry::{Position, Rect, Size};
use crate::state::window::WindowState;
use crate::state::WindowManager;

/// Region of a window frame under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromePart {
    TitleBar,
    Minimize,
    Maximize,
    Close,
    ResizeGrip,
    Body,
}

/// Control buttons, left to right
pub const CONTROL_BUTTONS: [ChromePart; 3] =
    [ChromePart::Minimize, ChromePart::Maximize, ChromePart::Close];

impl ChromePart {
    /// Label drawn on a control button; maximize reflects the window's state
    pub fn label(&self, maximized: bool) -> &'static str {
        match self {
            ChromePart::Minimize => "_",
            ChromePart::Maximize if maximized => "❐",
            ChromePart::Maximize => "□",
            ChromePart::Close => "x",
            ChromePart::TitleBar | ChromePart::ResizeGrip | ChromePart::Body => "",
        }
    }
}

/// Frame metrics, derived from config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeLayout {
    title_bar_height: u32,
    button_width: u32,
    grip_size: u32,
    margin: Size,
    taskbar_height: u32,
}

impl ChromeLayout {
    pub fn new(config: &DesktopConfig) -> Self {
        Self {
            title_bar_height: config.chrome.title_bar_height,
            button_width: config.chrome.button_width,
            grip_size: config.chrome.grip_size,
            margin: config.chrome.viewport_margin,
            taskbar_height: config.taskbar_height,
        }
    }

    /// Viewport minus the taskbar reservation
    pub fn desktop_area(&self, viewport: Size) -> Rect {
        Rect::new(
            0,
            0,
            viewport.width,
            viewport.height.saturating_sub(self.taskbar_height),
        )
    }

    /// Screen rectangle of a window, or None when it is not drawn
    pub fn frame_rect(&self, window: &WindowState, viewport: Size) -> Option<Rect> {
        if window.is_minimized() {
            return None;
        }
        if window.is_maximized() {
            return Some(self.desktop_area(viewport));
        }

        let max_width = viewport.width.saturating_sub(self.margin.width);
        let max_height = viewport.height.saturating_sub(self.margin.height);
        Some(Rect {
            position: window.position,
            size: Size::new(
                window.size.width.min(max_width),
                window.size.height.min(max_height),
            ),
        })
    }

    pub fn title_bar(&self, frame: Rect) -> Rect {
        Rect {
            position: frame.position,
            size: Size::new(
                frame.size.width,
                self.title_bar_height.min(frame.size.height),
            ),
        }
    }

    pub fn body_rect(&self, frame: Rect) -> Rect {
        frame.without_top(self.title_bar_height)
    }

    /// Control buttons sit right-aligned in the title bar
    pub fn button_rect(&self, frame: Rect, part: ChromePart) -> Option<Rect> {
        let slot = CONTROL_BUTTONS.iter().position(|p| *p == part)?;
        let from_right = (CONTROL_BUTTONS.len() - slot) as i32;
        Some(Rect::new(
            frame.right() - from_right * self.button_width as i32,
            frame.y(),
            self.button_width,
            self.title_bar_height.min(frame.size.height),
        ))
    }

    pub fn grip_rect(&self, frame: Rect) -> Rect {
        Rect::new(
            frame.right() - self.grip_size as i32,
            frame.bottom() - self.grip_size as i32,
            self.grip_size,
            self.grip_size,
        )
    }

    pub fn hit_test(&self, window: &WindowState, frame: Rect, point: Position) -> Option<ChromePart> {
        if !frame.contains(point) {
            return None;
        }
        for part in CONTROL_BUTTONS {
            if self
                .button_rect(frame, part)
                .is_some_and(|rect| rect.contains(point))
            {
                return Some(part);
            }
        }
        if self.title_bar(frame).contains(point) {
            return Some(ChromePart::TitleBar);
        }
        if !window.is_maximized() && self.grip_rect(frame).contains(point) {
            return Some(ChromePart::ResizeGrip);
        }
        Some(ChromePart::Body)
    }
}

/// What pointer-down landed on
#[derive(Debug, Clone, PartialEq)]
pub struct ChromeHit {
    pub window_id: String,
    pub part: ChromePart,
    pub frame: Rect,
}

/// A control button click that reached the window manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeCommand {
    pub window_id: String,
    pub part: ChromePart,
}

/// Outcome of pointer-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChromeRelease {
    /// No chrome session was active
    Idle,
    /// A drag, resize, or cancelled button press ended
    Ended,
    /// A control button was clicked
    Command(ChromeCommand),
}

#[derive(Debug, Clone, PartialEq)]
enum Session {
    Move { window_id: String, grab: (i32, i32) },
    Resize { window_id: String, origin: Position, start: Size },
    Button { window_id: String, part: ChromePart },
}

/// Transient pointer tracking for window frames. At most one session is live,
/// and every pointer-up ends it wherever the pointer is.
#[derive(Debug, Clone)]
pub struct ChromeController {
    layout: ChromeLayout,
    min_size: Size,
    session: Option<Session>,
}

impl ChromeController {
    pub fn new(config: &DesktopConfig) -> Self {
        Self {
            layout: ChromeLayout::new(config),
            min_size: config.min_window_size,
            session: None,
        }
    }

    pub fn layout(&self) -> &ChromeLayout {
        &self.layout
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Topmost drawn window containing `point`
    pub fn window_at(&self, wm: &WindowManager, viewport: Size, point: Position) -> Option<(String, Rect)> {
        wm.visible_windows().into_iter().rev().find_map(|w| {
            self.layout
                .frame_rect(w, viewport)
                .filter(|frame| frame.contains(point))
                .map(|frame| (w.id.clone(), frame))
        })
    }

    /// Pointer pressed somewhere on the desktop. Any press on a window raises it.
    pub fn pointer_down(
        &mut self,
        wm: &mut WindowManager,
        viewport: Size,
        point: Position,
    ) -> Option<ChromeHit> {
        self.session = None;
        let (window_id, frame) = self.window_at(wm, viewport, point)?;
        let window = wm.focus_window(&window_id)?;
        let part = self.layout.hit_test(window, frame, point)?;
        let maximized = window.is_maximized();

        self.session = match part {
            ChromePart::TitleBar if !maximized => Some(Session::Move {
                window_id: window_id.clone(),
                grab: point.delta_from(window.position),
            }),
            ChromePart::ResizeGrip => Some(Session::Resize {
                window_id: window_id.clone(),
                origin: point,
                start: window.size,
            }),
            ChromePart::Minimize | ChromePart::Maximize | ChromePart::Close => {
                Some(Session::Button {
                    window_id: window_id.clone(),
                    part,
                })
            }
            ChromePart::TitleBar | ChromePart::Body => None,
        };

        Some(ChromeHit {
            window_id,
            part,
            frame,
        })
    }

    /// Returns true when the move belonged to a chrome session
    pub fn pointer_move(&mut self, wm: &mut WindowManager, point: Position) -> bool {
        match &self.session {
            Some(Session::Move { window_id, grab }) => {
                let target = Position::new(point.x - grab.0, point.y - grab.1);
                wm.move_window(window_id, target.clamp_non_negative());
                true
            }
            Some(Session::Resize {
                window_id,
                origin,
                start,
            }) => {
                let (dx, dy) = point.delta_from(*origin);
                let width = (start.width as i32 + dx).max(self.min_size.width as i32);
                let height = (start.height as i32 + dy).max(self.min_size.height as i32);
                wm.resize_window(window_id, Size::new(width as u32, height as u32));
                true
            }
            Some(Session::Button { .. }) => true,
            None => false,
        }
    }

    pub fn pointer_up(&mut self, wm: &mut WindowManager, viewport: Size, point: Position) -> ChromeRelease {
        let Some(session) = self.session.take() else {
            return ChromeRelease::Idle;
        };

        let Session::Button { window_id, part } = session else {
            return ChromeRelease::Ended;
        };

        let still_over_button = wm
            .get(&window_id)
            .and_then(|w| self.layout.frame_rect(w, viewport))
            .and_then(|frame| self.layout.button_rect(frame, part))
            .is_some_and(|rect| rect.contains(point));
        if !still_over_button {
            debug!("[Chrome] Button press on {} released elsewhere", window_id);
            return ChromeRelease::Ended;
        }

        match part {
            ChromePart::Minimize => {
                wm.minimize_window(&window_id);
            }
            ChromePart::Maximize => {
                wm.maximize_window(&window_id);
            }
            ChromePart::Close => {
                wm.close_window(&window_id);
            }
            ChromePart::TitleBar | ChromePart::ResizeGrip | ChromePart::Body => {}
        }
        ChromeRelease::Command(ChromeCommand { window_id, part })
    }
}
