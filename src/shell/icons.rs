// Desktop icons: a column grid of launchers that can be dragged around.
// A press becomes either a click (select, double click opens) or a drag (move);
// the shared gesture recognizer makes sure it is never both.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::Launcher;
use crate::config::DesktopConfig;
use crate::input_handler::{ClickTracker, GestureEnd, PressGesture};
use crate::state::geometry::{Position, Rect, Size};

pub struct DesktopIcon {
    pub label: &'static str,
    pub launcher: Launcher,
}

pub static DESKTOP_ICONS: [DesktopIcon; 7] = [
    DesktopIcon {
        label: "MS Paint Art",
        launcher: Launcher::gallery("mspaint", "MS Paint Art"),
    },
    DesktopIcon {
        label: "iPad Art",
        launcher: Launcher::gallery("ipad", "iPad Art"),
    },
    DesktopIcon {
        label: "Paintings",
        launcher: Launcher::gallery("paintings", "Paintings"),
    },
    DesktopIcon {
        label: "GIFs",
        launcher: Launcher::gallery("gif", "GIFs"),
    },
    DesktopIcon {
        label: "Self Portraits",
        launcher: Launcher::gallery("selfPortraits", "Self Portraits"),
    },
    DesktopIcon {
        label: "About.txt",
        launcher: Launcher::about(),
    },
    DesktopIcon {
        label: "Paint",
        launcher: Launcher::paint(),
    },
];

pub const ICON_SIZE: Size = Size::new(88, 64);
pub const ICON_GRID_ORIGIN: Position = Position::new(16, 32);
/// Space between grid cells, both axes
pub const ICON_GAP: u32 = 16;

/// Outcome of releasing a press that started on an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconRelease {
    /// No icon press was in progress
    None,
    Selected,
    Open(&'static DesktopIcon),
    /// The icon was dragged to a new spot
    Moved,
}

impl std::fmt::Debug for DesktopIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopIcon").field("id", &self.launcher.id).finish()
    }
}

impl PartialEq for DesktopIcon {
    fn eq(&self, other: &Self) -> bool {
        self.launcher.id == other.launcher.id
    }
}

impl Eq for DesktopIcon {}

#[derive(Debug, Clone)]
struct IconPress {
    id: &'static str,
    gesture: PressGesture,
    start: Position,
}

#[derive(Debug, Clone)]
pub struct IconLayer {
    /// Positions that differ from the grid: saved or dragged
    moved: HashMap<String, Position>,
    selected: Option<&'static str>,
    press: Option<IconPress>,
    clicks: ClickTracker,
    drag_threshold: i32,
}

impl IconLayer {
    pub fn new(config: &DesktopConfig) -> Self {
        Self {
            moved: HashMap::new(),
            selected: None,
            press: None,
            clicks: ClickTracker::new(Duration::from_millis(config.double_click_ms)),
            drag_threshold: config.drag_threshold,
        }
    }

    /// Adopt saved positions for icons that still exist
    pub fn apply_saved(&mut self, saved: HashMap<String, Position>) {
        for (id, position) in saved {
            if DESKTOP_ICONS.iter().any(|icon| icon.launcher.id == id) {
                self.moved.insert(id, position.clamp_non_negative());
            }
        }
    }

    pub fn custom_positions(&self) -> &HashMap<String, Position> {
        &self.moved
    }

    pub fn selected(&self) -> Option<&'static str> {
        self.selected
    }

    /// Grid slot for icon `index`, filling columns top to bottom
    fn grid_position(index: usize, area: Rect) -> Position {
        let pitch_y = (ICON_SIZE.height + ICON_GAP) as i32;
        let pitch_x = (ICON_SIZE.width + ICON_GAP) as i32;
        let usable = area.size.height as i32 - ICON_GRID_ORIGIN.y;
        let per_column = (usable / pitch_y).max(1) as usize;

        Position::new(
            area.x() + ICON_GRID_ORIGIN.x + (index / per_column) as i32 * pitch_x,
            area.y() + ICON_GRID_ORIGIN.y + (index % per_column) as i32 * pitch_y,
        )
    }

    pub fn icon_rect(&self, index: usize, area: Rect) -> Option<Rect> {
        let icon = DESKTOP_ICONS.get(index)?;
        let position = self
            .moved
            .get(icon.launcher.id)
            .copied()
            .unwrap_or_else(|| Self::grid_position(index, area));
        Some(Rect {
            position,
            size: ICON_SIZE,
        })
    }

    /// Icon under `point`; later icons are drawn on top
    pub fn icon_at(&self, point: Position, area: Rect) -> Option<usize> {
        (0..DESKTOP_ICONS.len())
            .rev()
            .find(|&i| self.icon_rect(i, area).is_some_and(|r| r.contains(point)))
    }

    /// Press on the desktop background. Returns true when an icon was hit.
    pub fn pointer_down(&mut self, point: Position, area: Rect) -> bool {
        let hit = self
            .icon_at(point, area)
            .and_then(|i| Some((DESKTOP_ICONS[i].launcher.id, self.icon_rect(i, area)?)));
        let Some((id, rect)) = hit else {
            self.selected = None;
            self.press = None;
            return false;
        };

        self.selected = Some(id);
        self.press = Some(IconPress {
            id,
            gesture: PressGesture::new(point, self.drag_threshold),
            start: rect.position,
        });
        true
    }

    /// Returns true when an icon moved
    pub fn pointer_move(&mut self, point: Position) -> bool {
        let Some(press) = self.press.as_mut() else {
            return false;
        };
        let Some((dx, dy)) = press.gesture.track(point) else {
            return false;
        };
        let position = press.start.offset(dx, dy).clamp_non_negative();
        self.moved.insert(press.id.to_string(), position);
        true
    }

    pub fn pointer_up(&mut self, point: Position, now: Instant) -> IconRelease {
        let Some(press) = self.press.take() else {
            return IconRelease::None;
        };

        match press.gesture.release(point) {
            GestureEnd::DragEnd { from, to } => {
                let (dx, dy) = to.delta_from(from);
                let position = press.start.offset(dx, dy).clamp_non_negative();
                self.moved.insert(press.id.to_string(), position);
                IconRelease::Moved
            }
            GestureEnd::Click(_) => {
                if !self.clicks.click(press.id, now) {
                    return IconRelease::Selected;
                }
                DESKTOP_ICONS
                    .iter()
                    .find(|icon| icon.launcher.id == press.id)
                    .map_or(IconRelease::Selected, IconRelease::Open)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect::new(0, 0, 1280, 752);

    fn layer() -> IconLayer {
        IconLayer::new(&DesktopConfig::default())
    }

    fn center(layer: &IconLayer, index: usize) -> Position {
        let rect = layer.icon_rect(index, AREA).unwrap();
        rect.position.offset(10, 10)
    }

    #[test]
    fn test_grid_wraps_into_columns() {
        let layer = layer();
        let short = Rect::new(0, 0, 1280, 300);

        let first = layer.icon_rect(0, short).unwrap();
        let second = layer.icon_rect(1, short).unwrap();
        assert_eq!(first.position, ICON_GRID_ORIGIN);
        assert_eq!(second.x(), first.x());
        // Only three icons fit in 300px; the fourth starts a new column
        let fourth = layer.icon_rect(3, short).unwrap();
        assert_eq!(fourth.y(), first.y());
        assert!(fourth.x() > first.x());
    }

    #[test]
    fn test_double_click_opens() {
        let mut layer = layer();
        let start = Instant::now();
        let p = center(&layer, 5);

        assert!(layer.pointer_down(p, AREA));
        assert_eq!(layer.pointer_up(p, start), IconRelease::Selected);
        assert_eq!(layer.selected(), Some("about"));

        layer.pointer_down(p, AREA);
        match layer.pointer_up(p, start + Duration::from_millis(200)) {
            IconRelease::Open(icon) => assert_eq!(icon.launcher.id, "about"),
            other => panic!("expected open, got {:?}", other),
        }
    }

    #[test]
    fn test_drag_moves_and_never_opens() {
        let mut layer = layer();
        let start = Instant::now();
        let p = center(&layer, 0);
        let before = layer.icon_rect(0, AREA).unwrap().position;

        // A click first, so a following click would complete a double click
        layer.pointer_down(p, AREA);
        layer.pointer_up(p, start);

        layer.pointer_down(p, AREA);
        assert!(layer.pointer_move(p.offset(40, 20)));
        assert_eq!(
            layer.pointer_up(p.offset(40, 20), start + Duration::from_millis(100)),
            IconRelease::Moved
        );
        assert_eq!(
            layer.icon_rect(0, AREA).unwrap().position,
            before.offset(40, 20)
        );
        assert_eq!(layer.custom_positions().len(), 1);
    }

    #[test]
    fn test_jitter_below_threshold_is_click() {
        let mut layer = layer();
        let p = center(&layer, 2);
        layer.pointer_down(p, AREA);
        assert!(!layer.pointer_move(p.offset(3, -2)));
        assert_eq!(layer.pointer_up(p.offset(3, -2), Instant::now()), IconRelease::Selected);
        assert!(layer.custom_positions().is_empty());
    }

    #[test]
    fn test_drag_clamps_to_desktop() {
        let mut layer = layer();
        let p = center(&layer, 0);
        layer.pointer_down(p, AREA);
        layer.pointer_move(Position::new(-300, -300));
        layer.pointer_up(Position::new(-300, -300), Instant::now());
        assert_eq!(layer.icon_rect(0, AREA).unwrap().position, Position::new(0, 0));
    }

    #[test]
    fn test_saved_positions_override_grid() {
        let mut layer = layer();
        let mut saved = HashMap::new();
        saved.insert("paintApp".to_string(), Position::new(500, 400));
        saved.insert("recycleBin".to_string(), Position::new(1, 1));
        layer.apply_saved(saved);

        assert_eq!(layer.icon_rect(6, AREA).unwrap().position, Position::new(500, 400));
        assert_eq!(layer.custom_positions().len(), 1);
    }

    #[test]
    fn test_background_press_clears_selection() {
        let mut layer = layer();
        let p = center(&layer, 1);
        layer.pointer_down(p, AREA);
        layer.pointer_up(p, Instant::now());
        assert!(!layer.pointer_down(Position::new(1000, 700), AREA));
        assert_eq!(layer.selected(), None);
        assert_eq!(layer.pointer_up(Position::new(1000, 700), Instant::now()), IconRelease::None);
    }
}
