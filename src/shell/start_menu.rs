// Start menu: a fixed list of launchers that pops up above the start button.

use super::Launcher;
use crate::state::geometry::{Position, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartEntry {
    Launch {
        label: &'static str,
        launcher: Launcher,
    },
    Separator,
    /// Shown greyed out, does nothing
    Disabled(&'static str),
}

impl StartEntry {
    pub fn label(&self) -> &'static str {
        match self {
            StartEntry::Launch { label, .. } | StartEntry::Disabled(label) => label,
            StartEntry::Separator => "",
        }
    }

    fn height(&self) -> u32 {
        match self {
            StartEntry::Separator => SEPARATOR_HEIGHT,
            StartEntry::Launch { .. } | StartEntry::Disabled(_) => ITEM_HEIGHT,
        }
    }
}

pub static START_ENTRIES: [StartEntry; 11] = [
    StartEntry::Launch {
        label: "MS Paint Art",
        launcher: Launcher::gallery("mspaint", "MS Paint Art"),
    },
    StartEntry::Launch {
        label: "iPad Art",
        launcher: Launcher::gallery("ipad", "iPad Art"),
    },
    StartEntry::Launch {
        label: "Paintings",
        launcher: Launcher::gallery("paintings", "Paintings"),
    },
    StartEntry::Launch {
        label: "GIFs",
        launcher: Launcher::gallery("gif", "GIFs"),
    },
    StartEntry::Launch {
        label: "Self Portraits",
        launcher: Launcher::gallery("selfPortraits", "Self Portraits"),
    },
    StartEntry::Separator,
    StartEntry::Launch {
        label: "Paint",
        launcher: Launcher::paint(),
    },
    StartEntry::Launch {
        label: "About Me",
        launcher: Launcher::about(),
    },
    StartEntry::Launch {
        label: "Guestbook",
        launcher: Launcher::guestbook(),
    },
    StartEntry::Separator,
    StartEntry::Disabled("Shut Down..."),
];

pub const MENU_WIDTH: u32 = 256;
pub const ITEM_HEIGHT: u32 = 32;
pub const SEPARATOR_HEIGHT: u32 = 16;

#[derive(Debug, Clone, Default)]
pub struct StartMenu {
    open: bool,
}

impl StartMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Menu rectangle with its bottom edge on `taskbar_top`
    pub fn rect(&self, taskbar_top: i32) -> Rect {
        let height: u32 = START_ENTRIES.iter().map(StartEntry::height).sum();
        Rect::new(0, taskbar_top - height as i32, MENU_WIDTH, height)
    }

    pub fn entry_rects(&self, taskbar_top: i32) -> Vec<(&'static StartEntry, Rect)> {
        let menu = self.rect(taskbar_top);
        let mut y = menu.y();
        START_ENTRIES
            .iter()
            .map(|entry| {
                let rect = Rect::new(menu.x(), y, MENU_WIDTH, entry.height());
                y += entry.height() as i32;
                (entry, rect)
            })
            .collect()
    }

    /// Entry under `point` while the menu is open
    pub fn entry_at(&self, point: Position, taskbar_top: i32) -> Option<&'static StartEntry> {
        if !self.open {
            return None;
        }
        self.entry_rects(taskbar_top)
            .into_iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(entry, _)| entry)
    }

    pub fn contains(&self, point: Position, taskbar_top: i32) -> bool {
        self.open && self.rect(taskbar_top).contains(point)
    }
}
