// Desktop shell: owns one window manager session and everything drawn around it.
// Pointer and key input come in, window manager commands go out, and anything
// the host has to do on our behalf (disk writes) comes back as ShellEffects.

pub mod icons;
pub mod registry;
pub mod start_menu;
pub mod taskbar;
pub mod tui;

use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::DesktopConfig;
use crate::input_handler::{ChromeController, ChromeLayout, ChromePart, KeyInput, PointerButton};
use crate::paint::{PaintCanvas, Tool, PALETTE};
use crate::state::geometry::{Position, Rect, Size};
use crate::state::WindowManager;
use icons::{IconLayer, IconRelease};
use registry::{Content, ContentRegistry};
use start_menu::{StartEntry, StartMenu};
use taskbar::{Taskbar, TaskbarHit};

/// Something that opens a window: desktop icons and start menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Launcher {
    pub id: &'static str,
    pub title: &'static str,
    pub component_key: &'static str,
    pub size: Option<Size>,
}

impl Launcher {
    /// Gallery window whose gallery type is its own id
    pub const fn gallery(id: &'static str, title: &'static str) -> Self {
        Self {
            id,
            title,
            component_key: "gallery",
            size: None,
        }
    }

    pub const fn about() -> Self {
        Self {
            id: "about",
            title: "About Me",
            component_key: "about",
            size: Some(Size::new(480, 520)),
        }
    }

    pub const fn guestbook() -> Self {
        Self {
            id: "guestbook",
            title: "Guestbook",
            component_key: "guestbook",
            size: Some(Size::new(480, 520)),
        }
    }

    pub const fn paint() -> Self {
        Self {
            id: "paintApp",
            title: "untitled - Paint",
            component_key: "mspaintApp",
            size: Some(Size::new(720, 560)),
        }
    }

    pub fn props(&self) -> Option<Value> {
        (self.component_key == "gallery").then(|| json!({ "galleryType": self.id }))
    }
}

/// Work the host performs after an input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEffect {
    /// Icon layout changed; every non-grid position is included
    PersistIconPositions(HashMap<String, Position>),
    /// PNG bytes of the painting to save
    ExportPainting(Vec<u8>),
}

/// Paint window body: tool row, palette row, then the canvas
pub const PAINT_ROW_HEIGHT: u32 = 16;
pub const PAINT_TOOL_WIDTH: u32 = 24;
pub const PAINT_SWATCH_WIDTH: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintLayout {
    pub tools: Rect,
    pub palette: Rect,
    pub canvas: Rect,
}

impl PaintLayout {
    pub fn new(chrome: &ChromeLayout, frame: Rect) -> Self {
        let body = chrome.body_rect(frame);
        let row = |index: u32| {
            let top = body.without_top(PAINT_ROW_HEIGHT * index);
            Rect {
                position: top.position,
                size: Size::new(top.size.width, PAINT_ROW_HEIGHT.min(top.size.height)),
            }
        };
        Self {
            tools: row(0),
            palette: row(1),
            canvas: body.without_top(PAINT_ROW_HEIGHT * 2),
        }
    }

    pub fn tool_at(&self, point: Position) -> Option<Tool> {
        if !self.tools.contains(point) {
            return None;
        }
        let index = (point.x - self.tools.x()) as u32 / PAINT_TOOL_WIDTH;
        Tool::ALL.get(index as usize).copied()
    }

    pub fn swatch_at(&self, point: Position) -> Option<usize> {
        if !self.palette.contains(point) {
            return None;
        }
        let index = ((point.x - self.palette.x()) as u32 / PAINT_SWATCH_WIDTH) as usize;
        (index < PALETTE.len()).then_some(index)
    }
}

/// Who receives pointer moves until the next release
#[derive(Debug, Clone, PartialEq, Eq)]
enum Capture {
    Chrome,
    Icon,
    Paint { window_id: String },
}

pub struct Desktop {
    session_id: Uuid,
    config: DesktopConfig,
    viewport: Size,
    wm: WindowManager,
    chrome: ChromeController,
    icons: IconLayer,
    start_menu: StartMenu,
    registry: ContentRegistry,
    /// Mounted bodies; None records a body that failed to mount
    contents: HashMap<String, Option<Content>>,
    capture: Option<Capture>,
}

impl Desktop {
    pub fn new(config: DesktopConfig, viewport: Size) -> Self {
        let session_id = Uuid::new_v4();
        info!("[Shell] Desktop session {} ({}x{})", session_id, viewport.width, viewport.height);
        Self {
            session_id,
            wm: WindowManager::new(&config),
            chrome: ChromeController::new(&config),
            icons: IconLayer::new(&config),
            start_menu: StartMenu::default(),
            registry: ContentRegistry::default(),
            contents: HashMap::new(),
            capture: None,
            config,
            viewport,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn window_manager(&self) -> &WindowManager {
        &self.wm
    }

    pub fn chrome_layout(&self) -> &ChromeLayout {
        self.chrome.layout()
    }

    pub fn icons(&self) -> &IconLayer {
        &self.icons
    }

    pub fn start_menu(&self) -> &StartMenu {
        &self.start_menu
    }

    pub fn taskbar(&self) -> Taskbar {
        Taskbar::new(self.viewport, self.config.taskbar_height)
    }

    pub fn desktop_area(&self) -> Rect {
        self.chrome.layout().desktop_area(self.viewport)
    }

    /// Mounted body of a window, if it mounted
    pub fn content(&self, window_id: &str) -> Option<&Content> {
        self.contents.get(window_id).and_then(Option::as_ref)
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.sync_contents();
    }

    pub fn restore_icon_positions(&mut self, saved: HashMap<String, Position>) {
        self.icons.apply_saved(saved);
    }

    pub fn launch(&mut self, launcher: &Launcher) {
        info!("[Shell] Launching {}", launcher.id);
        self.wm.open_window(
            launcher.id,
            launcher.title,
            launcher.component_key,
            launcher.props(),
            launcher.size,
        );
        self.sync_contents();
    }

    pub fn pointer_down(&mut self, point: Position, button: PointerButton) -> Vec<ShellEffect> {
        self.capture = None;
        let taskbar = self.taskbar();

        if self.start_menu.is_open() {
            if let Some(entry) = self.start_menu.entry_at(point, taskbar.top()) {
                if let StartEntry::Launch { launcher, .. } = entry {
                    self.start_menu.close();
                    self.launch(launcher);
                }
                return Vec::new();
            }
            if !taskbar.start_button().contains(point) {
                self.start_menu.close();
            }
        }

        if let Some(hit) = taskbar.hit(&self.wm, point) {
            match hit {
                TaskbarHit::Start => self.start_menu.toggle(),
                TaskbarHit::Window(id) => taskbar::toggle_window(&mut self.wm, &id),
                TaskbarHit::Clock | TaskbarHit::Empty => {}
            }
            self.sync_contents();
            return Vec::new();
        }

        match button {
            PointerButton::Primary => {
                if let Some(hit) = self.chrome.pointer_down(&mut self.wm, self.viewport, point) {
                    if hit.part == ChromePart::Body {
                        self.body_pointer_down(&hit.window_id, hit.frame, point, button);
                    } else if self.chrome.is_active() {
                        self.capture = Some(Capture::Chrome);
                    }
                    return Vec::new();
                }
                let area = self.desktop_area();
                if self.icons.pointer_down(point, area) {
                    self.capture = Some(Capture::Icon);
                }
            }
            PointerButton::Secondary => {
                if let Some((window_id, frame)) = self.chrome.window_at(&self.wm, self.viewport, point) {
                    self.wm.focus_window(&window_id);
                    let on_body = self.chrome.layout().body_rect(frame).contains(point);
                    if on_body {
                        self.body_pointer_down(&window_id, frame, point, button);
                    }
                }
            }
        }
        Vec::new()
    }

    fn body_pointer_down(&mut self, window_id: &str, frame: Rect, point: Position, button: PointerButton) {
        let layout = PaintLayout::new(self.chrome.layout(), frame);
        let Some(canvas) = self
            .contents
            .get_mut(window_id)
            .and_then(Option::as_mut)
            .and_then(Content::paint_mut)
        else {
            return;
        };

        if let Some(tool) = layout.tool_at(point) {
            canvas.set_tool(tool);
        } else if let Some(index) = layout.swatch_at(point) {
            canvas.pick_palette(index, button);
        } else if layout.canvas.contains(point) {
            canvas.pointer_down(layout.canvas.to_local(point), button);
            self.capture = Some(Capture::Paint {
                window_id: window_id.to_string(),
            });
        }
    }

    /// Canvas rectangle of a window's paint body, in desktop pixels
    fn paint_canvas_rect(&self, window_id: &str) -> Option<Rect> {
        let window = self.wm.get(window_id)?;
        let frame = self.chrome.layout().frame_rect(window, self.viewport)?;
        Some(PaintLayout::new(self.chrome.layout(), frame).canvas)
    }

    fn paint_target(&mut self, window_id: &str, point: Position) -> Option<(&mut PaintCanvas, Position)> {
        let local = self.paint_canvas_rect(window_id)?.to_local(point);
        let canvas = self
            .contents
            .get_mut(window_id)?
            .as_mut()?
            .paint_mut()?;
        Some((canvas, local))
    }

    pub fn pointer_move(&mut self, point: Position) {
        match self.capture.clone() {
            Some(Capture::Chrome) => {
                if self.chrome.pointer_move(&mut self.wm, point) {
                    self.sync_contents();
                }
            }
            Some(Capture::Icon) => {
                self.icons.pointer_move(point);
            }
            Some(Capture::Paint { window_id }) => {
                if let Some((canvas, local)) = self.paint_target(&window_id, point) {
                    canvas.pointer_move(local);
                }
            }
            None => {}
        }
    }

    pub fn pointer_up(&mut self, point: Position, now: Instant) -> Vec<ShellEffect> {
        let mut effects = Vec::new();
        match self.capture.take() {
            Some(Capture::Chrome) => {
                self.chrome.pointer_up(&mut self.wm, self.viewport, point);
            }
            Some(Capture::Icon) => match self.icons.pointer_up(point, now) {
                IconRelease::Open(icon) => self.launch(&icon.launcher),
                IconRelease::Moved => effects.push(ShellEffect::PersistIconPositions(
                    self.icons.custom_positions().clone(),
                )),
                IconRelease::Selected | IconRelease::None => {}
            },
            Some(Capture::Paint { window_id }) => {
                if let Some((canvas, local)) = self.paint_target(&window_id, point) {
                    canvas.pointer_up(local);
                }
            }
            None => {}
        }
        self.sync_contents();
        effects
    }

    pub fn key(&mut self, key: KeyInput) -> Vec<ShellEffect> {
        if self.start_menu.is_open() && key == KeyInput::Escape {
            self.start_menu.close();
            return Vec::new();
        }

        let Some(active) = self.wm.active_window().map(|w| w.id.clone()) else {
            return Vec::new();
        };
        let Some(canvas) = self
            .contents
            .get_mut(&active)
            .and_then(Option::as_mut)
            .and_then(Content::paint_mut)
        else {
            return Vec::new();
        };

        if canvas.handle_key(key) || key != KeyInput::Save {
            return Vec::new();
        }
        match canvas.export_png() {
            Ok(Some(bytes)) => vec![ShellEffect::ExportPainting(bytes)],
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("[Shell] Export failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Mount bodies for new windows, drop bodies of closed ones, and fit paint
    /// canvases to their windows
    pub fn sync_contents(&mut self) {
        let open: HashSet<&str> = self.wm.windows().iter().map(|w| w.id.as_str()).collect();
        self.contents.retain(|id, _| open.contains(id.as_str()));

        for window in self.wm.windows() {
            let content = self.contents.entry(window.id.clone()).or_insert_with(|| {
                self.registry
                    .mount(&window.component_key, window.props.as_ref(), &self.config)
            });

            let Some(canvas) = content.as_mut().and_then(Content::paint_mut) else {
                continue;
            };
            if let Some(frame) = self.chrome.layout().frame_rect(window, self.viewport) {
                let rect = PaintLayout::new(self.chrome.layout(), frame).canvas;
                canvas.resize(rect.size.width, rect.size.height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use icons::DESKTOP_ICONS;
    use std::time::Duration;

    const VIEWPORT: Size = Size::new(1280, 800);

    fn desktop() -> Desktop {
        Desktop::new(DesktopConfig::default(), VIEWPORT)
    }

    fn click(desktop: &mut Desktop, point: Position, now: Instant) -> Vec<ShellEffect> {
        let mut effects = desktop.pointer_down(point, PointerButton::Primary);
        effects.extend(desktop.pointer_up(point, now));
        effects
    }

    fn canvas_rect(desktop: &Desktop, id: &str) -> Rect {
        desktop.paint_canvas_rect(id).unwrap()
    }

    #[test]
    fn test_double_click_icon_opens_window() {
        let mut desktop = desktop();
        let icon = desktop.icons().icon_rect(5, desktop.desktop_area()).unwrap();
        let p = icon.position.offset(8, 8);
        let now = Instant::now();

        click(&mut desktop, p, now);
        assert!(desktop.window_manager().is_empty());
        click(&mut desktop, p, now + Duration::from_millis(100));

        let about = desktop.window_manager().get("about").unwrap();
        assert_eq!(about.size, Size::new(480, 520));
        assert!(matches!(desktop.content("about"), Some(Content::About)));
    }

    #[test]
    fn test_icon_drag_emits_persist() {
        let mut desktop = desktop();
        let icon = desktop.icons().icon_rect(0, desktop.desktop_area()).unwrap();
        let p = icon.position.offset(8, 8);

        desktop.pointer_down(p, PointerButton::Primary);
        desktop.pointer_move(p.offset(200, 0));
        let effects = desktop.pointer_up(p.offset(200, 0), Instant::now());

        let id = DESKTOP_ICONS[0].launcher.id.to_string();
        match effects.as_slice() {
            [ShellEffect::PersistIconPositions(positions)] => {
                assert_eq!(positions.get(&id), Some(&icon.position.offset(200, 0)));
            }
            other => panic!("unexpected effects {:?}", other),
        }
    }

    #[test]
    fn test_start_menu_launch_and_outside_close() {
        let mut desktop = desktop();
        let taskbar = desktop.taskbar();
        let start = taskbar.start_button().position.offset(4, 4);

        click(&mut desktop, start, Instant::now());
        assert!(desktop.start_menu().is_open());

        let (_, guestbook) = desktop
            .start_menu()
            .entry_rects(taskbar.top())
            .into_iter()
            .find(|(e, _)| e.label() == "Guestbook")
            .unwrap();
        click(&mut desktop, guestbook.position.offset(4, 4), Instant::now());
        assert!(!desktop.start_menu().is_open());
        assert!(desktop.window_manager().get("guestbook").is_some());

        click(&mut desktop, start, Instant::now());
        click(&mut desktop, Position::new(900, 100), Instant::now());
        assert!(!desktop.start_menu().is_open());
    }

    #[test]
    fn test_disabled_entry_keeps_menu_open() {
        let mut desktop = desktop();
        let taskbar = desktop.taskbar();
        click(&mut desktop, taskbar.start_button().position, Instant::now());

        let (_, shut_down) = *desktop.start_menu().entry_rects(taskbar.top()).last().unwrap();
        click(&mut desktop, shut_down.position.offset(4, 4), Instant::now());
        assert!(desktop.start_menu().is_open());
        assert!(desktop.window_manager().is_empty());
    }

    #[test]
    fn test_taskbar_button_toggles_window() {
        let mut desktop = desktop();
        desktop.launch(&Launcher::about());
        let button = desktop.taskbar().buttons(desktop.window_manager())[0].rect;

        click(&mut desktop, button.position.offset(4, 4), Instant::now());
        assert!(desktop.window_manager().get("about").unwrap().is_minimized());
        click(&mut desktop, button.position.offset(4, 4), Instant::now());
        assert!(!desktop.window_manager().get("about").unwrap().is_minimized());
    }

    #[test]
    fn test_close_button_drops_content() {
        let mut desktop = desktop();
        desktop.launch(&Launcher::paint());
        assert!(desktop.content("paintApp").is_some());

        let window = desktop.window_manager().get("paintApp").unwrap();
        let frame = desktop.chrome_layout().frame_rect(window, VIEWPORT).unwrap();
        let close = desktop
            .chrome_layout()
            .button_rect(frame, ChromePart::Close)
            .unwrap();
        click(&mut desktop, close.position.offset(2, 2), Instant::now());

        assert!(desktop.window_manager().is_empty());
        assert!(desktop.content("paintApp").is_none());
    }

    #[test]
    fn test_paint_canvas_fits_window_body() {
        let mut desktop = desktop();
        desktop.launch(&Launcher::paint());
        let rect = canvas_rect(&desktop, "paintApp");
        let canvas = desktop.content("paintApp").and_then(Content::paint).unwrap();

        assert_eq!(canvas.size(), Some(rect.size));
        assert_eq!(rect.size.width, 720);
        assert_eq!(rect.size.height, 560 - 16 - 2 * PAINT_ROW_HEIGHT);
    }

    #[test]
    fn test_drawing_through_the_desktop() {
        let mut desktop = desktop();
        desktop.launch(&Launcher::paint());
        let rect = canvas_rect(&desktop, "paintApp");
        let from = rect.position.offset(10, 10);
        let to = rect.position.offset(50, 10);

        desktop.pointer_down(from, PointerButton::Primary);
        desktop.pointer_move(to);
        desktop.pointer_up(to, Instant::now());

        let canvas = desktop.content("paintApp").and_then(Content::paint).unwrap();
        assert_eq!(canvas.visible_pixel(30, 10), Some(Color::BLACK));
        assert_eq!(canvas.undo_depth(), 1);
    }

    #[test]
    fn test_toolbar_and_palette_clicks() {
        let mut desktop = desktop();
        desktop.launch(&Launcher::paint());
        let window = desktop.window_manager().get("paintApp").unwrap();
        let frame = desktop.chrome_layout().frame_rect(window, VIEWPORT).unwrap();
        let layout = PaintLayout::new(desktop.chrome_layout(), frame);

        let fill_button = layout.tools.position.offset(2 * PAINT_TOOL_WIDTH as i32 + 1, 1);
        click(&mut desktop, fill_button, Instant::now());
        let swatch = layout.palette.position.offset(3 * PAINT_SWATCH_WIDTH as i32 + 1, 1);
        desktop.pointer_down(swatch, PointerButton::Secondary);
        desktop.pointer_up(swatch, Instant::now());

        let canvas = desktop.content("paintApp").and_then(Content::paint).unwrap();
        assert_eq!(canvas.tool(), Tool::Fill);
        assert_eq!(canvas.background(), Color::from_hex(PALETTE[3]).unwrap());
    }

    #[test]
    fn test_save_key_exports_active_painting() {
        let mut desktop = desktop();
        assert!(desktop.key(KeyInput::Save).is_empty());

        desktop.launch(&Launcher::paint());
        let effects = desktop.key(KeyInput::Save);
        assert!(matches!(effects.as_slice(), [ShellEffect::ExportPainting(bytes)] if bytes.starts_with(b"\x89PNG")));

        // Keys go to the active window only
        desktop.launch(&Launcher::about());
        assert!(desktop.key(KeyInput::Save).is_empty());
    }

    #[test]
    fn test_unregistered_component_keeps_chrome() {
        let mut desktop = desktop();
        desktop.launch(&Launcher {
            id: "mystery",
            title: "Mystery",
            component_key: "doesNotExist",
            size: None,
        });
        assert!(desktop.window_manager().get("mystery").is_some());
        assert!(desktop.content("mystery").is_none());
    }

    #[test]
    fn test_gallery_launcher_props() {
        assert_eq!(
            Launcher::gallery("gif", "GIFs").props(),
            Some(json!({ "galleryType": "gif" }))
        );
        assert_eq!(Launcher::paint().props(), None);
    }
}
