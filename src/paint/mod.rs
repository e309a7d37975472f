// Paint canvas hosted inside the paint window.
// Owns the raster, the shape-preview overlay, tool state and the undo history.
// Every operation is a silent no-op until the canvas is first sized.

pub mod color;
pub mod export;
pub mod fill;
pub mod font;
pub mod raster;
pub mod undo;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PaintError;
use crate::input_handler::{KeyInput, PointerButton};
use crate::state::geometry::{Position, Size};
pub use color::{palette_color, Color, BRUSH_SIZES, PALETTE};
pub use export::EXPORT_FILENAME;
pub use raster::Raster;
use undo::UndoStack;

pub const DEFAULT_BRUSH_SIZE: u32 = 2;
/// Eraser strokes are this many times wider than the brush
pub const ERASER_WIDTH_FACTOR: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    Pencil,
    Eraser,
    Fill,
    Line,
    Rectangle,
    Ellipse,
    ColorPicker,
    Text,
}

impl Tool {
    pub const ALL: [Tool; 8] = [
        Tool::Pencil,
        Tool::Eraser,
        Tool::Fill,
        Tool::Line,
        Tool::Rectangle,
        Tool::Ellipse,
        Tool::ColorPicker,
        Tool::Text,
    ];

    /// Keyboard shortcut that selects this tool
    pub fn key(self) -> char {
        match self {
            Tool::Pencil => 'p',
            Tool::Eraser => 'e',
            Tool::Fill => 'f',
            Tool::Line => 'l',
            Tool::Rectangle => 'b',
            Tool::Ellipse => 'o',
            Tool::ColorPicker => 'k',
            Tool::Text => 't',
        }
    }

    pub fn from_key(key: char) -> Option<Tool> {
        Tool::ALL.into_iter().find(|tool| tool.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Eraser => "Eraser",
            Tool::Fill => "Fill",
            Tool::Line => "Line",
            Tool::Rectangle => "Rectangle",
            Tool::Ellipse => "Ellipse",
            Tool::ColorPicker => "Color Picker",
            Tool::Text => "Text",
        }
    }

    fn is_shape(self) -> bool {
        matches!(self, Tool::Line | Tool::Rectangle | Tool::Ellipse)
    }
}

/// Text typed at a point but not yet stamped onto the raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub origin: Position,
    pub value: String,
}

/// In-progress pointer interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stroke {
    Freehand {
        last: Position,
        color: Color,
        width: u32,
    },
    Shape {
        tool: Tool,
        start: Position,
        current: Position,
        color: Color,
    },
}

#[derive(Debug, Clone)]
pub struct PaintCanvas {
    raster: Option<Raster>,
    overlay: Option<Raster>,
    undo: UndoStack,
    tool: Tool,
    brush_size: u32,
    foreground: Color,
    background: Color,
    stroke: Option<Stroke>,
    text: Option<TextEntry>,
    cursor: Option<Position>,
}

impl PaintCanvas {
    pub fn new(undo_depth: usize) -> Self {
        Self {
            raster: None,
            overlay: None,
            undo: UndoStack::new(undo_depth),
            tool: Tool::Pencil,
            brush_size: DEFAULT_BRUSH_SIZE,
            foreground: Color::BLACK,
            background: Color::WHITE,
            stroke: None,
            text: None,
            cursor: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.raster.is_some()
    }

    pub fn size(&self) -> Option<Size> {
        self.raster
            .as_ref()
            .map(|r| Size::new(r.width(), r.height()))
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_ref()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }

    pub fn text_entry(&self) -> Option<&TextEntry> {
        self.text.as_ref()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Fit the raster to a new container size. The first non-zero size mounts
    /// the canvas; later sizes keep existing pixels at the top-left.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        match &self.raster {
            Some(r) if r.width() == width && r.height() == height => return,
            Some(r) => self.raster = Some(r.resized(width, height)),
            None => {
                debug!("[Paint] Mounted {}x{} canvas", width, height);
                self.raster = Some(Raster::new(width, height, Color::WHITE));
            }
        }
        self.overlay = Some(Raster::new(width, height, Color::TRANSPARENT));
        self.stroke = None;
        self.refresh_text_preview();
    }

    /// Switch tools. Pending text is committed and an unfinished drag is dropped.
    pub fn set_tool(&mut self, tool: Tool) {
        self.stroke = None;
        if self.text.is_some() {
            self.commit_text();
        }
        self.tool = tool;
        self.refresh_text_preview();
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.max(1);
        self.refresh_text_preview();
    }

    /// Step to the next larger (or smaller) preset brush size
    pub fn step_brush_size(&mut self, larger: bool) {
        let next = if larger {
            BRUSH_SIZES.iter().copied().find(|&s| s > self.brush_size)
        } else {
            BRUSH_SIZES.iter().rev().copied().find(|&s| s < self.brush_size)
        };
        if let Some(size) = next {
            self.set_brush_size(size);
        }
    }

    pub fn set_foreground(&mut self, color: Color) {
        self.foreground = color;
        self.refresh_text_preview();
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Palette click: primary sets the foreground, secondary the background
    pub fn pick_palette(&mut self, index: usize, button: PointerButton) {
        let Some(color) = palette_color(index) else {
            return;
        };
        match button {
            PointerButton::Primary => self.set_foreground(color),
            PointerButton::Secondary => self.set_background(color),
        }
    }

    fn draw_color(&self, button: PointerButton) -> Color {
        match button {
            PointerButton::Primary => self.foreground,
            PointerButton::Secondary => self.background,
        }
    }

    fn snapshot(&mut self) {
        if let Some(raster) = &self.raster {
            self.undo.push(raster.clone());
        }
    }

    pub fn pointer_down(&mut self, pos: Position, button: PointerButton) {
        self.cursor = Some(pos);
        if !self.is_mounted() {
            return;
        }

        match self.tool {
            Tool::Pencil | Tool::Eraser => {
                let (color, width) = if self.tool == Tool::Eraser {
                    (self.background, self.brush_size * ERASER_WIDTH_FACTOR)
                } else {
                    (self.draw_color(button), self.brush_size)
                };
                self.snapshot();
                if let Some(raster) = self.raster.as_mut() {
                    raster.stamp(pos.x, pos.y, width, color);
                }
                self.stroke = Some(Stroke::Freehand {
                    last: pos,
                    color,
                    width,
                });
            }
            Tool::Fill => {
                let color = self.draw_color(button);
                let target = self.raster.as_ref().and_then(|r| r.pixel(pos.x, pos.y));
                if target.is_none() || target == Some(color) {
                    return;
                }
                self.snapshot();
                if let Some(raster) = self.raster.as_mut() {
                    fill::flood_fill(raster, pos.x, pos.y, color);
                }
            }
            Tool::ColorPicker => {
                let Some(picked) = self.raster.as_ref().and_then(|r| r.pixel(pos.x, pos.y))
                else {
                    return;
                };
                match button {
                    PointerButton::Primary => self.set_foreground(picked.opaque()),
                    PointerButton::Secondary => self.set_background(picked.opaque()),
                }
            }
            Tool::Text => {
                self.commit_text();
                self.text = Some(TextEntry {
                    origin: pos,
                    value: String::new(),
                });
            }
            tool @ (Tool::Line | Tool::Rectangle | Tool::Ellipse) => {
                self.snapshot();
                self.stroke = Some(Stroke::Shape {
                    tool,
                    start: pos,
                    current: pos,
                    color: self.draw_color(button),
                });
            }
        }
    }

    pub fn pointer_move(&mut self, pos: Position) {
        self.cursor = Some(pos);
        let Some(stroke) = self.stroke else {
            return;
        };

        match stroke {
            Stroke::Freehand { last, color, width } => {
                if let Some(raster) = self.raster.as_mut() {
                    raster.draw_line(last, pos, width, color);
                }
                self.stroke = Some(Stroke::Freehand {
                    last: pos,
                    color,
                    width,
                });
            }
            Stroke::Shape {
                tool, start, color, ..
            } => {
                let brush = self.brush_size;
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.fill(Color::TRANSPARENT);
                    draw_shape(overlay, tool, start, pos, brush, color);
                }
                self.stroke = Some(Stroke::Shape {
                    tool,
                    start,
                    current: pos,
                    color,
                });
            }
        }
    }

    pub fn pointer_up(&mut self, pos: Position) {
        self.cursor = Some(pos);
        let Some(stroke) = self.stroke.take() else {
            return;
        };

        if let Stroke::Shape {
            tool, start, color, ..
        } = stroke
        {
            let brush = self.brush_size;
            if let Some(raster) = self.raster.as_mut() {
                draw_shape(raster, tool, start, pos, brush, color);
            }
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.fill(Color::TRANSPARENT);
            }
        }
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(entry) = self.text.as_mut() {
            entry.value.push(c);
            self.refresh_text_preview();
        }
    }

    pub fn backspace(&mut self) {
        if let Some(entry) = self.text.as_mut() {
            entry.value.pop();
            self.refresh_text_preview();
        }
    }

    /// Drop the pending text without drawing it
    pub fn cancel_text(&mut self) {
        if self.text.take().is_some() {
            self.refresh_text_preview();
        }
    }

    /// Stamp pending text onto the raster. Blank entries are discarded.
    pub fn commit_text(&mut self) {
        let Some(entry) = self.text.take() else {
            return;
        };
        self.refresh_text_preview();
        if entry.value.trim().is_empty() || !self.is_mounted() {
            return;
        }

        self.snapshot();
        let (scale, color) = (self.brush_size, self.foreground);
        if let Some(raster) = self.raster.as_mut() {
            font::draw_text(raster, entry.origin, &entry.value, scale, color);
        }
    }

    fn refresh_text_preview(&mut self) {
        if matches!(self.stroke, Some(Stroke::Shape { .. })) {
            return;
        }
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        overlay.fill(Color::TRANSPARENT);
        if let Some(entry) = &self.text {
            font::draw_text(
                overlay,
                entry.origin,
                &entry.value,
                self.brush_size,
                self.foreground,
            );
        }
    }

    /// Restore the latest snapshot. Ignored mid-drag, while the snapshot
    /// belongs to the stroke still being drawn.
    pub fn undo(&mut self) {
        if self.stroke.is_some() {
            debug!("[Paint] Undo ignored during a stroke");
            return;
        }
        let Some(current) = &self.raster else {
            return;
        };
        let Some(snapshot) = self.undo.pop() else {
            return;
        };
        // Snapshots taken before a container resize are pasted at the origin
        let restored = if snapshot.width() == current.width() && snapshot.height() == current.height()
        {
            snapshot
        } else {
            snapshot.resized(current.width(), current.height())
        };
        self.raster = Some(restored);
        debug!("[Paint] Undo, {} snapshots left", self.undo.len());
    }

    fn transform(&mut self, apply: impl FnOnce(&mut Raster)) {
        if !self.is_mounted() {
            return;
        }
        self.snapshot();
        if let Some(raster) = self.raster.as_mut() {
            apply(raster);
        }
    }

    /// File > New: paint the whole raster white
    pub fn clear(&mut self) {
        self.transform(|r| r.fill(Color::WHITE));
    }

    pub fn flip_horizontal(&mut self) {
        self.transform(Raster::flip_horizontal);
    }

    pub fn flip_vertical(&mut self) {
        self.transform(Raster::flip_vertical);
    }

    pub fn rotate_90(&mut self) {
        self.transform(Raster::rotate_90_cw);
    }

    pub fn rotate_180(&mut self) {
        self.transform(Raster::rotate_180);
    }

    pub fn invert(&mut self) {
        self.transform(Raster::invert);
    }

    /// Encode the raster as PNG. `Ok(None)` while unmounted.
    pub fn export_png(&self) -> Result<Option<Vec<u8>>, PaintError> {
        let Some(raster) = &self.raster else {
            return Ok(None);
        };
        let bytes = export::encode_png(raster)?;
        info!("[Paint] Exported {} byte PNG", bytes.len());
        Ok(Some(bytes))
    }

    pub fn export_data_uri(&self) -> Result<Option<String>, PaintError> {
        Ok(self.export_png()?.map(|bytes| export::data_uri(&bytes)))
    }

    /// Pixel as displayed: the overlay wins wherever it has ink
    pub fn visible_pixel(&self, x: i32, y: i32) -> Option<Color> {
        let base = self.raster.as_ref()?.pixel(x, y)?;
        match self.overlay.as_ref().and_then(|o| o.pixel(x, y)) {
            Some(over) if over.a > 0 => Some(over),
            _ => Some(base),
        }
    }

    /// Keyboard handling. Returns true when the key was consumed.
    /// Saving is left to the host, which owns the file system.
    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        if self.text.is_some() {
            match key {
                KeyInput::Char(c) => self.type_char(c),
                KeyInput::Backspace => self.backspace(),
                KeyInput::Enter => self.commit_text(),
                KeyInput::Escape => self.cancel_text(),
                KeyInput::Undo => self.undo(),
                KeyInput::New => self.clear(),
                KeyInput::Save => return false,
            }
            return true;
        }

        match key {
            KeyInput::Undo => self.undo(),
            KeyInput::New => self.clear(),
            KeyInput::Char('[') => self.step_brush_size(false),
            KeyInput::Char(']') => self.step_brush_size(true),
            KeyInput::Char('h') => self.flip_horizontal(),
            KeyInput::Char('v') => self.flip_vertical(),
            KeyInput::Char('r') => self.rotate_90(),
            KeyInput::Char('R') => self.rotate_180(),
            KeyInput::Char('n') => self.invert(),
            KeyInput::Char(c) if c.is_ascii_digit() => {
                let index = c.to_digit(10).unwrap_or(0) as usize;
                self.pick_palette(index, PointerButton::Primary);
            }
            KeyInput::Char(c) => match Tool::from_key(c) {
                Some(tool) => self.set_tool(tool),
                None => return false,
            },
            KeyInput::Enter | KeyInput::Backspace | KeyInput::Escape | KeyInput::Save => {
                return false
            }
        }
        true
    }
}

fn draw_shape(
    target: &mut Raster,
    tool: Tool,
    start: Position,
    end: Position,
    width: u32,
    color: Color,
) {
    debug_assert!(tool.is_shape());
    match tool {
        Tool::Line => target.draw_line(start, end, width, color),
        Tool::Rectangle => target.stroke_rect(start, end, width, color),
        Tool::Ellipse => target.stroke_ellipse(start, end, width, color),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    fn mounted() -> PaintCanvas {
        let mut canvas = PaintCanvas::new(20);
        canvas.resize(40, 30);
        canvas
    }

    fn pixel(canvas: &PaintCanvas, x: i32, y: i32) -> Color {
        canvas.raster().and_then(|r| r.pixel(x, y)).unwrap()
    }

    #[test]
    fn test_unmounted_canvas_ignores_everything() {
        let mut canvas = PaintCanvas::new(20);
        canvas.resize(0, 10);
        canvas.pointer_down(Position::new(1, 1), PointerButton::Primary);
        canvas.pointer_move(Position::new(5, 5));
        canvas.pointer_up(Position::new(5, 5));
        canvas.flip_horizontal();
        canvas.clear();
        canvas.undo();

        assert!(!canvas.is_mounted());
        assert_eq!(canvas.undo_depth(), 0);
        assert_eq!(canvas.export_png().unwrap(), None);
    }

    #[test]
    fn test_pencil_stroke_uses_button_colour() {
        let mut canvas = mounted();
        canvas.set_foreground(RED);
        canvas.set_background(Color::BLACK);

        canvas.pointer_down(Position::new(2, 2), PointerButton::Primary);
        canvas.pointer_move(Position::new(10, 2));
        canvas.pointer_up(Position::new(10, 2));
        assert_eq!(pixel(&canvas, 6, 2), RED);

        canvas.pointer_down(Position::new(2, 20), PointerButton::Secondary);
        canvas.pointer_move(Position::new(10, 20));
        canvas.pointer_up(Position::new(10, 20));
        assert_eq!(pixel(&canvas, 6, 20), Color::BLACK);
        assert_eq!(canvas.undo_depth(), 2);
    }

    #[test]
    fn test_eraser_paints_background_wider() {
        let mut canvas = mounted();
        canvas.raster.as_mut().unwrap().fill(RED);
        canvas.set_tool(Tool::Eraser);

        canvas.pointer_down(Position::new(20, 15), PointerButton::Primary);
        canvas.pointer_up(Position::new(20, 15));

        // Brush 2 erases with diameter 6
        assert_eq!(pixel(&canvas, 20, 15), Color::WHITE);
        assert_eq!(pixel(&canvas, 23, 15), Color::WHITE);
        assert_eq!(pixel(&canvas, 25, 15), RED);
    }

    #[test]
    fn test_shape_preview_is_not_committed_until_release() {
        let mut canvas = mounted();
        canvas.set_tool(Tool::Rectangle);
        canvas.set_foreground(RED);

        canvas.pointer_down(Position::new(5, 5), PointerButton::Primary);
        canvas.pointer_move(Position::new(20, 20));
        assert_eq!(pixel(&canvas, 5, 12), Color::WHITE);
        assert_eq!(canvas.visible_pixel(5, 12), Some(RED));

        // Moving again clears the stale preview
        canvas.pointer_move(Position::new(15, 15));
        assert_eq!(canvas.visible_pixel(20, 12), Some(Color::WHITE));

        canvas.pointer_up(Position::new(15, 15));
        assert_eq!(pixel(&canvas, 15, 10), RED);
        assert_eq!(canvas.visible_pixel(20, 12), Some(Color::WHITE));
        assert_eq!(canvas.undo_depth(), 1);
    }

    #[test]
    fn test_fill_with_same_colour_pushes_nothing() {
        let mut canvas = mounted();
        canvas.set_tool(Tool::Fill);
        canvas.set_foreground(Color::WHITE);
        canvas.pointer_down(Position::new(3, 3), PointerButton::Primary);
        assert_eq!(canvas.undo_depth(), 0);

        canvas.set_foreground(RED);
        canvas.pointer_down(Position::new(3, 3), PointerButton::Primary);
        assert_eq!(canvas.undo_depth(), 1);
        assert_eq!(pixel(&canvas, 39, 29), RED);
    }

    #[test]
    fn test_colour_picker_sets_opaque_colour() {
        let mut canvas = mounted();
        canvas
            .raster
            .as_mut()
            .unwrap()
            .set_pixel(4, 4, Color::rgba(1, 2, 3, 10));
        canvas.set_tool(Tool::ColorPicker);

        canvas.pointer_down(Position::new(4, 4), PointerButton::Secondary);
        assert_eq!(canvas.background(), Color::rgb(1, 2, 3));
        assert_eq!(canvas.foreground(), Color::BLACK);

        canvas.pointer_down(Position::new(4, 4), PointerButton::Primary);
        assert_eq!(canvas.foreground(), Color::rgb(1, 2, 3));
        assert_eq!(canvas.undo_depth(), 0);
    }

    #[test]
    fn test_undo_restores_exact_bytes() {
        let mut canvas = mounted();
        canvas.pointer_down(Position::new(1, 1), PointerButton::Primary);
        canvas.pointer_move(Position::new(30, 25));
        canvas.pointer_up(Position::new(30, 25));
        let before = canvas.raster().cloned().unwrap();

        for op in [
            PaintCanvas::flip_horizontal,
            PaintCanvas::flip_vertical,
            PaintCanvas::rotate_90,
            PaintCanvas::rotate_180,
            PaintCanvas::invert,
            PaintCanvas::clear,
        ] {
            op(&mut canvas);
            assert_ne!(canvas.raster(), Some(&before));
            canvas.undo();
            assert_eq!(canvas.raster(), Some(&before));
        }
    }

    #[test]
    fn test_undo_mid_drag_keeps_stroke_undoable() {
        let mut canvas = mounted();
        let blank = canvas.raster().cloned().unwrap();
        canvas.set_tool(Tool::Rectangle);

        canvas.pointer_down(Position::new(5, 5), PointerButton::Primary);
        canvas.pointer_move(Position::new(20, 20));
        assert!(canvas.handle_key(KeyInput::Undo));
        assert_eq!(canvas.undo_depth(), 1);

        canvas.pointer_up(Position::new(20, 20));
        assert_ne!(canvas.raster(), Some(&blank));

        canvas.handle_key(KeyInput::Undo);
        assert_eq!(canvas.raster(), Some(&blank));
        assert_eq!(canvas.undo_depth(), 0);
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut canvas = mounted();
        let before = canvas.raster().cloned();
        canvas.undo();
        assert_eq!(canvas.raster().cloned(), before);
    }

    #[test]
    fn test_resize_keeps_pixels() {
        let mut canvas = mounted();
        canvas.raster.as_mut().unwrap().set_pixel(2, 2, RED);
        canvas.resize(60, 50);
        assert_eq!(canvas.size(), Some(Size::new(60, 50)));
        assert_eq!(pixel(&canvas, 2, 2), RED);
        assert_eq!(pixel(&canvas, 55, 45), Color::WHITE);
    }

    #[test]
    fn test_text_commit_on_tool_switch() {
        let mut canvas = mounted();
        canvas.set_tool(Tool::Text);
        canvas.pointer_down(Position::new(2, 2), PointerButton::Primary);
        for c in "HI".chars() {
            canvas.handle_key(KeyInput::Char(c));
        }
        // Preview only until committed
        assert_eq!(pixel(&canvas, 2, 2), Color::WHITE);
        assert_eq!(canvas.visible_pixel(2, 2), Some(Color::BLACK));

        canvas.set_tool(Tool::Pencil);
        assert!(canvas.text_entry().is_none());
        assert_eq!(pixel(&canvas, 2, 2), Color::BLACK);
        assert_eq!(canvas.undo_depth(), 1);
    }

    #[test]
    fn test_tool_switch_drops_unfinished_shape() {
        let mut canvas = mounted();
        canvas.set_tool(Tool::Line);
        canvas.pointer_down(Position::new(5, 20), PointerButton::Primary);
        canvas.pointer_move(Position::new(35, 20));
        assert_eq!(canvas.visible_pixel(20, 20), Some(Color::BLACK));

        canvas.handle_key(KeyInput::Char('t'));
        assert_eq!(canvas.visible_pixel(20, 20), Some(Color::WHITE));

        // The text preview shows straight away
        canvas.pointer_down(Position::new(2, 2), PointerButton::Primary);
        canvas.handle_key(KeyInput::Char('H'));
        assert_eq!(canvas.visible_pixel(2, 2), Some(Color::BLACK));

        // Releasing the old drag draws nothing
        canvas.pointer_up(Position::new(35, 20));
        assert_eq!(pixel(&canvas, 20, 20), Color::WHITE);
    }

    #[test]
    fn test_blank_text_is_discarded() {
        let mut canvas = mounted();
        canvas.set_tool(Tool::Text);
        canvas.pointer_down(Position::new(2, 2), PointerButton::Primary);
        canvas.type_char(' ');
        canvas.pointer_down(Position::new(10, 10), PointerButton::Primary);

        assert_eq!(canvas.undo_depth(), 0);
        assert_eq!(canvas.text_entry().map(|e| e.origin), Some(Position::new(10, 10)));

        canvas.handle_key(KeyInput::Char('A'));
        canvas.handle_key(KeyInput::Escape);
        assert!(canvas.text_entry().is_none());
        assert_eq!(canvas.visible_pixel(12, 10), Some(Color::WHITE));
    }

    #[test]
    fn test_key_bindings() {
        let mut canvas = mounted();
        assert!(canvas.handle_key(KeyInput::Char('f')));
        assert_eq!(canvas.tool(), Tool::Fill);

        canvas.handle_key(KeyInput::Char(']'));
        assert_eq!(canvas.brush_size(), 3);
        canvas.handle_key(KeyInput::Char('['));
        canvas.handle_key(KeyInput::Char('['));
        canvas.handle_key(KeyInput::Char('['));
        assert_eq!(canvas.brush_size(), 1);

        canvas.handle_key(KeyInput::Char('2'));
        assert_eq!(canvas.foreground(), palette_color(2).unwrap());

        assert!(!canvas.handle_key(KeyInput::Save));
        assert!(!canvas.handle_key(KeyInput::Char('z')));
    }

    #[test]
    fn test_export_data_uri() {
        let canvas = mounted();
        let uri = canvas.export_data_uri().unwrap().unwrap();
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
