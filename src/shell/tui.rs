// Terminal host for the desktop. Desktop geometry is kept in pixels; each
// terminal cell covers `cell.width` x `cell.height` of them. Mouse cells map to
// the pixel at the cell's centre, and the paint canvas is drawn with half-block
// glyphs so every cell shows two pixel blocks.

use anyhow::Result;
use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect as CellRect;
use ratatui::style::{Color as TuiColor, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::collections::HashMap;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use super::icons::DESKTOP_ICONS;
use super::registry::Content;
use super::start_menu::StartEntry;
use super::{Desktop, PaintLayout, ShellEffect, PAINT_SWATCH_WIDTH, PAINT_TOOL_WIDTH};
use crate::config::{CellConfig, DesktopConfig};
use crate::input_handler::chrome::CONTROL_BUTTONS;
use crate::input_handler::{KeyInput, PointerButton};
use crate::paint::{palette_color, Color, PaintCanvas, Tool, PALETTE};
use crate::state::geometry::{Position, Rect, Size};
use crate::storage::LayoutStore;

type Term = Terminal<CrosstermBackend<Stdout>>;

const DESKTOP_BG: TuiColor = TuiColor::Rgb(0xFF, 0xC0, 0xCB);
const TITLE_ACTIVE: TuiColor = TuiColor::Rgb(0xFF, 0x14, 0x93);
const TITLE_INACTIVE: TuiColor = TuiColor::Rgb(0x80, 0x80, 0x80);
const FACE: TuiColor = TuiColor::Rgb(0xC0, 0xC0, 0xC0);
const LABEL: TuiColor = TuiColor::Rgb(0x8B, 0x00, 0x45);
const FRAME_TICK: Duration = Duration::from_millis(16);

/// Run the desktop until Ctrl+Q
pub async fn run(config: DesktopConfig) -> Result<()> {
    let store = LayoutStore::new(config.data_dir.clone());
    let saved = store.load_icon_positions().await;

    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, config, saved, &store).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_loop(
    terminal: &mut Term,
    config: DesktopConfig,
    saved: HashMap<String, Position>,
    store: &LayoutStore,
) -> Result<()> {
    let cell = config.cell;
    let size = terminal.size()?;
    let mut desktop = Desktop::new(config, viewport_for(size.width, size.height, cell));
    desktop.restore_icon_positions(saved);

    loop {
        terminal.draw(|frame| draw(frame, &desktop))?;

        if !event::poll(FRAME_TICK)? {
            continue;
        }
        let effects = match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if is_quit(&key) {
                    info!("[Shell] Quit requested");
                    return Ok(());
                }
                translate_key(&key)
                    .map(|k| desktop.key(k))
                    .unwrap_or_default()
            }
            Event::Mouse(mouse) => handle_mouse(&mut desktop, mouse, cell),
            Event::Resize(columns, rows) => {
                desktop.set_viewport(viewport_for(columns, rows, cell));
                Vec::new()
            }
            _ => Vec::new(),
        };

        for effect in effects {
            apply_effect(store, effect).await;
        }
    }
}

async fn apply_effect(store: &LayoutStore, effect: ShellEffect) {
    match effect {
        ShellEffect::PersistIconPositions(positions) => {
            store.save_icon_positions(&positions).await;
        }
        ShellEffect::ExportPainting(bytes) => match store.save_export(&bytes).await {
            Ok(path) => info!("[Shell] Painting saved to {}", path.display()),
            Err(e) => warn!("[Shell] Painting not saved: {}", e),
        },
    }
}

fn viewport_for(columns: u16, rows: u16, cell: CellConfig) -> Size {
    Size::new(columns as u32 * cell.width, rows as u32 * cell.height)
}

/// Desktop pixel at the centre of a terminal cell
fn cell_center(column: u16, row: u16, cell: CellConfig) -> Position {
    Position::new(
        (column as u32 * cell.width + cell.width / 2) as i32,
        (row as u32 * cell.height + cell.height / 2) as i32,
    )
}

fn handle_mouse(desktop: &mut Desktop, mouse: MouseEvent, cell: CellConfig) -> Vec<ShellEffect> {
    let point = cell_center(mouse.column, mouse.row, cell);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => desktop.pointer_down(point, PointerButton::Primary),
        MouseEventKind::Down(MouseButton::Right) => {
            desktop.pointer_down(point, PointerButton::Secondary)
        }
        MouseEventKind::Drag(_) | MouseEventKind::Moved => {
            desktop.pointer_move(point);
            Vec::new()
        }
        MouseEventKind::Up(_) => desktop.pointer_up(point, Instant::now()),
        _ => Vec::new(),
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('q'))
}

fn translate_key(key: &KeyEvent) -> Option<KeyInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('z') => Some(KeyInput::Undo),
            KeyCode::Char('s') => Some(KeyInput::Save),
            KeyCode::Char('n') => Some(KeyInput::New),
            _ => None,
        };
    }
    match key.code {
        // Alt+Enter breaks a line in the text tool, plain Enter commits
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => Some(KeyInput::Char('\n')),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Esc => Some(KeyInput::Escape),
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        _ => None,
    }
}

/// Cells covering a pixel rectangle, clipped to `bounds`
fn to_cells(rect: Rect, cell: CellConfig, bounds: CellRect) -> Option<CellRect> {
    let (cw, ch) = (cell.width as i32, cell.height as i32);
    let x0 = rect.x().div_euclid(cw).max(bounds.x as i32);
    let y0 = rect.y().div_euclid(ch).max(bounds.y as i32);
    let x1 = (rect.right() + cw - 1)
        .div_euclid(cw)
        .min(bounds.right() as i32);
    let y1 = (rect.bottom() + ch - 1)
        .div_euclid(ch)
        .min(bounds.bottom() as i32);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(CellRect::new(
        x0 as u16,
        y0 as u16,
        (x1 - x0) as u16,
        (y1 - y0) as u16,
    ))
}

fn tui_color(color: Color) -> TuiColor {
    TuiColor::Rgb(color.r, color.g, color.b)
}

/// Colour that best represents a block of canvas pixels: the most common one,
/// unless something else is drawn in it, in which case the drawn colour wins
fn block_color(canvas: &PaintCanvas, x: i32, y: i32, width: i32, height: i32) -> Option<Color> {
    let mut counts: Vec<(Color, u32)> = Vec::new();
    for py in y..y + height {
        for px in x..x + width {
            let Some(color) = canvas.visible_pixel(px, py) else {
                continue;
            };
            match counts.iter_mut().find(|(c, _)| *c == color) {
                Some((_, n)) => *n += 1,
                None => counts.push((color, 1)),
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.get(1).or(counts.first()).map(|(c, _)| *c)
}

fn fill(frame: &mut Frame, area: CellRect, bg: TuiColor) {
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new("").style(Style::default().bg(bg)), area);
}

fn draw(frame: &mut Frame, desktop: &Desktop) {
    let screen = frame.area();
    let cell = desktop.config().cell;
    fill(frame, screen, DESKTOP_BG);

    draw_icons(frame, desktop, cell, screen);

    let active = desktop.window_manager().active_window().map(|w| w.id.clone());
    for window in desktop.window_manager().visible_windows() {
        let Some(frame_rect) = desktop.chrome_layout().frame_rect(window, desktop.viewport()) else {
            continue;
        };
        draw_window(
            frame,
            desktop,
            &window.id,
            &window.title,
            frame_rect,
            window.is_maximized(),
            active.as_deref() == Some(window.id.as_str()),
        );
    }

    if desktop.start_menu().is_open() {
        draw_start_menu(frame, desktop, cell, screen);
    }
    draw_taskbar(frame, desktop, cell, screen);
}

fn draw_icons(frame: &mut Frame, desktop: &Desktop, cell: CellConfig, screen: CellRect) {
    let area = desktop.desktop_area();
    for (index, icon) in DESKTOP_ICONS.iter().enumerate() {
        let Some(rect) = desktop.icons().icon_rect(index, area) else {
            continue;
        };
        let Some(cells) = to_cells(rect, cell, screen) else {
            continue;
        };
        let selected = desktop.icons().selected() == Some(icon.launcher.id);
        let label_style = if selected {
            Style::default().fg(TuiColor::White).bg(TITLE_ACTIVE)
        } else {
            Style::default().fg(LABEL).bg(DESKTOP_BG)
        };
        let glyph = if icon.launcher.component_key == "gallery" {
            "[#]"
        } else {
            "[*]"
        };
        let lines = vec![
            Line::from(Span::styled(glyph, Style::default().fg(LABEL).bg(DESKTOP_BG))).centered(),
            Line::from(Span::styled(icon.label, label_style)).centered(),
        ];
        frame.render_widget(Paragraph::new(lines), cells);
    }
}

fn draw_window(
    frame: &mut Frame,
    desktop: &Desktop,
    id: &str,
    title: &str,
    rect: Rect,
    maximized: bool,
    active: bool,
) {
    let cell = desktop.config().cell;
    let screen = frame.area();
    let layout = desktop.chrome_layout();
    let Some(cells) = to_cells(rect, cell, screen) else {
        return;
    };
    fill(frame, cells, TuiColor::White);

    let title_bg = if active { TITLE_ACTIVE } else { TITLE_INACTIVE };
    if let Some(bar) = to_cells(layout.title_bar(rect), cell, screen) {
        let title_style = Style::default().fg(TuiColor::White).bg(title_bg);
        fill(frame, bar, title_bg);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" {}", title), title_style))),
            bar,
        );
    }
    for part in CONTROL_BUTTONS {
        let Some(button) = layout
            .button_rect(rect, part)
            .and_then(|r| to_cells(r, cell, screen))
        else {
            continue;
        };
        let style = Style::default().fg(TuiColor::Black).bg(FACE);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(part.label(maximized), style)).centered())
                .style(style),
            button,
        );
    }

    let body = layout.body_rect(rect);
    match desktop.content(id) {
        Some(Content::Paint(canvas)) => draw_paint(frame, canvas, PaintLayout::new(layout, rect), cell),
        Some(content) => {
            if let Some(body_cells) = to_cells(body, cell, screen) {
                let lines: Vec<Line> = content
                    .summary()
                    .into_iter()
                    .map(|text| Line::from(Span::styled(text, Style::default().fg(LABEL))))
                    .collect();
                frame.render_widget(Paragraph::new(lines), body_cells);
            }
        }
        None => {}
    }

    if !maximized {
        let grip = layout.grip_rect(rect);
        if let Some(grip_cells) = to_cells(grip, cell, screen) {
            let corner = CellRect::new(
                grip_cells.right().saturating_sub(1),
                grip_cells.bottom().saturating_sub(1),
                1,
                1,
            )
            .intersection(screen);
            frame.render_widget(Paragraph::new("◢").style(Style::default().fg(FACE)), corner);
        }
    }
}

fn draw_paint(frame: &mut Frame, canvas: &PaintCanvas, layout: PaintLayout, cell: CellConfig) {
    let screen = frame.area();

    if let Some(tools) = to_cells(layout.tools, cell, screen) {
        let per_tool = (PAINT_TOOL_WIDTH / cell.width).max(1) as usize;
        let mut spans: Vec<Span> = Tool::ALL
            .iter()
            .map(|tool| {
                let style = if *tool == canvas.tool() {
                    Style::default().fg(TuiColor::White).bg(TITLE_ACTIVE)
                } else {
                    Style::default().fg(TuiColor::Black).bg(FACE)
                };
                Span::styled(format!("{:^width$}", tool.key(), width = per_tool), style)
            })
            .collect();
        spans.push(Span::styled(
            format!(" {} | size {}", canvas.tool().label(), canvas.brush_size()),
            Style::default().fg(TuiColor::Black),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), tools);
    }

    if let Some(palette) = to_cells(layout.palette, cell, screen) {
        let per_swatch = (PAINT_SWATCH_WIDTH / cell.width).max(1) as usize;
        let mut spans: Vec<Span> = (0..PALETTE.len())
            .filter_map(palette_color)
            .map(|color| Span::styled(" ".repeat(per_swatch), Style::default().bg(tui_color(color))))
            .collect();
        spans.push(Span::raw(" "));
        spans.push(Span::styled("fg", Style::default().bg(tui_color(canvas.foreground())).fg(tui_color(canvas.background()))));
        spans.push(Span::styled("bg", Style::default().bg(tui_color(canvas.background())).fg(tui_color(canvas.foreground()))));
        frame.render_widget(Paragraph::new(Line::from(spans)), palette);
    }

    let Some(cells) = to_cells(layout.canvas, cell, screen) else {
        return;
    };
    let (cw, ch) = (cell.width as i32, cell.height as i32);
    let half = (ch / 2).max(1);
    let origin = layout.canvas.position;
    let buf = frame.buffer_mut();
    for row in cells.top()..cells.bottom() {
        for column in cells.left()..cells.right() {
            let x = column as i32 * cw - origin.x;
            let y = row as i32 * ch - origin.y;
            let top = block_color(canvas, x, y, cw, half);
            let bottom = block_color(canvas, x, y + half, cw, ch - half);
            let (Some(top), Some(bottom)) = (top, bottom) else {
                continue;
            };
            if let Some(target) = buf.cell_mut((column, row)) {
                target
                    .set_symbol("▀")
                    .set_fg(tui_color(top))
                    .set_bg(tui_color(bottom));
            }
        }
    }
}

fn draw_start_menu(frame: &mut Frame, desktop: &Desktop, cell: CellConfig, screen: CellRect) {
    let top = desktop.taskbar().top();
    let menu = desktop.start_menu();
    if let Some(cells) = to_cells(menu.rect(top), cell, screen) {
        fill(frame, cells, FACE);
    }
    for (entry, rect) in menu.entry_rects(top) {
        let Some(cells) = to_cells(rect, cell, screen) else {
            continue;
        };
        let line = match entry {
            StartEntry::Launch { label, .. } => {
                Line::from(Span::styled(format!("  {}", label), Style::default().fg(TuiColor::Black)))
            }
            StartEntry::Separator => Line::from(Span::styled(
                "─".repeat(cells.width as usize),
                Style::default().fg(TITLE_INACTIVE),
            )),
            StartEntry::Disabled(label) => Line::from(Span::styled(
                format!("  {}", label),
                Style::default()
                    .fg(TITLE_INACTIVE)
                    .add_modifier(Modifier::DIM),
            )),
        };
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(FACE)), cells);
    }
}

fn draw_taskbar(frame: &mut Frame, desktop: &Desktop, cell: CellConfig, screen: CellRect) {
    let taskbar = desktop.taskbar();
    if let Some(bar) = to_cells(taskbar.bar(), cell, screen) {
        fill(frame, bar, FACE);
    }

    let pressed = Style::default()
        .fg(TuiColor::Black)
        .bg(TuiColor::White)
        .add_modifier(Modifier::BOLD);
    let raised = Style::default().fg(TuiColor::Black).bg(FACE);

    if let Some(start) = to_cells(taskbar.start_button(), cell, screen) {
        let style = if desktop.start_menu().is_open() { pressed } else { raised };
        frame.render_widget(Paragraph::new(Line::from(Span::styled("♥ Start", style))).style(style), start);
    }
    for button in taskbar.buttons(desktop.window_manager()) {
        let Some(cells) = to_cells(button.rect, cell, screen) else {
            continue;
        };
        let style = if button.active { pressed } else { raised };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(button.title, style))).style(style),
            cells,
        );
    }
    if let Some(clock) = to_cells(taskbar.clock(), cell, screen) {
        let time = Local::now().format("%H:%M").to_string();
        frame.render_widget(Paragraph::new(Line::from(time).centered()).style(raised), clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: CellConfig = CellConfig {
        width: 8,
        height: 16,
    };

    #[test]
    fn test_cell_center_mapping() {
        assert_eq!(cell_center(0, 0, CELL), Position::new(4, 8));
        assert_eq!(cell_center(10, 3, CELL), Position::new(84, 56));
        assert_eq!(viewport_for(160, 50, CELL), Size::new(1280, 800));
    }

    #[test]
    fn test_to_cells_rounds_outward_and_clips() {
        let screen = CellRect::new(0, 0, 100, 40);
        assert_eq!(
            to_cells(Rect::new(4, 8, 8, 16), CELL, screen),
            Some(CellRect::new(0, 0, 2, 2))
        );
        assert_eq!(
            to_cells(Rect::new(760, 600, 200, 100), CELL, screen),
            Some(CellRect::new(95, 37, 5, 3))
        );
        assert_eq!(to_cells(Rect::new(2000, 0, 10, 10), CELL, screen), None);
    }

    #[test]
    fn test_block_color_prefers_ink() {
        let mut canvas = PaintCanvas::new(1);
        canvas.resize(16, 16);
        assert_eq!(block_color(&canvas, 0, 0, 8, 8), Some(Color::WHITE));

        canvas.pointer_down(Position::new(3, 3), PointerButton::Primary);
        canvas.pointer_up(Position::new(3, 3));
        assert_eq!(block_color(&canvas, 0, 0, 8, 8), Some(Color::BLACK));
        assert_eq!(block_color(&canvas, 8, 8, 8, 8), Some(Color::WHITE));
        assert_eq!(block_color(&canvas, 100, 100, 8, 8), None);
    }

    #[test]
    fn test_key_translation() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert!(is_quit(&ctrl('q')));
        assert_eq!(translate_key(&ctrl('z')), Some(KeyInput::Undo));
        assert_eq!(translate_key(&ctrl('s')), Some(KeyInput::Save));
        assert_eq!(translate_key(&ctrl('x')), None);

        let plain = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert!(!is_quit(&plain));
        assert_eq!(translate_key(&plain), Some(KeyInput::Char('R')));
        assert_eq!(
            translate_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT)),
            Some(KeyInput::Char('\n'))
        );
        assert_eq!(
            translate_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            Some(KeyInput::Enter)
        );
    }
}
