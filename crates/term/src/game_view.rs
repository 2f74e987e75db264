//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{LevelPhase, ObstacleKind, PowerKind, SpecialKind, Symbol};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Front-end state drawn on top of the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlay<'a> {
    pub cursor: Option<usize>,
    pub selected: Option<usize>,
    pub hint: Option<(usize, usize)>,
    /// Latest combo or status message.
    pub message: Option<&'a str>,
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

const SYMBOL_COLORS: [Rgb; 8] = [
    Rgb::new(255, 170, 130),
    Rgb::new(170, 110, 220),
    Rgb::new(240, 220, 80),
    Rgb::new(230, 70, 90),
    Rgb::new(255, 150, 40),
    Rgb::new(110, 210, 100),
    Rgb::new(90, 200, 220),
    Rgb::new(230, 230, 230),
];

/// A lightweight terminal renderer for the board and its side panel.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Glyph plus special marker.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(2),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        overlay: &Overlay<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let board_w = snap.width as u16 * self.cell_w;
        let board_h = snap.height as u16;
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;
        let start_x = viewport.width.saturating_sub(frame_w + 24) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for i in 0..snap.width * snap.height {
            let (row, col) = ((i / snap.width) as u16, (i % snap.width) as u16);
            let x = start_x + 1 + col * self.cell_w;
            let y = start_y + 1 + row;
            let (glyph, marker, mut style) = cell_look(snap, i);

            let hinted = overlay.hint.is_some_and(|(a, b)| a == i || b == i);
            if overlay.selected == Some(i) {
                style.bg = Rgb::new(90, 90, 40);
            } else if hinted {
                style.bg = Rgb::new(40, 70, 40);
            }
            if overlay.cursor == Some(i) {
                style = style.reverse();
            }

            fb.put_char(x, y, glyph, style);
            fb.put_char(x + 1, y, marker, style);
            if self.cell_w > 2 {
                fb.fill_rect(x + 2, y, self.cell_w - 2, 1, ' ', style);
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x + frame_w + 2, start_y);

        if let Some(msg) = overlay.message {
            let style = CellStyle::new(Rgb::new(255, 220, 120), PANEL_BG).bold();
            let x = start_x + frame_w.saturating_sub(msg.chars().count() as u16) / 2;
            fb.put_str(x, start_y + frame_h, msg, style);
        }

        match snap.phase {
            LevelPhase::Complete { .. } => {
                draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "LEVEL COMPLETE  [n]")
            }
            LevelPhase::Failed => {
                draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER  [r]")
            }
            _ => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, overlay: &Overlay<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, overlay, viewport, &mut fb);
        fb
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }
        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let dim = value.dim();

        let mut y = start_y;
        let x = fb.put_str(panel_x, y, "LEVEL ", label);
        let x = fb.put_u64(x, y, snap.level as u64, value);
        fb.put_str(x + 1, y, snap.mode.as_str(), dim);
        y += 2;

        fb.put_str(panel_x, y, "SCORE", label);
        y += 1;
        let x = fb.put_u64(panel_x, y, snap.score, value);
        let x = fb.put_str(x, y, " / ", dim);
        fb.put_u64(x, y, snap.target_score, dim);
        y += 1;
        draw_progress(fb, panel_x, y, snap.progress_percent());
        y += 2;

        if snap.timed {
            fb.put_str(panel_x, y, "TIME", label);
            y += 1;
            let style = if snap.time_left <= 10 {
                CellStyle::new(Rgb::new(230, 80, 80), PANEL_BG).bold()
            } else {
                value
            };
            let x = fb.put_u64(panel_x, y, snap.time_left as u64, style);
            fb.put_char(x, y, 's', style);
        } else {
            fb.put_str(panel_x, y, "MOVES", label);
            y += 1;
            fb.put_u64(panel_x, y, snap.moves as u64, value);
        }
        y += 2;

        fb.put_str(panel_x, y, "GOALS", label);
        y += 1;
        let config = snap.mode.config();
        for obj in &snap.objectives {
            if y >= viewport.height {
                return;
            }
            let style = if obj.is_complete() {
                dim
            } else {
                CellStyle::new(symbol_color(obj.symbol), PANEL_BG)
            };
            let x = fb.put_str(panel_x, y, config.glyph(obj.symbol), style);
            let x = fb.put_str(x, y, " ", style);
            let x = fb.put_u64(x, y, obj.current.min(obj.target) as u64, style);
            let x = fb.put_str(x, y, "/", style);
            fb.put_u64(x, y, obj.target as u64, style);
            y += 1;
        }
        y += 1;

        fb.put_str(panel_x, y, "POWERS", label);
        y += 1;
        for kind in PowerKind::ALL {
            if y >= viewport.height {
                return;
            }
            let style = if snap.selected_power == Some(kind) {
                value.reverse()
            } else if snap.superpowers.count(kind) == 0 {
                dim
            } else {
                value
            };
            let x = fb.put_str(panel_x, y, kind.as_str(), style);
            let x = fb.put_str(x, y, " x", style);
            fb.put_u64(x, y, snap.superpowers.count(kind) as u64, style);
            y += 1;
        }

        if snap.combo > 1 && y + 1 < viewport.height {
            let x = fb.put_str(panel_x, y + 1, "COMBO x", label);
            fb.put_u64(x, y + 1, snap.combo as u64, label);
        }
    }
}

fn symbol_color(symbol: Symbol) -> Rgb {
    SYMBOL_COLORS[symbol.index() % SYMBOL_COLORS.len()]
}

/// Glyph, special marker and style of one board cell
fn cell_look(snap: &GameSnapshot, i: usize) -> (char, char, CellStyle) {
    if let Some(kind) = snap.obstacles.get(i).copied().flatten() {
        let health = snap.health.get(i).copied().flatten();
        let digit = health
            .and_then(|h| char::from_digit(h as u32, 10))
            .unwrap_or(' ');
        return match kind {
            ObstacleKind::Ice => ('░', '░', CellStyle::new(Rgb::new(170, 220, 255), BOARD_BG)),
            ObstacleKind::Chocolate => ('▓', '▓', CellStyle::new(Rgb::new(140, 90, 50), BOARD_BG)),
            ObstacleKind::Trash => ('#', digit, CellStyle::new(Rgb::new(160, 160, 160), BOARD_BG).bold()),
            ObstacleKind::IceSpawner => ('I', digit, CellStyle::new(Rgb::new(120, 200, 255), BOARD_BG).bold()),
            ObstacleKind::ChocolateSpawner => {
                ('C', digit, CellStyle::new(Rgb::new(180, 110, 60), BOARD_BG).bold())
            }
        };
    }

    let Some(symbol) = snap.symbols.get(i).copied().flatten() else {
        return ('·', ' ', CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim());
    };
    let glyph = snap
        .mode
        .config()
        .glyph(symbol)
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?');
    let mut style = CellStyle::new(symbol_color(symbol), BOARD_BG);
    if snap.is_objective_cell(i) {
        style = style.bold();
    }
    let marker = match snap.specials.get(i).copied().flatten() {
        Some(SpecialKind::RowClear) => '─',
        Some(SpecialKind::ColClear) => '│',
        Some(SpecialKind::AreaBomb) => '*',
        Some(SpecialKind::ColorClear) => '@',
        None => ' ',
    };
    (glyph, marker, style)
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_progress(fb: &mut FrameBuffer, x: u16, y: u16, percent: u32) {
    const WIDTH: u32 = 10;
    let filled = (percent.min(100) * WIDTH / 100) as u16;
    let on = CellStyle::new(Rgb::new(120, 220, 120), PANEL_BG);
    let off = CellStyle::new(Rgb::new(70, 70, 70), PANEL_BG);
    for i in 0..WIDTH as u16 {
        let style = if i < filled { on } else { off };
        fb.put_char(x + i, y, if i < filled { '█' } else { '░' }, style);
    }
}

fn draw_overlay_text(fb: &mut FrameBuffer, start_x: u16, start_y: u16, frame_w: u16, frame_h: u16, text: &str) {
    let mid_y = start_y.saturating_add(frame_h / 2);
    let text_w = text.chars().count() as u16;
    let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
    fb.put_str(x, mid_y, text, style);
}
