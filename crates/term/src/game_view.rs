//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Coord, Token, MAX_PIECE_COUNT};

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

/// Vertical placement of the board frame inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const CURSOR_BG: Rgb = Rgb::new(75, 75, 95);
const SELECTED_BG: Rgb = Rgb::new(150, 130, 40);

const PALETTE: [Rgb; MAX_PIECE_COUNT as usize] = [
    Rgb::new(220, 80, 80),
    Rgb::new(80, 200, 110),
    Rgb::new(80, 130, 230),
    Rgb::new(240, 210, 80),
    Rgb::new(200, 110, 220),
    Rgb::new(80, 210, 210),
    Rgb::new(255, 155, 40),
    Rgb::new(235, 235, 235),
    Rgb::new(160, 90, 50),
    Rgb::new(150, 230, 60),
    Rgb::new(255, 120, 170),
    Rgb::new(120, 120, 255),
    Rgb::new(0, 160, 140),
    Rgb::new(190, 190, 110),
    Rgb::new(140, 60, 160),
    Rgb::new(120, 120, 120),
];

/// Display color of a token.
pub fn token_color(token: Token) -> Rgb {
    PALETTE[token.index() as usize % PALETTE.len()]
}

/// A lightweight terminal renderer for the match-3 board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Board placement inside the viewport.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Terminal position of the top-left char of board cell `c`.
    pub fn cell_origin(&self, snap: &GameSnapshot, viewport: Viewport, c: Coord) -> Option<(u16, u16)> {
        if c.x < 0 || c.y < 0 || c.x as u8 >= snap.width || c.y as u8 >= snap.height {
            return None;
        }
        let frame = self.frame(snap, viewport);
        let row = (snap.height - 1 - c.y as u8) as u16;
        Some((
            frame.x + 1 + c.x as u16 * self.cell_w,
            frame.y + 1 + row * self.cell_h,
        ))
    }

    fn frame(&self, snap: &GameSnapshot, viewport: Viewport) -> Frame {
        let w = snap.width as u16 * self.cell_w + 2;
        let h = snap.height as u16 * self.cell_h + 2;
        let x = viewport.width.saturating_sub(w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        Frame { x, y, w, h }
    }

    /// Render the round into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        cursor: Option<Coord>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let frame = self.frame(snap, viewport);
        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            frame.w - 2,
            frame.h - 2,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG),
        );
        fb.draw_box(frame.x, frame.y, frame.w, frame.h, border);

        let selected = snap.selected_coord();
        // No cursor while clicks would be rejected.
        let cursor = cursor.filter(|_| snap.playable());
        for y in 0..snap.height as i8 {
            for x in 0..snap.width as i8 {
                let c = Coord::new(x, y);
                let bg = if selected == Some(c) {
                    SELECTED_BG
                } else if cursor == Some(c) {
                    CURSOR_BG
                } else {
                    BOARD_BG
                };
                self.draw_cell(fb, snap, viewport, c, bg);
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if !snap.running {
            let mid = frame.y + frame.h / 2;
            let title = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
            let hint = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
            if snap.round_id > 0 {
                fb.put_str_centered(frame.x, frame.w, mid.saturating_sub(1), "GAME OVER", title);
            }
            fb.put_str_centered(frame.x, frame.w, mid, "N: new", hint);
            fb.put_str_centered(frame.x, frame.w, mid + 1, "R: rush", hint);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, cursor: Option<Coord>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    fn draw_cell(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, c: Coord, bg: Rgb) {
        let Some((px, py)) = self.cell_origin(snap, viewport, c) else {
            return;
        };
        match snap.cell(c.x, c.y) {
            Some(v) => {
                let style = CellStyle::new(token_color(Token::new(v)), bg).bold();
                fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
                fb.put_char(px, py, '●', style);
            }
            None => {
                let style = CellStyle::new(Rgb::new(90, 90, 100), bg).dim();
                fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
                fb.put_char(px, py, '·', style);
            }
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0)).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = frame.y;
        fb.put_str(panel_x, y, "POINTS", label);
        fb.put_u64(panel_x, y + 1, snap.points, value);
        y += 3;

        fb.put_str(panel_x, y, "GOAL", label);
        fb.put_u64(panel_x, y + 1, snap.round_goal, value);
        y += 3;

        fb.put_str(panel_x, y, "TIME", label);
        let end = fb.put_u64(panel_x, y + 1, (snap.timer_ms / 1000) as u64, value);
        let end = fb.put_str(end, y + 1, ".", value);
        fb.put_u64(end, y + 1, ((snap.timer_ms % 1000) / 100) as u64, value);
        y += 3;

        fb.put_str(panel_x, y, "MODE", label);
        fb.put_str(panel_x, y + 1, if snap.rush { "RUSH" } else { "NORMAL" }, value);
        y += 3;

        if snap.resolving {
            fb.put_str(panel_x, y, "...", value.dim());
        }
    }
}
