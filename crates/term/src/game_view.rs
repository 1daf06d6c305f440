//! GameView: maps a session snapshot into a terminal framebuffer.
//!
//! This module is pure (no I/O). Row 0 of the board is drawn at the bottom of the frame,
//! matching the grid's column-major, bottom-up layout.

use crate::core::{GameSnapshot, TileSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::settle::{SettleTracker, TileStage};
use crate::types::{FinishReason, SessionPhase, TileKind};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

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

/// Front-end state drawn on top of the snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewState<'a> {
    pub cursor: Option<(usize, usize)>,
    pub settle: Option<&'a SettleTracker>,
    /// One-line message under the board
    pub status: Option<&'a str>,
}

/// Screen rectangle of the board frame, border included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoardFrame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

pub struct GameView {
    /// Tile width in terminal columns.
    cell_w: u16,
    /// Tile height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Three columns leave room for the kind letter between cursor brackets.
        Self {
            cell_w: 3,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    fn frame(&self, columns: usize, rows: usize, viewport: Viewport) -> BoardFrame {
        let w = (columns as u16).saturating_mul(self.cell_w).saturating_add(2);
        let h = (rows as u16).saturating_mul(self.cell_h).saturating_add(2);
        BoardFrame {
            x: viewport.width.saturating_sub(w) / 2,
            y: viewport.height.saturating_sub(h) / 2,
            w,
            h,
        }
    }

    /// Top-left terminal cell of slot `(col, row)`
    fn slot_origin(&self, frame: BoardFrame, rows: usize, col: usize, row: usize) -> (u16, u16) {
        let from_top = (rows - 1 - row) as u16;
        (
            frame
                .x
                .saturating_add(1)
                .saturating_add((col as u16).saturating_mul(self.cell_w)),
            frame
                .y
                .saturating_add(1)
                .saturating_add(from_top.saturating_mul(self.cell_h)),
        )
    }

    /// Board slot under terminal position `(x, y)`, if any.
    pub fn hit_test(
        &self,
        snap: &GameSnapshot,
        viewport: Viewport,
        x: u16,
        y: u16,
    ) -> Option<(usize, usize)> {
        let (columns, rows) = (snap.board.columns, snap.board.rows);
        let frame = self.frame(columns, rows, viewport);
        let dx = x.checked_sub(frame.x.saturating_add(1))?;
        let dy = y.checked_sub(frame.y.saturating_add(1))?;
        let col = (dx / self.cell_w) as usize;
        let from_top = (dy / self.cell_h) as usize;
        if col >= columns || from_top >= rows {
            return None;
        }
        Some((col, rows - 1 - from_top))
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        state: &ViewState<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (columns, rows) = (snap.board.columns, snap.board.rows);
        let frame = self.frame(columns, rows, viewport);
        let background = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();

        fb.fill_rect(frame.x + 1, frame.y + 1, frame.w - 2, frame.h - 2, ' ', background);
        draw_border(fb, frame, CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG));

        for col in 0..columns {
            for row in 0..rows {
                let (px, py) = self.slot_origin(frame, rows, col, row);
                let tile = snap.board.get(col, row).filter(|t| {
                    state.settle.map_or(true, |s| s.stage(t.id) != TileStage::Pending)
                });
                match tile {
                    Some(tile) => self.draw_tile(fb, px, py, tile, state.settle),
                    None => fb.fill_rect(px, py, self.cell_w, self.cell_h, '·', background),
                }
                if state.cursor == Some((col, row)) && snap.playable() {
                    self.draw_cursor(fb, px, py);
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if let Some(status) = state.status {
            let style = CellStyle::new(Rgb::new(180, 180, 190), PANEL_BG);
            fb.put_str(frame.x, frame.y + frame.h, status, style);
        }

        if let Some(text) = overlay_text(snap) {
            let hint = match snap.phase {
                SessionPhase::Finished(_) => Some("R to restart"),
                _ => None,
            };
            draw_overlay(fb, frame, &text, hint);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, state: &ViewState<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, state, viewport, &mut fb);
        fb
    }

    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        px: u16,
        py: u16,
        tile: TileSnapshot,
        settle: Option<&SettleTracker>,
    ) {
        let settling = settle.is_some_and(|s| s.stage(tile.id) == TileStage::Settling);
        let mut bg = kind_color(tile.kind);
        if settling {
            bg = bg.darken();
        }
        let mut style = CellStyle::new(Rgb::new(20, 20, 20), bg);
        if tile.power {
            style = CellStyle::new(Rgb::new(255, 255, 255), bg).bold();
        }
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);

        let glyph = if tile.power { '*' } else { tile.kind.letter() };
        fb.put_char(px + self.cell_w / 2, py + self.cell_h / 2, glyph, style);
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, px: u16, py: u16) {
        let mid = py + self.cell_h / 2;
        if self.cell_w >= 3 {
            for (x, ch) in [(px, '['), (px + self.cell_w - 1, ']')] {
                let bg = fb.get(x, mid).map_or(BOARD_BG, |c| c.style.bg);
                fb.put_char(x, mid, ch, CellStyle::new(Rgb::new(255, 255, 255), bg).bold());
            }
        } else if let Some(cell) = fb.get(px, mid) {
            let inverted = CellStyle::new(cell.style.bg, cell.style.fg).bold();
            fb.put_char(px, mid, cell.ch, inverted);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame: BoardFrame,
    ) {
        let x = frame.x.saturating_add(frame.w).saturating_add(2);
        if x.saturating_add(12) > viewport.width {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let mut y = frame.y;

        let mut pair = |fb: &mut FrameBuffer, title: &str, current: u32, total: Option<u32>| {
            fb.put_str(x, y, title, label);
            let end = fb.put_u32(x, y + 1, current, value);
            if let Some(total) = total {
                let end = fb.put_str(end, y + 1, " / ", value);
                fb.put_u32(end, y + 1, total, value);
            }
            y = y.saturating_add(3);
        };

        pair(fb, "SCORE", snap.score, Some(snap.win_score));
        pair(fb, "TURNS", snap.turns_remaining, Some(snap.turn_budget));
        pair(fb, "SHUFFLES", snap.shuffles_remaining, None);
        pair(fb, "GAME", snap.episode_id + 1, None);

        let help = CellStyle::new(Rgb::new(140, 140, 150), PANEL_BG);
        for line in ["click/space: blast", "right/s: shuffle", "r: restart  q: quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(x, y, line, help);
            y += 1;
        }
    }
}

/// Message shown over the board for the current phase, if any
pub fn overlay_text(snap: &GameSnapshot) -> Option<String> {
    match snap.phase {
        SessionPhase::Init => Some("Press N to start".to_string()),
        SessionPhase::Playing => None,
        SessionPhase::Finished(FinishReason::Win) => Some("VICTORY!".to_string()),
        SessionPhase::Finished(FinishReason::TurnsExhausted) => Some(format!(
            "Could not reach {} points in {} turns",
            snap.win_score, snap.turn_budget
        )),
        SessionPhase::Finished(FinishReason::NoMovesLeft) => Some("No moves left".to_string()),
    }
}

fn kind_color(kind: TileKind) -> Rgb {
    match kind {
        TileKind::Green => Rgb::new(90, 200, 100),
        TileKind::Blue => Rgb::new(80, 130, 230),
        TileKind::Yellow => Rgb::new(235, 210, 80),
        TileKind::Purple => Rgb::new(170, 100, 215),
        TileKind::Red => Rgb::new(220, 75, 75),
    }
}

fn draw_border(fb: &mut FrameBuffer, frame: BoardFrame, style: CellStyle) {
    let BoardFrame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
}

fn draw_overlay(fb: &mut FrameBuffer, frame: BoardFrame, text: &str, hint: Option<&str>) {
    let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
    let center_x = frame.x + frame.w / 2;
    let mid_y = frame.y + frame.h / 2;
    for (dy, line) in std::iter::once(text).chain(hint).enumerate() {
        let half = line.chars().count() as u16 / 2;
        fb.put_str(center_x.saturating_sub(half), mid_y + dy as u16, line, style);
    }
}
