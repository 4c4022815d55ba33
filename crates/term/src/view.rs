//! SessionView: projects a session into a terminal framebuffer.
//!
//! This module is pure (no I/O). It only reads the session; the same session
//! state always produces the same frame.

use std::time::Duration;

use crate::core::{Session, SessionState};
use crate::engine::{Engine, Playfield};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{CellKind, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, NEXT_QUEUE_LEN};

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

    /// The session's last reported bounds, or `fallback` before any resize.
    pub fn of<E>(session: &Session<E>, fallback: Viewport) -> Self {
        session
            .bounds()
            .map(|(w, h)| Self::new(w, h))
            .unwrap_or(fallback)
    }
}

const SHORT_HELP: &str = "p pause  ? help  q quit";

const FULL_HELP: [&str; 9] = [
    "left/right  move",
    "up, x  rotate",
    "z  rotate back",
    "down  soft drop",
    "space  hard drop",
    "c  hold",
    "p, esc  pause",
    "?  close help",
    "q  quit",
];

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);

pub struct SessionView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for SessionView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self { cell_w: 2 }
    }
}

impl SessionView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to `viewport`.
    pub fn render_into<E>(&self, session: &Session<E>, viewport: Viewport, fb: &mut FrameBuffer)
    where
        E: Engine + Playfield,
    {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let board_w = u16::from(BOARD_WIDTH) * self.cell_w;
        let board_h = u16::from(BOARD_HEIGHT);
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;

        // Header row, frame, help row.
        let start_x = viewport.width.saturating_sub(frame_w + 20) / 2;
        let start_y = viewport.height.saturating_sub(frame_h + 2) / 2;
        let frame_y = start_y + 1;

        self.draw_header(fb, session.state(), start_x, start_y, frame_w);

        let play = CellStyle::fg(Rgb::new(80, 80, 90)).on(PLAY_BG);
        fb.fill_rect(start_x + 1, frame_y + 1, board_w, board_h, ' ', play);
        let border = CellStyle::fg(Rgb::new(200, 200, 200));
        draw_border(fb, start_x, frame_y, frame_w, frame_h, border);

        let engine = session.engine();
        for y in 0..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH {
                let (ch, style) = cell_glyph(engine.cell(x, y));
                let px = start_x + 1 + u16::from(x) * self.cell_w;
                fb.fill_rect(px, frame_y + 1 + u16::from(y), self.cell_w, 1, ch, style);
            }
        }

        self.draw_side_panel(fb, session, start_x + frame_w + 2, frame_y);

        let help_y = frame_y + frame_h;
        if session.show_help() {
            self.draw_full_help(fb, start_x, frame_y, frame_w);
        } else {
            fb.put_str(start_x, help_y, SHORT_HELP, CellStyle::default().dim());
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render<E>(&self, session: &Session<E>, viewport: Viewport) -> FrameBuffer
    where
        E: Engine + Playfield,
    {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(session, viewport, &mut fb);
        fb
    }

    fn draw_header(&self, fb: &mut FrameBuffer, state: SessionState, x: u16, y: u16, frame_w: u16) {
        let (text, color) = match state {
            SessionState::Running => ("RUNNING", Rgb::new(100, 220, 120)),
            SessionState::Paused => ("PAUSED", Rgb::new(240, 220, 80)),
            SessionState::Finished | SessionState::Terminated => {
                ("GAME OVER", Rgb::new(220, 80, 80))
            }
        };
        let text_w = text.len() as u16;
        let cx = x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        fb.put_str(cx, y, text, CellStyle::fg(color).bold());
    }

    fn draw_side_panel<E>(&self, fb: &mut FrameBuffer, session: &Session<E>, x: u16, y: u16)
    where
        E: Engine + Playfield,
    {
        if x >= fb.width() {
            return;
        }
        let label = CellStyle::default().bold();
        let value = CellStyle::fg(Rgb::new(200, 200, 200));
        let stats = session.engine().stats();

        let mut y = y;
        let counters = [
            ("SCORE", stats.score),
            ("LEVEL", stats.level),
            ("LINES", stats.lines),
        ];
        for (name, n) in counters {
            fb.put_str(x, y, name, label);
            fb.put_u32(x, y + 1, n, value);
            y += 3;
        }

        fb.put_str(x, y, "TIME", label);
        fb.put_str(x, y + 1, &format_elapsed(session.elapsed()), value);
        y += 3;

        fb.put_str(x, y, "HOLD", label);
        match session.engine().hold_piece() {
            Some(kind) => {
                fb.put_char(x, y + 1, piece_letter(kind), piece_style(kind));
            }
            None => {
                fb.put_char(x, y + 1, '-', value.dim());
            }
        }
        y += 3;

        fb.put_str(x, y, "NEXT", label);
        y += 1;
        for &kind in session.engine().next_pieces().iter().take(NEXT_QUEUE_LEN) {
            fb.put_char(x, y, piece_letter(kind), piece_style(kind));
            y += 1;
        }
    }

    fn draw_full_help(&self, fb: &mut FrameBuffer, x: u16, frame_y: u16, frame_w: u16) {
        let w = frame_w.saturating_sub(2);
        let h = FULL_HELP.len() as u16 + 2;
        let top = frame_y + 2;
        let style = CellStyle::default().on(Rgb::new(0, 0, 0));
        fb.fill_rect(x + 1, top, w, h, ' ', style);
        for (i, line) in FULL_HELP.iter().enumerate() {
            fb.put_str(x + 2, top + 1 + i as u16, line, style);
        }
    }
}

/// `SS.mmm` during the first minute, `MM:SS` after.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{:02}.{:03}", secs, elapsed.subsec_millis())
    } else {
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
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

fn cell_glyph(cell: CellKind) -> (char, CellStyle) {
    match cell {
        CellKind::Empty => ('·', CellStyle::fg(Rgb::new(90, 90, 100)).on(PLAY_BG).dim()),
        CellKind::Ghost => ('░', CellStyle::fg(Rgb::new(140, 140, 140)).on(PLAY_BG).dim()),
        CellKind::Filled(kind) => ('█', piece_style(kind).on(PLAY_BG).bold()),
    }
}

fn piece_style(kind: PieceKind) -> CellStyle {
    let fg = match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    };
    CellStyle::fg(fg)
}

fn piece_letter(kind: PieceKind) -> char {
    match kind {
        PieceKind::I => 'I',
        PieceKind::O => 'O',
        PieceKind::T => 'T',
        PieceKind::S => 'S',
        PieceKind::Z => 'Z',
        PieceKind::J => 'J',
        PieceKind::L => 'L',
    }
}
