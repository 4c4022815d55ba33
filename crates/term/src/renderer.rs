//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The first frame after entering, after [`TerminalRenderer::invalidate`] or
//! after a size change is a full redraw; later frames only rewrite the spans
//! of cells that changed.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    enhanced_keys: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
            enhanced_keys: false,
        }
    }

    /// Enter raw mode and the alternate screen.
    ///
    /// Returns whether the terminal will report key releases (kitty keyboard
    /// protocol).
    pub fn enter(&mut self) -> Result<bool> {
        terminal::enable_raw_mode()?;
        self.enhanced_keys = terminal::supports_keyboard_enhancement().unwrap_or(false);

        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        if self.enhanced_keys {
            self.buf.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.flush_buf()?;
        Ok(self.enhanced_keys)
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        if self.enhanced_keys {
            self.buf.queue(PopKeyboardEnhancementFlags)?;
        }
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (after a resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `fb`, then swap it with the previous frame.
    ///
    /// Keep one `FrameBuffer` and pass it in every frame: after the call it
    /// holds the frame before last, ready to be rendered into again.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        encode_frame(self.last.as_ref(), fb, &mut self.buf)?;
        self.flush_buf()?;

        let mut prev = self
            .last
            .take()
            .unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode `next` into `out` as crossterm commands.
///
/// Without a comparable `prev` (first frame, or a size change) the screen is
/// cleared and every row repainted; otherwise only the spans that differ
/// from `prev` are written.
pub fn encode_frame(
    prev: Option<&FrameBuffer>,
    next: &FrameBuffer,
    out: &mut Vec<u8>,
) -> Result<()> {
    let mut painter = Painter::new(out);
    let width = usize::from(next.width());

    match prev.filter(|p| p.width() == next.width() && p.height() == next.height()) {
        Some(prev) => {
            for span in dirty_spans(prev, next) {
                let from = span.y as usize * width + span.x as usize;
                let cells = &next.cells()[from..from + span.len as usize];
                painter.paint(span.x, span.y, cells)?;
            }
        }
        None => {
            painter.out.queue(terminal::Clear(terminal::ClearType::All))?;
            if width > 0 {
                for (y, row) in next.cells().chunks(width).enumerate() {
                    painter.paint(0, y as u16, row)?;
                }
            }
        }
    }

    painter.finish()
}

/// A horizontal run of changed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    x: u16,
    y: u16,
    len: u16,
}

/// Maximal runs of cells that differ between two same-sized frames.
fn dirty_spans(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<Span> {
    let width = usize::from(next.width());
    let mut spans = Vec::new();
    if width == 0 {
        return spans;
    }

    let rows = prev.cells().chunks(width).zip(next.cells().chunks(width));
    for (y, (old, new)) in rows.enumerate() {
        let mut open: Option<u16> = None;
        for (x, (a, b)) in old.iter().zip(new).enumerate() {
            let x = x as u16;
            match (a != b, open) {
                (true, None) => open = Some(x),
                (false, Some(start)) => {
                    spans.push(Span { x: start, y: y as u16, len: x - start });
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(start) = open {
            spans.push(Span { x: start, y: y as u16, len: width as u16 - start });
        }
    }
    spans
}

/// Writes cells while tracking the terminal's current style, so that only
/// the parts of a style that change between cells are emitted.
struct Painter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> Painter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn paint(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        self.out.queue(cursor::MoveTo(x, y))?;
        for cell in cells {
            self.set_style(cell.style)?;
            self.out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    fn set_style(&mut self, style: CellStyle) -> Result<()> {
        let prev = match self.style {
            Some(prev) if prev == style => return Ok(()),
            Some(prev) if prev.bold == style.bold && prev.dim == style.dim => Some(prev),
            _ => None,
        };

        // An attribute reset also drops colors on some terminals.
        if prev.is_none() {
            self.out.queue(SetAttribute(Attribute::Reset))?;
            if style.bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                self.out.queue(SetAttribute(Attribute::Dim))?;
            }
        }
        if prev.map(|p| p.fg) != Some(style.fg) {
            self.out.queue(SetForegroundColor(color(style.fg)))?;
        }
        if prev.map(|p| p.bg) != Some(style.bg) {
            self.out.queue(SetBackgroundColor(color(style.bg)))?;
        }
        self.style = Some(style);
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
