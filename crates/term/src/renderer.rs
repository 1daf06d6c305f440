//! TerminalRenderer: flushes a framebuffer to the real terminal.
//!
//! Frames are diffed against the previous one and only changed runs are written. Mouse
//! capture is switched on with the alternate screen so clicks reach the board.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// A horizontal run of changed cells: `(x, y, len)`
pub type Span = (u16, u16, u16);

pub struct TerminalRenderer {
    out: io::Stdout,
    previous: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            previous: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(EnableMouseCapture)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(DisableMouseCapture)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush()?;
        terminal::disable_raw_mode().context("disable raw mode")?;
        Ok(())
    }

    /// Force a full redraw on the next frame (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Draw `frame`, then keep a copy to diff the next frame against.
    pub fn draw(&mut self, frame: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        match self.previous.as_mut() {
            Some(prev) if prev.width() == frame.width() && prev.height() == frame.height() => {
                encode_spans(frame, &changed_spans(prev, frame), &mut self.buf)?;
                prev.clone_from(frame);
            }
            _ => {
                encode_full(frame, &mut self.buf)?;
                self.previous = Some(frame.clone());
            }
        }
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Changed runs between two equally sized frames, top to bottom, left to right.
pub fn changed_spans(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<Span> {
    let mut spans = Vec::new();
    for y in 0..next.height() {
        let mut run_start: Option<u16> = None;
        for x in 0..next.width() {
            let differs = prev.get(x, y) != next.get(x, y);
            match (differs, run_start) {
                (true, None) => run_start = Some(x),
                (false, Some(start)) => {
                    spans.push((start, y, x - start));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            spans.push((start, y, next.width() - start));
        }
    }
    spans
}

/// Encode a full redraw of `frame` into `out`.
pub fn encode_full(frame: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let rows: Vec<Span> = (0..frame.height()).map(|y| (0, y, frame.width())).collect();
    encode_spans(frame, &rows, out)
}

/// Encode the given runs of `frame` into `out`, switching style only when it changes.
pub fn encode_spans(frame: &FrameBuffer, spans: &[Span], out: &mut Vec<u8>) -> Result<()> {
    let mut style: Option<CellStyle> = None;
    for &(x, y, len) in spans {
        out.queue(cursor::MoveTo(x, y))?;
        for cx in x..x + len {
            let cell = frame.get(cx, y).unwrap_or_default();
            if style != Some(cell.style) {
                queue_style(out, cell.style)?;
                style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn queue_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(color(style.fg)))?;
    out.queue(SetBackgroundColor(color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_spans_coalesce_and_split() {
        let before = FrameBuffer::new(6, 2);
        let mut after = before.clone();
        let style = CellStyle::default();
        after.put_str(1, 0, "ab", style);
        after.put_char(5, 0, 'z', style);
        after.put_char(0, 1, 'q', style);

        assert_eq!(
            changed_spans(&before, &after),
            vec![(1, 0, 2), (5, 0, 1), (0, 1, 1)]
        );
    }

    #[test]
    fn test_identical_frames_have_no_spans() {
        let fb = FrameBuffer::new(3, 3);
        assert!(changed_spans(&fb, &fb.clone()).is_empty());
    }

    #[test]
    fn test_encoding_contains_text() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(0, 0, "GO", CellStyle::default());
        let mut out = Vec::new();
        encode_full(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('G') && text.contains('O'));
    }
}
