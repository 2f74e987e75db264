//! Terminal output for the board view.
//!
//! A frame is written as spans: horizontal stretches of cells that differ
//! from the frame on screen. The first frame, and the first after a resize
//! or `invalidate`, covers every row.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Attrs, Cell, CellStyle, FrameBuffer, Rgb};

/// A stretch of `len` dirty cells starting at column `x` of row `y`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

/// Dirty spans of `next` relative to `prev`, row by row
pub fn changed_spans<'a>(prev: &'a FrameBuffer, next: &'a FrameBuffer) -> impl Iterator<Item = Span> + 'a {
    let resized = prev.width() != next.width() || prev.height() != next.height();
    (0..next.height()).flat_map(move |y| {
        let new_row = next.row(y);
        let old_row = if resized { &[][..] } else { prev.row(y) };
        row_spans(y, old_row, new_row)
    })
}

fn row_spans(y: u16, old: &[Cell], new: &[Cell]) -> Vec<Span> {
    let dirty = |x: usize| old.get(x) != Some(&new[x]);
    let mut spans = Vec::new();
    let mut x = 0;
    while x < new.len() {
        if !dirty(x) {
            x += 1;
            continue;
        }
        let start = x;
        while x < new.len() && dirty(x) {
            x += 1;
        }
        spans.push(Span {
            x: start as u16,
            y,
            len: (x - start) as u16,
        });
    }
    spans
}

/// Emits style changes only when the next cell needs a different style
#[derive(Default)]
struct Pen {
    style: Option<CellStyle>,
}

impl Pen {
    fn print(&mut self, out: &mut Vec<u8>, cell: Cell) -> Result<()> {
        if self.style != Some(cell.style) {
            queue_style(out, cell.style)?;
            self.style = Some(cell.style);
        }
        out.queue(Print(cell.ch))?;
        Ok(())
    }

    fn finish(self, out: &mut Vec<u8>) -> Result<()> {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn queue_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(color(style.fg)))?;
    out.queue(SetBackgroundColor(color(style.bg)))?;
    for (flag, attr) in [
        (Attrs::BOLD, Attribute::Bold),
        (Attrs::DIM, Attribute::Dim),
        (Attrs::REVERSE, Attribute::Reverse),
    ] {
        if style.attrs.contains(flag) {
            out.queue(SetAttribute(attr))?;
        }
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

fn encode_spans(fb: &FrameBuffer, spans: impl Iterator<Item = Span>, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = Pen::default();
    for span in spans {
        out.queue(cursor::MoveTo(span.x, span.y))?;
        let row = fb.row(span.y);
        for &cell in &row[span.x as usize..(span.x + span.len) as usize] {
            pen.print(out, cell)?;
        }
    }
    pen.finish(out)
}

/// Clear the screen and write every cell of `fb` into `out`
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let rows = (0..fb.height()).map(|y| Span {
        x: 0,
        y,
        len: fb.width(),
    });
    encode_spans(fb, rows, out)
}

/// Write only the cells of `next` that differ from `prev` into `out`
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    encode_spans(next, changed_spans(prev, next), out)
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// What the terminal currently shows.
    shown: FrameBuffer,
    full_redraw: bool,
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
            stdout: io::stdout(),
            shown: FrameBuffer::new(0, 0),
            full_redraw: true,
            buf: Vec::with_capacity(32 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.buf.queue(cursor::Hide)?;
        self.flush()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        Pen::default().finish(&mut self.buf)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Redraw everything on the next frame (after a resize)
    pub fn invalidate(&mut self) {
        self.full_redraw = true;
    }

    /// Put `fb` on screen.
    ///
    /// On return `fb` holds the frame that was shown before, ready to be
    /// drawn over for the next frame.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let resized = self.shown.width() != fb.width() || self.shown.height() != fb.height();
        if self.full_redraw || resized {
            encode_full_into(fb, &mut self.buf)?;
            self.full_redraw = false;
        } else {
            encode_diff_into(&self.shown, fb, &mut self.buf)?;
        }
        self.flush()?;

        std::mem::swap(&mut self.shown, fb);
        fb.resize(self.shown.width(), self.shown.height());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}
