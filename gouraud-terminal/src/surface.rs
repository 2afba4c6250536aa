/// Half-block terminal surface: each character cell shows two pixel rows
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use gouraud_core::error::SurfaceError;
use gouraud_core::{Color as Rgba, FrameBuffer, Surface};
use std::io::Write;

/// Upper half block; foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '\u{2580}';

/// A [`FrameBuffer`] that presents itself to a terminal with 24-bit colour.
///
/// The pixel height is twice the number of cell rows given, starting at
/// `top_row` so lines above it stay free for a status bar.
pub struct TerminalSurface<W: Write> {
    frame: FrameBuffer,
    writer: W,
    top_row: u16,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(writer: W, columns: u16, rows: u16, top_row: u16, background: Rgba) -> Result<Self, SurfaceError> {
        let frame = FrameBuffer::with_background(columns as usize, rows as usize * 2, background)?;
        Ok(Self {
            frame,
            writer,
            top_row,
        })
    }

    /// Resize to a new cell grid; the contents are cleared
    pub fn resize(&mut self, columns: u16, rows: u16) -> Result<(), SurfaceError> {
        self.frame.resize(columns as usize, rows as usize * 2)
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn width(&self) -> usize {
        self.frame.width()
    }

    fn height(&self) -> usize {
        self.frame.height()
    }

    fn clear(&mut self) {
        self.frame.clear();
    }

    fn set_pixel(&mut self, x: i32, y: i32, depth: f32, color: Rgba) -> bool {
        self.frame.set_pixel(x, y, depth, color)
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        let rows: Vec<&[[u8; 3]]> = self.frame.rows().collect();
        let mut last: Option<([u8; 3], [u8; 3])> = None;

        for (cell_row, pair) in rows.chunks(2).enumerate() {
            self.writer
                .queue(cursor::MoveTo(0, self.top_row + cell_row as u16))?;
            let top = pair[0];
            let bottom = pair.get(1).copied().unwrap_or(top);
            for (&upper, &lower) in top.iter().zip(bottom) {
                // only emit colour changes
                if last != Some((upper, lower)) {
                    self.writer
                        .queue(SetForegroundColor(rgb(upper)))?
                        .queue(SetBackgroundColor(rgb(lower)))?;
                    last = Some((upper, lower));
                }
                self.writer.queue(Print(HALF_BLOCK))?;
            }
        }

        self.writer.queue(ResetColor)?;
        self.writer.flush()?;
        Ok(())
    }
}
