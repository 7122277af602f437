use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use tp_core::frame::{CellColor, GlyphCell, RenderedGrid};

/// Nombre de lignes écrites entre deux flush.
pub const FLUSH_EVERY_ROWS: usize = 5;

/// Écrit une grille en séquences ANSI truecolor.
///
/// Chaque cellule colorée est encadrée par sa couleur et un reset
/// (`ESC[48;2;R;G;Bm` fond, `ESC[38;2;R;G;Bm` texte, `ESC[0m`) ; les
/// cellules sans couleur sont écrites telles quelles. Un `\n` termine chaque
/// ligne.
///
/// # Errors
/// Returns any I/O error from `out`.
///
/// # Example
/// ```
/// use tp_core::frame::{CellColor, GlyphCell, RenderedGrid};
/// use tp_render::ansi::write_grid;
///
/// let mut grid = RenderedGrid::new(2, 1);
/// grid.set(0, 0, GlyphCell { ch: '@', color: Some(CellColor::Background((1, 2, 3))) });
/// let mut out = Vec::new();
/// write_grid(&mut out, &grid).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "\x1b[48;2;1;2;3m@\x1b[0m \n");
/// ```
pub fn write_grid<W: Write>(out: &mut W, grid: &RenderedGrid) -> io::Result<()> {
    for (y, row) in grid.rows().enumerate() {
        for cell in row {
            write_cell(out, cell)?;
        }
        queue!(out, Print('\n'))?;
        if (y + 1) % FLUSH_EVERY_ROWS == 0 {
            out.flush()?;
        }
    }
    out.flush()?;
    log::debug!("Grille écrite : {}×{}", grid.width, grid.height);
    Ok(())
}

#[inline(always)]
fn write_cell<W: Write>(out: &mut W, cell: &GlyphCell) -> io::Result<()> {
    match cell.color {
        None => queue!(out, Print(cell.ch)),
        Some(CellColor::Background((r, g, b))) => queue!(
            out,
            SetBackgroundColor(Color::Rgb { r, g, b }),
            Print(cell.ch),
            ResetColor
        ),
        Some(CellColor::Foreground((r, g, b))) => queue!(
            out,
            SetForegroundColor(Color::Rgb { r, g, b }),
            Print(cell.ch),
            ResetColor
        ),
    }
}

/// Glyphs only, one line per row, each terminated by `\n`.
///
/// # Example
/// ```
/// use tp_core::frame::RenderedGrid;
/// use tp_render::ansi::grid_to_string;
/// assert_eq!(grid_to_string(&RenderedGrid::new(3, 2)), "   \n   \n");
/// ```
#[must_use]
pub fn grid_to_string(grid: &RenderedGrid) -> String {
    let mut text = String::with_capacity(grid.cells.len() + grid.height as usize);
    for row in grid.rows() {
        text.extend(row.iter().map(|c| c.ch));
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(grid: &RenderedGrid) -> String {
        let mut out = Vec::new();
        write_grid(&mut out, grid).unwrap_or_else(|e| panic!("{e}"));
        String::from_utf8(out).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn uncolored_cells_are_plain_glyphs() {
        let mut grid = RenderedGrid::new(3, 2);
        grid.set(1, 0, GlyphCell { ch: '░', color: None });
        grid.set(2, 1, GlyphCell { ch: '@', color: None });
        assert_eq!(render(&grid), " ░ \n  @\n");
        assert_eq!(render(&grid), grid_to_string(&grid));
    }

    #[test]
    fn foreground_uses_38() {
        let mut grid = RenderedGrid::new(1, 1);
        grid.set(0, 0, GlyphCell {
            ch: '#',
            color: Some(CellColor::Foreground((255, 0, 128))),
        });
        assert_eq!(render(&grid), "\x1b[38;2;255;0;128m#\x1b[0m\n");
    }

    #[test]
    fn background_uses_48_and_resets_each_cell() {
        let mut grid = RenderedGrid::new(2, 1);
        for x in 0..2 {
            grid.set(x, 0, GlyphCell {
                ch: '.',
                color: Some(CellColor::Background((9, 8, 7))),
            });
        }
        assert_eq!(
            render(&grid),
            "\x1b[48;2;9;8;7m.\x1b[0m\x1b[48;2;9;8;7m.\x1b[0m\n"
        );
    }

    #[test]
    fn plain_text_ignores_colors() {
        let mut grid = RenderedGrid::new(2, 1);
        grid.set(0, 0, GlyphCell {
            ch: '█',
            color: Some(CellColor::Background((1, 1, 1))),
        });
        assert_eq!(grid_to_string(&grid), "█ \n");
    }

    /// Counts flushes to check the periodic flush.
    struct FlushCounter {
        bytes: Vec<u8>,
        flushes: usize,
    }

    impl Write for FlushCounter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn flushes_every_five_rows_and_at_end() {
        let mut out = FlushCounter {
            bytes: Vec::new(),
            flushes: 0,
        };
        write_grid(&mut out, &RenderedGrid::new(4, 12)).unwrap_or_else(|e| panic!("{e}"));
        // rows 5 and 10, then the final flush
        assert_eq!(out.flushes, 3);
        assert_eq!(out.bytes.iter().filter(|&&b| b == b'\n').count(), 12);
    }

    #[test]
    fn empty_grid_writes_nothing() {
        assert_eq!(render(&RenderedGrid::new(0, 0)), "");
    }
}
