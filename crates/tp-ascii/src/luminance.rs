use rayon::prelude::*;
use tp_core::charset::CharsetTable;
use tp_core::color::luminance;
use tp_core::config::ColorTarget;
use tp_core::frame::{GlyphCell, PixelBuffer, RenderedGrid};

/// Process a frame into a glyph grid using luminance mapping only.
///
/// One cell per pixel; each cell gets `glyph[lum * (len - 1) / 255]` and no
/// color.
///
/// # Example
/// ```
/// use tp_core::charset::CharsetTable;
/// use tp_core::frame::PixelBuffer;
/// use tp_ascii::luminance::process_grayscale;
///
/// let charset = CharsetTable::new(" .:-=+*#%@").unwrap();
/// let grid = process_grayscale(&PixelBuffer::filled(10, 10, (255, 255, 255)), &charset);
/// assert!(grid.cells.iter().all(|c| c.ch == '@' && c.color.is_none()));
/// ```
#[must_use]
pub fn process_grayscale(frame: &PixelBuffer, charset: &CharsetTable) -> RenderedGrid {
    map_rows(frame, |r, g, b| GlyphCell {
        ch: charset.glyph_for(luminance(r, g, b)),
        color: None,
    })
}

/// Process a frame into a glyph grid carrying each pixel's own color.
///
/// The glyph is chosen exactly as in [`process_grayscale`]; the color goes
/// to the layer selected by `target`.
///
/// # Example
/// ```
/// use tp_core::charset::CharsetTable;
/// use tp_core::config::ColorTarget;
/// use tp_core::frame::{CellColor, PixelBuffer};
/// use tp_ascii::luminance::process_truecolor;
///
/// let charset = CharsetTable::new(" .:#@").unwrap();
/// let grid = process_truecolor(&PixelBuffer::filled(2, 1, (255, 0, 0)), &charset, ColorTarget::Background);
/// assert_eq!(grid.get(1, 0).color, Some(CellColor::Background((255, 0, 0))));
/// assert_eq!(grid.get(1, 0).ch, '.'); // lum 76 → 76 × 4 / 255 = 1
/// ```
#[must_use]
pub fn process_truecolor(
    frame: &PixelBuffer,
    charset: &CharsetTable,
    target: ColorTarget,
) -> RenderedGrid {
    map_rows(frame, |r, g, b| {
        let idx = charset.index_for(luminance(r, g, b));
        GlyphCell {
            // glyph_at borne l'index au dernier glyphe.
            ch: charset.glyph_at(idx),
            color: Some(target.paint((r, g, b))),
        }
    })
}

/// Map every pixel to a cell independently, rows in parallel.
fn map_rows<F>(frame: &PixelBuffer, cell_for: F) -> RenderedGrid
where
    F: Fn(u8, u8, u8) -> GlyphCell + Sync,
{
    let mut grid = RenderedGrid::new(frame.width(), frame.height());
    if grid.cells.is_empty() {
        return grid;
    }
    let width = grid.width as usize;
    grid.cells
        .par_chunks_mut(width)
        .zip(frame.as_raw().par_chunks(width * 3))
        .for_each(|(row, pixels)| {
            for (cell, px) in row.iter_mut().zip(pixels.chunks_exact(3)) {
                *cell = cell_for(px[0], px[1], px[2]);
            }
        });
    grid
}
