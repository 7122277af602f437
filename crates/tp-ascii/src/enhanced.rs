//! Mode PaletteDither : contours + gamma pour le glyphe, Floyd–Steinberg
//! sur palette fixe pour la couleur.

use rayon::prelude::*;
use tp_core::charset::CharsetTable;
use tp_core::config::ColorTarget;
use tp_core::frame::{GlyphCell, PixelBuffer, RenderedGrid};

use crate::dither::PaletteQuantizer;
use crate::edge::laplacian_strength;
use crate::tone::luminance_plane;

/// Poids du contour ajouté à la luminance avant correction gamma.
pub const EDGE_WEIGHT: f32 = 0.5;

/// Gamma d'affichage standard. Valeur empirique, ajustable.
pub const DISPLAY_GAMMA: f32 = 2.2;

/// Ramp index from a gamma-corrected blend of luminance and edge strength.
///
/// `adjusted = ((lum + 0.5 * edge) / 255)^2.2 * 255`, then
/// `idx = clamp(adjusted * (len - 1) / 255, 0, len - 1)`.
///
/// # Example
/// ```
/// use tp_ascii::enhanced::blended_index;
/// assert_eq!(blended_index(0, 0, 10), 0);
/// assert_eq!(blended_index(255, 0, 10), 9);
/// assert_eq!(blended_index(128, 0, 10), 1); // gamma darkens mid-tones
/// assert_eq!(blended_index(255, 255, 10), 9); // overshoot clamps
/// ```
#[inline(always)]
#[must_use]
pub fn blended_index(luminance: u8, edge: u8, len: usize) -> usize {
    let max_idx = len.saturating_sub(1);
    let blended = (f32::from(luminance) + f32::from(edge) * EDGE_WEIGHT) / 255.0;
    let adjusted = blended.powf(DISPLAY_GAMMA) * 255.0;
    let idx = (adjusted * max_idx as f32 / 255.0) as usize;
    idx.min(max_idx)
}

/// Render a frame in palette-dither mode.
///
/// Glyph densities come from the edge/gamma blend and are independent per
/// cell; colors come from the sequential Floyd–Steinberg pass, which must
/// see the whole raster in order.
///
/// # Example
/// ```
/// use tp_core::charset::CharsetTable;
/// use tp_core::color::Palette;
/// use tp_core::config::ColorTarget;
/// use tp_core::frame::{CellColor, PixelBuffer};
/// use tp_ascii::dither::PaletteQuantizer;
/// use tp_ascii::enhanced::process_palette_dither;
///
/// let charset = CharsetTable::new(" .:#@").unwrap();
/// let palette = Palette::primaries();
/// let quantizer = PaletteQuantizer::new(&palette).unwrap();
/// let frame = PixelBuffer::filled(3, 3, (255, 255, 255));
/// let grid = process_palette_dither(&frame, &charset, &quantizer, ColorTarget::Background);
/// assert_eq!(grid.get(1, 1).ch, '@');
/// assert_eq!(grid.get(1, 1).color, Some(CellColor::Background((255, 255, 255))));
/// ```
#[must_use]
pub fn process_palette_dither(
    frame: &PixelBuffer,
    charset: &CharsetTable,
    quantizer: &PaletteQuantizer<'_>,
    target: ColorTarget,
) -> RenderedGrid {
    let mut grid = RenderedGrid::new(frame.width(), frame.height());
    if grid.cells.is_empty() {
        return grid;
    }
    let width = grid.width as usize;
    let height = grid.height as usize;

    // Passe globale : le contour doit être normalisé sur toute l'image.
    let lum = luminance_plane(frame);
    let edges = laplacian_strength(&lum, width, height);

    // Passe séquentielle : diffusion d'erreur en ordre raster.
    let colors = quantizer.quantize(frame);
    let palette = quantizer.palette();

    let len = charset.len();
    grid.cells
        .par_iter_mut()
        .zip(lum.par_iter().zip(edges.par_iter()).zip(colors.par_iter()))
        .for_each(|(cell, ((&l, &e), &color))| {
            *cell = GlyphCell {
                ch: charset.glyph_at(blended_index(l, e, len)),
                color: Some(target.paint(palette.rgb(color))),
            };
        });
    grid
}
