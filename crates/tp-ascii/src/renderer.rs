use tp_core::charset::{CharsetPresets, CharsetTable};
use tp_core::color::Palette;
use tp_core::config::{ColorMode, ColorTarget, RenderOptions};
use tp_core::error::RenderError;
use tp_core::frame::{PixelBuffer, RenderedGrid};

use crate::dither::PaletteQuantizer;
use crate::resize::Resizer;
use crate::{enhanced, geometry, luminance, tone};

/// GlyphRenderer orchestre le pipeline pixel→glyphes.
///
/// Les rampes et la palette sont construites une fois et empruntées ; un
/// rendu valide toutes ses préconditions avant la première cellule, puis
/// produit une grille complète.
///
/// # Example
/// ```
/// use tp_ascii::renderer::GlyphRenderer;
/// use tp_core::charset::CharsetPresets;
/// use tp_core::color::Palette;
/// use tp_core::config::RenderOptions;
/// use tp_core::frame::PixelBuffer;
///
/// let presets = CharsetPresets::default();
/// let palette = Palette::default();
/// let renderer = GlyphRenderer::new(&presets, &palette);
/// let grid = renderer.render(&PixelBuffer::filled(200, 100, (0, 0, 0)), &RenderOptions::default()).unwrap();
/// assert_eq!((grid.width, grid.height), (120, 30));
/// ```
pub struct GlyphRenderer<'a> {
    charsets: &'a CharsetPresets,
    palette: &'a Palette,
}

impl<'a> GlyphRenderer<'a> {
    /// Borrow the charset presets and palette for the renderer's lifetime.
    #[must_use]
    pub fn new(charsets: &'a CharsetPresets, palette: &'a Palette) -> Self {
        Self { charsets, palette }
    }

    /// Full pipeline: tone mapping, geometry fit, resize, then glyph mapping.
    ///
    /// # Errors
    /// - `EmptyImage` for a buffer without rows or columns.
    /// - `InvalidGeometry` for a zero target dimension.
    /// - `InvalidCharset` if the selected ramp has fewer than 2 glyphs.
    /// - `InvalidPalette` for an empty palette in `PaletteDither` mode.
    /// - `Resize` if the resampler fails.
    pub fn render(
        &self,
        pixels: &PixelBuffer,
        opts: &RenderOptions,
    ) -> Result<RenderedGrid, RenderError> {
        let pipeline = self.validate(pixels, opts)?;
        let (width, height) = geometry::fit_dimensions(pixels.width(), pixels.height(), opts)?;

        let adjusted = tone::adjust(pixels, opts.contrast, opts.brightness);
        let resized = Resizer::new().resize(&adjusted, width, height)?;

        log::debug!(
            "Rendu {:?} / {:?} : {}×{} → {width}×{height}",
            opts.color_mode,
            opts.char_style,
            pixels.width(),
            pixels.height()
        );
        Ok(pipeline.run(&resized))
    }

    /// Map an already cell-sized buffer, one cell per pixel.
    ///
    /// Skips tone mapping and resizing; the grid has the buffer's dimensions.
    ///
    /// # Errors
    /// Same preconditions as [`GlyphRenderer::render`], except geometry.
    ///
    /// # Example
    /// ```
    /// use tp_ascii::renderer::GlyphRenderer;
    /// use tp_core::charset::CharsetPresets;
    /// use tp_core::color::Palette;
    /// use tp_core::config::RenderOptions;
    /// use tp_core::frame::PixelBuffer;
    ///
    /// let presets = CharsetPresets::default();
    /// let palette = Palette::default();
    /// let renderer = GlyphRenderer::new(&presets, &palette);
    /// let grid = renderer
    ///     .render_cells(&PixelBuffer::filled(10, 10, (255, 255, 255)), &RenderOptions::default())
    ///     .unwrap();
    /// assert_eq!(grid.to_lines()[0], "@@@@@@@@@@");
    /// ```
    pub fn render_cells(
        &self,
        pixels: &PixelBuffer,
        opts: &RenderOptions,
    ) -> Result<RenderedGrid, RenderError> {
        Ok(self.validate(pixels, opts)?.run(pixels))
    }

    /// Check every precondition once, before any per-pixel work.
    fn validate(
        &self,
        pixels: &PixelBuffer,
        opts: &RenderOptions,
    ) -> Result<Pipeline<'a>, RenderError> {
        if pixels.is_empty() {
            return Err(RenderError::EmptyImage {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        let charset = self.charsets.get(opts.char_style);
        if charset.len() < 2 {
            return Err(RenderError::InvalidCharset { len: charset.len() });
        }
        let mode = match opts.color_mode {
            ColorMode::Grayscale => Mode::Grayscale,
            ColorMode::Truecolor => Mode::Truecolor,
            ColorMode::PaletteDither => Mode::Dither(PaletteQuantizer::new(self.palette)?),
        };
        Ok(Pipeline {
            charset,
            mode,
            target: opts.color_target,
        })
    }
}

/// Rendu validé, prêt à être appliqué à une image de la taille cible.
struct Pipeline<'a> {
    charset: &'a CharsetTable,
    mode: Mode<'a>,
    target: ColorTarget,
}

enum Mode<'a> {
    Grayscale,
    Truecolor,
    Dither(PaletteQuantizer<'a>),
}

impl Pipeline<'_> {
    fn run(&self, frame: &PixelBuffer) -> RenderedGrid {
        match &self.mode {
            Mode::Grayscale => luminance::process_grayscale(frame, self.charset),
            Mode::Truecolor => luminance::process_truecolor(frame, self.charset, self.target),
            Mode::Dither(q) => {
                enhanced::process_palette_dither(frame, self.charset, q, self.target)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tp_core::charset::CharStyle;
    use tp_core::color::PaletteColor;
    use tp_core::frame::CellColor;

    use super::*;

    fn opts(color_mode: ColorMode) -> RenderOptions {
        RenderOptions {
            color_mode,
            ..RenderOptions::default()
        }
    }

    const MODES: [ColorMode; 3] = [
        ColorMode::Grayscale,
        ColorMode::Truecolor,
        ColorMode::PaletteDither,
    ];

    #[test]
    fn one_by_one_renders_in_every_mode() {
        let presets = CharsetPresets::default();
        let palette = Palette::default();
        let renderer = GlyphRenderer::new(&presets, &palette);
        let pixel = PixelBuffer::filled(1, 1, (90, 180, 30));
        for mode in MODES {
            let cells = renderer
                .render_cells(&pixel, &opts(mode))
                .unwrap_or_else(|e| panic!("{mode:?}: {e}"));
            assert_eq!(cells.cells.len(), 1);
            let full = renderer
                .render(&pixel, &opts(mode))
                .unwrap_or_else(|e| panic!("{mode:?}: {e}"));
            // aspect 2.0 < 3.0 → width 80, height 40
            assert_eq!((full.width, full.height), (80, 40));
        }
    }

    #[test]
    fn black_and_white_end_to_end() {
        let presets = CharsetPresets::default();
        let palette = Palette::default();
        let renderer = GlyphRenderer::new(&presets, &palette);
        let o = opts(ColorMode::Grayscale);

        let black = renderer
            .render(&PixelBuffer::filled(10, 10, (0, 0, 0)), &o)
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(black.cells.iter().all(|c| c.ch == ' ' && c.color.is_none()));

        let white = renderer
            .render(&PixelBuffer::filled(10, 10, (255, 255, 255)), &o)
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(white.cells.iter().all(|c| c.ch == '@'));
    }

    #[test]
    fn empty_image_rejected() {
        let presets = CharsetPresets::default();
        let palette = Palette::default();
        let renderer = GlyphRenderer::new(&presets, &palette);
        let empty = PixelBuffer::filled(0, 10, (0, 0, 0));
        assert_eq!(
            renderer.render(&empty, &RenderOptions::default()),
            Err(RenderError::EmptyImage { width: 0, height: 10 })
        );
    }

    #[test]
    fn empty_palette_only_matters_for_dither() {
        let presets = CharsetPresets::default();
        let palette = Palette::new(Vec::new());
        let renderer = GlyphRenderer::new(&presets, &palette);
        let pb = PixelBuffer::filled(4, 4, (1, 2, 3));
        assert!(renderer.render_cells(&pb, &opts(ColorMode::Truecolor)).is_ok());
        assert_eq!(
            renderer.render_cells(&pb, &opts(ColorMode::PaletteDither)),
            Err(RenderError::InvalidPalette)
        );
    }

    #[test]
    fn zero_target_rejected_before_rendering() {
        let presets = CharsetPresets::default();
        let palette = Palette::default();
        let renderer = GlyphRenderer::new(&presets, &palette);
        let o = RenderOptions {
            target_height: 0,
            ..RenderOptions::default()
        };
        assert!(matches!(
            renderer.render(&PixelBuffer::filled(4, 4, (0, 0, 0)), &o),
            Err(RenderError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn dither_is_byte_identical_across_runs() {
        let presets = CharsetPresets::default();
        let palette = Palette::default();
        let renderer = GlyphRenderer::new(&presets, &palette);
        let pb = PixelBuffer::from_fn(97, 61, |x, y| {
            ((x * 2) as u8, (y * 4) as u8, ((x + y) % 256) as u8)
        });
        let o = RenderOptions {
            char_style: CharStyle::Detailed,
            ..opts(ColorMode::PaletteDither)
        };
        let a = renderer.render(&pb, &o).unwrap_or_else(|e| panic!("{e}"));
        let b = renderer.render(&pb, &o).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(a, b);
    }

    #[test]
    fn brightness_applies_before_mapping() {
        let presets = CharsetPresets::default();
        let palette = Palette::default();
        let renderer = GlyphRenderer::new(&presets, &palette);
        let o = RenderOptions {
            brightness: 255.0,
            preserve_aspect_ratio: false,
            target_width: 4,
            target_height: 2,
            ..RenderOptions::default()
        };
        let grid = renderer
            .render(&PixelBuffer::filled(8, 8, (0, 0, 0)), &o)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(grid.to_lines(), vec!["@@@@", "@@@@"]);
    }

    #[test]
    fn custom_palette_and_blocks() {
        let mut presets = CharsetPresets::default();
        presets.set(
            CharStyle::Blocks,
            CharsetTable::new(" █").unwrap_or_else(|e| panic!("{e}")),
        );
        let palette = Palette::new(vec![PaletteColor::new("amber", (255, 176, 0))]);
        let renderer = GlyphRenderer::new(&presets, &palette);
        let o = RenderOptions {
            char_style: CharStyle::Blocks,
            ..opts(ColorMode::PaletteDither)
        };
        let grid = renderer
            .render_cells(&PixelBuffer::filled(3, 2, (255, 255, 255)), &o)
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(grid.cells.iter().all(|c| c.ch == '█'
            && c.color == Some(CellColor::Background((255, 176, 0)))));
    }
}
