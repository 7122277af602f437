//! Quantification sur palette fixe avec diffusion d'erreur Floyd–Steinberg.
//!
//! Le parcours est strictement séquentiel (row-major) : l'erreur d'une cellule
//! n'est écrite que sur des cellules pas encore visitées, et chaque cellule
//! lit puis remet à zéro son accumulateur avant d'être quantifiée.

use tp_core::color::{Palette, Rgb};
use tp_core::error::RenderError;
use tp_core::frame::PixelBuffer;

/// One diffusion target relative to the current cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Diffusion {
    /// Column offset.
    pub dx: i32,
    /// Row offset (never negative).
    pub dy: u32,
    /// Weight numerator over [`FLOYD_STEINBERG_DIVISOR`].
    pub weight: u8,
}

/// Noyau Floyd–Steinberg : 7/16 à droite, 3/16 en bas à gauche, 5/16 en bas,
/// 1/16 en bas à droite.
pub const FLOYD_STEINBERG: [Diffusion; 4] = [
    Diffusion { dx: 1, dy: 0, weight: 7 },
    Diffusion { dx: -1, dy: 1, weight: 3 },
    Diffusion { dx: 0, dy: 1, weight: 5 },
    Diffusion { dx: 1, dy: 1, weight: 1 },
];

/// Dénominateur commun des poids Floyd–Steinberg.
pub const FLOYD_STEINBERG_DIVISOR: f32 = 16.0;

/// Quantization error still to be applied, one signed RGB triple per pixel.
///
/// Scoped to a single quantization pass.
///
/// # Example
/// ```
/// use tp_ascii::dither::ErrorAccumulator;
/// let mut acc = ErrorAccumulator::new(3, 2);
/// acc.add(1, 1, [16.0, -32.0, 0.0], 0.5);
/// assert_eq!(acc.take(1, 1), [8.0, -16.0, 0.0]);
/// assert_eq!(acc.take(1, 1), [0.0, 0.0, 0.0]);
/// ```
pub struct ErrorAccumulator {
    errors: Vec<[f32; 3]>,
    width: usize,
    height: usize,
}

impl ErrorAccumulator {
    /// Zero-initialised accumulator.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            errors: vec![[0.0; 3]; width * height],
            width,
            height,
        }
    }

    /// Read the accumulated error at (x, y) and reset it to zero.
    #[inline(always)]
    pub fn take(&mut self, x: usize, y: usize) -> [f32; 3] {
        std::mem::take(&mut self.errors[y * self.width + x])
    }

    /// Add `error * factor` at (x, y). Out-of-bounds targets are dropped.
    #[inline(always)]
    pub fn add(&mut self, x: isize, y: usize, error: [f32; 3], factor: f32) {
        if x < 0 || x as usize >= self.width || y >= self.height {
            return;
        }
        let cell = &mut self.errors[y * self.width + x as usize];
        for (acc, e) in cell.iter_mut().zip(error) {
            *acc += e * factor;
        }
    }

    /// Spread `error` from (x, y) with the Floyd–Steinberg kernel.
    #[inline(always)]
    pub fn diffuse(&mut self, x: usize, y: usize, error: [f32; 3]) {
        for d in &FLOYD_STEINBERG {
            self.add(
                x as isize + d.dx as isize,
                y + d.dy as usize,
                error,
                f32::from(d.weight) / FLOYD_STEINBERG_DIVISOR,
            );
        }
    }
}

/// Nearest-palette quantizer with error diffusion.
///
/// # Example
/// ```
/// use tp_ascii::dither::PaletteQuantizer;
/// use tp_core::color::Palette;
/// use tp_core::frame::PixelBuffer;
///
/// let palette = Palette::primaries();
/// let quantizer = PaletteQuantizer::new(&palette).unwrap();
/// let indices = quantizer.quantize(&PixelBuffer::filled(4, 4, (250, 5, 5)));
/// assert!(indices.iter().all(|&i| i == 0)); // red
/// ```
pub struct PaletteQuantizer<'a> {
    palette: &'a Palette,
}

impl<'a> PaletteQuantizer<'a> {
    /// Borrow a palette for quantization.
    ///
    /// # Errors
    /// Returns `RenderError::InvalidPalette` for an empty palette.
    pub fn new(palette: &'a Palette) -> Result<Self, RenderError> {
        if palette.is_empty() {
            return Err(RenderError::InvalidPalette);
        }
        Ok(Self { palette })
    }

    /// The borrowed palette.
    #[must_use]
    pub fn palette(&self) -> &'a Palette {
        self.palette
    }

    /// Quantize one error-adjusted color.
    ///
    /// Returns the palette index and the signed error `value - chosen`,
    /// measured on the unclamped value.
    #[inline(always)]
    #[must_use]
    pub fn quantize_value(&self, value: [f32; 3]) -> (usize, [f32; 3]) {
        let clamped: Rgb = (
            value[0].clamp(0.0, 255.0) as u8,
            value[1].clamp(0.0, 255.0) as u8,
            value[2].clamp(0.0, 255.0) as u8,
        );
        // Non vide, vérifié dans `new`.
        let index = self.palette.nearest(clamped).unwrap_or(0);
        let (r, g, b) = self.palette.rgb(index);
        let error = [
            value[0] - f32::from(r),
            value[1] - f32::from(g),
            value[2] - f32::from(b),
        ];
        (index, error)
    }

    /// Palette index of every pixel, row-major, after Floyd–Steinberg
    /// diffusion in raster order.
    ///
    /// Deterministic: the same buffer always gives the same indices.
    #[must_use]
    pub fn quantize(&self, pixels: &PixelBuffer) -> Vec<usize> {
        let width = pixels.width() as usize;
        let height = pixels.height() as usize;
        let mut errors = ErrorAccumulator::new(width, height);
        let mut indices = Vec::with_capacity(width * height);

        for (y, row) in pixels.rows().enumerate() {
            for (x, px) in row.chunks_exact(3).enumerate() {
                let acc = errors.take(x, y);
                let value = [
                    f32::from(px[0]) + acc[0],
                    f32::from(px[1]) + acc[1],
                    f32::from(px[2]) + acc[2],
                ];
                let (index, error) = self.quantize_value(value);
                errors.diffuse(x, y, error);
                indices.push(index);
            }
        }
        indices
    }
}

#[cfg(test)]
mod tests {
    use tp_core::color::PaletteColor;

    use super::*;

    fn black_white() -> Palette {
        Palette::new(vec![
            PaletteColor::new("black", (0, 0, 0)),
            PaletteColor::new("white", (255, 255, 255)),
        ])
    }

    #[test]
    fn weights_sum_to_one() {
        let total: u32 = FLOYD_STEINBERG.iter().map(|d| u32::from(d.weight)).sum();
        assert_eq!(total, 16);
        assert!((total as f32 / FLOYD_STEINBERG_DIVISOR - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn interior_diffusion_conserves_error() {
        let mut acc = ErrorAccumulator::new(3, 2);
        acc.diffuse(1, 0, [32.0, -16.0, 8.0]);
        let mut sum = [0.0f32; 3];
        for y in 0..2 {
            for x in 0..3 {
                let e = acc.take(x, y);
                for c in 0..3 {
                    sum[c] += e[c];
                }
            }
        }
        assert_eq!(sum, [32.0, -16.0, 8.0]);
    }

    #[test]
    fn diffusion_targets() {
        let mut acc = ErrorAccumulator::new(3, 2);
        acc.diffuse(1, 0, [16.0, 0.0, 0.0]);
        assert_eq!(acc.take(2, 0)[0], 7.0);
        assert_eq!(acc.take(0, 1)[0], 3.0);
        assert_eq!(acc.take(1, 1)[0], 5.0);
        assert_eq!(acc.take(2, 1)[0], 1.0);
        assert_eq!(acc.take(0, 0)[0], 0.0);
    }

    #[test]
    fn corner_diffusion_is_truncated_not_redistributed() {
        let mut acc = ErrorAccumulator::new(2, 2);
        // bottom-right corner: every target is out of bounds
        acc.diffuse(1, 1, [16.0, 16.0, 16.0]);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(acc.take(x, y), [0.0; 3]);
            }
        }
        // left column: the (i+1, j-1) share is dropped
        acc.diffuse(0, 0, [16.0, 0.0, 0.0]);
        assert_eq!(acc.take(1, 0)[0], 7.0);
        assert_eq!(acc.take(0, 1)[0], 5.0);
        assert_eq!(acc.take(1, 1)[0], 1.0);
    }

    #[test]
    fn empty_palette_rejected() {
        let palette = Palette::new(Vec::new());
        assert!(matches!(
            PaletteQuantizer::new(&palette),
            Err(RenderError::InvalidPalette)
        ));
    }

    #[test]
    fn mid_gray_alternates_black_and_white() {
        let palette = black_white();
        let q = PaletteQuantizer::new(&palette).unwrap_or_else(|e| panic!("{e}"));
        let indices = q.quantize(&PixelBuffer::filled(32, 32, (128, 128, 128)));
        let whites = indices.iter().filter(|&&i| i == 1).count();
        // error diffusion keeps the average close to 50 %
        assert!((430..=600).contains(&whites), "whites = {whites}");
    }

    #[test]
    fn first_row_follows_hand_computation() {
        let palette = black_white();
        let q = PaletteQuantizer::new(&palette).unwrap_or_else(|e| panic!("{e}"));
        // 100 → black, error 100 → next gets 43.75 → 143.75 → white,
        // error -111.25 → next gets -48.67 → 51.33 → black
        let indices = q.quantize(&PixelBuffer::filled(3, 1, (100, 100, 100)));
        assert_eq!(indices, vec![0, 1, 0]);
    }

    #[test]
    fn quantize_is_deterministic() {
        let palette = Palette::primaries();
        let q = PaletteQuantizer::new(&palette).unwrap_or_else(|e| panic!("{e}"));
        let pb = PixelBuffer::from_fn(40, 25, |x, y| {
            ((x * 6) as u8, (y * 10) as u8, ((x * y) % 256) as u8)
        });
        assert_eq!(q.quantize(&pb), q.quantize(&pb));
    }

    #[test]
    fn single_pixel() {
        let palette = Palette::primaries();
        let q = PaletteQuantizer::new(&palette).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(q.quantize(&PixelBuffer::filled(1, 1, (10, 10, 240))), vec![2]);
    }

    #[test]
    fn error_uses_unclamped_value() {
        let palette = black_white();
        let q = PaletteQuantizer::new(&palette).unwrap_or_else(|e| panic!("{e}"));
        let (index, error) = q.quantize_value([300.0, -20.0, 255.0]);
        // clamped (255, 0, 255): black 2×255², white 255² → white
        assert_eq!(index, 1);
        assert_eq!(error, [45.0, -275.0, 0.0]);
    }
}
