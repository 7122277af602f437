//! Contraste, luminosité et plan de luminance.

use std::borrow::Cow;

use rayon::prelude::*;
pub use tp_core::color::luminance;
use tp_core::frame::PixelBuffer;

/// Minimum rows per rayon task.
const PAR_MIN_ROWS: usize = 8;

/// True when `contrast`/`brightness` leave every channel unchanged.
#[inline]
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_identity(contrast: f32, brightness: f32) -> bool {
    contrast == 1.0 && brightness == 0.0
}

/// Adjust one channel: `clamp(round(v * contrast + brightness), 0, 255)`.
///
/// Halfway values round to even.
///
/// # Example
/// ```
/// use tp_ascii::tone::adjust_channel;
/// assert_eq!(adjust_channel(100, 1.5, 10.0), 160);
/// assert_eq!(adjust_channel(200, 2.0, 0.0), 255);
/// assert_eq!(adjust_channel(10, 1.0, -50.0), 0);
/// assert_eq!(adjust_channel(5, 0.5, 0.0), 2);
/// ```
#[inline(always)]
#[must_use]
pub fn adjust_channel(value: u8, contrast: f32, brightness: f32) -> u8 {
    (f32::from(value) * contrast + brightness)
        .round_ties_even()
        .clamp(0.0, 255.0) as u8
}

/// Apply contrast and brightness to every channel.
///
/// The identity pair borrows the input untouched; applying the transform
/// with identity parameters would give the same bytes.
///
/// # Example
/// ```
/// use std::borrow::Cow;
/// use tp_ascii::tone::adjust;
/// use tp_core::frame::PixelBuffer;
///
/// let pb = PixelBuffer::filled(2, 2, (100, 50, 0));
/// assert!(matches!(adjust(&pb, 1.0, 0.0), Cow::Borrowed(_)));
/// assert_eq!(adjust(&pb, 2.0, 5.0).pixel(1, 1), (205, 105, 5));
/// ```
#[must_use]
pub fn adjust(pixels: &PixelBuffer, contrast: f32, brightness: f32) -> Cow<'_, PixelBuffer> {
    if is_identity(contrast, brightness) {
        return Cow::Borrowed(pixels);
    }
    Cow::Owned(apply(pixels, contrast, brightness))
}

/// Unconditional version of [`adjust`].
#[must_use]
pub fn apply(pixels: &PixelBuffer, contrast: f32, brightness: f32) -> PixelBuffer {
    let (width, height) = (pixels.width(), pixels.height());
    let mut data = pixels.as_raw().to_vec();
    let row_bytes = (width as usize * 3).max(1);
    data.par_chunks_mut(row_bytes)
        .with_min_len(PAR_MIN_ROWS)
        .for_each(|row| {
            for v in row.iter_mut() {
                *v = adjust_channel(*v, contrast, brightness);
            }
        });
    match PixelBuffer::from_raw(width, height, data) {
        Ok(adjusted) => adjusted,
        // Same length as the source buffer.
        Err(e) => unreachable!("tone mapping changed the buffer size: {e}"),
    }
}

/// Luminance of every pixel, row-major, `width * height` bytes.
///
/// # Example
/// ```
/// use tp_ascii::tone::luminance_plane;
/// use tp_core::frame::PixelBuffer;
///
/// let pb = PixelBuffer::from_fn(2, 1, |x, _| if x == 0 { (0, 0, 0) } else { (255, 255, 255) });
/// assert_eq!(luminance_plane(&pb), vec![0, 255]);
/// ```
#[must_use]
pub fn luminance_plane(pixels: &PixelBuffer) -> Vec<u8> {
    let width = pixels.width() as usize;
    let mut plane = vec![0u8; width * pixels.height() as usize];
    if plane.is_empty() {
        return plane;
    }
    plane
        .par_chunks_mut(width)
        .zip(pixels.as_raw().par_chunks(width * 3))
        .with_min_len(PAR_MIN_ROWS)
        .for_each(|(out, row)| {
            for (lum, px) in out.iter_mut().zip(row.chunks_exact(3)) {
                *lum = luminance(px[0], px[1], px[2]);
            }
        });
    plane
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> PixelBuffer {
        PixelBuffer::from_fn(17, 9, |x, y| {
            ((x * 15) as u8, (y * 28) as u8, ((x + y) * 10) as u8)
        })
    }

    #[test]
    fn identity_matches_explicit_transform() {
        let pb = gradient();
        assert_eq!(apply(&pb, 1.0, 0.0), pb);
        assert_eq!(*adjust(&pb, 1.0, 0.0), pb);
    }

    #[test]
    fn adjust_clamps_both_ends() {
        let pb = PixelBuffer::filled(3, 3, (0, 128, 255));
        let bright = adjust(&pb, 1.0, 200.0);
        assert_eq!(bright.pixel(0, 0), (200, 255, 255));
        let dark = adjust(&pb, 0.5, -100.0);
        assert_eq!(dark.pixel(2, 2), (0, 0, 28));
    }

    #[test]
    fn halfway_values_round_to_even() {
        assert_eq!(adjust_channel(1, 0.5, 0.0), 0);
        assert_eq!(adjust_channel(3, 0.5, 0.0), 2);
        assert_eq!(adjust_channel(5, 0.5, 0.0), 2);
        assert_eq!(adjust_channel(7, 0.5, 0.0), 4);
        assert_eq!(adjust_channel(10, 1.0, 0.5), 10);
        assert_eq!(adjust_channel(11, 1.0, 0.5), 12);
        let pb = PixelBuffer::filled(2, 2, (1, 5, 9));
        assert_eq!(apply(&pb, 0.5, 0.0).pixel(1, 1), (0, 2, 4));
    }

    #[test]
    fn luminance_plane_matches_per_pixel() {
        let pb = gradient();
        let plane = luminance_plane(&pb);
        assert_eq!(plane.len(), 17 * 9);
        for y in 0..9 {
            for x in 0..17 {
                assert_eq!(plane[(y * 17 + x) as usize], pb.luminance(x, y));
            }
        }
    }

    #[test]
    fn luminance_plane_of_empty_buffer() {
        let pb = PixelBuffer::filled(0, 0, (0, 0, 0));
        assert!(luminance_plane(&pb).is_empty());
    }
}
