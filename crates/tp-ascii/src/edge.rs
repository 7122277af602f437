//! Détection de contours par Laplacien 3×3 sur le plan de luminance.

use rayon::prelude::*;

/// Réponse Laplacienne en (x, y), bords réfléchis sans répéter le pixel de
/// bord (`…cb|abc…`).
///
/// Noyau `[[2,0,2],[0,-8,0],[2,0,2]]` (dérivées secondes de Sobel 3×3).
#[inline(always)]
fn laplacian_at(lum: &[u8], width: usize, height: usize, x: usize, y: usize) -> i32 {
    let xm = reflect_101(x as isize - 1, width);
    let xp = reflect_101(x as isize + 1, width);
    let ym = reflect_101(y as isize - 1, height);
    let yp = reflect_101(y as isize + 1, height);

    let at = |px: usize, py: usize| i32::from(lum[py * width + px]);
    let corners = at(xm, ym) + at(xp, ym) + at(xm, yp) + at(xp, yp);
    2 * corners - 8 * at(x, y)
}

/// Index réfléchi type `BORDER_REFLECT_101`.
#[inline(always)]
fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let r = if i < 0 {
        -i
    } else if i >= n {
        2 * n - 2 - i
    } else {
        i
    };
    r as usize
}

/// Edge strength of every pixel, normalised to `0..=255` over the image.
///
/// The absolute Laplacian response is saturated to 255, then stretched so
/// that the weakest response maps to 0 and the strongest to 255. A flat
/// response (uniform image) yields all zeros. Needs the complete plane: no
/// output is final before the global min/max is known.
///
/// `lum` is row-major, `width * height` bytes.
///
/// # Example
/// ```
/// use tp_ascii::edge::laplacian_strength;
///
/// // vertical step: dark left, bright right
/// let lum: Vec<u8> = (0..36).map(|i| if i % 6 < 3 { 0 } else { 200 }).collect();
/// let edges = laplacian_strength(&lum, 6, 6);
/// assert_eq!(edges[2], 255); // dark side of the step
/// assert_eq!(edges[0], 0);   // flat region
/// ```
#[must_use]
pub fn laplacian_strength(lum: &[u8], width: usize, height: usize) -> Vec<u8> {
    debug_assert_eq!(lum.len(), width * height, "plane size mismatch");
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut raw = vec![0u8; width * height];
    raw.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            *out = laplacian_at(lum, width, height, x, y).unsigned_abs().min(255) as u8;
        }
    });

    stretch_min_max(&mut raw);
    raw
}

/// Stretch `values` so that the minimum maps to 0 and the maximum to 255,
/// halfway values rounding to even. A constant slice becomes all zeros.
fn stretch_min_max(values: &mut [u8]) {
    let (min, max) = values
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if min >= max {
        values.fill(0);
        return;
    }

    let scale = 255.0 / f32::from(max - min);
    values.par_iter_mut().for_each(|v| {
        *v = (f32::from(*v - min) * scale).round_ties_even().min(255.0) as u8;
    });
}
