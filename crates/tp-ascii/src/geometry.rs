//! Dimensions cibles avec correction d'aspect des cellules terminal.

use tp_core::config::RenderOptions;
use tp_core::error::RenderError;

/// Rapport hauteur/largeur d'une cellule terminal.
///
/// Une cellule est environ deux fois plus haute que large ; multiplier
/// l'aspect source par ce facteur garde les cercles ronds. Valeur empirique,
/// ajustable pour des polices atypiques.
pub const TERMINAL_CELL_ASPECT: f64 = 2.0;

/// Plancher appliqué aux deux dimensions quand l'aspect est préservé.
pub const MIN_CELLS: u32 = 20;

/// Compute the `(width, height)` cell target for a source image.
///
/// Without aspect preservation the requested box is returned verbatim.
/// Otherwise the source aspect, multiplied by `TERMINAL_CELL_ASPECT`, is fit
/// into the box: the constrained dimension is derived by truncation and both
/// are raised to at least `MIN_CELLS`.
///
/// # Errors
/// Returns `RenderError::InvalidGeometry` if any source or target dimension
/// is zero.
///
/// # Example
/// ```
/// use tp_ascii::geometry::fit_dimensions;
/// use tp_core::config::RenderOptions;
///
/// let opts = RenderOptions::default(); // 120×40, aspect preserved
/// assert_eq!(fit_dimensions(200, 100, &opts).unwrap(), (120, 30));
/// ```
pub fn fit_dimensions(
    src_width: u32,
    src_height: u32,
    opts: &RenderOptions,
) -> Result<(u32, u32), RenderError> {
    let (target_width, target_height) = (opts.target_width, opts.target_height);
    if src_width == 0 || src_height == 0 || target_width == 0 || target_height == 0 {
        return Err(RenderError::InvalidGeometry {
            src_width,
            src_height,
            target_width,
            target_height,
        });
    }

    if !opts.preserve_aspect_ratio {
        return Ok((target_width, target_height));
    }

    let corrected = f64::from(src_width) / f64::from(src_height) * TERMINAL_CELL_ASPECT;
    let box_aspect = f64::from(target_width) / f64::from(target_height);

    let (width, height) = if corrected > box_aspect {
        (target_width, (f64::from(target_width) / corrected) as u32)
    } else {
        ((f64::from(target_height) * corrected) as u32, target_height)
    };

    let fitted = (width.max(MIN_CELLS), height.max(MIN_CELLS));
    log::debug!(
        "Géométrie : source {src_width}×{src_height} (aspect corrigé {corrected:.3}) → {}×{}",
        fitted.0,
        fitted.1
    );
    Ok(fitted)
}
