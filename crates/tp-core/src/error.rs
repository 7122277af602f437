use thiserror::Error;

/// Precondition failures of a render call.
///
/// Every variant is detected before the per-pixel loops start, so a render
/// either returns a complete grid or one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Zero source or target dimension.
    #[error("Géométrie invalide : source {src_width}×{src_height}, cible {target_width}×{target_height}")]
    InvalidGeometry {
        /// Source width in pixels.
        src_width: u32,
        /// Source height in pixels.
        src_height: u32,
        /// Requested width in cells.
        target_width: u32,
        /// Requested height in cells.
        target_height: u32,
    },

    /// Charset with fewer than 2 glyphs.
    #[error("Charset invalide : {len} glyphe(s), minimum 2")]
    InvalidCharset {
        /// Number of glyphs supplied.
        len: usize,
    },

    /// Empty palette in palette-dither mode.
    #[error("Palette vide en mode PaletteDither")]
    InvalidPalette,

    /// Pixel buffer without rows or columns.
    #[error("Image vide : {width}×{height}")]
    EmptyImage {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// Raw data length does not match `width * height * 3`.
    #[error("Taille de buffer incohérente : attendu {expected} octets, reçu {actual}")]
    BufferSize {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// The resampler rejected the buffers.
    #[error("Redimensionnement impossible : {0}")]
    Resize(String),
}
