/// Glyph rendering engine for termpix.
///
/// Converts pixel buffers to ASCII/Unicode glyph grids: tone mapping,
/// cell geometry, resampling, edge detection and palette dithering.
pub mod dither;
pub mod edge;
pub mod enhanced;
pub mod geometry;
pub mod luminance;
pub mod renderer;
pub mod resize;
pub mod tone;

pub use renderer::GlyphRenderer;
