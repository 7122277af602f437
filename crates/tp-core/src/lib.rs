/// Configuration, types, and shared structures for termpix.
///
/// This crate contains all shared types, traits, and configuration logic
/// used across the termpix workspace.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use charset::{CharStyle, CharsetPresets, CharsetTable};
pub use color::{Palette, PaletteColor, Rgb};
pub use config::{AppConfig, ColorMode, ColorTarget, RenderOptions};
pub use error::RenderError;
pub use frame::{CellColor, GlyphCell, PixelBuffer, RenderedGrid};
