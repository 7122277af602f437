use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// 10 caractères : compact, bon contraste.
pub const CHARSET_SIMPLE: &str = " .:-=+*#%@";

/// 70 caractères : rampe Paul Bourke, résolution maximale.
pub const CHARSET_DETAILED: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Blocs Unicode : pseudo-pixels.
pub const CHARSET_BLOCKS: &str = " ░▒▓█";

/// Preset de rampe de glyphes.
///
/// # Example
/// ```
/// use tp_core::charset::CharStyle;
/// assert_eq!(CharStyle::default(), CharStyle::Simple);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum CharStyle {
    /// `CHARSET_SIMPLE`.
    #[default]
    Simple,
    /// `CHARSET_DETAILED`.
    Detailed,
    /// `CHARSET_BLOCKS`.
    Blocks,
}

/// Ordered glyph ramp, lightest first, with a luminance lookup table.
///
/// The ordering is trusted: index 0 is the least dense glyph.
///
/// # Example
/// ```
/// use tp_core::charset::CharsetTable;
/// let table = CharsetTable::new(" .:#@").unwrap();
/// assert_eq!(table.glyph_for(0), ' ');
/// assert_eq!(table.glyph_for(255), '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharsetTable {
    glyphs: Vec<char>,
    lut: [usize; 256],
}

impl CharsetTable {
    /// Build a table from a string, one glyph per `char`.
    ///
    /// # Errors
    /// Returns `RenderError::InvalidCharset` with fewer than 2 glyphs.
    pub fn new(glyphs: &str) -> Result<Self, RenderError> {
        Self::from_glyphs(glyphs.chars().collect())
    }

    /// Build a table from an explicit glyph list.
    ///
    /// # Errors
    /// Returns `RenderError::InvalidCharset` with fewer than 2 glyphs.
    pub fn from_glyphs(glyphs: Vec<char>) -> Result<Self, RenderError> {
        let len = glyphs.len();
        if len < 2 {
            return Err(RenderError::InvalidCharset { len });
        }
        let mut lut = [0usize; 256];
        for (lum, slot) in lut.iter_mut().enumerate() {
            *slot = lum * (len - 1) / 255;
        }
        Ok(Self { glyphs, lut })
    }

    /// Number of glyphs.
    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false: tables hold at least 2 glyphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyphs in density order.
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Ramp index for a luminance: `lum * (len - 1) / 255`.
    ///
    /// # Example
    /// ```
    /// use tp_core::charset::CharsetTable;
    /// let table = CharsetTable::new(" .:-=+*#%@").unwrap();
    /// assert_eq!(table.index_for(0), 0);
    /// assert_eq!(table.index_for(128), 4);
    /// assert_eq!(table.index_for(255), 9);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn index_for(&self, luminance: u8) -> usize {
        self.lut[luminance as usize]
    }

    /// Glyph for a luminance.
    #[inline(always)]
    #[must_use]
    pub fn glyph_for(&self, luminance: u8) -> char {
        self.glyphs[self.index_for(luminance)]
    }

    /// Glyph at `index`, clamped to the last glyph when out of range.
    #[inline(always)]
    #[must_use]
    pub fn glyph_at(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }
}

/// Table `CharStyle → CharsetTable`, construite une fois au démarrage.
///
/// # Example
/// ```
/// use tp_core::charset::{CharStyle, CharsetPresets};
/// let presets = CharsetPresets::default();
/// assert_eq!(presets.get(CharStyle::Blocks).glyphs(), &[' ', '░', '▒', '▓', '█']);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharsetPresets {
    simple: CharsetTable,
    detailed: CharsetTable,
    blocks: CharsetTable,
}

impl CharsetPresets {
    /// Build presets from three glyph ramps.
    ///
    /// # Errors
    /// Returns `RenderError::InvalidCharset` if any ramp is shorter than 2.
    pub fn new(simple: &str, detailed: &str, blocks: &str) -> Result<Self, RenderError> {
        Ok(Self {
            simple: CharsetTable::new(simple)?,
            detailed: CharsetTable::new(detailed)?,
            blocks: CharsetTable::new(blocks)?,
        })
    }

    /// Table for a style.
    #[must_use]
    pub fn get(&self, style: CharStyle) -> &CharsetTable {
        match style {
            CharStyle::Simple => &self.simple,
            CharStyle::Detailed => &self.detailed,
            CharStyle::Blocks => &self.blocks,
        }
    }

    /// Replace the table of one style.
    pub fn set(&mut self, style: CharStyle, table: CharsetTable) {
        match style {
            CharStyle::Simple => self.simple = table,
            CharStyle::Detailed => self.detailed = table,
            CharStyle::Blocks => self.blocks = table,
        }
    }
}

impl Default for CharsetPresets {
    fn default() -> Self {
        match Self::new(CHARSET_SIMPLE, CHARSET_DETAILED, CHARSET_BLOCKS) {
            Ok(presets) => presets,
            // Les constantes ont toutes au moins 2 glyphes.
            Err(e) => unreachable!("built-in charset rejected: {e}"),
        }
    }
}
