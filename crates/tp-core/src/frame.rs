use crate::color::{Rgb, luminance};
use crate::error::RenderError;

/// Raster RGB immuable une fois construit.
///
/// Stocke les pixels en RGB row-major, 3 octets par pixel, origine en haut
/// à gauche.
///
/// # Example
/// ```
/// use tp_core::frame::PixelBuffer;
/// let pb = PixelBuffer::filled(4, 2, (10, 20, 30));
/// assert_eq!(pb.as_raw().len(), 4 * 2 * 3);
/// assert_eq!(pb.pixel(3, 1), (10, 20, 30));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Wrap raw RGB bytes.
    ///
    /// # Errors
    /// Returns `RenderError::BufferSize` if `data.len() != width * height * 3`.
    ///
    /// # Example
    /// ```
    /// use tp_core::frame::PixelBuffer;
    /// assert!(PixelBuffer::from_raw(2, 1, vec![0; 6]).is_ok());
    /// assert!(PixelBuffer::from_raw(2, 1, vec![0; 5]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Buffer of uniform color.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgb: Rgb) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..width as usize * height as usize {
            data.extend_from_slice(&[rgb.0, rgb.1, rgb.2]);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    ///
    /// # Example
    /// ```
    /// use tp_core::frame::PixelBuffer;
    /// let pb = PixelBuffer::from_fn(3, 2, |x, y| ((x * 10) as u8, (y * 10) as u8, 0));
    /// assert_eq!(pb.pixel(2, 1), (20, 10, 0));
    /// ```
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                let (r, g, b) = f(x, y);
                data.extend_from_slice(&[r, g, b]);
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Width in pixels (columns).
    #[inline(always)]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels (rows).
    #[inline(always)]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the buffer has no rows or no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGB bytes, row-major.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its bytes.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Accès au pixel (x, y).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        (self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Luminance perceptuelle du pixel (x, y).
    ///
    /// # Example
    /// ```
    /// use tp_core::frame::PixelBuffer;
    /// let pb = PixelBuffer::filled(1, 1, (255, 255, 255));
    /// assert_eq!(pb.luminance(0, 0), 255);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        let (r, g, b) = self.pixel(x, y);
        luminance(r, g, b)
    }

    /// Iterate over rows as byte slices of `width * 3`.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks_exact panics on 0; an empty buffer yields no rows.
        self.data.chunks_exact((self.width as usize * 3).max(1))
    }
}

/// Calque terminal qui reçoit la couleur d'une cellule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellColor {
    /// Couleur de texte (`ESC[38;2;…m`).
    Foreground(Rgb),
    /// Couleur de fond (`ESC[48;2;…m`).
    Background(Rgb),
}

impl CellColor {
    /// The RGB value regardless of layer.
    #[must_use]
    pub fn rgb(self) -> Rgb {
        match self {
            Self::Foreground(rgb) | Self::Background(rgb) => rgb,
        }
    }
}

/// Single cell of a rendered grid.
///
/// # Example
/// ```
/// use tp_core::frame::GlyphCell;
/// let cell = GlyphCell::default();
/// assert_eq!(cell.ch, ' ');
/// assert!(cell.color.is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur, absente en mode niveaux de gris.
    pub color: Option<CellColor>,
}

impl Default for GlyphCell {
    fn default() -> Self {
        Self { ch: ' ', color: None }
    }
}

/// Grille de sortie : `height` lignes de `width` cellules, row-major.
///
/// # Example
/// ```
/// use tp_core::frame::{GlyphCell, RenderedGrid};
/// let mut grid = RenderedGrid::new(80, 24);
/// grid.set(0, 0, GlyphCell { ch: '@', color: None });
/// assert_eq!(grid.get(0, 0).ch, '@');
/// assert_eq!(grid.rows().count(), 24);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<GlyphCell>,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

impl RenderedGrid {
    /// Crée une grille pré-allouée de cellules vides.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![GlyphCell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, cell: GlyphCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get a cell reference at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &GlyphCell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Rows in top-to-bottom order.
    pub fn rows(&self) -> impl Iterator<Item = &[GlyphCell]> {
        self.cells.chunks_exact((self.width as usize).max(1))
    }

    /// Glyphs only, one `String` per row.
    ///
    /// # Example
    /// ```
    /// use tp_core::frame::RenderedGrid;
    /// let grid = RenderedGrid::new(3, 2);
    /// assert_eq!(grid.to_lines(), vec!["   ".to_string(), "   ".to_string()]);
    /// ```
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.ch).collect())
            .collect()
    }
}
