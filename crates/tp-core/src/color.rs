use serde::{Deserialize, Serialize};

/// Couleur RGB 8 bits par canal.
pub type Rgb = (u8, u8, u8);

/// Luminance perceptuelle BT.601 (`0.299R + 0.587G + 0.114B`), arrondie.
///
/// Calculée en virgule fixe 14 bits : les poids somment exactement à
/// `1 << 14`, donc le blanc donne 255 et le noir 0.
///
/// # Example
/// ```
/// use tp_core::color::luminance;
/// assert_eq!(luminance(0, 0, 0), 0);
/// assert_eq!(luminance(255, 255, 255), 255);
/// assert_eq!(luminance(255, 0, 0), 76);
/// ```
#[inline(always)]
#[must_use]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868 + 8192) >> 14) as u8
}

/// Squared Euclidean distance between two colors.
#[inline(always)]
#[must_use]
pub fn distance_sq(a: Rgb, b: Rgb) -> u32 {
    let dr = i32::from(a.0) - i32::from(b.0);
    let dg = i32::from(a.1) - i32::from(b.1);
    let db = i32::from(a.2) - i32::from(b.2);
    (dr * dr + dg * dg + db * db) as u32
}

/// Entrée nommée d'une palette.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaletteColor {
    /// Nom lisible ("red", "cyan", ...).
    pub name: String,
    /// Valeur RGB.
    pub rgb: Rgb,
}

impl PaletteColor {
    /// Build a named entry.
    #[must_use]
    pub fn new(name: &str, rgb: Rgb) -> Self {
        Self {
            name: name.to_string(),
            rgb,
        }
    }
}

/// Palette fixe et ordonnée, utilisée uniquement en mode PaletteDither.
///
/// L'ordre de déclaration départage les égalités de distance.
///
/// # Example
/// ```
/// use tp_core::color::Palette;
/// let palette = Palette::default();
/// assert_eq!(palette.len(), 8);
/// assert_eq!(palette.nearest((250, 10, 10)), Some(0));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteColor>,
}

impl Palette {
    /// Wrap an ordered list of entries. An empty list is representable but
    /// is rejected by the renderer in palette-dither mode.
    #[must_use]
    pub fn new(entries: Vec<PaletteColor>) -> Self {
        Self { entries }
    }

    /// The eight default entries: three primaries, three secondaries, then
    /// white and black.
    #[must_use]
    pub fn primaries() -> Self {
        Self::new(vec![
            PaletteColor::new("red", (255, 0, 0)),
            PaletteColor::new("green", (0, 255, 0)),
            PaletteColor::new("blue", (0, 0, 255)),
            PaletteColor::new("yellow", (255, 255, 0)),
            PaletteColor::new("cyan", (0, 255, 255)),
            PaletteColor::new("magenta", (255, 0, 255)),
            PaletteColor::new("white", (255, 255, 255)),
            PaletteColor::new("black", (0, 0, 0)),
        ])
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the palette has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[PaletteColor] {
        &self.entries
    }

    /// RGB value of entry `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    #[inline(always)]
    #[must_use]
    pub fn rgb(&self, index: usize) -> Rgb {
        self.entries[index].rgb
    }

    /// Index of the entry closest to `color` in RGB space.
    ///
    /// Distances are compared as exact integers; the first minimal entry in
    /// declaration order wins. `None` for an empty palette.
    ///
    /// # Example
    /// ```
    /// use tp_core::color::{Palette, PaletteColor};
    /// let palette = Palette::new(vec![
    ///     PaletteColor::new("black", (0, 0, 0)),
    ///     PaletteColor::new("white", (255, 255, 255)),
    /// ]);
    /// assert_eq!(palette.nearest((100, 100, 100)), Some(0));
    /// assert_eq!(palette.nearest((200, 200, 200)), Some(1));
    /// ```
    #[must_use]
    pub fn nearest(&self, color: Rgb) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            let dist = distance_sq(color, entry.rgb);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((i, dist)),
            }
        }
        best.map(|(i, _)| i)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::primaries()
    }
}
