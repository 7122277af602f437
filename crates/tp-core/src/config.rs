use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{CharStyle, CharsetPresets, CharsetTable};
use crate::color::{Palette, PaletteColor, Rgb};
use crate::frame::CellColor;

/// Options d'un rendu, lues seulement pendant le rendu.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use tp_core::config::RenderOptions;
/// let opts = RenderOptions::default();
/// assert_eq!((opts.target_width, opts.target_height), (120, 40));
/// assert!(opts.preserve_aspect_ratio);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RenderOptions {
    /// Largeur cible en cellules.
    pub target_width: u32,
    /// Hauteur cible en cellules.
    pub target_height: u32,
    /// Rampe de glyphes.
    pub char_style: CharStyle,
    /// Méthode de coloration.
    pub color_mode: ColorMode,
    /// Correction d'aspect des cellules terminal.
    pub preserve_aspect_ratio: bool,
    /// Gain multiplicatif. 1.0 = neutre.
    pub contrast: f32,
    /// Décalage additif dans l'espace 0–255. 0.0 = neutre.
    pub brightness: f32,
    /// Calque qui reçoit la couleur en modes Truecolor / PaletteDither.
    pub color_target: ColorTarget,
}

/// Color mode of a render.
///
/// # Example
/// ```
/// use tp_core::config::ColorMode;
/// assert!(matches!(ColorMode::default(), ColorMode::Grayscale));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ColorMode {
    /// Glyphes seuls, sans couleur.
    #[default]
    Grayscale,
    /// RGB direct du pixel source.
    Truecolor,
    /// Quantifié sur palette fixe avec diffusion d'erreur Floyd–Steinberg.
    PaletteDither,
}

/// Terminal layer receiving the cell color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ColorTarget {
    /// `ESC[48;2;…m`.
    #[default]
    Background,
    /// `ESC[38;2;…m`.
    Foreground,
}

impl ColorTarget {
    /// Attach `rgb` to this layer.
    ///
    /// # Example
    /// ```
    /// use tp_core::config::ColorTarget;
    /// use tp_core::frame::CellColor;
    /// assert_eq!(ColorTarget::Background.paint((1, 2, 3)), CellColor::Background((1, 2, 3)));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn paint(self, rgb: Rgb) -> CellColor {
        match self {
            Self::Background => CellColor::Background(rgb),
            Self::Foreground => CellColor::Foreground(rgb),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            target_width: 120,
            target_height: 40,
            char_style: CharStyle::Simple,
            color_mode: ColorMode::Grayscale,
            preserve_aspect_ratio: true,
            contrast: 1.0,
            brightness: 0.0,
            color_target: ColorTarget::Background,
        }
    }
}

impl RenderOptions {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.target_width = self.target_width.clamp(1, 2000);
        self.target_height = self.target_height.clamp(1, 2000);
        self.contrast = self.contrast.clamp(0.0, 10.0);
        self.brightness = self.brightness.clamp(-255.0, 255.0);
    }
}

/// Configuration complète de l'application : options, rampes, palette.
///
/// Construite une fois au démarrage puis passée par référence.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Options de rendu.
    pub render: RenderOptions,
    /// Rampes de glyphes par style.
    pub charsets: CharsetPresets,
    /// Palette du mode PaletteDither.
    pub palette: Palette,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            charsets: CharsetPresets::default(),
            palette: Palette::primaries(),
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
    charsets: Option<CharsetSection>,
    palette: Option<Vec<PaletteColor>>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    target_width: Option<u32>,
    target_height: Option<u32>,
    char_style: Option<CharStyle>,
    color_mode: Option<ColorMode>,
    preserve_aspect_ratio: Option<bool>,
    contrast: Option<f32>,
    brightness: Option<f32>,
    color_target: Option<ColorTarget>,
}

/// Charset overrides, one optional ramp per style.
#[derive(Deserialize)]
struct CharsetSection {
    simple: Option<String>,
    detailed: Option<String>,
    blocks: Option<String>,
}

/// Parse une configuration TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the TOML is malformed or a charset override has
/// fewer than 2 glyphs.
///
/// # Example
/// ```
/// use tp_core::config::{parse_config, ColorMode};
/// let config = parse_config("[render]\ncolor_mode = \"Truecolor\"\n").unwrap();
/// assert_eq!(config.render.color_mode, ColorMode::Truecolor);
/// assert_eq!(config.render.target_width, 120);
/// ```
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = AppConfig::default();

    if let Some(r) = file.render {
        let opts = &mut config.render;
        if let Some(v) = r.target_width {
            opts.target_width = v;
        }
        if let Some(v) = r.target_height {
            opts.target_height = v;
        }
        if let Some(v) = r.char_style {
            opts.char_style = v;
        }
        if let Some(v) = r.color_mode {
            opts.color_mode = v;
        }
        if let Some(v) = r.preserve_aspect_ratio {
            opts.preserve_aspect_ratio = v;
        }
        if let Some(v) = r.contrast {
            opts.contrast = v;
        }
        if let Some(v) = r.brightness {
            opts.brightness = v;
        }
        if let Some(v) = r.color_target {
            opts.color_target = v;
        }
    }

    if let Some(c) = file.charsets {
        for (style, ramp) in [
            (CharStyle::Simple, c.simple),
            (CharStyle::Detailed, c.detailed),
            (CharStyle::Blocks, c.blocks),
        ] {
            if let Some(ramp) = ramp {
                let table = CharsetTable::new(&ramp)
                    .with_context(|| format!("Charset {style:?} invalide : {ramp:?}"))?;
                config.charsets.set(style, table);
            }
        }
    }

    if let Some(entries) = file.palette {
        if entries.is_empty() {
            log::warn!("Palette vide dans la configuration, le mode PaletteDither échouera.");
        }
        config.palette = Palette::new(entries);
    }

    config.render.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use tp_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}
