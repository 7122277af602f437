use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tp_core::charset::CharStyle;
use tp_core::config::{AppConfig, ColorMode, ColorTarget, RenderOptions};

/// termpix : affiche une image en art ASCII/Unicode dans le terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source : chemin vers une image (PNG, JPEG, BMP, GIF, WebP).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Source : URL d'une image.
    #[arg(long)]
    pub url: Option<String>,

    /// Source : tag de la galerie (maid, waifu, uniform, ...).
    #[arg(long)]
    pub tag: Option<String>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Largeur cible en cellules.
    #[arg(long)]
    pub width: Option<u32>,

    /// Hauteur cible en cellules.
    #[arg(long)]
    pub height: Option<u32>,

    /// Rampe de glyphes.
    #[arg(long, value_enum)]
    pub style: Option<StyleArg>,

    /// Mode couleur.
    #[arg(long, value_enum)]
    pub color: Option<ColorArg>,

    /// Désactiver la correction d'aspect des cellules.
    #[arg(long, default_value_t = false)]
    pub no_aspect: bool,

    /// Gain de contraste (1.0 = neutre).
    #[arg(long)]
    pub contrast: Option<f32>,

    /// Décalage de luminosité (-255 à 255).
    #[arg(long, allow_hyphen_values = true)]
    pub brightness: Option<f32>,

    /// Colorer le texte plutôt que le fond.
    #[arg(long, default_value_t = false)]
    pub foreground: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// `--style` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Simple,
    Detailed,
    Blocks,
}

impl From<StyleArg> for CharStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Simple => Self::Simple,
            StyleArg::Detailed => Self::Detailed,
            StyleArg::Blocks => Self::Blocks,
        }
    }
}

/// `--color` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Grayscale,
    Truecolor,
    Dither,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Grayscale => Self::Grayscale,
            ColorArg::Truecolor => Self::Truecolor,
            ColorArg::Dither => Self::PaletteDither,
        }
    }
}

impl Cli {
    /// Validate that exactly one image source is provided.
    ///
    /// # Errors
    /// Returns an error if zero or more than one source is specified.
    pub fn validate_source(&self) -> anyhow::Result<()> {
        let count = usize::from(self.image.is_some())
            + usize::from(self.url.is_some())
            + usize::from(self.tag.is_some());

        if count == 0 {
            anyhow::bail!("Aucune source spécifiée. Utilisez --image, --url ou --tag.");
        }
        if count > 1 {
            anyhow::bail!("Une seule source à la fois. Spécifiez --image, --url OU --tag.");
        }
        Ok(())
    }

    /// Load the config file, or the defaults when it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn resolve_config(&self) -> anyhow::Result<AppConfig> {
        if self.config.exists() {
            tp_core::config::load_config(&self.config)
        } else {
            log::warn!(
                "Config introuvable : {}. Utilisation des défauts.",
                self.config.display()
            );
            Ok(AppConfig::default())
        }
    }

    /// Apply command-line overrides on top of the file configuration, then
    /// clamp.
    pub fn apply_overrides(&self, opts: &mut RenderOptions) {
        if let Some(w) = self.width {
            opts.target_width = w;
        }
        if let Some(h) = self.height {
            opts.target_height = h;
        }
        if let Some(style) = self.style {
            opts.char_style = style.into();
        }
        if let Some(color) = self.color {
            opts.color_mode = color.into();
        }
        if self.no_aspect {
            opts.preserve_aspect_ratio = false;
        }
        if let Some(c) = self.contrast {
            opts.contrast = c;
        }
        if let Some(b) = self.brightness {
            opts.brightness = b;
        }
        if self.foreground {
            opts.color_target = ColorTarget::Foreground;
        }
        opts.clamp_all();
    }
}
