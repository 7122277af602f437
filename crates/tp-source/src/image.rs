use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tp_core::frame::PixelBuffer;
use tp_core::traits::Source;

/// Décode des octets compressés (PNG, JPEG, BMP, GIF, WebP) en RGB.
///
/// Le canal alpha est ignoré ; le format est deviné depuis les octets.
///
/// # Errors
/// Returns an error if the format is unknown or the data is corrupt.
///
/// # Example
/// ```
/// use std::io::Cursor;
/// use tp_source::image::decode_bytes;
///
/// let mut png = Vec::new();
/// image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]))
///     .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
///     .unwrap();
/// let pixels = decode_bytes(&png).unwrap();
/// assert_eq!((pixels.width(), pixels.height()), (3, 2));
/// assert_eq!(pixels.pixel(2, 1), (10, 20, 30));
/// ```
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes).context("Impossible de décoder l'image")?;
    into_pixels(img)
}

/// Charge et décode un fichier image.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use tp_source::image::load_image;
/// let pixels = load_image(Path::new("test.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    into_pixels(img)
}

fn into_pixels(img: image::DynamicImage) -> Result<PixelBuffer> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    log::debug!("Image décodée : {width}×{height}");
    Ok(PixelBuffer::from_raw(width, height, rgb.into_raw())?)
}

/// Source d'image locale.
///
/// # Example
/// ```no_run
/// use tp_core::traits::Source;
/// use tp_source::image::FileSource;
/// let mut source = FileSource::new("photo.jpg");
/// let pixels = source.load().unwrap();
/// ```
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source reading `path` on each load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Source for FileSource {
    fn load(&mut self) -> Result<PixelBuffer> {
        load_image(&self.path)
    }

    fn describe(&self) -> String {
        format!("fichier {}", self.path.display())
    }
}
