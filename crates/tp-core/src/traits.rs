use anyhow::Result;

use crate::frame::PixelBuffer;

/// Fournit l'image source au pipeline.
///
/// Implémenté par : `FileSource`, `UrlSource`, `TagSource`.
///
/// # Example
/// ```
/// use tp_core::traits::Source;
/// use tp_core::frame::PixelBuffer;
///
/// struct SolidSource;
/// impl Source for SolidSource {
///     fn load(&mut self) -> anyhow::Result<PixelBuffer> {
///         Ok(PixelBuffer::filled(4, 4, (0, 0, 0)))
///     }
///     fn describe(&self) -> String { "solid".into() }
/// }
///
/// let mut source = SolidSource;
/// assert_eq!(source.load().unwrap().width(), 4);
/// ```
pub trait Source {
    /// Récupère et décode l'image.
    ///
    /// Bloquant : lecture disque ou requête HTTP. Les erreurs amont (statut
    /// HTTP, octets corrompus) sont remontées ici, jamais par le rendu.
    ///
    /// # Errors
    /// Returns an error if the image cannot be retrieved or decoded.
    fn load(&mut self) -> Result<PixelBuffer>;

    /// Description lisible pour les logs.
    fn describe(&self) -> String;
}
