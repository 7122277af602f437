/// Image sources for termpix (local file, URL, gallery tag).
///
/// Every source ends in [`crate::image::decode_bytes`] or
/// [`crate::image::load_image`] and hands an RGB `PixelBuffer` to the
/// renderer.
pub mod fetch;
pub mod gallery;
pub mod image;

pub use crate::fetch::UrlSource;
pub use crate::gallery::TagSource;
pub use crate::image::FileSource;
