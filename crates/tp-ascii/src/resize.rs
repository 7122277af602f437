use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use tp_core::error::RenderError;
use tp_core::frame::PixelBuffer;

/// Resizer bilinéaire wrappant fast_image_resize.
///
/// # Example
/// ```
/// use tp_ascii::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch copy of the source (fast_image_resize wants `&mut` on it).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new bilinear resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
            src_buf: Vec::new(),
        }
    }

    /// Resample `src` to `width × height`.
    ///
    /// A same-size request returns a copy of `src`.
    ///
    /// # Errors
    /// Returns `RenderError::Resize` if the resampler rejects the buffers
    /// (zero dimensions included).
    ///
    /// # Example
    /// ```
    /// use tp_ascii::resize::Resizer;
    /// use tp_core::frame::PixelBuffer;
    /// let mut r = Resizer::new();
    /// let src = PixelBuffer::filled(100, 100, (9, 9, 9));
    /// let dst = r.resize(&src, 50, 25).unwrap();
    /// assert_eq!((dst.width(), dst.height()), (50, 25));
    /// assert_eq!(dst.pixel(10, 10), (9, 9, 9));
    /// ```
    pub fn resize(
        &mut self,
        src: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, RenderError> {
        if src.width() == width && src.height() == height {
            return Ok(src.clone());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(src.as_raw());

        let src_image = Image::from_slice_u8(
            src.width(),
            src.height(),
            &mut self.src_buf,
            PixelType::U8x3,
        )
        .map_err(|e| RenderError::Resize(format!("source {}×{} : {e}", src.width(), src.height())))?;

        let mut dst_data = vec![0u8; width as usize * height as usize * 3];
        let mut dst_image = Image::from_slice_u8(width, height, &mut dst_data, PixelType::U8x3)
            .map_err(|e| RenderError::Resize(format!("destination {width}×{height} : {e}")))?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .map_err(|e| RenderError::Resize(e.to_string()))?;

        PixelBuffer::from_raw(width, height, dst_data)
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience for one-shot usage.
///
/// # Errors
/// Returns `RenderError::Resize` if the resize operation fails.
///
/// # Example
/// ```
/// use tp_ascii::resize::resize_pixels;
/// use tp_core::frame::PixelBuffer;
/// let src = PixelBuffer::filled(100, 100, (0, 0, 0));
/// let dst = resize_pixels(&src, 40, 20).unwrap();
/// assert_eq!(dst.width(), 40);
/// ```
pub fn resize_pixels(src: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer, RenderError> {
    Resizer::new().resize(src, width, height)
}
