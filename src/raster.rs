//! Background image decoding and display fitting.
//!
//! The overlay only needs the final on-screen size of the image; pixels are
//! handed to whatever surface displays them.

use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;

use crate::error::EditorError;
use crate::render::CanvasGeometry;

/// Extensions offered by the background image picker.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff", "tif"];

/// Display area the image must fit into, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBounds {
    pub width: u32,
    pub height: u32,
}

impl DisplayBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Size an image is shown at: unchanged if it fits inside `bounds` minus
/// `margin`, otherwise scaled down uniformly until it does.
pub fn fit_to_bounds(width: u32, height: u32, bounds: DisplayBounds, margin: u32) -> (u32, u32) {
    let max_width = bounds.width.saturating_sub(margin).max(1);
    let max_height = bounds.height.saturating_sub(margin).max(1);

    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = (f64::from(max_width) / f64::from(width))
        .min(f64::from(max_height) / f64::from(height));
    let fitted_width = (f64::from(width) * scale) as u32;
    let fitted_height = (f64::from(height) * scale) as u32;
    (fitted_width.max(1), fitted_height.max(1))
}

/// A decoded image ready for display.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Pixels at display size
    pub pixels: RgbaImage,
    /// Size of the source image before fitting
    pub original_size: (u32, u32),
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether the image was scaled down to fit the display.
    pub fn is_scaled(&self) -> bool {
        self.original_size != (self.width(), self.height())
    }

    /// Canvas the overlay is projected onto.
    pub fn geometry(&self) -> CanvasGeometry {
        CanvasGeometry::new(f64::from(self.width()), f64::from(self.height()))
    }
}

/// Decodes image bytes and fits them to the display.
pub trait ImageDecoder {
    fn decode(&self, bytes: &[u8], bounds: DisplayBounds) -> Result<DecodedImage, EditorError>;

    /// Read and decode a file.
    fn decode_file(&self, path: &Path, bounds: DisplayBounds) -> Result<DecodedImage, EditorError> {
        let bytes = std::fs::read(path)
            .map_err(|e| EditorError::image_decode(format!("{}: {}", path.display(), e)))?;
        self.decode(&bytes, bounds)
    }
}

/// [`ImageDecoder`] backed by the `image` crate, resizing with Lanczos3.
#[derive(Debug, Clone, Copy)]
pub struct RasterDecoder {
    /// Pixels kept free on each display axis
    pub margin: u32,
}

impl RasterDecoder {
    pub fn new(margin: u32) -> Self {
        Self { margin }
    }
}

impl ImageDecoder for RasterDecoder {
    fn decode(&self, bytes: &[u8], bounds: DisplayBounds) -> Result<DecodedImage, EditorError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| EditorError::image_decode(e.to_string()))?
            .to_rgba8();

        let original_size = (img.width(), img.height());
        let (width, height) = fit_to_bounds(original_size.0, original_size.1, bounds, self.margin);

        let pixels = if (width, height) == original_size {
            img
        } else {
            log::debug!(
                "Scaling image {}x{} -> {}x{} to fit {}x{} display",
                original_size.0,
                original_size.1,
                width,
                height,
                bounds.width,
                bounds.height
            );
            image::imageops::resize(&img, width, height, FilterType::Lanczos3)
        };

        log::info!("Decoded {}x{} image", pixels.width(), pixels.height());

        Ok(DecodedImage {
            pixels,
            original_size,
        })
    }
}
