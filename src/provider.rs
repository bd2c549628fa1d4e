//! Model Provider Trait
//!
//! Defines the narrow adapter interface the gateway talks to. Swapping the
//! provider SDK means implementing [`ModelBackend`]; nothing above the
//! dispatcher changes.

use crate::error::{ImageError, ProviderError};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;

/// Largest image accepted for analysis.
pub const MAX_IMAGE_SIZE_MB: u64 = 10;

/// Longest side of a photo after preparation.
pub const MAX_IMAGE_DIMENSION: u32 = 800;

/// JPEG quality used when re-encoding photos.
pub const JPEG_QUALITY: u8 = 85;

/// Generative model provider
///
/// One capability: generate text for a prompt, optionally with an image,
/// against a named model. Implementations perform exactly one provider call
/// and must not retry.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Generate a text answer
    ///
    /// # Arguments
    ///
    /// * `model` - Provider model identifier (e.g. `models/gemini-1.5-flash`)
    /// * `prompt` - Fully built prompt text
    /// * `image` - Optional image sent alongside the prompt as multimodal input
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<String, ProviderError>;

    /// Short provider name used in logs (e.g. "gemini")
    fn name(&self) -> &str;
}

/// Decoded image attached to a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
    /// Raw encoded image bytes
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Map a file extension to the MIME type of an accepted image format.
    pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            _ => None,
        }
    }

    /// Load a photo from disk and prepare it for upload.
    ///
    /// Format and size are checked before reading. The file is then decoded,
    /// so a corrupt file never reaches the provider. See
    /// [`from_image_bytes`](Self::from_image_bytes) for the preparation.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if Self::mime_for_extension(ext).is_none() {
            return Err(ImageError::UnsupportedFormat(ext.to_string()));
        }

        let len = std::fs::metadata(path)?.len();
        if len > MAX_IMAGE_SIZE_MB * 1024 * 1024 {
            return Err(ImageError::TooLarge {
                size_mb: len as f64 / (1024.0 * 1024.0),
                limit_mb: MAX_IMAGE_SIZE_MB,
            });
        }

        Self::from_image_bytes(&std::fs::read(path)?)
    }

    /// Decode an encoded photo, flatten any transparency onto white, shrink
    /// it to fit [`MAX_IMAGE_DIMENSION`] and re-encode as JPEG.
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;

        let mut prepared = DynamicImage::ImageRgb8(flatten_on_white(&decoded));
        if prepared.width() > MAX_IMAGE_DIMENSION || prepared.height() > MAX_IMAGE_DIMENSION {
            prepared = prepared.thumbnail(MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION);
        }

        let mut encoded = Vec::new();
        prepared
            .write_with_encoder(JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY))
            .map_err(|e| ImageError::Encode(e.to_string()))?;

        Ok(Self::new("image/jpeg", encoded))
    }
}

/// RGB copy of `image` with alpha composited over a white background.
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}
