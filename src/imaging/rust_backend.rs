//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Resample | `image::DynamicImage::resize_exact` with the configured filter |
//! | Encode → PNG (alpha) | `image::codecs::png::PngEncoder` |
//! | Encode → JPEG (opaque) | `image::codecs::jpeg::JpegEncoder` at the requested quality |

use super::backend::{BackendError, DecodedImage, Dimensions, EncodedImage, ImageBackend};
use super::params::{OutputFormat, Quality, ResampleFilter, ResizePlan};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustBackend {
    filter: ResampleFilter,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }
}

/// Open a file and sniff its format from the content, not the extension.
fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Encode opaque pixels as JPEG. The encoder accepts 1-100, so 0 maps to 1.
fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let q = quality.value().clamp(1, 100) as u8;
    JpegEncoder::new_with_quality(&mut buf, q)
        .encode_image(&rgb)
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {}", e)))?;
    Ok(buf)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, BackendError> {
    let rgba = img.to_rgba8();
    let mut buf = Vec::new();
    rgba.write_with_encoder(PngEncoder::new(&mut buf))
        .map_err(|e| BackendError::Encode(format!("PNG encode failed: {}", e)))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_reader(path)?.into_dimensions().map_err(|e| {
            BackendError::Decode(format!("Failed to read dimensions of {}: {}", path.display(), e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError> {
        let pixels = open_reader(path)?.decode().map_err(|e| {
            BackendError::Decode(format!("Failed to decode {}: {}", path.display(), e))
        })?;
        Ok(DecodedImage::new(pixels))
    }

    fn encode(
        &self,
        image: &DecodedImage,
        plan: &ResizePlan,
        quality: Quality,
    ) -> Result<EncodedImage, BackendError> {
        let resized =
            image
                .pixels()
                .resize_exact(plan.width, plan.height, self.filter.filter_type());
        if resized.width() != plan.width || resized.height() != plan.height {
            return Err(BackendError::Encode(format!(
                "Resample produced {}x{}, expected {}x{}",
                resized.width(),
                resized.height(),
                plan.width,
                plan.height
            )));
        }

        let format = OutputFormat::for_alpha(image.has_alpha());
        let bytes = match format {
            OutputFormat::Lossless => encode_png(&resized)?,
            OutputFormat::Lossy => encode_jpeg(&resized, quality)?,
        };
        if bytes.is_empty() {
            return Err(BackendError::Encode(format!("{} encoder produced no data", format)));
        }

        Ok(EncodedImage {
            bytes,
            format,
            width: plan.width,
            height: plan.height,
        })
    }
}
