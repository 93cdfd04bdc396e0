//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, decode, and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust codecs.

use super::params::{OutputFormat, Quality, ResizePlan};
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A decoded raster image, owned for the duration of one resize.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    has_alpha: bool,
    pixels: DynamicImage,
}

impl DecodedImage {
    pub fn new(pixels: DynamicImage) -> Self {
        Self {
            width: pixels.width(),
            height: pixels.height(),
            has_alpha: pixels.color().has_alpha(),
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }
}

/// An encoded output buffer and the format it was encoded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Every backend must implement all three operations so the resizer stays
/// backend-agnostic.
pub trait ImageBackend: Sync {
    /// Get image dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode a raster image from disk.
    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError>;

    /// Resample `image` to `plan` and encode it.
    ///
    /// Sources with an alpha channel are encoded losslessly and `quality` is
    /// ignored; opaque sources are encoded lossily at `quality`.
    fn encode(
        &self,
        image: &DecodedImage,
        plan: &ResizePlan,
        quality: Quality,
    ) -> Result<EncodedImage, BackendError>;
}
