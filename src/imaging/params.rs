//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`resizer`](crate::resizer) (which decides whether
//! and how far to scale) and the [`backend`](super::backend) (which does the
//! actual pixel work). This separation allows swapping backends (e.g. for
//! testing with a mock) without changing the decision logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (0–100, default 100). Clamped on construction.
//! - [`Bounds`]: Optional maximum width and height, each independently absent.
//! - [`ImageRequest`]: One resize invocation: source path, bounds, quality.
//! - [`ResizePlan`]: Target dimensions computed from the request and the decoded image.
//! - [`OutputFormat`]: Lossless (PNG) or lossy (JPEG) encoding choice.
//! - [`ResampleFilter`]: The fixed filter used to resample pixels.

use image::ImageFormat;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(100)
    }
}

/// Caller-supplied maximum dimensions.
///
/// An absent bound means "no limit on this axis". It is never a zero or an
/// infinity, and it never takes part in arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl Bounds {
    pub fn new(max_width: Option<u32>, max_height: Option<u32>) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_width.is_none() && self.max_height.is_none()
    }
}

/// A single resize invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub source: PathBuf,
    pub bounds: Bounds,
    pub quality: Quality,
}

impl ImageRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        max_width: Option<u32>,
        max_height: Option<u32>,
        quality: u32,
    ) -> Self {
        Self {
            source: source.into(),
            bounds: Bounds::new(max_width, max_height),
            quality: Quality::new(quality),
        }
    }
}

/// Target dimensions for a resize. Both are always > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizePlan {
    pub width: u32,
    pub height: u32,
}

/// Output encoding, chosen from the source's transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG. Used whenever the source has an alpha channel.
    Lossless,
    /// JPEG at the requested quality.
    Lossy,
}

impl OutputFormat {
    pub fn for_alpha(has_alpha: bool) -> Self {
        if has_alpha {
            Self::Lossless
        } else {
            Self::Lossy
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Lossless => ImageFormat::Png,
            Self::Lossy => ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lossless => f.write_str("png"),
            Self::Lossy => f.write_str("jpeg"),
        }
    }
}

/// Resampling filter applied when scaling.
///
/// `Nearest` reproduces plain unfiltered pixel scaling and is the default;
/// `Triangle` is bilinear interpolation. Both are deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    #[default]
    Nearest,
    Triangle,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
        }
    }
}
