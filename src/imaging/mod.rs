//! Image processing in pure Rust, with no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Decode** | `ImageReader::decode` (JPEG, PNG, TIFF, WebP) |
//! | **Resample** | `resize_exact` with a fixed filter (nearest by default) |
//! | **Encode** | PNG when the source has alpha, JPEG otherwise |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for the scale decision and dimension math (unit testable)
//! - **Parameters**: Data structures describing a resize request and its plan
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, DecodedImage, Dimensions, EncodedImage, ImageBackend};
pub use calculations::{InvalidDimension, calculate_target_dimensions, should_scale};
pub use params::{Bounds, ImageRequest, OutputFormat, Quality, ResampleFilter, ResizePlan};
pub use rust_backend::RustBackend;
