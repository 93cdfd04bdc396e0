//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use super::params::{Bounds, ResizePlan};
use thiserror::Error;

/// A resize that would produce (or start from) a zero-sized image.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot scale {original_width}x{original_height} to {target_width}x{target_height}")]
pub struct InvalidDimension {
    pub original_width: u32,
    pub original_height: u32,
    pub target_width: u64,
    pub target_height: u64,
}

/// Decide whether an image must be scaled to fit its bounds.
///
/// True iff some present bound is strictly smaller than the matching
/// original dimension. Absent bounds are skipped, so an unbounded request
/// never scales, and a bound equal to the dimension does not trigger a resize.
///
/// # Examples
/// ```
/// # use downscale::imaging::{Bounds, Dimensions, should_scale};
/// let original = Dimensions { width: 1000, height: 500 };
/// assert!(should_scale(original, Bounds::new(Some(500), None)));
/// assert!(!should_scale(original, Bounds::new(None, Some(500))));
/// assert!(!should_scale(original, Bounds::default()));
/// ```
pub fn should_scale(original: Dimensions, bounds: Bounds) -> bool {
    if bounds.is_unbounded() {
        return false;
    }
    let width_exceeds = bounds.max_width.is_some_and(|w| w < original.width);
    let height_exceeds = bounds.max_height.is_some_and(|h| h < original.height);
    width_exceeds || height_exceeds
}

/// Calculate aspect-preserving target dimensions within `bounds`.
///
/// With both bounds present, `max_width * height` is compared against
/// `max_height * width`: if the former is greater the height bound binds,
/// otherwise the width bound does. With one bound present that axis binds.
/// With none, the original size is returned. The free axis is floored.
///
/// # Errors
/// [`InvalidDimension`] if either original dimension is zero, or either
/// target dimension floors to zero or overflows `u32`.
///
/// # Examples
/// ```
/// # use downscale::imaging::{Bounds, Dimensions, calculate_target_dimensions};
/// let original = Dimensions { width: 1000, height: 500 };
/// let plan = calculate_target_dimensions(original, Bounds::new(Some(500), None)).unwrap();
/// assert_eq!((plan.width, plan.height), (500, 250));
/// ```
pub fn calculate_target_dimensions(
    original: Dimensions,
    bounds: Bounds,
) -> Result<ResizePlan, InvalidDimension> {
    let orig_w = u64::from(original.width);
    let orig_h = u64::from(original.height);

    let invalid = |target_width, target_height| InvalidDimension {
        original_width: original.width,
        original_height: original.height,
        target_width,
        target_height,
    };

    if orig_w == 0 || orig_h == 0 {
        return Err(invalid(orig_w, orig_h));
    }

    let (width, height) = match (bounds.max_width, bounds.max_height) {
        (Some(max_w), Some(max_h)) => {
            let (max_w, max_h) = (u64::from(max_w), u64::from(max_h));
            if max_w * orig_h > max_h * orig_w {
                (max_h * orig_w / orig_h, max_h)
            } else {
                (max_w, max_w * orig_h / orig_w)
            }
        }
        (Some(max_w), None) => {
            let max_w = u64::from(max_w);
            (max_w, max_w * orig_h / orig_w)
        }
        (None, Some(max_h)) => {
            let max_h = u64::from(max_h);
            (max_h * orig_w / orig_h, max_h)
        }
        (None, None) => (orig_w, orig_h),
    };

    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok(ResizePlan {
            width: w,
            height: h,
        }),
        _ => Err(invalid(width, height)),
    }
}
