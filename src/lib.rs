//! # downscale
//!
//! Scale raster images down to caller-supplied maximum dimensions.
//!
//! Given a source image and an optional maximum width and/or height, the
//! resizer decides whether the image exceeds either bound. If it does not,
//! the source path is handed back untouched. If it does, the image is
//! resampled to the largest size that fits while keeping its aspect ratio,
//! re-encoded, written to the output directory as `scaled_<name>`, and its
//! EXIF tags are copied across.
//!
//! ```no_run
//! use downscale::imaging::RustBackend;
//! use downscale::metadata::ExifCopier;
//! use downscale::resizer::ImageResizer;
//!
//! let resizer = ImageResizer::new(RustBackend::new(), ExifCopier, "/tmp/scaled");
//! let path = resizer.resize_if_needed("photos/IMG_0042.jpg", Some(1024), None, 85)?;
//! println!("{}", path.display());
//! # Ok::<(), downscale::resizer::ResizeError>(())
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resizer`] | The orchestrator: decode → decide → plan → encode → write → copy metadata |
//! | [`imaging`] | Scale decision, dimension math, and the `image`-crate backend |
//! | [`writer`] | Lands encoded bytes in the output directory |
//! | [`naming`] | `scaled_<name>` destination naming and the collision policy |
//! | [`metadata`] | EXIF carry-over from source to scaled file |
//! | [`config`] | TOML config loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Absent Bounds Are Not Numbers
//!
//! A missing bound is an `Option::None`, not a zero or `u32::MAX`. It is
//! skipped by the scale decision and treated as "no limit on this axis" by
//! the dimension math, so it can never leak into arithmetic.
//!
//! ## Transparency Picks the Format
//!
//! Images with an alpha channel are always written as PNG and the requested
//! quality is ignored; everything else is JPEG at that quality. The output
//! file keeps the source's extension either way, so a transparent `.jpg`
//! source yields PNG bytes in a `.jpg` file.
//!
//! ## Injected Collaborators
//!
//! The backend, the metadata copier, and the output directory are passed to
//! [`resizer::ImageResizer::new`]. Nothing is read from global state at call
//! time, and tests swap in recording doubles.

pub mod config;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod resizer;
pub mod writer;
