//! Decide whether an image needs scaling, and scale it if so.
//!
//! ## Pipeline
//!
//! ```text
//! decode ─▶ should_scale? ──no──▶ return source path (no side effects)
//!                │
//!               yes
//!                ▼
//!   calculate_target_dimensions ─▶ encode ─▶ write ─▶ copy metadata ─▶ return dest path
//! ```
//!
//! Every step runs synchronously on the caller's thread. The first failure
//! aborts the call with a single [`ResizeError`] naming the stage that failed.
//! Nothing is cleaned up on failure: a destination written before a metadata
//! failure stays on disk. The source file is never modified.
//!
//! ## Concurrency
//!
//! [`ImageResizer`] holds only immutable configuration, so one instance can
//! serve concurrent calls from several threads. Two calls whose sources share
//! a basename race on the same destination under the default naming policy;
//! the last writer wins.

use crate::config::ResizerConfig;
use crate::imaging::{
    BackendError, Bounds, ImageBackend, ImageRequest, InvalidDimension, OutputFormat,
    ResizePlan, RustBackend, calculate_target_dimensions, should_scale,
};
use crate::metadata::{ExifCopier, MetadataCopier, MetadataFailure, NoopCopier};
use crate::writer::{WriteOptions, write_output};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("Invalid dimensions: {0}")]
    InvalidDimension(#[from] InvalidDimension),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResizeError {
    fn decode(path: &Path, err: BackendError) -> Self {
        let reason = match err {
            BackendError::Decode(reason) => reason,
            other => other.to_string(),
        };
        Self::Decode {
            path: path.to_path_buf(),
            reason,
        }
    }

    fn encode(err: BackendError) -> Self {
        match err {
            BackendError::Encode(reason) => Self::Encode(reason),
            other => Self::Encode(other.to_string()),
        }
    }
}

/// What a resize call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResizeOutcome {
    /// Already within bounds; the source path is returned untouched.
    Unchanged { path: PathBuf, width: u32, height: u32 },
    /// A scaled copy was written.
    Scaled {
        source: PathBuf,
        path: PathBuf,
        original_width: u32,
        original_height: u32,
        plan: ResizePlan,
        format: OutputFormat,
    },
}

impl ResizeOutcome {
    /// The path the caller should use from now on.
    pub fn path(&self) -> &Path {
        match self {
            Self::Unchanged { path, .. } | Self::Scaled { path, .. } => path,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            Self::Unchanged { path, .. } | Self::Scaled { path, .. } => path,
        }
    }
}

/// Dry-run answer from [`ImageResizer::preview`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub original: (u32, u32),
    /// `None` when no scaling is needed.
    pub plan: Option<ResizePlan>,
}

/// The resize orchestrator.
///
/// The backend, metadata copier, and output directory are fixed at
/// construction; nothing is read from the environment at call time.
pub struct ImageResizer<B, M> {
    backend: B,
    copier: M,
    output_dir: PathBuf,
    write_options: WriteOptions,
    on_metadata_failure: MetadataFailure,
}

impl<B: ImageBackend, M: MetadataCopier> ImageResizer<B, M> {
    pub fn new(backend: B, copier: M, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            copier,
            output_dir: output_dir.into(),
            write_options: WriteOptions::default(),
            on_metadata_failure: MetadataFailure::default(),
        }
    }

    pub fn with_write_options(mut self, options: WriteOptions) -> Self {
        self.write_options = options;
        self
    }

    pub fn with_metadata_failure(mut self, policy: MetadataFailure) -> Self {
        self.on_metadata_failure = policy;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Scale `source` to fit the bounds if it does not already.
    ///
    /// Returns the scaled file's path, or `source` unchanged when no bound is
    /// exceeded. `quality` (clamped to 0-100) only applies to JPEG output.
    pub fn resize_if_needed(
        &self,
        source: impl Into<PathBuf>,
        max_width: Option<u32>,
        max_height: Option<u32>,
        quality: u32,
    ) -> Result<PathBuf, ResizeError> {
        let request = ImageRequest::new(source, max_width, max_height, quality);
        self.run(&request).map(ResizeOutcome::into_path)
    }

    /// Run the full pipeline for one request.
    pub fn run(&self, request: &ImageRequest) -> Result<ResizeOutcome, ResizeError> {
        let source = &request.source;

        let decoded = self
            .backend
            .decode(source)
            .map_err(|e| ResizeError::decode(source, e))?;
        let original = decoded.dimensions();
        tracing::debug!(
            source = %source.display(),
            width = original.width,
            height = original.height,
            has_alpha = decoded.has_alpha(),
            "decoded"
        );

        if !should_scale(original, request.bounds) {
            tracing::info!(source = %source.display(), "within bounds, leaving unchanged");
            return Ok(ResizeOutcome::Unchanged {
                path: source.clone(),
                width: original.width,
                height: original.height,
            });
        }

        let plan = calculate_target_dimensions(original, request.bounds)?;
        tracing::debug!(width = plan.width, height = plan.height, "planned");

        let encoded = self
            .backend
            .encode(&decoded, &plan, request.quality)
            .map_err(ResizeError::encode)?;
        drop(decoded);
        tracing::debug!(format = %encoded.format, bytes = encoded.bytes.len(), "encoded");

        let dest = write_output(&encoded, source, &self.output_dir, &self.write_options)?;

        if let Err(e) = self.copier.copy_metadata(source, &dest) {
            match self.on_metadata_failure {
                MetadataFailure::Fail => return Err(ResizeError::Io(e)),
                MetadataFailure::Warn => {
                    tracing::warn!(dest = %dest.display(), "metadata copy failed: {}", e);
                }
            }
        }

        tracing::info!(
            source = %source.display(),
            dest = %dest.display(),
            width = plan.width,
            height = plan.height,
            format = %encoded.format,
            "scaled"
        );
        Ok(ResizeOutcome::Scaled {
            source: source.clone(),
            path: dest,
            original_width: original.width,
            original_height: original.height,
            plan,
            format: encoded.format,
        })
    }

    /// Report whether and how `source` would be scaled, without decoding
    /// pixels or writing anything.
    pub fn preview(&self, source: &Path, bounds: Bounds) -> Result<Preview, ResizeError> {
        let original = self
            .backend
            .identify(source)
            .map_err(|e| ResizeError::decode(source, e))?;
        let plan = if should_scale(original, bounds) {
            Some(calculate_target_dimensions(original, bounds)?)
        } else {
            None
        };
        Ok(Preview {
            original: (original.width, original.height),
            plan,
        })
    }
}

impl ImageResizer<RustBackend, Box<dyn MetadataCopier>> {
    /// Build the production resizer from a loaded config.
    pub fn from_config(config: &ResizerConfig) -> Self {
        let copier: Box<dyn MetadataCopier> = if config.metadata.copy {
            Box::new(ExifCopier)
        } else {
            Box::new(NoopCopier)
        };
        Self::new(
            RustBackend::with_filter(config.filter),
            copier,
            &config.output_dir,
        )
        .with_write_options(config.write_options())
        .with_metadata_failure(config.metadata.on_failure)
    }
}
