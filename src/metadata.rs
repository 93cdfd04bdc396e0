//! Metadata carry-over from a source image to its scaled copy.
//!
//! Re-encoding drops every tag the source carried, including orientation,
//! so the resizer hands `(source, destination)` to a [`MetadataCopier`] once
//! the scaled file is on disk.
//!
//! | Implementation | Behaviour |
//! |---|---|
//! | [`ExifCopier`] | Reads EXIF from the source with `little_exif` and writes it to the destination |
//! | [`NoopCopier`] | Does nothing; used when `metadata.copy = false` |
//!
//! A source without readable EXIF is not an error: there is simply nothing to
//! copy. Failing to *write* tags to the destination is.
//!
//! The destination keeps the source's extension even when the encoder picked
//! a different container, so the container is sniffed from the written bytes
//! and never inferred from the file name.

use little_exif::filetype::FileExtension;
use little_exif::metadata::Metadata;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

/// Copies auxiliary image tags from one file to another.
pub trait MetadataCopier: Sync {
    fn copy_metadata(&self, source: &Path, dest: &Path) -> io::Result<()>;
}

impl<T: MetadataCopier + ?Sized> MetadataCopier for &T {
    fn copy_metadata(&self, source: &Path, dest: &Path) -> io::Result<()> {
        (**self).copy_metadata(source, dest)
    }
}

impl<T: MetadataCopier + ?Sized> MetadataCopier for Box<T> {
    fn copy_metadata(&self, source: &Path, dest: &Path) -> io::Result<()> {
        (**self).copy_metadata(source, dest)
    }
}

/// What the resizer does when the copier fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataFailure {
    /// Abort the resize with an IO error.
    #[default]
    Fail,
    /// Log a warning and return the scaled path anyway.
    Warn,
}

/// EXIF copier backed by `little_exif`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifCopier;

impl MetadataCopier for ExifCopier {
    fn copy_metadata(&self, source: &Path, dest: &Path) -> io::Result<()> {
        let metadata = match Metadata::new_from_path(source) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!(source = %source.display(), "no EXIF to copy: {}", e);
                return Ok(());
            }
        };
        let mut bytes = fs::read(dest)?;
        let container = FileExtension::auto_detect(&mut Cursor::new(&bytes)).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: unrecognised image container", dest.display()),
            )
        })?;
        metadata.write_to_vec(&mut bytes, container)?;
        fs::write(dest, bytes)
    }
}

/// Copier that never touches the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCopier;

impl MetadataCopier for NoopCopier {
    fn copy_metadata(&self, _source: &Path, _dest: &Path) -> io::Result<()> {
        Ok(())
    }
}
