//! Persist an encoded image into the output directory.
//!
//! The default write is a plain truncate-and-write: a failure partway through
//! can leave a truncated file at the destination, and nothing is rolled back.
//! Setting [`WriteOptions::atomic`] writes to a temp file in the output
//! directory and renames it over the destination instead, so readers only
//! ever see the old file or the complete new one.

use crate::imaging::EncodedImage;
use crate::naming::{NamingPolicy, scaled_file_name};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// How the writer names and lands files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub naming: NamingPolicy,
    pub atomic: bool,
}

/// Write `encoded` to `output_dir/scaled_<basename of source>`.
///
/// An existing file at the destination is overwritten. The output directory
/// must already exist. Returns the destination path.
pub fn write_output(
    encoded: &EncodedImage,
    source: &Path,
    output_dir: &Path,
    options: &WriteOptions,
) -> io::Result<PathBuf> {
    let name = scaled_file_name(source, options.naming, &encoded.bytes)?;
    let dest = output_dir.join(name);

    if options.atomic {
        let mut tmp = NamedTempFile::new_in(output_dir)?;
        tmp.write_all(&encoded.bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&dest).map_err(|e| e.error)?;
    } else {
        std::fs::write(&dest, &encoded.bytes)?;
    }

    tracing::debug!(
        dest = %dest.display(),
        bytes = encoded.bytes.len(),
        atomic = options.atomic,
        "wrote scaled image"
    );
    Ok(dest)
}
