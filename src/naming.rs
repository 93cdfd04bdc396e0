//! Destination filename derivation for scaled images.
//!
//! A scaled copy of `photos/IMG_0042.jpg` is named `scaled_IMG_0042.jpg`.
//! The extension is carried over unchanged from the source, even when the
//! encoder picked a format the extension does not describe (a transparent
//! `.jpg` source comes out as PNG bytes in a `.jpg` file).
//!
//! ## Collision policy
//!
//! Two sources with the same basename map to the same destination, and the
//! later write wins. [`NamingPolicy::ContentHash`] opts out of that by
//! prefixing a digest of the encoded bytes:
//!
//! ```text
//! overwrite     scaled_IMG_0042.jpg
//! content-hash  scaled_3fa1c0d2b9e4_IMG_0042.jpg
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;

/// Prefix for every scaled output file.
pub const SCALED_PREFIX: &str = "scaled_";

/// Number of hex characters of the SHA-256 digest kept in hashed names.
const HASH_LEN: usize = 12;

/// How destination names are derived when basenames collide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingPolicy {
    /// `scaled_<basename>`; same basename → same path, last writer wins.
    #[default]
    Overwrite,
    /// `scaled_<digest>_<basename>`; digest of the encoded bytes.
    ContentHash,
}

/// SHA-256 of the encoded bytes, truncated for use in a filename.
pub fn short_digest(bytes: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(bytes));
    digest[..HASH_LEN].to_string()
}

/// Derive the destination filename for a scaled copy of `source`.
///
/// Fails with [`io::ErrorKind::InvalidInput`] when `source` has no final
/// path component (e.g. `/` or `..`).
pub fn scaled_file_name(source: &Path, policy: NamingPolicy, bytes: &[u8]) -> io::Result<String> {
    let basename = source.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", source.display()),
        )
    })?;
    let basename = basename.to_string_lossy();

    Ok(match policy {
        NamingPolicy::Overwrite => format!("{SCALED_PREFIX}{basename}"),
        NamingPolicy::ContentHash => {
            format!("{SCALED_PREFIX}{}_{basename}", short_digest(bytes))
        }
    })
}
