//! Content fingerprints for change detection.
//!
//! A [`Fingerprint`] is the lowercase hex encoding of the xxHash3-128 digest of a
//! file's bytes. It is only used to tell whether a sound changed between two
//! reloads, so speed and determinism matter, collision resistance does not.

use crate::error::Result;
use camino::Utf8Path;
use std::fmt;
use std::io::Read;
use xxhash_rust::xxh3::{xxh3_128, Xxh3};

/// Read buffer size used when streaming files into the hasher.
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Hex-encoded xxHash3-128 digest of a file's contents (always 32 characters).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_digest(xxh3_128(data))
    }

    /// Fingerprint a file by streaming it through the hasher.
    ///
    /// The file is never fully resident in memory, so large assets only cost the
    /// size of the read buffer.
    pub fn from_file(path: &Utf8Path) -> Result<Self> {
        let mut file = std::fs::File::open(path.as_std_path())?;
        let mut hasher = Xxh3::new();
        let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

        loop {
            let read = file.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(Self::from_digest(hasher.digest128()))
    }

    fn from_digest(digest: u128) -> Self {
        Self(format!("{:032x}", digest))
    }

    /// The hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.0[..16])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
