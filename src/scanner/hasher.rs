//! BLAKE3 content fingerprinting with streaming reads.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing BLAKE3 fingerprints
//! of file contents. Files are read in fixed-size blocks so memory stays
//! bounded regardless of file size.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// A content fingerprint: the 32-byte BLAKE3 digest of a file's full contents.
///
/// Fingerprint equality is the sole duplicate criterion; two files with equal
/// fingerprints are treated as byte-identical.
pub type Fingerprint = [u8; 32];

/// Default read block size (64 KiB).
pub const BLOCK_SIZE: usize = 64 * 1024;

/// Convert a fingerprint to its lowercase hex representation.
///
/// # Example
///
/// ```
/// use dupescan::scanner::fingerprint_hex;
///
/// let mut fp = [0u8; 32];
/// fp[0] = 0xAB;
/// assert!(fingerprint_hex(&fp).starts_with("ab00"));
/// ```
#[must_use]
pub fn fingerprint_hex(fp: &Fingerprint) -> String {
    let mut hex = String::with_capacity(64);
    for byte in fp {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Errors that can occur while fingerprinting a file.
///
/// A hash error excludes the file from duplicate grouping for the current run;
/// it never aborts the detection pass.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file was not found (it may have been removed mid-scan).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// The path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::Io { path, .. } => path,
        }
    }

    fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Streaming BLAKE3 file hasher.
///
/// Reads files block by block and folds the blocks into a single running
/// digest, so memory usage is `block_size` regardless of file size.
#[derive(Debug, Clone)]
pub struct Hasher {
    block_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default block size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            block_size: BLOCK_SIZE,
        }
    }

    /// Create a hasher with a custom block size.
    ///
    /// # Arguments
    ///
    /// * `block_size` - Read block size in bytes (minimum 1)
    #[must_use]
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    /// Compute the fingerprint of a file's full contents.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// partway. Callers must treat a failed file as having no fingerprint for
    /// this run and continue with the remaining files.
    pub fn digest(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.block_size];

        loop {
            let read = file
                .read(&mut buffer)
                .map_err(|e| HashError::from_io(path, e))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(*hasher.finalize().as_bytes())
    }
}
