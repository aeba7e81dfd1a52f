//! Scanner module for directory traversal, statistics, and file hashing.
//!
//! This module provides functionality for:
//! - Recursive directory walking with deterministic entry order
//! - Aggregate statistics by extension, category, and directory
//! - Content fingerprinting with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`stats`]: Aggregate tallies consumed by reporting
//! - [`category`]: Extension-based file classification
//! - [`hasher`]: BLAKE3 file fingerprinting (streaming)

pub mod category;
pub mod hasher;
pub mod stats;
pub mod walker;

use std::path::PathBuf;
use std::time::SystemTime;

use serde::Serialize;

// Re-export main types
pub use category::FileCategory;
pub use hasher::{fingerprint_hex, Fingerprint, HashError, Hasher, BLOCK_SIZE};
pub use stats::{ScanStats, Tally};
pub use walker::scan_tree;

/// Metadata for a discovered file.
///
/// An immutable snapshot taken at scan time; the detection pipeline consumes
/// it read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

impl FileEntry {
    /// Create a new FileEntry.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    /// * `modified` - Last modification time
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            modified,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified root path was not found.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The specified root path is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while reading the root directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
