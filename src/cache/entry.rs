//! Cache entry definitions.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::scanner::Fingerprint;

/// A single cached fingerprint, keyed externally by path.
///
/// The entry is valid for a file iff `size` and `modified` both match the
/// current scan snapshot exactly. This is a conservative staleness check; a
/// touched-but-identical file is simply re-hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// File size in bytes at the time the fingerprint was computed.
    pub size: u64,
    /// Modification time at the time the fingerprint was computed.
    pub modified: SystemTime,
    /// The computed content fingerprint.
    pub fingerprint: Fingerprint,
}

impl CacheEntry {
    /// Create a new cache entry.
    #[must_use]
    pub fn new(size: u64, modified: SystemTime, fingerprint: Fingerprint) -> Self {
        Self {
            size,
            modified,
            fingerprint,
        }
    }

    /// Check whether this entry is still valid for the given snapshot.
    #[must_use]
    pub fn matches(&self, size: u64, modified: SystemTime) -> bool {
        self.size == size && self.modified == modified
    }
}
