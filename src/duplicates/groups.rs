//! Size-based candidate grouping and duplicate group types.
//!
//! # Overview
//!
//! Size grouping is the first phase of duplicate detection. It partitions
//! files by exact byte size and prunes singleton buckets, since files with
//! different sizes cannot be duplicates. Most files in a real tree are unique
//! by size, so this phase avoids content reads entirely for them.
//!
//! # Example
//!
//! ```
//! use dupescan::scanner::FileEntry;
//! use dupescan::duplicates::group_by_size;
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024, SystemTime::now()),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024, SystemTime::now()),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048, SystemTime::now()),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.candidate_files, 2);  // the two 1024-byte files
//! assert_eq!(groups.len(), 1);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::{fingerprint_hex, FileEntry, Fingerprint};

/// A group of files sharing the same byte size.
///
/// The minimal necessary (not sufficient) condition for duplication. File
/// order inside the group is scan order.
#[derive(Debug, Clone)]
pub struct SizeGroup {
    /// File size in bytes (shared by all files in this group)
    pub size: u64,
    /// Files with this exact size, in scan order
    pub files: Vec<FileEntry>,
}

impl SizeGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A confirmed group of byte-identical files.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// Content fingerprint shared by every member.
    pub fingerprint: Fingerprint,
    /// Size of each member in bytes.
    pub size: u64,
    /// Members in first-seen scan order. Always at least two.
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of redundant copies (total minus the one worth keeping).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Space reclaimable if all but one member were removed.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Fingerprint as a hex string.
    #[must_use]
    pub fn fingerprint_hex(&self) -> String {
        fingerprint_hex(&self.fingerprint)
    }

    /// Member paths, in group order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from the size-grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files in candidate groups (2+ files of one size)
    pub candidate_files: usize,
    /// Number of files eliminated as unique by size
    pub eliminated_unique: usize,
    /// Number of candidate groups
    pub candidate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size and prune singleton buckets (Phase 1).
///
/// Pure and O(n). Group order follows the first appearance of each size in
/// the input, and files within a group keep input order, so a deterministic
/// scan yields deterministic candidate groups.
///
/// # Arguments
///
/// * `files` - Scan-ordered file entries
///
/// # Returns
///
/// Candidate groups (2+ files each) and grouping statistics.
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileEntry>,
) -> (Vec<SizeGroup>, GroupingStats) {
    let mut stats = GroupingStats::default();
    let mut index_by_size: HashMap<u64, usize> = HashMap::new();
    let mut groups: Vec<SizeGroup> = Vec::new();

    for file in files {
        stats.total_files += 1;
        match index_by_size.get(&file.size) {
            Some(&idx) => groups[idx].files.push(file),
            None => {
                index_by_size.insert(file.size, groups.len());
                groups.push(SizeGroup {
                    size: file.size,
                    files: vec![file],
                });
            }
        }
    }

    stats.unique_sizes = groups.len();

    groups.retain(|group| {
        if group.len() == 1 {
            stats.eliminated_unique += 1;
            log::trace!(
                "Eliminated unique size {}: {}",
                group.size,
                group.files[0].path.display()
            );
            false
        } else {
            stats.candidate_files += group.len();
            stats.candidate_groups += 1;
            log::debug!(
                "Size group {} bytes: {} candidates",
                group.size,
                group.len()
            );
            true
        }
    });

    log::info!(
        "Phase 1 complete: {} files -> {} candidates ({:.1}% eliminated)",
        stats.total_files,
        stats.candidate_files,
        stats.elimination_rate()
    );

    (groups, stats)
}
