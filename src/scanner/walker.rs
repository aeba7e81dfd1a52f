//! Recursive directory traversal.
//!
//! # Overview
//!
//! Walks a directory tree and produces the ordered file list plus aggregate
//! statistics that the rest of the pipeline consumes. Entries are visited in
//! sorted order, so the same tree always yields the same scan order and
//! downstream group membership stays deterministic.
//!
//! Per-entry failures (unreadable subdirectory, vanished file) are logged and
//! skipped; only an unusable root is fatal.

use std::path::Path;

use walkdir::WalkDir;

use super::{FileEntry, ScanError, ScanStats};

/// Walk `root` recursively, collecting file entries and statistics.
///
/// # Arguments
///
/// * `root` - Root directory to scan
///
/// # Returns
///
/// The ordered list of discovered files (sorted traversal order) and the
/// aggregate [`ScanStats`].
///
/// # Errors
///
/// Returns [`ScanError`] only when the root itself is missing, not a
/// directory, or unreadable. Failures below the root are skipped and counted
/// in [`ScanStats::skipped`].
pub fn scan_tree(root: &Path) -> Result<(Vec<FileEntry>, ScanStats), ScanError> {
    let meta = std::fs::metadata(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::NotFound(root.to_path_buf()),
        _ => ScanError::Io {
            path: root.to_path_buf(),
            source: e,
        },
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut stats = ScanStats::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                stats.skipped += 1;
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                stats.skipped += 1;
                log::warn!(
                    "Skipping {}: metadata unavailable: {}",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };

        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(e) => {
                stats.skipped += 1;
                log::warn!(
                    "Skipping {}: modification time unavailable: {}",
                    entry.path().display(),
                    e
                );
                continue;
            }
        };

        let record = FileEntry::new(entry.path().to_path_buf(), metadata.len(), modified);
        stats.record(&record);
        files.push(record);
    }

    log::info!(
        "Scan complete: {} files, {} bytes, {} skipped",
        stats.total_files,
        stats.total_size,
        stats.skipped
    );

    Ok((files, stats))
}
