//! Deletion plan execution.
//!
//! # Overview
//!
//! Applies a [`DeletionPlan`] item by item: files first, then directories
//! (recursively). Execution is best-effort, not transactional: each item's
//! failure is captured individually and processing continues. Freed bytes are
//! accumulated from the sizes observed immediately before removal.
//!
//! Dry-run mode computes and reports the same sizes without touching the
//! filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::selection::DeletionPlan;

/// Error type for deletion operations.
#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    /// Item was not found (it may have been deleted already).
    #[error("not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed {
        /// Item that failed
        path: PathBuf,
        /// Trash backend error text
        message: String,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Item that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// The path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::TrashFailed { path, .. } | Self::Io { path, .. } => path,
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

/// How items are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Move items to the system trash (recoverable).
    #[default]
    Trash,
    /// Remove items permanently.
    Permanent,
}

/// Configuration for plan execution.
#[derive(Debug, Clone, Default)]
pub struct ExecuteConfig {
    /// Report what would be removed without mutating the filesystem.
    pub dry_run: bool,
    /// Trash or permanent removal.
    pub mode: DeleteMode,
}

/// Outcome of applying (or simulating) a deletion plan.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    /// Number of files removed (or that would be removed in a dry run).
    pub deleted_files: usize,
    /// Number of directories removed (or that would be).
    pub deleted_directories: usize,
    /// Bytes freed, from sizes observed immediately before removal.
    pub freed_bytes: u64,
    /// Per-item failures; items after a failure still execute.
    pub errors: Vec<DeleteError>,
    /// Whether this report came from a dry run.
    pub dry_run: bool,
}

impl ExecutionReport {
    /// Check if every item succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable one-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let verb = if self.dry_run {
            "Would delete"
        } else {
            "Deleted"
        };
        if self.all_succeeded() {
            format!(
                "{} {} file(s) and {} dir(s), freeing {}",
                verb,
                self.deleted_files,
                self.deleted_directories,
                bytesize::ByteSize(self.freed_bytes)
            )
        } else {
            format!(
                "{} {} file(s) and {} dir(s), freeing {} ({} failed)",
                verb,
                self.deleted_files,
                self.deleted_directories,
                bytesize::ByteSize(self.freed_bytes),
                self.errors.len()
            )
        }
    }
}

/// Recursive size of a directory tree, skipping unreadable entries.
fn directory_size(dir: &Path) -> u64 {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum()
}

fn remove_file(path: &Path, mode: DeleteMode) -> Result<(), DeleteError> {
    match mode {
        DeleteMode::Trash => trash::delete(path).map_err(|e| DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        DeleteMode::Permanent => {
            fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))
        }
    }
}

fn remove_dir(path: &Path, mode: DeleteMode) -> Result<(), DeleteError> {
    match mode {
        DeleteMode::Trash => trash::delete(path).map_err(|e| DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        DeleteMode::Permanent => {
            fs::remove_dir_all(path).map_err(|e| DeleteError::from_io(path, e))
        }
    }
}

/// Apply (or simulate) a deletion plan.
///
/// Files are processed before directories. An item that is already gone,
/// unreadable, or undeletable produces one entry in
/// [`ExecutionReport::errors`] and contributes nothing to `freed_bytes`;
/// remaining items still execute.
#[must_use]
pub fn execute_plan(plan: &DeletionPlan, config: &ExecuteConfig) -> ExecutionReport {
    let mut report = ExecutionReport {
        dry_run: config.dry_run,
        ..ExecutionReport::default()
    };

    for path in &plan.files {
        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                let err = DeleteError::from_io(path, e);
                log::warn!("Skipping file: {}", err);
                report.errors.push(err);
                continue;
            }
        };

        if config.dry_run {
            log::info!("[dry-run] would delete file: {}", path.display());
        } else if let Err(err) = remove_file(path, config.mode) {
            log::warn!("Failed to delete file: {}", err);
            report.errors.push(err);
            continue;
        } else {
            log::info!("Deleted file: {} ({} bytes)", path.display(), size);
        }

        report.deleted_files += 1;
        report.freed_bytes += size;
    }

    for path in &plan.directories {
        if !path.exists() {
            let err = DeleteError::NotFound(path.clone());
            log::warn!("Skipping directory: {}", err);
            report.errors.push(err);
            continue;
        }
        let size = directory_size(path);

        if config.dry_run {
            log::info!("[dry-run] would delete directory: {}", path.display());
        } else if let Err(err) = remove_dir(path, config.mode) {
            log::warn!("Failed to delete directory: {}", err);
            report.errors.push(err);
            continue;
        } else {
            log::info!("Deleted directory: {} ({} bytes)", path.display(), size);
        }

        report.deleted_directories += 1;
        report.freed_bytes += size;
    }

    log::info!("{}", report.summary());

    report
}
