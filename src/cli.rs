//! Command-line interface definitions.
//!
//! All arguments are defined with the clap derive API. The core pipeline
//! consumes these values as plain configuration; it never reads the
//! environment itself.
//!
//! # Example
//!
//! ```bash
//! # Scan and report duplicates
//! dupescan ~/Downloads
//!
//! # Also look for identical directories, grouped report by category
//! dupescan ~/Downloads --find-identical-dirs --group-by-category
//!
//! # Interactive cleanup with a dry run first
//! dupescan ~/Downloads --interactive --dry-run
//!
//! # Automatic keep-first cleanup, skipping prompts and the trash
//! dupescan ~/Downloads --auto-first --yes --permanent
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use directories::ProjectDirs;

/// Duplicate file and directory finder with a persistent hash cache.
///
/// dupescan scans a directory tree, finds files with byte-identical content
/// and directories whose duplicate contents match, and can preview and apply
/// a deletion plan.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Number of hashing workers
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", default_value = "4")]
    pub workers: usize,

    /// Path to the fingerprint cache store
    ///
    /// If not specified, a platform-specific default is used.
    #[arg(long, value_name = "PATH", env = "DUPESCAN_CACHE")]
    pub cache: Option<PathBuf>,

    /// Disable the fingerprint cache
    #[arg(long, conflicts_with = "cache")]
    pub no_cache: bool,

    /// Drop cache entries for files no longer present in the scanned tree
    #[arg(long)]
    pub compact_cache: bool,

    /// Group the duplicate report by file category
    #[arg(long)]
    pub group_by_category: bool,

    /// Also find directories with identical duplicate contents
    #[arg(long)]
    pub find_identical_dirs: bool,

    /// Select what to delete interactively, group by group
    #[arg(long)]
    pub interactive: bool,

    /// Keep the first copy in every group, delete the rest
    #[arg(long, conflicts_with = "interactive")]
    pub auto_first: bool,

    /// Report what would be deleted without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt before deleting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Delete permanently instead of moving to the system trash
    ///
    /// Warning: permanently deleted files cannot be recovered.
    #[arg(long)]
    pub permanent: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable sectioned report
    Text,
    /// JSON for scripting
    Json,
}

impl Cli {
    /// The cache store path: the `--cache` override or the platform default.
    #[must_use]
    pub fn cache_store_path(&self) -> PathBuf {
        self.cache.clone().unwrap_or_else(default_cache_path)
    }
}

/// Platform-specific default cache store location.
///
/// Falls back to a dotfile in the current directory when the platform
/// directories cannot be determined.
#[must_use]
pub fn default_cache_path() -> PathBuf {
    ProjectDirs::from("com", "dupescan", "dupescan")
        .map(|dirs| dirs.cache_dir().join("hashes.json"))
        .unwrap_or_else(|| PathBuf::from(".dupescan-hashes.json"))
}
