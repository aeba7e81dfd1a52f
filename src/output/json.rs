//! JSON report output for scripting.

use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::actions::ExecutionReport;
use crate::duplicates::{DuplicateGroup, GroupingStats, IdenticalDirGroup};
use crate::scanner::{fingerprint_hex, ScanStats};
use crate::selection::DeletionPlan;

#[derive(Serialize)]
struct JsonGroup {
    fingerprint: String,
    size: u64,
    paths: Vec<PathBuf>,
}

#[derive(Serialize)]
struct JsonDirGroup {
    signature: Vec<String>,
    directories: Vec<PathBuf>,
}

#[derive(Serialize)]
struct JsonExecution {
    dry_run: bool,
    deleted_files: usize,
    deleted_directories: usize,
    freed_bytes: u64,
    errors: Vec<String>,
}

/// Machine-readable run report.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    scan: &'a ScanStats,
    grouping: &'a GroupingStats,
    duplicate_groups: Vec<JsonGroup>,
    identical_directories: Vec<JsonDirGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a DeletionPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    execution: Option<JsonExecution>,
}

impl<'a> JsonReport<'a> {
    /// Assemble a report from the run's artifacts.
    #[must_use]
    pub fn new(
        scan: &'a ScanStats,
        grouping: &'a GroupingStats,
        groups: &[DuplicateGroup],
        dir_groups: &[IdenticalDirGroup],
        plan: Option<&'a DeletionPlan>,
        execution: Option<&ExecutionReport>,
    ) -> Self {
        Self {
            scan,
            grouping,
            duplicate_groups: groups
                .iter()
                .map(|g| JsonGroup {
                    fingerprint: g.fingerprint_hex(),
                    size: g.size,
                    paths: g.paths(),
                })
                .collect(),
            identical_directories: dir_groups
                .iter()
                .map(|g| JsonDirGroup {
                    signature: g.signature.iter().map(fingerprint_hex).collect(),
                    directories: g.directories.clone(),
                })
                .collect(),
            plan,
            execution: execution.map(|report| JsonExecution {
                dry_run: report.dry_run,
                deleted_files: report.deleted_files,
                deleted_directories: report.deleted_directories,
                freed_bytes: report.freed_bytes,
                errors: report.errors.iter().map(ToString::to_string).collect(),
            }),
        }
    }
}

/// Serialize the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an I/O error if serialization or the write fails.
pub fn render_json(out: &mut impl Write, report: &JsonReport<'_>) -> io::Result<()> {
    let text = serde_json::to_string_pretty(report)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writeln!(out, "{}", text)
}
