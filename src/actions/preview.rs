//! Deletion preview.
//!
//! Renders what a plan would remove before the user confirms it. Directory
//! rows reuse the scan-time tallies so the preview needs no extra I/O.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::scanner::ScanStats;
use crate::selection::DeletionPlan;

/// Number of file rows shown before the preview elides the rest.
const PREVIEW_FILE_LIMIT: usize = 10;

/// Render the deletion preview for `plan`.
///
/// Returns the total number of bytes the plan is expected to free, computed
/// from current file sizes and scan-time directory tallies.
///
/// # Errors
///
/// Returns an I/O error only if writing to `out` fails.
pub fn render_preview(
    out: &mut impl Write,
    plan: &DeletionPlan,
    stats: &ScanStats,
) -> io::Result<u64> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "{}", "DELETION PREVIEW".bold())?;
    writeln!(out, "{}", "=".repeat(60))?;

    if plan.is_empty() {
        writeln!(out, "Nothing selected for deletion.")?;
        return Ok(0);
    }

    let mut total = 0u64;

    if !plan.files.is_empty() {
        let mut files_total = 0u64;
        for path in &plan.files {
            files_total += std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        }
        total += files_total;

        writeln!(out)?;
        writeln!(out, "Files to delete ({}):", plan.files.len())?;
        for path in plan.files.iter().take(PREVIEW_FILE_LIMIT) {
            writeln!(out, "  - {}", path.display())?;
        }
        if plan.files.len() > PREVIEW_FILE_LIMIT {
            writeln!(
                out,
                "  ... and {} more",
                plan.files.len() - PREVIEW_FILE_LIMIT
            )?;
        }
        writeln!(out, "Total file size: {}", ByteSize(files_total))?;
    }

    if !plan.directories.is_empty() {
        let mut dirs_total = 0u64;
        writeln!(out)?;
        writeln!(out, "Directories to delete ({}):", plan.directories.len())?;
        for dir in &plan.directories {
            match stats.directory(dir) {
                Some(tally) => {
                    dirs_total += tally.size;
                    writeln!(
                        out,
                        "  - {} ({} files, {})",
                        dir.display(),
                        tally.count,
                        ByteSize(tally.size)
                    )?;
                }
                None => writeln!(out, "  - {} (no scan statistics)", dir.display())?,
            }
        }
        total += dirs_total;
        writeln!(out, "Total directory size: {}", ByteSize(dirs_total))?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} {}",
        "Estimated space to free:".bold(),
        ByteSize(total).to_string().green()
    )?;

    Ok(total)
}
