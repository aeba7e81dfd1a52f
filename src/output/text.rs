//! Human-readable report output.
//!
//! Sectioned text report: scan summary, category distribution, top
//! extensions and directories, then the duplicate listings (flat or grouped
//! by category).

use std::collections::BTreeMap;
use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::duplicates::{DuplicateGroup, IdenticalDirGroup};
use crate::scanner::{FileCategory, ScanStats};

/// Write a section header with separators.
pub fn print_section(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "{}", title.bold())?;
    writeln!(out, "{}", "=".repeat(60))
}

/// Write the scan summary sections.
pub fn render_summary(out: &mut impl Write, stats: &ScanStats) -> io::Result<()> {
    print_section(out, "SCAN SUMMARY")?;
    writeln!(out, "Total files: {}", stats.total_files)?;
    writeln!(out, "Total size:  {}", ByteSize(stats.total_size))?;
    if stats.skipped > 0 {
        writeln!(out, "Skipped:     {} (unreadable)", stats.skipped)?;
    }

    print_section(out, "BY CATEGORY")?;
    for (category, tally) in stats.categories_sorted() {
        let share = if stats.total_files == 0 {
            0.0
        } else {
            (tally.count as f64 / stats.total_files as f64) * 100.0
        };
        writeln!(
            out,
            "* {:<12}: {:>6} files ({:>5.1}%), {:>10}",
            category.to_string(),
            tally.count,
            share,
            ByteSize(tally.size).to_string()
        )?;
    }

    print_section(out, "TOP EXTENSIONS")?;
    for (ext, tally) in stats.top_extensions(15) {
        let label = if ext.is_empty() { "(none)" } else { ext };
        writeln!(
            out,
            "* {:<8}: {:>6} files, {:>10}",
            label,
            tally.count,
            ByteSize(tally.size).to_string()
        )?;
    }

    print_section(out, "TOP DIRECTORIES")?;
    for (dir, tally) in stats.top_directories(10) {
        writeln!(
            out,
            "* {}: {} files, {}",
            dir.display(),
            tally.count,
            ByteSize(tally.size)
        )?;
    }

    Ok(())
}

fn render_group(out: &mut impl Write, index: usize, group: &DuplicateGroup) -> io::Result<()> {
    writeln!(
        out,
        "\nGroup {} (fingerprint {}...), size {}, category {}",
        index,
        &group.fingerprint_hex()[..8],
        ByteSize(group.size),
        FileCategory::from_path(&group.files[0].path)
    )?;
    for file in &group.files {
        writeln!(out, "  -> {}", file.path.display())?;
    }
    Ok(())
}

/// Write duplicate groups and identical-directory groups.
///
/// With `by_category`, file groups are bucketed by the category of their
/// first member; the directory listing is unaffected.
pub fn render_duplicates(
    out: &mut impl Write,
    groups: &[DuplicateGroup],
    dir_groups: &[IdenticalDirGroup],
    stats: &ScanStats,
    by_category: bool,
) -> io::Result<()> {
    if groups.is_empty() {
        writeln!(out, "\nNo duplicates found.")?;
    } else {
        let wasted: u64 = groups.iter().map(DuplicateGroup::wasted_space).sum();
        print_section(out, "DUPLICATE SUMMARY")?;
        writeln!(out, "Duplicate groups: {}", groups.len())?;
        writeln!(
            out,
            "Space taken by redundant copies: {}",
            ByteSize(wasted).to_string().red()
        )?;

        if by_category {
            let mut buckets: BTreeMap<FileCategory, Vec<(usize, &DuplicateGroup)>> =
                BTreeMap::new();
            for (idx, group) in groups.iter().enumerate() {
                buckets
                    .entry(FileCategory::from_path(&group.files[0].path))
                    .or_default()
                    .push((idx + 1, group));
            }
            for (category, bucket) in buckets {
                print_section(
                    out,
                    &format!("DUPLICATES: {}", category.to_string().to_uppercase()),
                )?;
                let mut category_wasted = 0u64;
                for (index, group) in bucket {
                    category_wasted += group.wasted_space();
                    render_group(out, index, group)?;
                }
                writeln!(
                    out,
                    "\nRedundant bytes in {}: {}",
                    category,
                    ByteSize(category_wasted)
                )?;
            }
        } else {
            print_section(out, "ALL DUPLICATES")?;
            for (idx, group) in groups.iter().enumerate() {
                render_group(out, idx + 1, group)?;
            }
        }
    }

    if !dir_groups.is_empty() {
        print_section(out, "IDENTICAL DIRECTORIES")?;
        for (idx, group) in dir_groups.iter().enumerate() {
            writeln!(out, "\nGroup {}:", idx + 1)?;
            for dir in &group.directories {
                match stats.directory(dir) {
                    Some(tally) => writeln!(
                        out,
                        "  -> {} ({} files, {})",
                        dir.display(),
                        tally.count,
                        ByteSize(tally.size)
                    )?,
                    None => writeln!(out, "  -> {}", dir.display())?,
                }
            }
        }
    }

    Ok(())
}
