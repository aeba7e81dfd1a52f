//! Interactive per-group policy selection.
//!
//! # Overview
//!
//! Walks the user through every duplicate group and identical-directory
//! group, collecting one [`Policy`] per group. Input and output are generic
//! over [`BufRead`]/[`Write`] so the flow is testable with plain buffers.
//!
//! Menu per group:
//! - `s` skip this group
//! - `a` keep the first copy, delete the rest
//! - `b` keep the last copy, delete the rest
//! - `m` choose the copies to keep by number
//! - `A` apply keep-first to this and all remaining groups
//!
//! Any other input skips the group.

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use bytesize::ByteSize;

use crate::duplicates::{DuplicateGroup, IdenticalDirGroup};
use crate::scanner::{FileCategory, ScanStats};
use crate::selection::Policy;

/// Interactive policy collector over generic input/output streams.
pub struct PolicyPrompt<R, W> {
    input: R,
    output: W,
    apply_first_to_rest: bool,
}

impl<R: BufRead, W: Write> PolicyPrompt<R, W> {
    /// Create a prompt session.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            apply_first_to_rest: false,
        }
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn read_keep_set(&mut self, len: usize) -> io::Result<Policy> {
        write!(self.output, "Numbers of the copies to keep (space-separated): ")?;
        self.output.flush()?;
        let line = self.read_line()?;
        let keep: BTreeSet<usize> = line
            .split_whitespace()
            .filter_map(|token| token.parse().ok())
            .collect();

        let policy = Policy::KeepSet(keep);
        match policy.deletions(len) {
            Ok(_) => Ok(policy),
            Err(e) => {
                writeln!(self.output, "Invalid selection ({}), skipping group", e)?;
                Ok(Policy::Skip)
            }
        }
    }

    fn prompt_choice(&mut self, len: usize) -> io::Result<Policy> {
        writeln!(self.output, "  [s] skip this group")?;
        writeln!(self.output, "  [a] keep the first copy, delete the rest")?;
        writeln!(self.output, "  [b] keep the last copy, delete the rest")?;
        writeln!(self.output, "  [m] choose the copies to keep")?;
        writeln!(self.output, "  [A] keep-first for this and all remaining groups")?;
        write!(self.output, "\nYour choice: ")?;
        self.output.flush()?;

        let choice = self.read_line()?;
        match choice.as_str() {
            "s" => Ok(Policy::Skip),
            "a" => Ok(Policy::KeepFirst),
            "b" => Ok(Policy::KeepLast),
            "m" => self.read_keep_set(len),
            "A" => {
                self.apply_first_to_rest = true;
                Ok(Policy::KeepFirst)
            }
            other => {
                writeln!(self.output, "Unrecognized choice {:?}, skipping group", other)?;
                Ok(Policy::Skip)
            }
        }
    }

    /// Collect one policy per duplicate group.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading input or writing the menu fails.
    pub fn file_policies(&mut self, groups: &[DuplicateGroup]) -> io::Result<Vec<Policy>> {
        let mut policies = Vec::with_capacity(groups.len());

        for (idx, group) in groups.iter().enumerate() {
            if self.apply_first_to_rest {
                policies.push(Policy::KeepFirst);
                continue;
            }

            writeln!(
                self.output,
                "\nGroup {} (fingerprint {}...), size {}, category {}",
                idx + 1,
                &group.fingerprint_hex()[..8],
                ByteSize(group.size),
                FileCategory::from_path(&group.files[0].path)
            )?;
            for (n, file) in group.files.iter().enumerate() {
                writeln!(self.output, "  [{}] {}", n + 1, file.path.display())?;
            }

            policies.push(self.prompt_choice(group.len())?);
        }

        Ok(policies)
    }

    /// Collect one policy per identical-directory group.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading input or writing the menu fails.
    pub fn dir_policies(
        &mut self,
        groups: &[IdenticalDirGroup],
        stats: &ScanStats,
    ) -> io::Result<Vec<Policy>> {
        let mut policies = Vec::with_capacity(groups.len());

        for (idx, group) in groups.iter().enumerate() {
            if self.apply_first_to_rest {
                policies.push(Policy::KeepFirst);
                continue;
            }

            writeln!(self.output, "\nIdentical directory group {}:", idx + 1)?;
            for (n, dir) in group.directories.iter().enumerate() {
                match stats.directory(dir) {
                    Some(tally) => writeln!(
                        self.output,
                        "  [{}] {} ({} files, {})",
                        n + 1,
                        dir.display(),
                        tally.count,
                        ByteSize(tally.size)
                    )?,
                    None => writeln!(self.output, "  [{}] {}", n + 1, dir.display())?,
                }
            }

            policies.push(self.prompt_choice(group.len())?);
        }

        Ok(policies)
    }
}

/// Ask a yes/no question, defaulting to no.
///
/// # Errors
///
/// Returns an I/O error if reading input or writing the prompt fails.
pub fn confirm(input: &mut impl BufRead, output: &mut impl Write, prompt: &str) -> io::Result<bool> {
    write!(output, "{} (y/N): ", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
