//! Application pipeline.
//!
//! Wires the stages together: scan, size grouping, fingerprint detection,
//! identical-directory matching, cache persistence, reporting, selection,
//! preview, and execution. All per-item failures stay local; only an
//! unusable root or an invalid selection aborts the run.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::{execute_plan, render_preview, DeleteMode, ExecuteConfig, ExecutionReport};
use crate::cache::HashCache;
use crate::cli::{Cli, OutputFormat};
use crate::duplicates::{
    detect, group_by_size, match_directories, DetectConfig, DuplicateGroup, IdenticalDirGroup,
};
use crate::error::ExitCode;
use crate::interactive::{confirm, PolicyPrompt};
use crate::output::json::JsonReport;
use crate::output::{render_duplicates, render_json, render_summary};
use crate::progress::{Progress, ProgressCallback};
use crate::scanner::{scan_tree, Hasher, ScanStats};
use crate::selection::{build_plan, DeletionPlan, Policy};

/// Run the full pipeline for the given CLI configuration.
///
/// # Errors
///
/// Returns an error for configuration-level failures only: an unusable scan
/// root, an invalid selection, or a report write failure.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let (files, scan_stats) = scan_tree(&cli.path)
        .with_context(|| format!("cannot scan {}", cli.path.display()))?;

    let text_output = cli.output == OutputFormat::Text;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if text_output {
        render_summary(&mut out, &scan_stats)?;
    }

    let cache = if cli.no_cache {
        None
    } else {
        Some(Arc::new(HashCache::load(&cli.cache_store_path())))
    };

    let seen: Option<HashSet<PathBuf>> = cli
        .compact_cache
        .then(|| files.iter().map(|f| f.path.clone()).collect());

    let (candidates, grouping_stats) = group_by_size(files);

    let mut detect_config = DetectConfig::default().with_workers(cli.workers);
    if let Some(ref cache) = cache {
        detect_config = detect_config.with_cache(cache.clone());
    }
    if text_output && !cli.quiet {
        let progress: Arc<dyn ProgressCallback> = Arc::new(Progress::new(false));
        detect_config = detect_config.with_progress(progress);
    }

    let (groups, detect_stats) = detect(candidates, Arc::new(Hasher::new()), detect_config);

    let dir_groups = if cli.find_identical_dirs {
        match_directories(&groups)
    } else {
        Vec::new()
    };

    if let Some(ref cache) = cache {
        if let Some(ref seen) = seen {
            cache.compact(seen);
        }
        // A persist failure costs only next run's cache hits; this run's
        // results are already in memory.
        if let Err(e) = cache.persist() {
            log::error!("Failed to persist cache: {}", e);
        }
    }

    if text_output {
        render_duplicates(
            &mut out,
            &groups,
            &dir_groups,
            &scan_stats,
            cli.group_by_category,
        )?;
    }

    let mut plan = select_plan(&cli, &groups, &dir_groups, &scan_stats)?;
    let mut execution: Option<ExecutionReport> = None;

    if let Some(ref mut plan) = plan {
        plan.reconcile();

        if text_output {
            render_preview(&mut out, plan, &scan_stats)?;
        }

        if !plan.is_empty() {
            let proceed = cli.yes
                || cli.dry_run
                || confirm(&mut io::stdin().lock(), &mut out, "\nConfirm deletion")?;

            if proceed {
                let report = execute_plan(
                    plan,
                    &ExecuteConfig {
                        dry_run: cli.dry_run,
                        mode: if cli.permanent {
                            DeleteMode::Permanent
                        } else {
                            DeleteMode::Trash
                        },
                    },
                );
                if text_output {
                    writeln!(out, "\n{}", report.summary())?;
                    for error in &report.errors {
                        writeln!(out, "  failed: {}", error)?;
                    }
                }
                execution = Some(report);
            } else if text_output {
                writeln!(out, "Deletion cancelled.")?;
            }
        }
    } else if text_output && !groups.is_empty() {
        writeln!(
            out,
            "\nRun with --interactive to choose what to delete, or --auto-first to keep the first copy of every group."
        )?;
    }

    if cli.output == OutputFormat::Json {
        let report = JsonReport::new(
            &scan_stats,
            &grouping_stats,
            &groups,
            &dir_groups,
            plan.as_ref(),
            execution.as_ref(),
        );
        render_json(&mut out, &report)?;
    }

    let had_item_failures = scan_stats.skipped > 0
        || detect_stats.failed_files > 0
        || execution.as_ref().is_some_and(|e| !e.all_succeeded());

    Ok(if had_item_failures {
        ExitCode::PartialSuccess
    } else if groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    })
}

/// Collect policies and build the deletion plan, if any selection mode is on.
fn select_plan(
    cli: &Cli,
    groups: &[DuplicateGroup],
    dir_groups: &[IdenticalDirGroup],
    scan_stats: &ScanStats,
) -> Result<Option<DeletionPlan>> {
    if groups.is_empty() && dir_groups.is_empty() {
        return Ok(None);
    }

    let (file_policies, dir_policies) = if cli.auto_first {
        (
            vec![Policy::KeepFirst; groups.len()],
            vec![Policy::KeepFirst; dir_groups.len()],
        )
    } else if cli.interactive {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut prompt = PolicyPrompt::new(stdin.lock(), stdout.lock());
        let file_policies = prompt.file_policies(groups)?;
        let dir_policies = prompt.dir_policies(dir_groups, scan_stats)?;
        (file_policies, dir_policies)
    } else {
        return Ok(None);
    };

    let plan = build_plan(
        groups,
        dir_groups,
        |idx, _| file_policies[idx].clone(),
        |idx, _| dir_policies[idx].clone(),
    )
    .context("invalid selection")?;

    Ok(Some(plan))
}
