//! Duplicate detection over size-candidate groups.
//!
//! # Overview
//!
//! For every candidate file the detector resolves a fingerprint: a cache hit
//! reuses the stored value, a miss streams the file through the hasher and
//! stores the fresh result. Files whose digest fails are logged and excluded
//! from grouping for this run; the pass never aborts on a per-file error.
//!
//! Hashing runs on a bounded worker pool, but aggregation is keyed by input
//! order, so group membership and group order are deterministic for a
//! deterministic scan regardless of worker scheduling.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::cache::HashCache;
use crate::progress::ProgressCallback;
use crate::scanner::{FileEntry, Fingerprint, HashError, Hasher};

use super::groups::{DuplicateGroup, SizeGroup};

/// Configuration for the detection pass.
#[derive(Clone, Default)]
pub struct DetectConfig {
    /// Number of hashing workers. Zero means one.
    pub workers: usize,
    /// Optional fingerprint cache consulted before hashing.
    pub cache: Option<Arc<HashCache>>,
    /// Optional progress callback.
    pub progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for DetectConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectConfig")
            .field("workers", &self.workers)
            .field("cache", &self.cache.as_ref().map(|_| "<cache>"))
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl DetectConfig {
    /// Set the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the fingerprint cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<HashCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// Statistics from the detection pass.
#[derive(Debug, Default)]
pub struct DetectStats {
    /// Files that entered the pass
    pub input_files: usize,
    /// Fingerprints resolved from the cache
    pub cache_hits: usize,
    /// Fingerprints computed fresh
    pub fresh_digests: usize,
    /// Files excluded because their digest failed
    pub failed_files: usize,
    /// Digest errors, one per failed file
    pub errors: Vec<HashError>,
    /// Confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Redundant copies across all groups (members minus one each)
    pub duplicate_files: usize,
    /// Space reclaimable across all groups
    pub wasted_space: u64,
}

/// Resolve fingerprints for all candidate files and build duplicate groups.
///
/// # Arguments
///
/// * `candidates` - Size-candidate groups from Phase 1
/// * `hasher` - Streaming hasher used on cache misses
/// * `config` - Worker count, cache, and progress callback
///
/// # Returns
///
/// Duplicate groups (2+ members each, first-seen order) and pass statistics.
#[must_use]
pub fn detect(
    candidates: Vec<SizeGroup>,
    hasher: Arc<Hasher>,
    config: DetectConfig,
) -> (Vec<DuplicateGroup>, DetectStats) {
    let files: Vec<FileEntry> = candidates.into_iter().flat_map(|g| g.files).collect();

    let mut stats = DetectStats {
        input_files: files.len(),
        ..DetectStats::default()
    };

    if files.is_empty() {
        log::debug!("Phase 2: no candidate files");
        return (Vec::new(), stats);
    }

    if let Some(ref progress) = config.progress {
        progress.on_phase_start("hash", files.len());
    }
    log::info!("Phase 2: resolving fingerprints for {} files", files.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.max(1))
        .build()
        .unwrap_or_else(|_| {
            log::warn!(
                "Failed to create bounded thread pool, using global pool with {} threads",
                rayon::current_num_threads()
            );
            rayon::ThreadPoolBuilder::new().build().unwrap()
        });

    // Indexed collect keeps results in input order, which keeps aggregation
    // independent of completion order.
    let results: Vec<(FileEntry, Result<Fingerprint, HashError>, bool)> = pool.install(|| {
        files
            .into_par_iter()
            .enumerate()
            .map(|(idx, file)| {
                if let Some(ref progress) = config.progress {
                    progress.on_progress(idx + 1, file.path.to_string_lossy().as_ref());
                }

                if let Some(ref cache) = config.cache {
                    if let Some(fingerprint) = cache.lookup(&file.path, file.size, file.modified) {
                        log::trace!("Cache hit: {}", file.path.display());
                        return (file, Ok(fingerprint), true);
                    }
                    log::trace!("Cache miss: {}", file.path.display());
                }

                match hasher.digest(&file.path) {
                    Ok(fingerprint) => {
                        if let Some(ref cache) = config.cache {
                            cache.store(&file.path, file.size, file.modified, fingerprint);
                        }
                        (file, Ok(fingerprint), false)
                    }
                    Err(e) => {
                        log::warn!("Failed to hash {}: {}", file.path.display(), e);
                        (file, Err(e), false)
                    }
                }
            })
            .collect()
    });

    // Sequential aggregation in input order: fingerprint groups come out in
    // first-seen order with members in scan order.
    let mut index_by_fingerprint: HashMap<Fingerprint, usize> = HashMap::new();
    let mut all_groups: Vec<DuplicateGroup> = Vec::new();

    for (file, result, cache_hit) in results {
        match result {
            Ok(fingerprint) => {
                if cache_hit {
                    stats.cache_hits += 1;
                } else {
                    stats.fresh_digests += 1;
                }
                match index_by_fingerprint.get(&fingerprint) {
                    Some(&idx) => all_groups[idx].files.push(file),
                    None => {
                        index_by_fingerprint.insert(fingerprint, all_groups.len());
                        all_groups.push(DuplicateGroup {
                            fingerprint,
                            size: file.size,
                            files: vec![file],
                        });
                    }
                }
            }
            Err(e) => {
                stats.failed_files += 1;
                stats.errors.push(e);
            }
        }
    }

    all_groups.retain(|group| group.len() >= 2);

    stats.duplicate_groups = all_groups.len();
    stats.duplicate_files = all_groups.iter().map(DuplicateGroup::duplicate_count).sum();
    stats.wasted_space = all_groups.iter().map(DuplicateGroup::wasted_space).sum();

    if let Some(ref progress) = config.progress {
        progress.on_phase_end("hash");
    }

    log::info!(
        "Phase 2 complete: {} groups, {} redundant copies, {} bytes reclaimable ({} cache hits, {} fresh, {} failed)",
        stats.duplicate_groups,
        stats.duplicate_files,
        stats.wasted_space,
        stats.cache_hits,
        stats.fresh_digests,
        stats.failed_files
    );

    (all_groups, stats)
}
