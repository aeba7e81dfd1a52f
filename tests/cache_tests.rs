use std::fs;
use std::sync::Arc;
use std::time::Duration;

use filetime::FileTime;
use tempfile::tempdir;

use dupescan::cache::HashCache;
use dupescan::duplicates::{detect, group_by_size, DetectConfig};
use dupescan::scanner::{scan_tree, Hasher};

#[test]
fn test_initial_scan_then_rescan_hits_cache() {
    let dir = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();
    let cache_path = cache_dir.path().join("hashes.json");

    let content = b"duplicate content";
    fs::write(dir.path().join("file1.txt"), content).unwrap();
    fs::write(dir.path().join("file2.txt"), content).unwrap();

    // Initial run: everything is a fresh digest.
    let cache = Arc::new(HashCache::load(&cache_path));
    let (files, _) = scan_tree(dir.path()).unwrap();
    let (candidates, _) = group_by_size(files);
    let config = DetectConfig::default().with_cache(cache.clone());
    let (groups, stats) = detect(candidates, Arc::new(Hasher::new()), config);

    assert_eq!(groups.len(), 1);
    assert_eq!(stats.cache_hits, 0);
    assert_eq!(stats.fresh_digests, 2);
    cache.persist().unwrap();

    // Rescan with the persisted cache: identical groups, zero fresh digests.
    let cache = Arc::new(HashCache::load(&cache_path));
    let (files, _) = scan_tree(dir.path()).unwrap();
    let (candidates, _) = group_by_size(files);
    let config = DetectConfig::default().with_cache(cache);
    let (groups2, stats2) = detect(candidates, Arc::new(Hasher::new()), config);

    assert_eq!(stats2.cache_hits, 2);
    assert_eq!(stats2.fresh_digests, 0);
    assert_eq!(groups2.len(), 1);
    assert_eq!(groups2[0].paths(), groups[0].paths());
}

#[test]
fn test_mtime_change_invalidates_entry() {
    let dir = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();
    let cache_path = cache_dir.path().join("hashes.json");

    let file1 = dir.path().join("file1.txt");
    let file2 = dir.path().join("file2.txt");
    fs::write(&file1, b"identical content 21b").unwrap();
    fs::write(&file2, b"identical content 21b").unwrap();

    let cache = Arc::new(HashCache::load(&cache_path));
    let (files, _) = scan_tree(dir.path()).unwrap();
    let (candidates, _) = group_by_size(files);
    detect(
        candidates,
        Arc::new(Hasher::new()),
        DetectConfig::default().with_cache(cache.clone()),
    );
    cache.persist().unwrap();

    // Rewrite file1 with different content of the same size and a new mtime.
    fs::write(&file1, b"different content 21b").unwrap();
    let meta = fs::metadata(&file1).unwrap();
    let bumped = FileTime::from_unix_time(
        FileTime::from_last_modification_time(&meta).unix_seconds() + 5,
        0,
    );
    filetime::set_file_mtime(&file1, bumped).unwrap();

    let cache = Arc::new(HashCache::load(&cache_path));
    let (files, _) = scan_tree(dir.path()).unwrap();
    let (candidates, _) = group_by_size(files);
    let (groups, stats) = detect(
        candidates,
        Arc::new(Hasher::new()),
        DetectConfig::default().with_cache(cache),
    );

    // file1 was re-hashed, file2 came from the cache, and the two are no
    // longer duplicates.
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.fresh_digests, 1);
    assert!(groups.is_empty());
}

#[test]
fn test_size_change_invalidates_entry() {
    let dir = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();
    let cache_path = cache_dir.path().join("hashes.json");

    let file1 = dir.path().join("file1.txt");
    fs::write(&file1, b"original").unwrap();
    fs::write(dir.path().join("file2.txt"), b"original").unwrap();

    let cache = Arc::new(HashCache::load(&cache_path));
    let (files, _) = scan_tree(dir.path()).unwrap();
    let (candidates, _) = group_by_size(files);
    detect(
        candidates,
        Arc::new(Hasher::new()),
        DetectConfig::default().with_cache(cache.clone()),
    );
    cache.persist().unwrap();

    // Grow file1; its cached entry must be ignored on the next run.
    fs::write(&file1, b"original but longer now").unwrap();
    fs::write(dir.path().join("file3.txt"), b"original but longer now").unwrap();

    let cache = Arc::new(HashCache::load(&cache_path));
    let (files, _) = scan_tree(dir.path()).unwrap();
    let (candidates, _) = group_by_size(files);
    let (groups, stats) = detect(
        candidates,
        Arc::new(Hasher::new()),
        DetectConfig::default().with_cache(cache),
    );

    // file1 and file3 form the only candidate pair now; both need fresh
    // digests (file1's entry is stale, file3 was never cached).
    assert_eq!(stats.fresh_digests, 2);
    assert_eq!(groups.len(), 1);
}

#[test]
fn test_corrupt_store_falls_back_to_empty() {
    let dir = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();
    let cache_path = cache_dir.path().join("hashes.json");
    fs::write(&cache_path, b"definitely not json").unwrap();

    fs::write(dir.path().join("a.txt"), b"pair").unwrap();
    fs::write(dir.path().join("b.txt"), b"pair").unwrap();

    let cache = Arc::new(HashCache::load(&cache_path));
    assert!(cache.is_empty());

    let (files, _) = scan_tree(dir.path()).unwrap();
    let (candidates, _) = group_by_size(files);
    let (groups, stats) = detect(
        candidates,
        Arc::new(Hasher::new()),
        DetectConfig::default().with_cache(cache.clone()),
    );

    assert_eq!(groups.len(), 1);
    assert_eq!(stats.fresh_digests, 2);

    // Persist replaces the corrupt store with a valid one.
    cache.persist().unwrap();
    let reloaded = HashCache::load(&cache_path);
    assert_eq!(reloaded.len(), 2);
}

#[test]
fn test_persisted_entries_survive_for_unseen_paths() {
    let cache_dir = tempdir().unwrap();
    let cache_path = cache_dir.path().join("hashes.json");

    let cache = HashCache::load(&cache_path);
    cache.store(
        std::path::Path::new("/long/gone/file.bin"),
        123,
        std::time::SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000),
        [4u8; 32],
    );
    cache.persist().unwrap();

    // Entries for vanished paths are kept across runs unless compaction is
    // requested explicitly.
    let reloaded = HashCache::load(&cache_path);
    assert_eq!(reloaded.len(), 1);
}
