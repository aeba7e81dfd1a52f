//! Aggregate scan statistics.
//!
//! Tallies are keyed by extension, category, and containing directory. They
//! feed report output and the deletion preview; the detection pipeline never
//! reads them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::category::FileCategory;
use super::FileEntry;

/// Count and cumulative size for one tally key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Number of files counted under this key.
    pub count: u64,
    /// Cumulative size in bytes.
    pub size: u64,
}

impl Tally {
    fn add(&mut self, size: u64) {
        self.count += 1;
        self.size += size;
    }
}

/// Aggregate statistics collected during a scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    /// Total number of files recorded.
    pub total_files: u64,
    /// Total size of all recorded files in bytes.
    pub total_size: u64,
    /// Tallies keyed by lowercase extension ("" for none).
    pub by_extension: HashMap<String, Tally>,
    /// Tallies keyed by file category.
    pub by_category: HashMap<FileCategory, Tally>,
    /// Tallies keyed by containing directory.
    pub by_directory: HashMap<PathBuf, Tally>,
    /// Number of entries skipped because their metadata could not be read.
    pub skipped: u64,
}

impl ScanStats {
    /// Record one file into all tallies.
    pub fn record(&mut self, entry: &FileEntry) {
        self.total_files += 1;
        self.total_size += entry.size;

        let ext = entry
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        self.by_category
            .entry(FileCategory::from_extension(&ext))
            .or_default()
            .add(entry.size);
        self.by_extension.entry(ext).or_default().add(entry.size);

        if let Some(dir) = entry.path.parent() {
            self.by_directory
                .entry(dir.to_path_buf())
                .or_default()
                .add(entry.size);
        }
    }

    /// Tally for one directory, if any file was recorded under it.
    #[must_use]
    pub fn directory(&self, dir: &Path) -> Option<Tally> {
        self.by_directory.get(dir).copied()
    }

    /// Extensions sorted by cumulative size descending.
    #[must_use]
    pub fn top_extensions(&self, limit: usize) -> Vec<(&str, Tally)> {
        let mut entries: Vec<(&str, Tally)> = self
            .by_extension
            .iter()
            .map(|(ext, tally)| (ext.as_str(), *tally))
            .collect();
        entries.sort_by(|a, b| b.1.size.cmp(&a.1.size).then_with(|| a.0.cmp(b.0)));
        entries.truncate(limit);
        entries
    }

    /// Directories sorted by cumulative size descending.
    #[must_use]
    pub fn top_directories(&self, limit: usize) -> Vec<(&Path, Tally)> {
        let mut entries: Vec<(&Path, Tally)> = self
            .by_directory
            .iter()
            .map(|(dir, tally)| (dir.as_path(), *tally))
            .collect();
        entries.sort_by(|a, b| b.1.size.cmp(&a.1.size).then_with(|| a.0.cmp(b.0)));
        entries.truncate(limit);
        entries
    }

    /// Categories sorted by name for stable report output.
    #[must_use]
    pub fn categories_sorted(&self) -> Vec<(FileCategory, Tally)> {
        let mut entries: Vec<(FileCategory, Tally)> = self
            .by_category
            .iter()
            .map(|(cat, tally)| (*cat, *tally))
            .collect();
        entries.sort_by_key(|(cat, _)| *cat);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn make_entry(path: &str, size: u64) -> FileEntry {
        FileEntry::new(PathBuf::from(path), size, SystemTime::now())
    }

    #[test]
    fn test_record_totals() {
        let mut stats = ScanStats::default();
        stats.record(&make_entry("/a/one.jpg", 100));
        stats.record(&make_entry("/a/two.jpg", 200));
        stats.record(&make_entry("/b/three.txt", 50));

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_size, 350);
    }

    #[test]
    fn test_record_by_extension_and_category() {
        let mut stats = ScanStats::default();
        stats.record(&make_entry("/a/one.JPG", 100));
        stats.record(&make_entry("/a/two.jpg", 200));
        stats.record(&make_entry("/a/noext", 10));

        assert_eq!(stats.by_extension["jpg"].count, 2);
        assert_eq!(stats.by_extension["jpg"].size, 300);
        assert_eq!(stats.by_extension[""].count, 1);
        assert_eq!(stats.by_category[&FileCategory::Images].count, 2);
        assert_eq!(stats.by_category[&FileCategory::Other].count, 1);
    }

    #[test]
    fn test_record_by_directory() {
        let mut stats = ScanStats::default();
        stats.record(&make_entry("/a/one.txt", 100));
        stats.record(&make_entry("/a/two.txt", 50));
        stats.record(&make_entry("/a/sub/three.txt", 25));

        assert_eq!(stats.directory(Path::new("/a")).unwrap().count, 2);
        assert_eq!(stats.directory(Path::new("/a")).unwrap().size, 150);
        assert_eq!(stats.directory(Path::new("/a/sub")).unwrap().count, 1);
        assert!(stats.directory(Path::new("/missing")).is_none());
    }

    #[test]
    fn test_top_extensions_sorted_by_size() {
        let mut stats = ScanStats::default();
        stats.record(&make_entry("/a/one.jpg", 100));
        stats.record(&make_entry("/a/two.mp4", 5000));
        stats.record(&make_entry("/a/three.txt", 10));

        let top = stats.top_extensions(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "mp4");
        assert_eq!(top[1].0, "jpg");
    }

    #[test]
    fn test_top_directories_sorted_by_size() {
        let mut stats = ScanStats::default();
        stats.record(&make_entry("/big/one.bin", 9000));
        stats.record(&make_entry("/small/two.bin", 10));

        let top = stats.top_directories(10);
        assert_eq!(top[0].0, Path::new("/big"));
        assert_eq!(top[1].0, Path::new("/small"));
    }
}
