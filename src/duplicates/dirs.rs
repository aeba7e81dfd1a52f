//! Identical-directory matching over duplicate groups.
//!
//! # Overview
//!
//! Each directory's signature is the sorted multiset of fingerprints its
//! duplicate files contribute. Sorting makes signature equality
//! order-independent, and multiplicities matter: `{X, X, Y}` differs from
//! `{X, Y}`. Directories with equal signatures are grouped.
//!
//! Files that belong to no duplicate group contribute nothing, so this
//! answers "do these directories share the same duplicate content", not "are
//! these directories byte-for-byte identical trees".

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::Fingerprint;

use super::groups::DuplicateGroup;

/// Directories whose duplicate-file signatures are equal.
#[derive(Debug, Clone, Serialize)]
pub struct IdenticalDirGroup {
    /// Sorted fingerprint multiset shared by every member directory.
    pub signature: Vec<Fingerprint>,
    /// Member directories, in first-seen order. Always at least two.
    pub directories: Vec<PathBuf>,
}

impl IdenticalDirGroup {
    /// Number of directories in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }
}

/// Group directories by their duplicate-file signatures.
///
/// # Arguments
///
/// * `groups` - Duplicate groups from the detection pass
///
/// # Returns
///
/// Groups of two or more directories with equal signatures, in first-seen
/// order (deterministic for deterministic input).
#[must_use]
pub fn match_directories(groups: &[DuplicateGroup]) -> Vec<IdenticalDirGroup> {
    // Step 1: per-directory fingerprint lists, directories in first-seen order.
    let mut index_by_dir: HashMap<PathBuf, usize> = HashMap::new();
    let mut dir_fingerprints: Vec<(PathBuf, Vec<Fingerprint>)> = Vec::new();

    for group in groups {
        for file in &group.files {
            let Some(dir) = file.path.parent() else {
                continue;
            };
            match index_by_dir.get(dir) {
                Some(&idx) => dir_fingerprints[idx].1.push(group.fingerprint),
                None => {
                    index_by_dir.insert(dir.to_path_buf(), dir_fingerprints.len());
                    dir_fingerprints.push((dir.to_path_buf(), vec![group.fingerprint]));
                }
            }
        }
    }

    // Step 2: sort each list into its canonical signature form.
    for (_, fingerprints) in &mut dir_fingerprints {
        fingerprints.sort_unstable();
    }

    // Step 3: group directories by signature, preserving first-seen order.
    let mut index_by_signature: HashMap<Vec<Fingerprint>, usize> = HashMap::new();
    let mut matched: Vec<IdenticalDirGroup> = Vec::new();

    for (dir, signature) in dir_fingerprints {
        match index_by_signature.get(&signature) {
            Some(&idx) => matched[idx].directories.push(dir),
            None => {
                index_by_signature.insert(signature.clone(), matched.len());
                matched.push(IdenticalDirGroup {
                    signature,
                    directories: vec![dir],
                });
            }
        }
    }

    matched.retain(|group| group.len() >= 2);

    log::info!("Identical-directory pass: {} groups", matched.len());

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileEntry;
    use std::time::SystemTime;

    fn fp(byte: u8) -> Fingerprint {
        [byte; 32]
    }

    fn group(fingerprint: Fingerprint, paths: &[&str]) -> DuplicateGroup {
        DuplicateGroup {
            fingerprint,
            size: 4,
            files: paths
                .iter()
                .map(|p| FileEntry::new(PathBuf::from(p), 4, SystemTime::now()))
                .collect(),
        }
    }

    #[test]
    fn test_match_directories_order_independent() {
        // /a holds [F1, F2], /b holds [F2, F1] - identical signatures.
        let groups = vec![
            group(fp(1), &["/a/one.bin", "/b/two.bin"]),
            group(fp(2), &["/b/one.bin", "/a/two.bin"]),
        ];

        let matched = match_directories(&groups);

        assert_eq!(matched.len(), 1);
        assert_eq!(
            matched[0].directories,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn test_match_directories_multiplicity_matters() {
        // /a holds {X, Y}, /b holds {X, X}: not identical.
        let groups = vec![
            group(fp(1), &["/a/x1.bin", "/b/x1.bin", "/b/x2.bin"]),
            group(fp(2), &["/a/y.bin", "/c/y.bin"]),
        ];

        let matched = match_directories(&groups);

        assert!(matched.iter().all(|g| {
            !(g.directories.contains(&PathBuf::from("/a"))
                && g.directories.contains(&PathBuf::from("/b")))
        }));
    }

    #[test]
    fn test_match_directories_multiset_xxy() {
        // {X, X, Y} vs {Y, X, X} are identical; {X, Y} is not.
        let groups = vec![
            group(fp(1), &["/a/x1.bin", "/a/x2.bin", "/b/x1.bin", "/b/x2.bin", "/c/x.bin"]),
            group(fp(2), &["/a/y.bin", "/b/y.bin", "/c/y.bin"]),
        ];

        let matched = match_directories(&groups);

        assert_eq!(matched.len(), 1);
        assert_eq!(
            matched[0].directories,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert_eq!(matched[0].signature.len(), 3);
    }

    #[test]
    fn test_match_directories_no_groups() {
        assert!(match_directories(&[]).is_empty());
    }

    #[test]
    fn test_match_directories_single_dir_not_emitted() {
        let groups = vec![group(fp(1), &["/solo/a.bin", "/solo/b.bin"])];
        assert!(match_directories(&groups).is_empty());
    }

    #[test]
    fn test_match_directories_deterministic_order() {
        let groups = vec![
            group(fp(1), &["/m/a.bin", "/n/a.bin"]),
            group(fp(2), &["/p/b.bin", "/q/b.bin"]),
        ];

        let first = match_directories(&groups);
        let second = match_directories(&groups);

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].directories, second[0].directories);
        assert_eq!(first[1].directories, second[1].directories);
    }
}
