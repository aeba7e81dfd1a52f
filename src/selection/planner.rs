//! Deletion plan construction.
//!
//! # Overview
//!
//! The planner applies one retention policy per group and collects the
//! resulting paths. File-level and directory-level selections are computed
//! independently; [`DeletionPlan::reconcile`] drops file entries already
//! covered by a planned directory so the executor does not attempt them
//! twice.

use std::path::PathBuf;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, IdenticalDirGroup};

use super::policy::{Policy, PolicyError};

/// The final deletion plan: ordered, duplicate-free path lists.
///
/// Every planned file leaves at least one retained member in its group, and
/// every planned directory belongs to an identical-directory group that
/// retains at least one member.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeletionPlan {
    /// Files selected for deletion.
    pub files: Vec<PathBuf>,
    /// Directories selected for recursive deletion.
    pub directories: Vec<PathBuf>,
}

impl DeletionPlan {
    /// Check whether the plan selects anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    /// Total number of planned items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len() + self.directories.len()
    }

    /// Drop file entries whose containing directory (or any ancestor) is also
    /// planned for deletion.
    ///
    /// Removing the directory removes those files anyway; reconciling avoids
    /// reporting an already-removed error for each of them.
    pub fn reconcile(&mut self) {
        if self.directories.is_empty() {
            return;
        }
        let dirs = self.directories.clone();
        let before = self.files.len();
        self.files
            .retain(|file| !dirs.iter().any(|dir| file.starts_with(dir)));
        let dropped = before - self.files.len();
        if dropped > 0 {
            log::debug!(
                "Reconciled plan: {} file entries covered by planned directories",
                dropped
            );
        }
    }
}

/// Build a deletion plan from duplicate groups and identical-directory groups.
///
/// # Arguments
///
/// * `file_groups` - Duplicate groups from the detection pass
/// * `dir_groups` - Identical-directory groups from the matching pass
/// * `file_policy` - Policy for the i-th file group
/// * `dir_policy` - Policy for the i-th directory group
///
/// # Errors
///
/// Returns [`PolicyError`] if any policy is invalid for its group. No partial
/// plan escapes: validation fails the whole call before anything executes.
pub fn build_plan(
    file_groups: &[DuplicateGroup],
    dir_groups: &[IdenticalDirGroup],
    mut file_policy: impl FnMut(usize, &DuplicateGroup) -> Policy,
    mut dir_policy: impl FnMut(usize, &IdenticalDirGroup) -> Policy,
) -> Result<DeletionPlan, PolicyError> {
    let mut plan = DeletionPlan::default();

    for (idx, group) in file_groups.iter().enumerate() {
        let policy = file_policy(idx, group);
        for member in policy.deletions(group.len())? {
            plan.files.push(group.files[member].path.clone());
        }
    }

    for (idx, group) in dir_groups.iter().enumerate() {
        let policy = dir_policy(idx, group);
        for member in policy.deletions(group.len())? {
            plan.directories.push(group.directories[member].clone());
        }
    }

    log::info!(
        "Plan: {} files, {} directories selected",
        plan.files.len(),
        plan.directories.len()
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileEntry;
    use std::collections::BTreeSet;
    use std::time::SystemTime;

    fn file_group(paths: &[&str]) -> DuplicateGroup {
        DuplicateGroup {
            fingerprint: [9u8; 32],
            size: 10,
            files: paths
                .iter()
                .map(|p| FileEntry::new(PathBuf::from(p), 10, SystemTime::now()))
                .collect(),
        }
    }

    fn dir_group(dirs: &[&str]) -> IdenticalDirGroup {
        IdenticalDirGroup {
            signature: vec![[9u8; 32]],
            directories: dirs.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn test_build_plan_keep_first() {
        let groups = vec![file_group(&["/a", "/b", "/c"])];
        let plan = build_plan(&groups, &[], |_, _| Policy::KeepFirst, |_, _| Policy::Skip).unwrap();

        assert_eq!(plan.files, vec![PathBuf::from("/b"), PathBuf::from("/c")]);
        assert!(plan.directories.is_empty());
    }

    #[test]
    fn test_build_plan_keep_last() {
        let groups = vec![file_group(&["/a", "/b", "/c"])];
        let plan = build_plan(&groups, &[], |_, _| Policy::KeepLast, |_, _| Policy::Skip).unwrap();

        assert_eq!(plan.files, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn test_build_plan_keep_set() {
        let groups = vec![file_group(&["/a", "/b", "/c"])];
        let keep_b = Policy::KeepSet(BTreeSet::from([2]));
        let plan = build_plan(&groups, &[], |_, _| keep_b.clone(), |_, _| Policy::Skip).unwrap();

        assert_eq!(plan.files, vec![PathBuf::from("/a"), PathBuf::from("/c")]);
    }

    #[test]
    fn test_build_plan_empty_keep_set_rejected() {
        let groups = vec![file_group(&["/a", "/b"])];
        let empty = Policy::KeepSet(BTreeSet::new());
        let result = build_plan(&groups, &[], |_, _| empty.clone(), |_, _| Policy::Skip);

        assert_eq!(result.unwrap_err(), PolicyError::EmptyKeepSet);
    }

    #[test]
    fn test_build_plan_per_group_policies() {
        let groups = vec![file_group(&["/a", "/b"]), file_group(&["/c", "/d"])];
        let plan = build_plan(
            &groups,
            &[],
            |idx, _| if idx == 0 { Policy::Skip } else { Policy::KeepFirst },
            |_, _| Policy::Skip,
        )
        .unwrap();

        assert_eq!(plan.files, vec![PathBuf::from("/d")]);
    }

    #[test]
    fn test_build_plan_directories() {
        let dirs = vec![dir_group(&["/x", "/y", "/z"])];
        let plan = build_plan(&[], &dirs, |_, _| Policy::Skip, |_, _| Policy::KeepFirst).unwrap();

        assert_eq!(
            plan.directories,
            vec![PathBuf::from("/y"), PathBuf::from("/z")]
        );
    }

    #[test]
    fn test_reconcile_drops_covered_files() {
        let mut plan = DeletionPlan {
            files: vec![
                PathBuf::from("/gone/dir/file.txt"),
                PathBuf::from("/kept/file.txt"),
            ],
            directories: vec![PathBuf::from("/gone")],
        };

        plan.reconcile();

        assert_eq!(plan.files, vec![PathBuf::from("/kept/file.txt")]);
        assert_eq!(plan.directories, vec![PathBuf::from("/gone")]);
    }

    #[test]
    fn test_reconcile_without_directories_is_noop() {
        let mut plan = DeletionPlan {
            files: vec![PathBuf::from("/a")],
            directories: Vec::new(),
        };
        plan.reconcile();
        assert_eq!(plan.files.len(), 1);
    }

    #[test]
    fn test_plan_is_empty() {
        let plan = DeletionPlan::default();
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }
}
