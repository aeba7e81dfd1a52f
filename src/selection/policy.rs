//! Per-group retention policies.
//!
//! A policy decides which members of one group survive. Policies are applied
//! per group independently; every group must retain at least one member, so a
//! keep-set that would delete every copy is rejected before planning.

use std::collections::BTreeSet;

/// Retention policy for one duplicate or identical-directory group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Policy {
    /// Retain the first member (scan order), delete the rest.
    KeepFirst,
    /// Retain the last member, delete the rest.
    KeepLast,
    /// Retain exactly the listed positions (1-based, as presented to the
    /// user), delete the complement.
    KeepSet(BTreeSet<usize>),
    /// Leave the group out of the plan entirely.
    Skip,
}

/// Policy validation errors.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PolicyError {
    /// A keep-set retained nothing; applying it would destroy every copy.
    #[error("keep set retains no member: every copy in the group would be deleted")]
    EmptyKeepSet,

    /// A keep-set referenced a position outside the group.
    #[error("keep position {position} out of range for a group of {len}")]
    PositionOutOfRange {
        /// Offending 1-based position
        position: usize,
        /// Group length
        len: usize,
    },
}

impl Policy {
    /// Indices (0-based) of the members this policy deletes from a group of
    /// `len` members.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] for a keep-set that retains nothing or names a
    /// position outside `1..=len`. Validation happens here, before any plan is
    /// built, so a degenerate selection can never reach the executor.
    pub fn deletions(&self, len: usize) -> Result<Vec<usize>, PolicyError> {
        match self {
            Self::Skip => Ok(Vec::new()),
            Self::KeepFirst => Ok((1..len).collect()),
            Self::KeepLast => Ok((0..len.saturating_sub(1)).collect()),
            Self::KeepSet(keep) => {
                if keep.is_empty() {
                    return Err(PolicyError::EmptyKeepSet);
                }
                for &position in keep {
                    if position == 0 || position > len {
                        return Err(PolicyError::PositionOutOfRange { position, len });
                    }
                }
                Ok((0..len).filter(|i| !keep.contains(&(i + 1))).collect())
            }
        }
    }
}
