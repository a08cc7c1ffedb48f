//! Commit range resolution.
//!
//! Two modes narrow a branch history down to the commits that are new:
//!
//! - **Set difference** ([`exclude_commits_in`]): drop every commit that also
//!   appears in a comparison branch.
//! - **Ancestor pruning** ([`exclude_ancestors_of`]): drop a boundary commit
//!   and everything reachable from it through parent links.

use std::collections::{HashMap, HashSet};
use std::fmt;

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::git::{short_hash, CommitInfo, HistoryProvider};

/// Errors raised while validating range input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RangeError {
    /// The boundary specifier is empty or malformed.
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),
}

/// Exclusive lower bound of the commits considered new.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Boundary {
    /// Every commit on this branch is excluded.
    Branch(String),
    /// This commit (matched by id prefix) and all of its ancestors are excluded.
    Commit(String),
    /// The commit this tag points at and all of its ancestors are excluded.
    Tag(String),
}

impl Boundary {
    /// Creates a branch boundary.
    pub fn branch(name: &str) -> Result<Self, RangeError> {
        Ok(Self::Branch(validate_ref_name("branch", name)?))
    }

    /// Creates a commit boundary from a full or abbreviated hash.
    pub fn commit(prefix: &str) -> Result<Self, RangeError> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(RangeError::InvalidBoundary(
                "commit hash must not be empty".to_string(),
            ));
        }
        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RangeError::InvalidBoundary(format!(
                "'{prefix}' is not a hexadecimal commit hash"
            )));
        }
        Ok(Self::Commit(prefix.to_ascii_lowercase()))
    }

    /// Creates a tag boundary.
    pub fn tag(name: &str) -> Result<Self, RangeError> {
        Ok(Self::Tag(validate_ref_name("tag", name)?))
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(name) => write!(f, "branch {name}"),
            Self::Commit(prefix) => write!(f, "commit {prefix}"),
            Self::Tag(name) => write!(f, "tag {name}"),
        }
    }
}

fn validate_ref_name(kind: &str, name: &str) -> Result<String, RangeError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RangeError::InvalidBoundary(format!(
            "{kind} name must not be empty"
        )));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(RangeError::InvalidBoundary(format!(
            "{kind} name '{name}' contains whitespace"
        )));
    }
    Ok(name.to_string())
}

/// A parent commit listed before one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderViolation {
    /// The child commit.
    pub commit: String,
    /// The parent that appeared earlier in the list.
    pub parent: String,
}

impl fmt::Display for OrderViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parent {} is listed before its child {}",
            short_hash(&self.parent),
            short_hash(&self.commit)
        )
    }
}

/// Returns the first place where `commits` is not newest-first topological.
///
/// Parents missing from the list are ignored.
pub fn check_topological_order(commits: &[CommitInfo]) -> Option<OrderViolation> {
    let positions: HashMap<&str, usize> = commits
        .iter()
        .enumerate()
        .map(|(i, c)| (c.hash.as_str(), i))
        .collect();

    commits.iter().enumerate().find_map(|(i, commit)| {
        commit.parents.iter().find_map(|parent| match positions.get(parent.as_str()) {
            Some(&pos) if pos < i => Some(OrderViolation {
                commit: commit.hash.clone(),
                parent: parent.clone(),
            }),
            _ => None,
        })
    })
}

/// Returns the commits of `target` whose id does not appear in `comparison`.
///
/// The order of `target` is preserved.
pub fn exclude_commits_in(target: Vec<CommitInfo>, comparison: &[CommitInfo]) -> Vec<CommitInfo> {
    let known: HashSet<&str> = comparison.iter().map(|c| c.hash.as_str()).collect();
    target
        .into_iter()
        .filter(|c| !known.contains(c.hash.as_str()))
        .collect()
}

/// Drops the first commit whose id starts with `target_prefix` along with
/// all of its ancestors.
///
/// `commits` must be newest-first with every parent listed after its
/// children; ancestors that appear out of order may survive. When no commit
/// matches the prefix nothing is excluded.
pub fn exclude_ancestors_of(commits: Vec<CommitInfo>, target_prefix: &str) -> Vec<CommitInfo> {
    let mut excluded: HashSet<String> = HashSet::new();
    let mut target_found = false;

    for commit in &commits {
        if !target_found {
            if commit.hash.starts_with(target_prefix) {
                target_found = true;
                excluded.insert(commit.hash.clone());
                excluded.extend(commit.parents.iter().cloned());
                debug!(commit = %commit.hash, "Found boundary commit");
            }
        } else if excluded.contains(&commit.hash) {
            excluded.extend(commit.parents.iter().cloned());
        }
    }

    if !target_found {
        warn!(
            boundary = %target_prefix,
            commit_count = commits.len(),
            "Boundary commit not found in history; no commits excluded"
        );
        return commits;
    }

    commits
        .into_iter()
        .filter(|c| !excluded.contains(&c.hash))
        .collect()
}

/// Lists the commits on `branch` that are new relative to `boundary`.
pub async fn resolve_range(
    provider: &dyn HistoryProvider,
    branch: &str,
    boundary: &Boundary,
) -> Result<Vec<CommitInfo>> {
    let commits = provider.list_commits(branch).await?;
    let total = commits.len();

    if let Some(violation) = check_topological_order(&commits) {
        warn!(%violation, "History is not in topological order; ancestor pruning may keep old commits");
    }

    let resolved = match boundary {
        Boundary::Branch(other) => {
            let comparison = provider.list_commits(other).await?;
            exclude_commits_in(commits, &comparison)
        }
        Boundary::Commit(prefix) => exclude_ancestors_of(commits, prefix),
        Boundary::Tag(tag) => {
            let sha = provider.resolve_tag(tag).await?;
            exclude_ancestors_of(commits, &sha)
        }
    };

    info!(
        branch = %branch,
        boundary = %boundary,
        total_commits = total,
        new_commits = resolved.len(),
        "Resolved commit range"
    );

    Ok(resolved)
}
