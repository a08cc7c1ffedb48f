//! Git history access and the commit record.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;

pub mod commit;
pub mod error;
pub mod repository;

pub use commit::{AuthorInfo, CommitInfo};
pub use error::GitError;
pub use repository::GitRepository;

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;

/// Branch reference that selects the currently checked-out branch.
pub const CURRENT_BRANCH: &str = ".";

/// Source of commit history for range resolution.
///
/// Implementations must return commits newest-first in reverse-topological
/// order: a commit never appears after any of its parents.
pub trait HistoryProvider: Send + Sync {
    /// Returns every commit reachable from `branch_ref`, newest first.
    fn list_commits<'a>(
        &'a self,
        branch_ref: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<CommitInfo>>> + Send + 'a>>;

    /// Resolves a tag name to the full id of the commit it points at.
    fn resolve_tag<'a>(
        &'a self,
        tag_name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

/// Truncates a commit hash to [`SHORT_HASH_LEN`] characters.
pub fn short_hash(hash: &str) -> &str {
    hash.get(..SHORT_HASH_LEN).unwrap_or(hash)
}
