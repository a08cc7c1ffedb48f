//! Git repository operations.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use git2::{BranchType, Oid, Repository, Sort};
use tracing::debug;

use crate::git::{CommitInfo, GitError, HistoryProvider, CURRENT_BRANCH};

/// Git repository wrapper.
pub struct GitRepository {
    repo: Mutex<Repository>,
}

impl GitRepository {
    /// Opens repository at specified path.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path)
            .with_context(|| format!("Failed to open git repository at {}", path.display()))?;

        Ok(Self {
            repo: Mutex::new(repo),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Repository>> {
        self.repo
            .lock()
            .map_err(|_| anyhow::anyhow!("Git repository handle is poisoned"))
    }

    /// Returns the current branch name.
    pub fn current_branch(&self) -> Result<String> {
        let repo = self.lock()?;
        current_branch_of(&repo)
    }

    /// Checks if a branch exists.
    pub fn branch_exists(&self, branch_name: &str) -> Result<bool> {
        let repo = self.lock()?;
        Ok(find_branch_commit(&repo, branch_name).is_some())
    }

    /// Returns every commit reachable from `branch_ref`, newest first.
    ///
    /// `"."` selects the currently checked-out branch. The walk is sorted
    /// topologically so children always precede their parents.
    pub fn walk_commits(&self, branch_ref: &str) -> Result<Vec<CommitInfo>> {
        let repo = self.lock()?;

        let branch_name = if branch_ref == CURRENT_BRANCH {
            current_branch_of(&repo)?
        } else {
            branch_ref.to_string()
        };

        let tip = find_branch_commit(&repo, &branch_name)
            .ok_or_else(|| GitError::BranchNotFound(branch_name.clone()))?;

        let mut walker = repo.revwalk().context("Failed to create revwalk")?;
        walker
            .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
            .context("Failed to configure revwalk sorting")?;
        walker.push(tip).context("Failed to push branch tip")?;

        let mut commits = Vec::new();
        for oid in walker {
            let oid = oid.context("Failed to get commit OID from walker")?;
            let commit = repo.find_commit(oid).context("Failed to find commit")?;
            commits.push(CommitInfo::from_git_commit(&commit)?);
        }

        debug!(
            branch = %branch_name,
            tip = %tip,
            commit_count = commits.len(),
            "Walked branch history"
        );

        Ok(commits)
    }

    /// Resolves a tag to the full id of the commit it points at.
    ///
    /// Annotated tags are peeled down to their target commit.
    pub fn find_tag_commit(&self, tag_name: &str) -> Result<String> {
        let repo = self.lock()?;

        let reference = repo
            .find_reference(&format!("refs/tags/{tag_name}"))
            .map_err(|_| GitError::TagNotFound(tag_name.to_string()))?;
        let commit = reference
            .peel_to_commit()
            .with_context(|| format!("Tag '{tag_name}' does not point at a commit"))?;

        debug!(tag = %tag_name, commit = %commit.id(), "Resolved tag");

        Ok(commit.id().to_string())
    }
}

/// git2 calls are synchronous: the returned futures do all of their work on
/// the first poll and block the executor thread until the walk finishes.
impl HistoryProvider for GitRepository {
    fn list_commits<'a>(
        &'a self,
        branch_ref: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<CommitInfo>>> + Send + 'a>> {
        Box::pin(async move { self.walk_commits(branch_ref) })
    }

    fn resolve_tag<'a>(
        &'a self,
        tag_name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move { self.find_tag_commit(tag_name) })
    }
}

fn current_branch_of(repo: &Repository) -> Result<String> {
    let head = repo.head().context("Failed to get HEAD reference")?;

    if head.is_branch() {
        if let Some(name) = head.shorthand() {
            return Ok(name.to_string());
        }
    }

    Err(GitError::DetachedHead.into())
}

/// Looks a name up as a local branch, then a remote branch, then a revspec.
fn find_branch_commit(repo: &Repository, branch_name: &str) -> Option<Oid> {
    if let Ok(branch) = repo.find_branch(branch_name, BranchType::Local) {
        if let Ok(commit) = branch.get().peel_to_commit() {
            return Some(commit.id());
        }
    }

    if let Ok(branch) = repo.find_branch(branch_name, BranchType::Remote) {
        if let Ok(commit) = branch.get().peel_to_commit() {
            return Some(commit.id());
        }
    }

    repo.revparse_single(branch_name)
        .and_then(|obj| obj.peel_to_commit())
        .map(|commit| commit.id())
        .ok()
}
