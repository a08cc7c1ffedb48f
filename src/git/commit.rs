//! Commit record extracted from git history.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::Commit;
use serde::{Deserialize, Serialize};

/// Commit information structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full SHA-1 hash of the commit.
    pub hash: String,
    /// Hashes of the parent commits, in git's parent order.
    pub parents: Vec<String>,
    /// Author date with the author's timezone.
    pub date: DateTime<FixedOffset>,
    /// Commit author.
    pub author: AuthorInfo,
    /// Commit message with surrounding whitespace removed.
    pub message: String,
}

/// Commit author identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    /// Author name.
    pub name: String,
    /// Author email address.
    pub email: String,
}

impl CommitInfo {
    /// Creates CommitInfo from git2::Commit.
    pub fn from_git_commit(commit: &Commit) -> Result<Self> {
        let hash = commit.id().to_string();
        let parents = commit.parent_ids().map(|oid| oid.to_string()).collect();

        let signature = commit.author();
        let author = AuthorInfo {
            name: signature.name().unwrap_or("Unknown").to_string(),
            email: signature.email().unwrap_or("unknown@example.com").to_string(),
        };

        let timestamp = signature.when();
        let offset = FixedOffset::east_opt(timestamp.offset_minutes() * 60)
            .unwrap_or_else(|| Utc.fix());
        let date = DateTime::from_timestamp(timestamp.seconds(), 0)
            .context("Invalid commit timestamp")?
            .with_timezone(&offset);

        let message = commit.message().unwrap_or("").trim().to_string();

        Ok(Self {
            hash,
            parents,
            date,
            author,
            message,
        })
    }

    /// Returns the first line of the commit message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Returns true when this commit has more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}
