//! Range arguments shared by every command.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args};

use crate::analysis::{Boundary, RangeError};
use crate::git::{GitRepository, CURRENT_BRANCH};

/// Repository, branch and the boundary to exclude.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("boundary")
        .required(true)
        .args(["compare_branch", "since_commit", "since_tag"]),
))]
pub struct RangeArgs {
    /// Path to the git repository.
    #[arg(short = 'r', long, default_value = ".")]
    pub repository: PathBuf,

    /// Branch to report on ("." for the checked-out branch).
    #[arg(short = 'b', long, default_value = CURRENT_BRANCH)]
    pub branch: String,

    /// Excludes every commit that is also on this branch.
    #[arg(long, value_name = "BRANCH")]
    pub compare_branch: Option<String>,

    /// Excludes this commit (hash or unique prefix) and its ancestors.
    #[arg(long, value_name = "COMMIT")]
    pub since_commit: Option<String>,

    /// Excludes the tagged commit and its ancestors.
    #[arg(short = 't', long, alias = "final-tag", value_name = "TAG")]
    pub since_tag: Option<String>,
}

impl RangeArgs {
    /// Builds the boundary from whichever boundary flag was given.
    pub fn boundary(&self) -> Result<Boundary, RangeError> {
        match (&self.compare_branch, &self.since_commit, &self.since_tag) {
            (Some(branch), None, None) => Boundary::branch(branch),
            (None, Some(commit), None) => Boundary::commit(commit),
            (None, None, Some(tag)) => Boundary::tag(tag),
            _ => Err(RangeError::InvalidBoundary(
                "exactly one of --compare-branch, --since-commit or --since-tag is required"
                    .to_string(),
            )),
        }
    }

    /// Branch name for the report, with "." replaced by the checked-out branch.
    pub fn display_branch(&self, repo: &GitRepository) -> Result<String> {
        if self.branch == CURRENT_BRANCH {
            repo.current_branch()
        } else {
            Ok(self.branch.clone())
        }
    }
}
