//! Commits command: lists the commits of a release range.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use super::range::RangeArgs;
use crate::analysis::resolve_range;
use crate::data::{OutputFormat, ReleaseReport};
use crate::git::GitRepository;

/// Commits command options.
#[derive(Parser)]
pub struct CommitsCommand {
    /// Commit range selection.
    #[command(flatten)]
    pub range: RangeArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Writes the report to this file instead of stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

impl CommitsCommand {
    /// Executes the commits command.
    pub async fn execute(self) -> Result<()> {
        let boundary = self.range.boundary()?;
        crate::utils::check_git_repository(&self.range.repository)?;

        let repo = GitRepository::open_at(&self.range.repository)?;
        let commits = resolve_range(&repo, &self.range.branch, &boundary)
            .await
            .with_context(|| format!("Failed to resolve commits since {boundary}"))?;
        info!(count = commits.len(), "Resolved commit range");

        let branch = self.range.display_branch(&repo)?;
        let report = ReleaseReport::new(&branch, &boundary, &commits);
        super::emit_report(&report, self.format, self.output.as_deref())
    }
}
