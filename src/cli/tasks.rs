//! Tasks command: collects and enriches the tasks delivered by a release.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::range::RangeArgs;
use crate::analysis::{collect_release_tasks, TrackerContext, DEFAULT_CONCURRENCY};
use crate::data::{OutputFormat, ReleaseReport};
use crate::git::GitRepository;
use crate::tracker::JiraClient;
use crate::utils::JiraCredentialArgs;

/// Tasks command options.
#[derive(Parser)]
pub struct TasksCommand {
    /// Commit range selection.
    #[command(flatten)]
    pub range: RangeArgs,

    /// Jira host (falls back to JIRA_HOST).
    #[arg(long)]
    pub jira_host: Option<String>,

    /// Jira user (falls back to JIRA_USER).
    #[arg(long)]
    pub jira_user: Option<String>,

    /// Jira password or API token (falls back to JIRA_PASSWORD or JIRA_API_TOKEN).
    #[arg(long)]
    pub jira_password: Option<String>,

    /// Project key to match in commit messages; repeatable.
    /// When omitted, every project visible to the user is used.
    #[arg(long = "project-key", value_name = "KEY")]
    pub project_key: Vec<String>,

    /// Maximum number of concurrent tracker requests.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Writes the report to this file instead of stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

impl TasksCommand {
    /// Executes the tasks command.
    pub async fn execute(self) -> Result<()> {
        let boundary = self.range.boundary()?;

        // Preflight: repository and credentials before any history or network work
        let credentials = JiraCredentialArgs {
            host: self.jira_host.clone(),
            user: self.jira_user.clone(),
            password: self.jira_password.clone(),
        };
        let jira_config =
            crate::utils::check_tasks_command_prerequisites(&self.range.repository, &credentials)?;

        let repo = GitRepository::open_at(&self.range.repository)?;
        let client = JiraClient::new(jira_config)?;
        let context = TrackerContext::connect(&client, self.project_key.clone()).await?;

        let release = collect_release_tasks(
            &repo,
            &self.range.branch,
            &boundary,
            &context,
            self.concurrency,
        )
        .await
        .with_context(|| format!("Failed to collect tasks since {boundary}"))?;

        let branch = self.range.display_branch(&repo)?;
        let report = ReleaseReport::new(&branch, &boundary, &release.commits)
            .with_tasks(&release.tasks, &release.summary);

        super::emit_report(&report, self.format, self.output.as_deref())?;

        if !release.summary.failures.is_empty() {
            eprintln!(
                "warning: details missing for {} of {} tasks",
                release.summary.failures.len(),
                release.tasks.len()
            );
        }

        Ok(())
    }
}
