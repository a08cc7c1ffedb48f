//! CLI interface for release-tasks.

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::data::{OutputFormat, ReleaseReport};

pub mod commits;
pub mod range;
pub mod tasks;

/// release-tasks: lists the tracker tasks delivered by a release.
#[derive(Parser)]
#[command(name = "release-tasks")]
#[command(about = "Lists the issue-tracker tasks delivered between two points in git history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Resolves the commit range, aggregates tasks and fetches their details.
    Tasks(tasks::TasksCommand),
    /// Resolves the commit range only, without contacting the tracker.
    Commits(commits::CommitsCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Tasks(tasks_cmd) => tasks_cmd.execute().await,
            Commands::Commits(commits_cmd) => commits_cmd.execute().await,
        }
    }
}

/// Prints the report to stdout, or writes it to `output` when given.
pub(crate) fn emit_report(
    report: &ReleaseReport,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    match output {
        Some(path) => {
            report.write_to_file(path, format)?;
            eprintln!("Report written to {}", path.display());
        }
        None => print!("{}", report.render(format)?),
    }
    Ok(())
}
