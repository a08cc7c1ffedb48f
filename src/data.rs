//! Report model and serialization.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::analysis::{Boundary, EnrichmentSummary, TaskMap};
use crate::git::{short_hash, CommitInfo};
use crate::tracker::TaskDetails;

pub mod yaml;

pub use yaml::*;

/// Output formats for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML with multi-line friendly strings.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// Complete report of a release range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseReport {
    /// Version information for the tool that produced the report.
    pub versions: VersionInfo,
    /// Branch whose history was analyzed.
    pub branch: String,
    /// Exclusion boundary, e.g. `tag v1.2.0`.
    pub boundary: String,
    /// Commits that are new relative to the boundary, newest first.
    pub commits: Vec<CommitEntry>,
    /// Tasks referenced by the new commits (only present for task reports).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskEntry>,
    /// Tasks whose tracker lookup failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureEntry>,
}

/// Version information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version of release-tasks.
    pub release_tasks: String,
}

/// One commit in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEntry {
    /// Abbreviated commit hash.
    pub hash: String,
    /// Author date, `YYYY-MM-DD HH:MM` in the author's timezone.
    pub date: String,
    /// Author as `Name <email>`.
    pub author: String,
    /// First line of the commit message.
    pub message: String,
}

/// One task in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    /// Ticket identifier.
    pub id: String,
    /// Number of commit references, counting repeated mentions.
    pub commit_count: usize,
    /// Abbreviated hashes of the referencing commits.
    pub commits: Vec<String>,
    /// Tracker metadata, absent when the lookup failed or was skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<TaskDetails>,
}

/// A task whose metadata could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    /// Ticket identifier.
    pub id: String,
    /// Reason reported by the tracker client.
    pub reason: String,
}

impl From<&CommitInfo> for CommitEntry {
    fn from(commit: &CommitInfo) -> Self {
        Self {
            hash: short_hash(&commit.hash).to_string(),
            date: commit.date.format("%Y-%m-%d %H:%M").to_string(),
            author: format!("{} <{}>", commit.author.name, commit.author.email),
            message: commit.subject().to_string(),
        }
    }
}

impl ReleaseReport {
    /// Creates a report listing the commits of a resolved range.
    pub fn new(branch: &str, boundary: &Boundary, commits: &[CommitInfo]) -> Self {
        Self {
            versions: VersionInfo {
                release_tasks: crate::VERSION.to_string(),
            },
            branch: branch.to_string(),
            boundary: boundary.to_string(),
            commits: commits.iter().map(CommitEntry::from).collect(),
            tasks: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Adds the aggregated tasks and any enrichment failures.
    #[must_use]
    pub fn with_tasks(mut self, tasks: &TaskMap, summary: &EnrichmentSummary) -> Self {
        self.tasks = tasks
            .iter()
            .map(|task| TaskEntry {
                id: task.task_id.clone(),
                commit_count: task.commits.len(),
                commits: task
                    .commits
                    .iter()
                    .map(|c| short_hash(&c.hash).to_string())
                    .collect(),
                details: task.details.clone(),
            })
            .collect();
        self.failures = summary
            .failures
            .iter()
            .map(|f| FailureEntry {
                id: f.task_id.clone(),
                reason: f.reason.clone(),
            })
            .collect();
        self
    }

    /// Renders the report in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Yaml => to_yaml(self),
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")
            }
        }
    }

    /// Renders the report and writes it to `path`.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, format: OutputFormat) -> Result<()> {
        let content = self.render(format)?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.as_ref().display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::analysis::{aggregate_tasks, EnrichmentFailure, TicketExtractor};
    use crate::git::AuthorInfo;

    fn sample_commits() -> Vec<CommitInfo> {
        let make = |hash: &str, message: &str| CommitInfo {
            hash: hash.to_string(),
            parents: Vec::new(),
            date: DateTime::parse_from_rfc3339("2024-05-02T14:07:00+02:00").unwrap(),
            author: AuthorInfo {
                name: "Grace Hopper".to_string(),
                email: "grace@example.com".to_string(),
            },
            message: message.to_string(),
        };
        vec![
            make(
                "1111111111111111111111111111111111111111",
                "ABC-1 add export\n\nDetails here",
            ),
            make("2222222222222222222222222222222222222222", "ABC-2 and ABC-1"),
        ]
    }

    fn sample_report() -> ReleaseReport {
        let commits = sample_commits();
        let boundary = Boundary::tag("v1.0").unwrap();
        let mut tasks = aggregate_tasks(&commits, &TicketExtractor::new(["ABC"]).unwrap());
        tasks.get_or_insert("ABC-1").details = Some(TaskDetails {
            summary: Some("Export to CSV".to_string()),
            ..TaskDetails::default()
        });
        let summary = EnrichmentSummary {
            enriched: 1,
            failures: vec![EnrichmentFailure {
                task_id: "ABC-2".to_string(),
                reason: "Task ABC-2 not found".to_string(),
            }],
        };
        ReleaseReport::new("main", &boundary, &commits).with_tasks(&tasks, &summary)
    }

    #[test]
    fn commit_entries_are_abbreviated() {
        let report = sample_report();
        assert_eq!(
            report.commits[0],
            CommitEntry {
                hash: "11111111".to_string(),
                date: "2024-05-02 14:07".to_string(),
                author: "Grace Hopper <grace@example.com>".to_string(),
                message: "ABC-1 add export".to_string(),
            }
        );
        assert_eq!(report.boundary, "tag v1.0");
    }

    #[test]
    fn task_entries_count_every_mention() {
        let report = sample_report();
        assert_eq!(report.tasks.len(), 2);
        assert_eq!(report.tasks[0].id, "ABC-1");
        assert_eq!(report.tasks[0].commit_count, 2);
        assert_eq!(report.tasks[0].commits, vec!["11111111", "22222222"]);
        assert!(report.tasks[1].details.is_none());
        assert_eq!(report.failures[0].id, "ABC-2");
    }

    #[test]
    fn yaml_report_parses_back() {
        let report = sample_report();
        let yaml = report.render(OutputFormat::Yaml).unwrap();
        let parsed: ReleaseReport = from_yaml(&yaml).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn json_report_omits_empty_sections() {
        let commits = sample_commits();
        let report = ReleaseReport::new("main", &Boundary::Commit("abc".to_string()), &commits);
        let json = report.render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["commits"].as_array().unwrap().len(), 2);
        assert!(value.get("tasks").is_none());
        assert!(value.get("failures").is_none());
    }

    #[test]
    fn report_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        sample_report()
            .write_to_file(&path, OutputFormat::Json)
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"ABC-2\""));
    }
}
