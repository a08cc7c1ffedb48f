//! Shared test utilities for the `analysis` module.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use chrono::DateTime;

use crate::git::{AuthorInfo, CommitInfo, HistoryProvider};
use crate::tracker::{TaskDetails, TaskInfoProvider, TrackerError};

/// Builds a commit with the given id, parent ids and message.
pub(crate) fn commit(hash: &str, parents: &[&str], message: &str) -> CommitInfo {
    CommitInfo {
        hash: hash.to_string(),
        parents: parents.iter().map(|p| (*p).to_string()).collect(),
        date: DateTime::parse_from_rfc3339("2024-01-15T09:30:00+00:00").unwrap(),
        author: AuthorInfo {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
        },
        message: message.to_string(),
    }
}

/// Returns the hashes of `commits` in order.
pub(crate) fn hashes(commits: &[CommitInfo]) -> Vec<&str> {
    commits.iter().map(|c| c.hash.as_str()).collect()
}

/// History provider backed by in-memory branch and tag tables.
#[derive(Default)]
pub(crate) struct MemoryHistory {
    branches: HashMap<String, Vec<CommitInfo>>,
    tags: HashMap<String, String>,
}

impl MemoryHistory {
    pub(crate) fn with_branch(mut self, name: &str, commits: Vec<CommitInfo>) -> Self {
        self.branches.insert(name.to_string(), commits);
        self
    }

    pub(crate) fn with_tag(mut self, name: &str, commit: &str) -> Self {
        self.tags.insert(name.to_string(), commit.to_string());
        self
    }
}

impl HistoryProvider for MemoryHistory {
    fn list_commits<'a>(
        &'a self,
        branch_ref: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<CommitInfo>>> + Send + 'a>> {
        Box::pin(async move {
            self.branches
                .get(branch_ref)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no branch {branch_ref}"))
        })
    }

    fn resolve_tag<'a>(
        &'a self,
        tag_name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.tags
                .get(tag_name)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no tag {tag_name}"))
        })
    }
}

/// Tracker stub answering from a fixed table; unknown ids are not found.
///
/// Records the peak number of lookups in flight so tests can check the
/// concurrency bound.
pub(crate) struct StubTracker {
    project_keys: Vec<String>,
    details: HashMap<String, TaskDetails>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    key_requests: AtomicUsize,
}

impl StubTracker {
    /// Creates a stub for project `ABC` that knows the given task ids.
    pub(crate) fn new(known: &[&str]) -> Self {
        let details = known
            .iter()
            .map(|id| ((*id).to_string(), Self::details_for(id)))
            .collect();
        Self {
            project_keys: vec!["ABC".to_string()],
            details,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            key_requests: AtomicUsize::new(0),
        }
    }

    /// Details the stub returns for `id`.
    pub(crate) fn details_for(id: &str) -> TaskDetails {
        TaskDetails {
            summary: Some(format!("Summary of {id}")),
            status: Some("Done".to_string()),
            ..TaskDetails::default()
        }
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub(crate) fn key_requests(&self) -> usize {
        self.key_requests.load(Ordering::SeqCst)
    }
}

impl TaskInfoProvider for StubTracker {
    fn list_project_keys(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, TrackerError>> + Send + '_>> {
        Box::pin(async move {
            self.key_requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.project_keys.clone())
        })
    }

    fn fetch_task_details<'a>(
        &'a self,
        task_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<TaskDetails, TrackerError>> + Send + 'a>> {
        Box::pin(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.details
                .get(task_id)
                .cloned()
                .ok_or_else(|| TrackerError::NotFound(task_id.to_string()))
        })
    }
}
