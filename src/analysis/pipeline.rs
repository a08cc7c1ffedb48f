//! End-to-end collection of the tasks delivered in a commit range.

use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::{
    aggregate_tasks, enrich_tasks, resolve_range, Boundary, EnrichmentSummary, TaskMap,
    TicketExtractor,
};
use crate::git::{CommitInfo, HistoryProvider};
use crate::tracker::TaskInfoProvider;

/// Tracker connection and the project keys fetched from it.
///
/// Built once per run and handed to every stage that needs the tracker.
pub struct TrackerContext<'a> {
    tracker: &'a dyn TaskInfoProvider,
    project_keys: Vec<String>,
    extractor: TicketExtractor,
}

impl<'a> TrackerContext<'a> {
    /// Creates a context, fetching project keys unless `project_keys` is non-empty.
    pub async fn connect(
        tracker: &'a dyn TaskInfoProvider,
        project_keys: Vec<String>,
    ) -> Result<Self> {
        let project_keys = if project_keys.is_empty() {
            tracker
                .list_project_keys()
                .await
                .context("Failed to fetch project keys from the issue tracker")?
        } else {
            project_keys
        };

        let extractor =
            TicketExtractor::new(&project_keys).context("Failed to build ticket pattern")?;

        info!(project_count = project_keys.len(), "Loaded project keys");

        Ok(Self {
            tracker,
            project_keys,
            extractor,
        })
    }

    /// Known project keys.
    pub fn project_keys(&self) -> &[String] {
        &self.project_keys
    }

    /// Extractor built from the project keys.
    pub fn extractor(&self) -> &TicketExtractor {
        &self.extractor
    }

    /// The tracker client.
    pub fn tracker(&self) -> &'a dyn TaskInfoProvider {
        self.tracker
    }
}

/// Everything collected for one release range.
#[derive(Debug)]
pub struct ReleaseTasks {
    /// Commits that are new relative to the boundary.
    pub commits: Vec<CommitInfo>,
    /// Tasks referenced by those commits, enriched where possible.
    pub tasks: TaskMap,
    /// Outcome of the enrichment pass.
    pub summary: EnrichmentSummary,
}

/// Resolves the range, aggregates tasks and enriches them.
pub async fn collect_release_tasks(
    history: &dyn HistoryProvider,
    branch: &str,
    boundary: &Boundary,
    context: &TrackerContext<'_>,
    concurrency: usize,
) -> Result<ReleaseTasks> {
    let commits = resolve_range(history, branch, boundary).await?;
    let mut tasks = aggregate_tasks(&commits, context.extractor());
    let summary = enrich_tasks(&mut tasks, context.tracker(), concurrency).await;

    Ok(ReleaseTasks {
        commits,
        tasks,
        summary,
    })
}
