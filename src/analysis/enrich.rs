//! Attaching issue-tracker metadata to aggregated tasks.

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::analysis::TaskMap;
use crate::tracker::{TaskDetails, TaskInfoProvider};

/// Default number of tracker lookups in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Result of looking up a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// The tracker returned metadata for the task.
    Enriched(TaskDetails),
    /// The lookup failed; the task keeps its commits but gets no metadata.
    Failed(String),
}

/// A task whose lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    /// Identifier of the task.
    pub task_id: String,
    /// Human-readable reason reported by the tracker client.
    pub reason: String,
}

/// Totals of an enrichment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    /// Number of tasks that received metadata.
    pub enriched: usize,
    /// Tasks whose lookup failed, in task order.
    pub failures: Vec<EnrichmentFailure>,
}

/// Looks one task up without propagating tracker errors.
pub async fn lookup_task(provider: &dyn TaskInfoProvider, task_id: &str) -> EnrichmentOutcome {
    match provider.fetch_task_details(task_id).await {
        Ok(details) => EnrichmentOutcome::Enriched(details),
        Err(e) => EnrichmentOutcome::Failed(e.to_string()),
    }
}

/// Fetches metadata for every task, at most `concurrency` lookups at a time.
///
/// Each task is written only by its own lookup. A failed lookup leaves the
/// task without metadata and is recorded in the returned summary; it never
/// stops the remaining lookups.
pub async fn enrich_tasks(
    tasks: &mut TaskMap,
    provider: &dyn TaskInfoProvider,
    concurrency: usize,
) -> EnrichmentSummary {
    let semaphore = Semaphore::new(concurrency.max(1));
    let semaphore = &semaphore;

    let futs: Vec<_> = tasks
        .iter()
        .map(|task| {
            let task_id = task.task_id.clone();
            async move {
                match semaphore.acquire().await {
                    Ok(_permit) => lookup_task(provider, &task_id).await,
                    Err(e) => EnrichmentOutcome::Failed(format!("semaphore closed: {e}")),
                }
            }
        })
        .collect();

    let outcomes = join_all(futs).await;

    let mut summary = EnrichmentSummary::default();
    for (task, outcome) in tasks.iter_mut().zip(outcomes) {
        match outcome {
            EnrichmentOutcome::Enriched(details) => {
                debug!(task_id = %task.task_id, "Enriched task");
                task.details = Some(details);
                summary.enriched += 1;
            }
            EnrichmentOutcome::Failed(reason) => {
                warn!(task_id = %task.task_id, %reason, "Failed to fetch task details");
                summary.failures.push(EnrichmentFailure {
                    task_id: task.task_id.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        enriched = summary.enriched,
        failed = summary.failures.len(),
        "Enrichment finished"
    );

    summary
}
