//! Commit range resolution and ticket aggregation.
//!
//! The pipeline runs in four steps:
//!
//! 1. [`range`] narrows a branch history down to the commits that are new
//!    relative to a [`Boundary`].
//! 2. [`tickets`] finds project-key-prefixed ticket references in each
//!    commit message.
//! 3. [`tasks`] groups the commits by the tickets they reference.
//! 4. [`enrich`] attaches issue-tracker metadata to every task.
//!
//! [`pipeline`] chains the four steps behind a [`TrackerContext`].

pub mod enrich;
pub mod pipeline;
pub mod range;
pub mod tasks;
pub mod tickets;

pub use enrich::{
    enrich_tasks, lookup_task, EnrichmentFailure, EnrichmentOutcome, EnrichmentSummary,
    DEFAULT_CONCURRENCY,
};
pub use pipeline::{collect_release_tasks, ReleaseTasks, TrackerContext};
pub use range::{
    check_topological_order, exclude_ancestors_of, exclude_commits_in, resolve_range, Boundary,
    OrderViolation, RangeError,
};
pub use tasks::{aggregate_tasks, Task, TaskMap};
pub use tickets::TicketExtractor;

#[cfg(test)]
pub(crate) mod test_utils;
