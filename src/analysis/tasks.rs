//! Grouping of commits by the tickets they reference.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::analysis::TicketExtractor;
use crate::git::CommitInfo;
use crate::tracker::TaskDetails;

/// An issue-tracker task and the commits that mention it.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    /// Normalized ticket identifier such as `ABC-123`.
    pub task_id: String,
    /// Commits referencing this task, once per mention, in scan order.
    pub commits: Vec<CommitInfo>,
    /// Tracker metadata, absent until enrichment succeeds.
    pub details: Option<TaskDetails>,
}

impl Task {
    fn new(task_id: String) -> Self {
        Self {
            task_id,
            commits: Vec::new(),
            details: None,
        }
    }
}

/// Tasks keyed by identifier, iterated in first-encounter order.
#[derive(Debug, Clone, Default)]
pub struct TaskMap {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
}

impl TaskMap {
    /// Creates an empty task map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the task with the given id, creating it if needed.
    pub fn get_or_insert(&mut self, task_id: &str) -> &mut Task {
        let position = match self.index.get(task_id) {
            Some(&position) => position,
            None => {
                self.tasks.push(Task::new(task_id.to_string()));
                let position = self.tasks.len() - 1;
                self.index.insert(task_id.to_string(), position);
                position
            }
        };
        &mut self.tasks[position]
    }

    /// Returns the task with the given id.
    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.index.get(task_id).and_then(|&i| self.tasks.get(i))
    }

    /// Number of distinct tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true when no task has been recorded.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates over tasks in first-encounter order.
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Iterates mutably over tasks in first-encounter order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Task> {
        self.tasks.iter_mut()
    }

    /// Consumes the map, returning tasks in first-encounter order.
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

impl<'a> IntoIterator for &'a TaskMap {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Groups `commits` by the tickets their messages reference.
///
/// A commit is appended to a task once for every mention the extractor
/// returns, so a message naming the same ticket twice contributes two
/// entries.
pub fn aggregate_tasks(commits: &[CommitInfo], extractor: &TicketExtractor) -> TaskMap {
    let mut tasks = TaskMap::new();

    for commit in commits {
        for ticket in extractor.extract(&commit.message) {
            tasks.get_or_insert(&ticket).commits.push(commit.clone());
        }
    }

    debug!(
        commit_count = commits.len(),
        task_count = tasks.len(),
        "Aggregated commits into tasks"
    );

    tasks
}
