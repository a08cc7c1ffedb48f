//! Issue tracker access.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod jira;

pub use error::TrackerError;
pub use jira::{JiraClient, JiraConfig};

/// Tracker metadata for a single task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    /// Display name of the user who created the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Display name of the current assignee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Workflow status name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Issue type name (Bug, Story, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    /// Name of the project the task belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// One-line summary of the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Trait for issue tracker clients.
pub trait TaskInfoProvider: Send + Sync {
    /// Returns the keys of every project visible to the client.
    fn list_project_keys(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, TrackerError>> + Send + '_>>;

    /// Fetches the details of one task.
    fn fetch_task_details<'a>(
        &'a self,
        task_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<TaskDetails, TrackerError>> + Send + 'a>>;
}
