//! Issue tracker errors.

use thiserror::Error;

/// Failures raised while talking to the issue tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Tracker credentials are missing from arguments, environment and settings.
    #[error("Jira credentials not found. Set JIRA_HOST, JIRA_USER and JIRA_PASSWORD (or JIRA_API_TOKEN)")]
    CredentialsNotFound,

    /// The tracker host could not be turned into a base URL.
    #[error("Invalid Jira host '{0}'")]
    InvalidHost(String),

    /// The requested task does not exist.
    #[error("Task {0} not found")]
    NotFound(String),

    /// The tracker rejected the credentials.
    #[error("Jira rejected the credentials (HTTP {0})")]
    Unauthorized(u16),

    /// The tracker answered with an unexpected HTTP status.
    #[error("Jira API request failed: {0}")]
    ApiRequestFailed(String),

    /// The response body could not be decoded.
    #[error("Invalid response format from Jira API: {0}")]
    InvalidResponseFormat(String),

    /// Network connectivity error.
    #[error("Network error: {0}")]
    NetworkError(String),
}
