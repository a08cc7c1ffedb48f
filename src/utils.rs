//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::{
    check_git_repository, check_jira_credentials, check_tasks_command_prerequisites,
    JiraCredentialArgs,
};
pub use settings::Settings;
