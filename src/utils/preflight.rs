//! Preflight validation checks for early failure detection
//!
//! Commands call these before touching history or the tracker so that a
//! missing repository or incomplete credentials fail fast with a clear
//! message.

use std::path::Path;

use anyhow::{Context, Result};

use crate::tracker::{JiraConfig, TrackerError};
use crate::utils::settings::Settings;

/// Environment variables holding the Jira host.
pub const JIRA_HOST_VARS: &[&str] = &["JIRA_HOST"];
/// Environment variables holding the Jira user.
pub const JIRA_USER_VARS: &[&str] = &["JIRA_USER"];
/// Environment variables holding the Jira password, in order of preference.
pub const JIRA_PASSWORD_VARS: &[&str] = &["JIRA_PASSWORD", "JIRA_API_TOKEN"];

/// Jira credentials given on the command line, each optional.
#[derive(Debug, Clone, Default)]
pub struct JiraCredentialArgs {
    /// Jira host.
    pub host: Option<String>,
    /// Jira user.
    pub user: Option<String>,
    /// Jira password or API token.
    pub password: Option<String>,
}

/// Validate we're pointed at a valid git repository
///
/// This is a lightweight check that opens the repository without
/// loading any commit data.
pub fn check_git_repository(path: &Path) -> Result<()> {
    crate::git::GitRepository::open_at(path).with_context(|| {
        format!(
            "'{}' is not a git repository. Use --repository to point at one.",
            path.display()
        )
    })?;
    Ok(())
}

/// Resolve Jira credentials before any tracker request is made
///
/// Each value comes from the command line first, then the environment,
/// then the settings file.
pub fn check_jira_credentials(args: &JiraCredentialArgs) -> Result<JiraConfig> {
    let settings = Settings::load()?;
    resolve_jira_config(args, &settings).map_err(Into::into)
}

/// Combined preflight check for the tasks command
///
/// Validates:
/// - Git repository access
/// - Jira credentials
pub fn check_tasks_command_prerequisites(
    repository: &Path,
    args: &JiraCredentialArgs,
) -> Result<JiraConfig> {
    check_git_repository(repository)?;
    check_jira_credentials(args)
}

fn resolve_jira_config(
    args: &JiraCredentialArgs,
    settings: &Settings,
) -> Result<JiraConfig, TrackerError> {
    let pick = |arg: &Option<String>, keys: &[&str]| {
        arg.clone()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| settings.get_any_env_var(keys))
    };

    match (
        pick(&args.host, JIRA_HOST_VARS),
        pick(&args.user, JIRA_USER_VARS),
        pick(&args.password, JIRA_PASSWORD_VARS),
    ) {
        (Some(host), Some(user), Some(password)) => Ok(JiraConfig {
            host,
            user,
            password,
        }),
        _ => Err(TrackerError::CredentialsNotFound),
    }
}
