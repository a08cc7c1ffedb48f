//! Git history errors.

use thiserror::Error;

/// Failures raised by the history provider.
#[derive(Error, Debug)]
pub enum GitError {
    /// The requested branch or revision does not exist.
    #[error("Branch '{0}' does not exist")]
    BranchNotFound(String),

    /// The requested tag does not exist.
    #[error("Tag '{0}' does not exist")]
    TagNotFound(String),

    /// HEAD does not point at a branch.
    #[error("Repository is in detached HEAD state")]
    DetachedHead,
}
