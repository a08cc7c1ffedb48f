//! # release-tasks
//!
//! Lists the issue-tracker tasks delivered between two points in git history.
//!
//! ## Features
//!
//! - Commit ranges against a previous release branch, commit or tag
//! - Ticket references extracted from commit messages by project key
//! - Task metadata fetched from Jira with bounded concurrency
//! - YAML or JSON reports
//!
//! ## Quick Start
//!
//! ```rust
//! use release_tasks::analysis::TicketExtractor;
//!
//! let extractor = TicketExtractor::new(["ABC"]).unwrap();
//! assert_eq!(extractor.extract("Fixes abc_42"), vec!["ABC-42"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod cli;
pub mod data;
pub mod git;
pub mod tracker;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of release-tasks.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
