//! git-autocommit - turn a dirty working tree into one-file-per-commit history.
//!
//! # Overview
//!
//! git-autocommit collects modified and untracked files, classifies each path
//! into a [`Category`], generates a templated commit message for it, and
//! commits the files one at a time, reporting the outcome of every file.

pub mod commit;
pub mod error;
pub mod git;

// Re-export commonly used types
pub use commit::{
    Category, CommitMessage, CommitOutcome, OutcomeStatus, RunConfig, RunSummary, TemplateSet,
};
pub use error::{CommitError, GitError, TemplateError};
pub use git::{GitCli, GitClient, LogEntry};
