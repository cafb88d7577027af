//! Error types for git-autocommit modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {0}")]
    NotARepository(String),

    #[error("git executable not found on PATH. Install git and try again.")]
    GitNotInstalled,

    #[error("Failed to open repository: {0}")]
    Open(#[source] git2::Error),

    #[error("Failed to read working tree status: {0}")]
    Status(#[source] git2::Error),

    #[error("Failed to read git config: {0}")]
    Config(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    Log(#[source] git2::Error),

    #[error("Failed to spawn git process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },
}

/// Per-file errors from the stage, verify, commit sequence.
///
/// None of these abort a run; each becomes a reported skip.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to stage {path}: {reason}")]
    StageFailed { path: String, reason: String },

    #[error("Nothing to commit for {0}")]
    NothingToCommit(String),

    #[error("Failed to commit {path}: {reason}")]
    CommitFailed { path: String, reason: String },
}

/// Errors from loading commit message templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to parse template file: {0}")]
    ParseFailed(#[source] serde_json::Error),

    #[error("Template pool '{0}' is empty")]
    EmptyPool(String),

    #[error("Title template for '{category}' has no {{name}} placeholder: {template}")]
    MissingPlaceholder { category: String, template: String },
}
