//! File classification, templated messages, and one-file-per-commit runs.

pub mod category;
pub mod message;
pub mod report;
pub mod runner;
pub mod templates;

pub use category::{Category, classify};
pub use message::{CommitMessage, Picker, RandomPicker, base_name, generate};
pub use runner::{
    CommitOutcome, DEFAULT_MAX_COMMITS, OutcomeStatus, RunConfig, RunSummary, SINGLE_USAGE,
    commit_file, commit_single, group_by_category, parse_max_commits, run_auto_commits,
    run_chunked_commits,
};
pub use templates::TemplateSet;
