//! Colored console reporting for commit runs.
//!
//! Progress lines go to stdout, errors to stderr. Logs are separate and go
//! through tracing.

use colored::Colorize;

use crate::commit::category::Category;
use crate::commit::runner::{CommitOutcome, OutcomeStatus, RunSummary};
use crate::git::client::{Identity, LogEntry};

/// One-line description of a file's outcome.
pub fn format_outcome(outcome: &CommitOutcome) -> String {
    match &outcome.status {
        OutcomeStatus::Committed => {
            let title = outcome
                .message
                .as_ref()
                .map(|m| m.title.as_str())
                .unwrap_or_default();
            format!(
                "{} {} {}",
                "[DONE]".green().bold(),
                outcome.path,
                format!("({})", title).dimmed()
            )
        }
        OutcomeStatus::NothingToCommit => {
            format!("{} {}: nothing to commit", "[SKIP]".yellow().bold(), outcome.path)
        }
        OutcomeStatus::StageFailed(reason) => format!(
            "{} {}: could not stage ({})",
            "[FAIL]".red().bold(),
            outcome.path,
            reason
        ),
        OutcomeStatus::CommitFailed(reason) => format!(
            "{} {}: commit failed ({})",
            "[FAIL]".red().bold(),
            outcome.path,
            reason
        ),
    }
}

pub fn print_outcome(outcome: &CommitOutcome) {
    println!("  {}", format_outcome(outcome));
}

/// `Name <email>`, or `None` when either half is unset.
pub fn format_identity(identity: &Identity) -> Option<String> {
    if !identity.is_complete() {
        return None;
    }
    Some(format!(
        "{} <{}>",
        identity.name.as_deref().unwrap_or_default().cyan(),
        identity.email.as_deref().unwrap_or_default()
    ))
}

pub fn print_identity(identity: &Identity) {
    match format_identity(identity) {
        Some(who) => println!("Committing as {}", who),
        None => eprintln!(
            "{} git user.name/user.email not fully configured; commits may fail",
            "[WARN]".yellow().bold()
        ),
    }
}

pub fn print_no_changes() {
    println!("{}", "No changes found. Working tree is clean.".yellow());
}

pub fn print_batch_header(count: usize, limit: usize) {
    println!(
        "{} {} file(s) (limit {})",
        "Committing".cyan().bold(),
        count,
        limit
    );
}

pub fn print_group_header(category: Category, count: usize) {
    println!();
    println!("{} ({} file(s))", category.as_str().cyan().bold(), count);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}

/// Closing counts for a run.
pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "{} committed, {} skipped, {} failed ({} attempted)",
        summary.committed(),
        summary.skipped(),
        summary.failed(),
        summary.attempted()
    )
}

pub fn print_summary(summary: &RunSummary) {
    println!();
    let line = format_summary(summary);
    if summary.failed() > 0 {
        println!("{}", line.red());
    } else if summary.committed() > 0 {
        println!("{}", line.green());
    } else {
        println!("{}", line.yellow());
    }
}

pub fn print_recent_log(entries: &[LogEntry]) {
    if entries.is_empty() {
        return;
    }
    println!();
    println!("{}", "Recent commits:".cyan().bold());
    for entry in entries {
        println!(
            "  {} {} {}",
            entry.short_id.yellow(),
            entry.summary,
            format!("({}, {})", entry.author, entry.time.format("%Y-%m-%d %H:%M")).dimmed()
        );
    }
}
