//! Commit orchestration: stage, verify, commit, and report each file.
//!
//! Every mode runs strictly one file at a time so each commit contains only
//! its own file. Per-file failures are reported and skipped; only a failed
//! repository check or change listing aborts a run.

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::commit::category::{Category, classify};
use crate::commit::message::{CommitMessage, Picker, generate};
use crate::commit::report;
use crate::commit::templates::TemplateSet;
use crate::error::{CommitError, GitError};
use crate::git::changes::collect_changes;
use crate::git::client::GitClient;

/// Number of files committed by `auto` when no limit is given.
pub const DEFAULT_MAX_COMMITS: usize = 10;

/// Reported when `single` is run without a path.
pub const SINGLE_USAGE: &str = "Please specify a file: git-autocommit single <file>";

const DEFAULT_COMMIT_DELAY_MS: u64 = 500;
const DEFAULT_CHUNK_DELAY_MS: u64 = 1000;

/// Environment variable overriding the pause between flat-mode commits.
const COMMIT_DELAY_ENV_VAR: &str = "AUTOCOMMIT_DELAY_MS";

/// Environment variable overriding the pause between grouped-mode commits.
const CHUNK_DELAY_ENV_VAR: &str = "AUTOCOMMIT_CHUNK_DELAY_MS";

/// Pacing for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub commit_delay: Duration,
    pub chunk_delay: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            commit_delay: Duration::from_millis(DEFAULT_COMMIT_DELAY_MS),
            chunk_delay: Duration::from_millis(DEFAULT_CHUNK_DELAY_MS),
        }
    }
}

impl RunConfig {
    /// Read delays from the environment, falling back to the defaults.
    pub fn from_env() -> Self {
        Self {
            commit_delay: delay_from_env(COMMIT_DELAY_ENV_VAR, DEFAULT_COMMIT_DELAY_MS),
            chunk_delay: delay_from_env(CHUNK_DELAY_ENV_VAR, DEFAULT_CHUNK_DELAY_MS),
        }
    }

    /// No pauses between commits.
    pub fn immediate() -> Self {
        Self {
            commit_delay: Duration::ZERO,
            chunk_delay: Duration::ZERO,
        }
    }
}

/// Logs a warning and uses the default if the variable is set but invalid.
fn delay_from_env(var: &str, default_ms: u64) -> Duration {
    match env::var(var) {
        Ok(v) if !v.is_empty() => match v.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!("Invalid {} value '{}', using default {}ms", var, v, default_ms);
                Duration::from_millis(default_ms)
            }
        },
        _ => Duration::from_millis(default_ms),
    }
}

/// Parse the `auto` limit leniently: missing or non-numeric means the default.
pub fn parse_max_commits(raw: Option<&str>) -> usize {
    match raw.map(str::trim) {
        Some(s) => s.parse::<usize>().unwrap_or_else(|_| {
            warn!("Invalid commit limit '{}', using {}", s, DEFAULT_MAX_COMMITS);
            DEFAULT_MAX_COMMITS
        }),
        None => DEFAULT_MAX_COMMITS,
    }
}

/// How a single file's stage, verify, commit sequence ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Committed,
    NothingToCommit,
    StageFailed(String),
    CommitFailed(String),
}

impl From<CommitError> for OutcomeStatus {
    fn from(err: CommitError) -> Self {
        match err {
            CommitError::StageFailed { reason, .. } => Self::StageFailed(reason),
            CommitError::NothingToCommit(_) => Self::NothingToCommit,
            CommitError::CommitFailed { reason, .. } => Self::CommitFailed(reason),
        }
    }
}

/// Result of processing one file.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub path: String,
    pub category: Category,
    pub status: OutcomeStatus,
    /// The message committed with; `None` unless the commit succeeded.
    pub message: Option<CommitMessage>,
}

impl CommitOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == OutcomeStatus::Committed
    }
}

/// Every outcome of a run, in processing order.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<CommitOutcome>,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn committed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    /// Files that had nothing staged after `git add`.
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::NothingToCommit)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.committed() - self.skipped()
    }
}

/// Group paths by category. Iteration follows category enumeration order;
/// paths keep their collected order within a group.
pub fn group_by_category(files: &[String]) -> BTreeMap<Category, Vec<String>> {
    let mut groups: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    for path in files {
        groups.entry(classify(path)).or_default().push(path.clone());
    }
    groups
}

/// Stage one path, verify it is staged, and commit it alone.
///
/// Never fails: every error becomes the outcome's status.
pub async fn commit_file<G, P>(
    git: &G,
    templates: &TemplateSet,
    picker: &mut P,
    path: &str,
) -> CommitOutcome
where
    G: GitClient + ?Sized,
    P: Picker,
{
    let category = classify(path);
    debug!("Processing {} as {}", path, category);

    match try_commit_file(git, templates, picker, category, path).await {
        Ok(message) => CommitOutcome {
            path: path.to_string(),
            category,
            status: OutcomeStatus::Committed,
            message: Some(message),
        },
        Err(err) => {
            warn!("{}", err);
            CommitOutcome {
                path: path.to_string(),
                category,
                status: err.into(),
                message: None,
            }
        }
    }
}

async fn try_commit_file<G, P>(
    git: &G,
    templates: &TemplateSet,
    picker: &mut P,
    category: Category,
    path: &str,
) -> Result<CommitMessage, CommitError>
where
    G: GitClient + ?Sized,
    P: Picker,
{
    let stage_failed = |e: GitError| CommitError::StageFailed {
        path: path.to_string(),
        reason: e.to_string(),
    };

    git.stage_path(path).await.map_err(stage_failed)?;

    let staged = git.list_staged().await.map_err(stage_failed)?;
    if !staged.iter().any(|s| s == path) {
        return Err(CommitError::NothingToCommit(path.to_string()));
    }

    let message = generate(templates, picker, category, path);
    git.commit(&message.format(), path)
        .await
        .map_err(|e| CommitError::CommitFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    info!("Committed {}: {}", path, message.title);
    Ok(message)
}

/// Flat mode: commit up to `max_commits` collected files, one per commit.
pub async fn run_auto_commits<G, P>(
    git: &G,
    templates: &TemplateSet,
    picker: &mut P,
    config: &RunConfig,
    max_commits: usize,
) -> Result<RunSummary, GitError>
where
    G: GitClient + ?Sized,
    P: Picker,
{
    let files = collect_changes(git).await?;
    let mut summary = RunSummary::default();

    if files.is_empty() {
        report::print_no_changes();
        return Ok(summary);
    }

    let batch: Vec<String> = files.into_iter().take(max_commits).collect();
    report::print_batch_header(batch.len(), max_commits);

    for (idx, path) in batch.iter().enumerate() {
        let outcome = commit_file(git, templates, picker, path).await;
        report::print_outcome(&outcome);

        let more_remaining = idx + 1 < batch.len();
        if outcome.succeeded() && more_remaining {
            pause(config.commit_delay).await;
        }
        summary.outcomes.push(outcome);
    }

    Ok(summary)
}

/// Grouped mode: commit every collected file, category by category.
pub async fn run_chunked_commits<G, P>(
    git: &G,
    templates: &TemplateSet,
    picker: &mut P,
    config: &RunConfig,
) -> Result<RunSummary, GitError>
where
    G: GitClient + ?Sized,
    P: Picker,
{
    let files = collect_changes(git).await?;
    let mut summary = RunSummary::default();

    if files.is_empty() {
        report::print_no_changes();
        return Ok(summary);
    }

    let total = files.len();
    let groups = group_by_category(&files);
    debug!("Grouped {} files into {} categories", total, groups.len());

    for (category, paths) in &groups {
        report::print_group_header(*category, paths.len());

        for path in paths {
            let outcome = commit_file(git, templates, picker, path).await;
            report::print_outcome(&outcome);

            let more_remaining = summary.attempted() + 1 < total;
            if outcome.succeeded() && more_remaining {
                pause(config.chunk_delay).await;
            }
            summary.outcomes.push(outcome);
        }
    }

    Ok(summary)
}

/// Single mode: commit exactly one user-specified path.
///
/// A missing path is reported and nothing touches git. A path that does not
/// name a file inside the working tree is reported as a stage failure.
pub async fn commit_single<G, P>(
    git: &G,
    templates: &TemplateSet,
    picker: &mut P,
    file: Option<&str>,
) -> Result<RunSummary, GitError>
where
    G: GitClient + ?Sized,
    P: Picker,
{
    let Some(file) = file.map(str::trim).filter(|f| !f.is_empty()) else {
        report::print_error(SINGLE_USAGE);
        return Ok(RunSummary::default());
    };

    if !git.is_repo().await {
        return Err(GitError::NotARepository(
            "run git-autocommit from inside a git working tree".into(),
        ));
    }

    let outcome = match git.resolve_path(file).await {
        Ok(path) => commit_file(git, templates, picker, &path).await,
        Err(e) => {
            warn!("Rejected {}: {}", file, e);
            CommitOutcome {
                path: file.to_string(),
                category: classify(file),
                status: OutcomeStatus::StageFailed(e.to_string()),
                message: None,
            }
        }
    };
    report::print_outcome(&outcome);

    Ok(RunSummary {
        outcomes: vec![outcome],
    })
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
