//! git-autocommit - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use git_autocommit::commit::{
    RandomPicker, RunConfig, RunSummary, SINGLE_USAGE, TemplateSet, commit_single,
    parse_max_commits, report, run_auto_commits, run_chunked_commits,
};
use git_autocommit::git::{GitCli, GitClient};

/// Number of history entries shown after a run.
const RECENT_LOG_LIMIT: usize = 5;

/// Commit pending files one at a time with generated messages.
#[derive(Parser, Debug)]
#[command(name = "git-autocommit")]
#[command(about = "Commit pending files one at a time with generated messages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Repository to operate on
    #[arg(short = 'C', long = "repo", default_value = ".", global = true)]
    repo: PathBuf,

    /// JSON file with title/body template overrides
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Commit up to MAX_COMMITS pending files, one commit each
    Auto {
        /// Maximum number of commits (default 10)
        max_commits: Option<String>,
    },
    /// Commit every pending file, grouped by category
    Chunked,
    /// Commit a single file
    Single {
        /// Path of the file to commit, relative to the repository root
        file: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            // Unknown commands only print usage; nothing is touched
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Usage errors never need git
    let missing_file = |file: &Option<String>| file.as_deref().is_none_or(|f| f.trim().is_empty());
    if matches!(&command, Command::Single { file } if missing_file(file)) {
        report::print_error(SINGLE_USAGE);
        return Ok(());
    }

    let templates = match &cli.templates {
        Some(path) => TemplateSet::from_json_file(path)
            .with_context(|| format!("Failed to load templates from {}", path.display()))?,
        None => TemplateSet::default(),
    };

    let git = GitCli::new(&cli.repo).context("git is required")?;
    let config = RunConfig::from_env();
    let mut picker = RandomPicker::new();

    let summary = match command {
        Command::Single { file } => {
            print_identity(&git).await;
            commit_single(&git, &templates, &mut picker, file.as_deref())
                .await
                .context("Not a git repository. Run git-autocommit from within a git repository.")?
        }
        Command::Auto { max_commits } => {
            let max_commits = parse_max_commits(max_commits.as_deref());
            print_identity(&git).await;
            run_auto_commits(&git, &templates, &mut picker, &config, max_commits)
                .await
                .context("Failed to collect changes")?
        }
        Command::Chunked => {
            print_identity(&git).await;
            run_chunked_commits(&git, &templates, &mut picker, &config)
                .await
                .context("Failed to collect changes")?
        }
    };

    finish(&git, &summary).await;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Show who commits will be attributed to. Best-effort.
async fn print_identity(git: &GitCli) {
    if !git.is_repo().await {
        return;
    }
    match git.user_identity().await {
        Ok(identity) => report::print_identity(&identity),
        Err(e) => warn!("Could not read git identity: {}", e),
    }
}

/// Print the run summary and recent history.
async fn finish(git: &GitCli, summary: &RunSummary) {
    if summary.attempted() == 0 {
        return;
    }

    report::print_summary(summary);

    if summary.committed() > 0 {
        match git.recent_log(RECENT_LOG_LIMIT).await {
            Ok(entries) => report::print_recent_log(&entries),
            Err(e) => warn!("Could not read recent history: {}", e),
        }
    }
}
