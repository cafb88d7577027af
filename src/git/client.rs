//! The version-control collaborator used by the commit pipeline.
//!
//! Reads (repository presence, status, identity, history) go through git2.
//! Mutations shell out to the system `git` binary so the user's hooks,
//! config, and credential setup apply to every commit.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use git2::{ErrorCode, Repository, Status, StatusOptions};
use tokio::process::Command;
use tracing::debug;

use crate::error::GitError;

/// Configured committer identity. Either half may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.email.is_some()
    }
}

/// One commit of recent history, for display.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub short_id: String,
    pub summary: String,
    pub author: String,
    pub time: DateTime<Utc>,
}

/// Narrow interface over the version-control system.
///
/// This abstraction allows the collector and the commit runner to be tested
/// against an in-memory fake or a mock instead of a real repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitClient: Send + Sync {
    /// Whether the configured path is inside a non-bare repository.
    async fn is_repo(&self) -> bool;

    /// Tracked files with unstaged modifications (including deletions).
    async fn list_modified(&self) -> Result<Vec<String>, GitError>;

    /// Untracked files not excluded by ignore rules.
    async fn list_untracked(&self) -> Result<Vec<String>, GitError>;

    async fn user_identity(&self) -> Result<Identity, GitError>;

    /// Turn a user-supplied path into the repository-relative form git
    /// reports (`/`-separated, no `.` or `..` segments).
    ///
    /// Fails with [`GitError::InvalidPath`] for the root itself, a directory,
    /// or anything outside the working tree.
    async fn resolve_path(&self, path: &str) -> Result<String, GitError>;

    /// Stage a single path (`git add -- <path>`).
    async fn stage_path(&self, path: &str) -> Result<(), GitError>;

    /// Paths currently staged relative to HEAD.
    async fn list_staged(&self) -> Result<Vec<String>, GitError>;

    /// Commit only `path` with the given message.
    async fn commit(&self, message: &str, path: &str) -> Result<(), GitError>;

    /// Most recent commits reachable from HEAD, newest first.
    async fn recent_log(&self, limit: usize) -> Result<Vec<LogEntry>, GitError>;
}

/// Production client: git2 for reads, the `git` binary for writes.
pub struct GitCli {
    path: PathBuf,
}

impl GitCli {
    /// Create a client for the repository containing `path`.
    ///
    /// Fails with [`GitError::GitNotInstalled`] when no `git` executable is
    /// on `PATH`, since every mutation needs it.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, GitError> {
        if which::which("git").is_err() {
            return Err(GitError::GitNotInstalled);
        }
        Ok(Self { path: path.into() })
    }

    fn open(&self) -> Result<Repository, GitError> {
        Repository::discover(&self.path).map_err(GitError::Open)
    }

    fn workdir(&self) -> Result<PathBuf, GitError> {
        let repo = self.open()?;
        repo.workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitError::NotARepository("bare repositories are not supported".into()))
    }

    fn status_paths(&self, untracked: bool, wanted: Status) -> Result<Vec<String>, GitError> {
        let repo = self.open()?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(untracked)
            .recurse_untracked_dirs(untracked)
            .include_ignored(false);

        let statuses = repo.statuses(Some(&mut opts)).map_err(GitError::Status)?;
        Ok(statuses
            .iter()
            .filter(|entry| entry.status().intersects(wanted))
            .filter_map(|entry| entry.path().map(String::from))
            .collect())
    }

    /// Run `git -C <workdir> <args>` and return stdout.
    async fn run_git(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        let workdir = self.workdir()?;
        debug!("Running git {} in {}", args.join(" "), workdir.display());

        let output = Command::new("git")
            .arg("-C")
            .arg(&workdir)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(GitError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            // git commit reports "nothing to commit" on stdout
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                stderr: detail.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Strip the working tree prefix from an absolute path.
    fn strip_workdir(workdir: &Path, absolute: &Path) -> Option<PathBuf> {
        if let Ok(rel) = absolute.strip_prefix(workdir) {
            return Some(rel.to_path_buf());
        }
        // workdir may be reported through a symlinked temp dir or vice versa
        let canonical = std::fs::canonicalize(workdir).ok()?;
        if let Ok(rel) = absolute.strip_prefix(&canonical) {
            return Some(rel.to_path_buf());
        }
        let parent = std::fs::canonicalize(absolute.parent()?).ok()?;
        let rel = parent.strip_prefix(&canonical).ok()?;
        Some(rel.join(absolute.file_name()?))
    }
}

/// Collapse `.` and `..` segments of a relative path without touching the
/// filesystem. Returns `None` when the path climbs above its starting point.
fn normalize_lexically(path: &Path) -> Option<Vec<&OsStr>> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::Normal(part) => parts.push(part),
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts)
}

#[async_trait]
impl GitClient for GitCli {
    async fn is_repo(&self) -> bool {
        self.open().map(|repo| !repo.is_bare()).unwrap_or(false)
    }

    async fn list_modified(&self) -> Result<Vec<String>, GitError> {
        self.status_paths(
            false,
            Status::WT_MODIFIED | Status::WT_DELETED | Status::WT_TYPECHANGE | Status::WT_RENAMED,
        )
    }

    async fn list_untracked(&self) -> Result<Vec<String>, GitError> {
        self.status_paths(true, Status::WT_NEW)
    }

    async fn user_identity(&self) -> Result<Identity, GitError> {
        let repo = self.open()?;
        let config = repo.config().map_err(GitError::Config)?;
        Ok(Identity {
            name: config.get_string("user.name").ok(),
            email: config.get_string("user.email").ok(),
        })
    }

    async fn resolve_path(&self, path: &str) -> Result<String, GitError> {
        let invalid = |reason: &str| GitError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let workdir = self.workdir()?;
        let requested = Path::new(path);
        let relative = if requested.is_absolute() {
            Self::strip_workdir(&workdir, requested)
                .ok_or_else(|| invalid("outside the repository"))?
        } else {
            requested.to_path_buf()
        };

        let parts =
            normalize_lexically(&relative).ok_or_else(|| invalid("outside the repository"))?;
        if parts.is_empty() {
            return Err(invalid("is the repository root"));
        }
        if parts[0] == ".git" {
            return Err(invalid("inside the .git directory"));
        }

        let resolved = parts
            .iter()
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if workdir.join(&resolved).is_dir() {
            return Err(invalid("is a directory"));
        }

        debug!("Resolved {} to {}", path, resolved);
        Ok(resolved)
    }

    async fn stage_path(&self, path: &str) -> Result<(), GitError> {
        self.run_git(&["add", "--", path], "add").await.map(|_| ())
    }

    async fn list_staged(&self) -> Result<Vec<String>, GitError> {
        let stdout = self
            .run_git(&["diff", "--cached", "--name-only", "-z"], "diff --cached")
            .await?;
        Ok(stdout
            .split('\0')
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect())
    }

    async fn commit(&self, message: &str, path: &str) -> Result<(), GitError> {
        self.run_git(&["commit", "-m", message, "--", path], "commit")
            .await
            .map(|_| ())
    }

    async fn recent_log(&self, limit: usize) -> Result<Vec<LogEntry>, GitError> {
        let repo = self.open()?;

        match repo.head() {
            Ok(_) => {}
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(GitError::Log(e)),
        }

        let mut revwalk = repo.revwalk().map_err(GitError::Log)?;
        revwalk.push_head().map_err(GitError::Log)?;

        let mut entries = Vec::new();
        for oid in revwalk.take(limit) {
            let oid = oid.map_err(GitError::Log)?;
            let commit = repo.find_commit(oid).map_err(GitError::Log)?;
            let id = oid.to_string();
            let time = Utc
                .timestamp_opt(commit.time().seconds(), 0)
                .single()
                .unwrap_or_else(Utc::now);

            entries.push(LogEntry {
                short_id: id[..7.min(id.len())].to_string(),
                summary: commit.summary().unwrap_or("").to_string(),
                author: commit.author().name().unwrap_or("unknown").to_string(),
                time,
            });
        }

        Ok(entries)
    }
}
