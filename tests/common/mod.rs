//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use git2::{Oid, Repository, Signature};

use git_autocommit::commit::Picker;
use git_autocommit::git::{GitClient, Identity, LogEntry};
use git_autocommit::GitError;

/// Picker that always takes the first option.
pub struct FirstPicker;

impl Picker for FirstPicker {
    fn pick<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
        options.first()
    }
}

#[derive(Default)]
struct FakeState {
    modified: Vec<String>,
    untracked: Vec<String>,
    staged: Vec<String>,
    commits: Vec<(String, String)>,
    ops: Vec<String>,
    fail_stage: HashSet<String>,
    fail_commit: HashSet<String>,
    never_staged: HashSet<String>,
}

/// In-memory git implementing the same interface as the real client.
pub struct FakeGit {
    is_repo: bool,
    state: Mutex<FakeState>,
}

impl FakeGit {
    pub fn new(modified: &[&str], untracked: &[&str]) -> Self {
        let state = FakeState {
            modified: modified.iter().map(|s| s.to_string()).collect(),
            untracked: untracked.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        Self {
            is_repo: true,
            state: Mutex::new(state),
        }
    }

    pub fn not_a_repo() -> Self {
        Self {
            is_repo: false,
            state: Mutex::new(FakeState::default()),
        }
    }

    /// `git add` for this path fails.
    pub fn fail_stage(self, path: &str) -> Self {
        self.state.lock().unwrap().fail_stage.insert(path.to_string());
        self
    }

    /// `git commit` for this path fails.
    pub fn fail_commit(self, path: &str) -> Self {
        self.state.lock().unwrap().fail_commit.insert(path.to_string());
        self
    }

    /// `git add` succeeds but leaves nothing staged for this path.
    pub fn never_staged(self, path: &str) -> Self {
        self.state.lock().unwrap().never_staged.insert(path.to_string());
        self
    }

    /// Committed (message, path) pairs in order.
    pub fn commits(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().commits.clone()
    }

    pub fn committed_paths(&self) -> Vec<String> {
        self.commits().into_iter().map(|(_, path)| path).collect()
    }

    /// Every recorded operation, e.g. `"add app.ts"`.
    pub fn ops(&self) -> Vec<String> {
        self.state.lock().unwrap().ops.clone()
    }

    pub fn count_ops(&self, prefix: &str) -> usize {
        self.ops().iter().filter(|op| op.starts_with(prefix)).count()
    }

    fn record(&self, op: String) {
        self.state.lock().unwrap().ops.push(op);
    }
}

#[async_trait]
impl GitClient for FakeGit {
    async fn is_repo(&self) -> bool {
        self.record("is_repo".into());
        self.is_repo
    }

    async fn list_modified(&self) -> Result<Vec<String>, GitError> {
        self.record("list_modified".into());
        Ok(self.state.lock().unwrap().modified.clone())
    }

    async fn list_untracked(&self) -> Result<Vec<String>, GitError> {
        self.record("list_untracked".into());
        Ok(self.state.lock().unwrap().untracked.clone())
    }

    async fn user_identity(&self) -> Result<Identity, GitError> {
        Ok(Identity {
            name: Some("Test User".into()),
            email: Some("test@example.com".into()),
        })
    }

    async fn resolve_path(&self, path: &str) -> Result<String, GitError> {
        self.record(format!("resolve {}", path));
        let resolved = path.trim_start_matches("./");
        if resolved.is_empty() || resolved.ends_with('/') {
            return Err(GitError::InvalidPath {
                path: path.to_string(),
                reason: "is a directory".into(),
            });
        }
        Ok(resolved.to_string())
    }

    async fn stage_path(&self, path: &str) -> Result<(), GitError> {
        self.record(format!("add {}", path));
        let mut state = self.state.lock().unwrap();
        if state.fail_stage.contains(path) {
            return Err(GitError::CommandFailed {
                operation: "add".into(),
                stderr: format!("fatal: pathspec '{}' did not match any files", path),
            });
        }
        if !state.never_staged.contains(path) && !state.staged.iter().any(|s| s == path) {
            state.staged.push(path.to_string());
        }
        Ok(())
    }

    async fn list_staged(&self) -> Result<Vec<String>, GitError> {
        self.record("diff --cached".into());
        Ok(self.state.lock().unwrap().staged.clone())
    }

    async fn commit(&self, message: &str, path: &str) -> Result<(), GitError> {
        self.record(format!("commit {}", path));
        let mut state = self.state.lock().unwrap();
        if state.fail_commit.contains(path) {
            return Err(GitError::CommandFailed {
                operation: "commit".into(),
                stderr: "pre-commit hook rejected the commit".into(),
            });
        }
        state.staged.retain(|s| s != path);
        state.modified.retain(|s| s != path);
        state.untracked.retain(|s| s != path);
        state.commits.push((message.to_string(), path.to_string()));
        Ok(())
    }

    async fn recent_log(&self, limit: usize) -> Result<Vec<LogEntry>, GitError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .commits
            .iter()
            .rev()
            .take(limit)
            .enumerate()
            .map(|(idx, (message, _))| LogEntry {
                short_id: format!("{:07x}", idx),
                summary: message.lines().next().unwrap_or("").to_string(),
                author: "Test User".into(),
                time: Utc::now(),
            })
            .collect())
    }
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new repository with a configured identity and one commit.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config.set_str("user.name", "Test User").expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");
        config
            .set_bool("commit.gpgsign", false)
            .expect("Failed to disable signing");

        let test_repo = Self { dir, repo };
        test_repo.write("README.md", "# test\n");
        test_repo.commit_all("chore: initial commit");
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the repository root, creating directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(path, content).expect("Failed to write test file");
    }

    /// Stage everything and commit it. Returns the commit OID.
    pub fn commit_all(&self, message: &str) -> Oid {
        let sig =
            Signature::now("Test User", "test@example.com").expect("Failed to create signature");

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .expect("Failed to add files");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Number of commits reachable from HEAD.
    pub fn commit_count(&self) -> usize {
        let mut revwalk = self.repo.revwalk().expect("Failed to create revwalk");
        revwalk.push_head().expect("Failed to push HEAD");
        revwalk.count()
    }

    /// Paths changed by the HEAD commit relative to its parent.
    pub fn head_changed_paths(&self) -> Vec<String> {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        let parent_tree = head.parent(0).ok().map(|p| p.tree().unwrap());
        let diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&head.tree().unwrap()), None)
            .unwrap();
        diff.deltas()
            .filter_map(|d| d.new_file().path().map(|p| p.to_string_lossy().to_string()))
            .collect()
    }
}
