//! Change-set collection from the working tree.

use std::collections::HashSet;

use tracing::debug;

use crate::error::GitError;
use crate::git::client::GitClient;

/// Version-control metadata directory, never committed.
const GIT_DIR_PREFIX: &str = ".git/";

/// Collect every file with pending changes, modified files first.
///
/// Merges tracked-but-modified files with untracked (non-ignored) files,
/// removes duplicates keeping the first occurrence, and drops anything under
/// `.git/`. A failed repository check or listing is returned as-is; callers
/// treat it as fatal before processing any file.
pub async fn collect_changes<G: GitClient + ?Sized>(git: &G) -> Result<Vec<String>, GitError> {
    if !git.is_repo().await {
        return Err(GitError::NotARepository(
            "run git-autocommit from inside a git working tree".into(),
        ));
    }

    let modified = git.list_modified().await?;
    let untracked = git.list_untracked().await?;
    debug!(
        "Found {} modified and {} untracked files",
        modified.len(),
        untracked.len()
    );

    let mut seen = HashSet::new();
    let files = modified
        .into_iter()
        .chain(untracked)
        .filter(|path| !is_git_metadata(path))
        .filter(|path| seen.insert(path.clone()))
        .collect();

    Ok(files)
}

fn is_git_metadata(path: &str) -> bool {
    path == ".git" || path.starts_with(GIT_DIR_PREFIX) || path.contains("/.git/")
}
