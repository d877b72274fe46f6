//! Revision-history access
//!
//! Wraps git2 behind the small query surface the change selector consumes:
//! repository presence, commit count and the file set of a revision diff.

mod select;

pub use select::{select_changed_files, Selection};

use anyhow::{Context, Result};
use git2::{DiffOptions, Repository as GitRepo};
use std::path::{Path, PathBuf};

/// Read-only query surface over revision history
pub trait RevisionHistory {
    /// Whether the working tree is under version control
    fn is_repository(&self) -> bool;

    /// Number of commits reachable from HEAD, counting at most `limit`
    fn commit_count(&self, limit: usize) -> Result<usize>;

    /// Paths changed between two revisions, in diff order
    fn diff(&self, from: &str, to: &str) -> Result<Vec<PathBuf>>;
}

/// Git-backed revision history for a working tree
pub struct Repository {
    inner: Option<GitRepo>,
}

impl Repository {
    /// Discover the repository containing `path`; absence is not an error
    pub fn discover(path: &Path) -> Self {
        Self {
            inner: GitRepo::discover(path).ok(),
        }
    }

    fn repo(&self) -> Result<&GitRepo> {
        self.inner
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("working tree is not under version control"))
    }
}

impl RevisionHistory for Repository {
    fn is_repository(&self) -> bool {
        self.inner.is_some()
    }

    fn commit_count(&self, limit: usize) -> Result<usize> {
        let repo = self.repo()?;
        let mut walk = repo.revwalk().context("Failed to start revision walk")?;
        walk.push_head().context("Failed to push HEAD")?;
        Ok(walk.take(limit).count())
    }

    fn diff(&self, from: &str, to: &str) -> Result<Vec<PathBuf>> {
        let repo = self.repo()?;

        let from_tree = repo
            .revparse_single(from)
            .with_context(|| format!("Failed to parse revision: {}", from))?
            .peel_to_commit()
            .context("Failed to peel to commit")?
            .tree()
            .context("Failed to get tree")?;

        let to_tree = repo
            .revparse_single(to)
            .with_context(|| format!("Failed to parse revision: {}", to))?
            .peel_to_commit()
            .context("Failed to peel to commit")?
            .tree()
            .context("Failed to get tree")?;

        let mut diff_opts = DiffOptions::new();
        diff_opts.include_untracked(false);

        let diff = repo
            .diff_tree_to_tree(Some(&from_tree), Some(&to_tree), Some(&mut diff_opts))
            .context("Failed to compute diff")?;

        let mut paths = Vec::new();

        diff.foreach(
            &mut |delta, _| {
                let path = delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_path_buf());

                if let Some(path) = path {
                    paths.push(path);
                }
                true
            },
            None,
            None,
            None,
        )
        .context("Failed to iterate diff")?;

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;

    fn commit_file(repo: &GitRepo, name: &str, content: &str, message: &str) {
        let root = repo.workdir().unwrap();
        let file_path = root.join(name);
        std::fs::create_dir_all(file_path.parent().unwrap()).unwrap();
        std::fs::write(&file_path, content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("tester", "tester@example.com").unwrap();

        let parents: Vec<git2::Commit> = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap();
    }

    #[test]
    fn test_not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let history = Repository::discover(dir.path());
        assert!(!history.is_repository());
    }

    #[test]
    fn test_commit_count_and_diff() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitRepo::init(dir.path()).unwrap();

        commit_file(&git, "src/a.ts", "export function a() {}\n", "first");
        let history = Repository::discover(dir.path());
        assert!(history.is_repository());
        assert_eq!(history.commit_count(10).unwrap(), 1);

        commit_file(&git, "src/b.ts", "export function b() {}\n", "second");
        assert_eq!(history.commit_count(10).unwrap(), 2);

        let changed = history.diff("HEAD~1", "HEAD").unwrap();
        assert_eq!(changed, vec![PathBuf::from("src/b.ts")]);
    }

    #[test]
    fn test_commit_count_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitRepo::init(dir.path()).unwrap();

        commit_file(&git, "a.ts", "1\n", "one");
        commit_file(&git, "a.ts", "2\n", "two");
        commit_file(&git, "a.ts", "3\n", "three");

        let history = Repository::discover(dir.path());
        assert_eq!(history.commit_count(2).unwrap(), 2);
    }
}
