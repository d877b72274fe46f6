//! Selection of the files to document for a run
//!
//! Decides between diffing the two most recent commits and falling back to a
//! full scan, depending on what revision history is available.

use super::RevisionHistory;
use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Outcome of change selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Working tree is not under version control; full fallback set
    NoRepo(Vec<PathBuf>),
    /// Only one commit exists, nothing to diff against; full fallback set
    SingleCommit(Vec<PathBuf>),
    /// Files from the latest diff matching the source filter
    Diff(Vec<PathBuf>),
    /// The history query failed; document nothing rather than guess
    DiffFailed(String),
}

impl Selection {
    /// Files selected for this run
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Selection::NoRepo(files) => files,
            Selection::SingleCommit(files) => files,
            Selection::Diff(files) => files,
            Selection::DiffFailed(_) => &[],
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::NoRepo(files) => {
                write!(f, "no repository, full scan of {} files", files.len())
            }
            Selection::SingleCommit(files) => {
                write!(f, "single commit, full scan of {} files", files.len())
            }
            Selection::Diff(files) => write!(f, "{} changed files from latest diff", files.len()),
            Selection::DiffFailed(warning) => write!(f, "diff query failed: {}", warning),
        }
    }
}

/// Pick the set of files to document
///
/// `fallback` supplies the full file set via the usual discovery path; it is
/// only invoked when there is no prior revision to diff against.
pub fn select_changed_files<H, F>(history: &H, config: &Config, fallback: F) -> Result<Selection>
where
    H: RevisionHistory,
    F: FnOnce() -> Result<Vec<PathBuf>>,
{
    if !history.is_repository() {
        return Ok(Selection::NoRepo(fallback()?));
    }

    // History queries failing is a warning, not a fatal error: an empty
    // selection documents nothing rather than guessing at what changed.
    let count = match history.commit_count(2) {
        Ok(count) => count,
        Err(e) => return Ok(Selection::DiffFailed(e.to_string())),
    };

    if count < 2 {
        return Ok(Selection::SingleCommit(fallback()?));
    }

    match history.diff("HEAD~1", "HEAD") {
        Ok(changed) => {
            let files = changed
                .into_iter()
                .filter(|path| config.selects(path))
                .collect();
            Ok(Selection::Diff(files))
        }
        Err(e) => Ok(Selection::DiffFailed(e.to_string())),
    }
}
