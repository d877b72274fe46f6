//! Source file discovery
//!
//! Walks the tree under a root and returns an ordered, duplicate-free list of
//! source files, pruning dotfolders and skipping the configured exclusions
//! (dependency folders, build output, minified and test files).

use crate::config::Config;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Find all source files under `root`, as paths relative to `root`
pub fn source_files(root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || (!is_hidden(e) && !is_excluded_dir(e, config)));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path().strip_prefix(root)?.to_path_buf();
        if !config.has_source_extension(&path) {
            continue;
        }
        if config.is_excluded(&path) {
            continue;
        }

        files.push(path);
    }

    Ok(files)
}

/// Dotfolders and dotfiles are never descended into or listed
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Excluded directories are pruned without descending
fn is_excluded_dir(entry: &DirEntry, config: &Config) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    config.exclude_dirs.iter().any(|d| *d == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "export function x() {}\n").unwrap();
    }

    #[test]
    fn test_discovery_is_ordered_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        touch(&root.join("src/b.ts"));
        touch(&root.join("src/a.ts"));
        touch(&root.join("src/app.test.ts"));
        touch(&root.join("src/vendor.min.js"));
        touch(&root.join("node_modules/pkg/index.js"));
        touch(&root.join(".cache/gen.ts"));
        touch(&root.join("notes.md"));

        let config = Config::default();
        let files = source_files(root, &config).unwrap();

        assert_eq!(
            files,
            vec![PathBuf::from("src/a.ts"), PathBuf::from("src/b.ts")]
        );
    }

    #[test]
    fn test_discovery_has_no_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("lib/x.jsx"));

        let config = Config::default();
        let files = source_files(root, &config).unwrap();
        assert_eq!(files.len(), 1);
    }
}
