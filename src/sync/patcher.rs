//! Marker-region splicing in the documentation file
//!
//! Regions are delimited by literal sentinel lines unique per function name.
//! Only the interior between a located pair is ever rewritten; everything
//! else in the document is preserved byte for byte.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Start sentinel for a function's region
pub fn start_marker(name: &str) -> String {
    format!("<!-- DOCS:START:{} -->", name)
}

/// End sentinel for a function's region
pub fn end_marker(name: &str) -> String {
    format!("<!-- DOCS:END:{} -->", name)
}

/// Result of applying one patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Region located and rewritten
    Patched,
    /// One or both sentinels missing; document left unmodified
    RegionNotFound,
    /// A sentinel appears more than once; document left unmodified
    DuplicateRegion,
}

/// Internal splice result carrying the rewritten document
#[derive(Debug)]
enum Splice {
    Replaced(String),
    NotFound,
    Duplicate,
}

/// Replace the interior of the named region, exclusive of the sentinels
///
/// The replacement is trimmed so re-applying identical content yields an
/// identical document.
fn splice_region(document: &str, name: &str, content: &str) -> Splice {
    let start = start_marker(name);
    let end = end_marker(name);

    let start_idx = match document.find(&start) {
        Some(idx) => idx,
        None => return Splice::NotFound,
    };
    let interior_start = start_idx + start.len();

    if document[interior_start..].contains(&start) {
        return Splice::Duplicate;
    }

    // The end sentinel must follow the start sentinel in document order
    let end_idx = match document[interior_start..].find(&end) {
        Some(rel) => interior_start + rel,
        None => return Splice::NotFound,
    };

    if document[end_idx + end.len()..].contains(&end) {
        return Splice::Duplicate;
    }

    let mut updated = String::with_capacity(document.len() + content.len());
    updated.push_str(&document[..interior_start]);
    updated.push('\n');
    updated.push_str(content.trim());
    updated.push('\n');
    updated.push_str(&document[end_idx..]);

    Splice::Replaced(updated)
}

/// Applies region patches to one document via read-modify-write
///
/// Each patch re-reads the current document before locating its region, so
/// patches against the same document must go through one patcher in sequence.
pub struct DocumentPatcher {
    path: PathBuf,
}

impl DocumentPatcher {
    /// Create a patcher for the document at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Patch the named region with new content and persist the document
    pub fn apply(&mut self, name: &str, content: &str) -> Result<PatchOutcome> {
        let document = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read document: {:?}", self.path))?;

        match splice_region(&document, name, content) {
            Splice::Replaced(updated) => {
                if updated != document {
                    std::fs::write(&self.path, updated)
                        .with_context(|| format!("Failed to write document: {:?}", self.path))?;
                }
                Ok(PatchOutcome::Patched)
            }
            Splice::NotFound => Ok(PatchOutcome::RegionNotFound),
            Splice::Duplicate => Ok(PatchOutcome::DuplicateRegion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
# API

<!-- DOCS:START:foo -->
old foo docs
<!-- DOCS:END:foo -->

<!-- DOCS:START:bar -->
old bar docs
<!-- DOCS:END:bar -->
";

    fn splice(document: &str, name: &str, content: &str) -> Splice {
        splice_region(document, name, content)
    }

    #[test]
    fn test_patch_replaces_only_the_target_interior() {
        let updated = match splice(DOC, "foo", "new foo docs") {
            Splice::Replaced(updated) => updated,
            other => panic!("unexpected splice: {:?}", other),
        };

        assert!(updated.contains("<!-- DOCS:START:foo -->\nnew foo docs\n<!-- DOCS:END:foo -->"));
        assert!(updated.contains("old bar docs"));
        assert!(!updated.contains("old foo docs"));
        assert!(updated.starts_with("# API\n"));
    }

    #[test]
    fn test_patch_is_idempotent() {
        let once = match splice(DOC, "foo", "new foo docs\n") {
            Splice::Replaced(updated) => updated,
            other => panic!("unexpected splice: {:?}", other),
        };
        let twice = match splice(&once, "foo", "new foo docs\n") {
            Splice::Replaced(updated) => updated,
            other => panic!("unexpected splice: {:?}", other),
        };

        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_region_leaves_document_alone() {
        assert!(matches!(splice(DOC, "missing", "text"), Splice::NotFound));
    }

    #[test]
    fn test_end_before_start_is_not_a_region() {
        let doc = "<!-- DOCS:END:foo -->\n<!-- DOCS:START:foo -->\n";
        assert!(matches!(splice(doc, "foo", "text"), Splice::NotFound));
    }

    #[test]
    fn test_duplicate_sentinel_is_detected() {
        let doc = "\
<!-- DOCS:START:foo -->
a
<!-- DOCS:END:foo -->
<!-- DOCS:START:foo -->
b
<!-- DOCS:END:foo -->
";
        assert!(matches!(splice(doc, "foo", "text"), Splice::Duplicate));
    }

    #[test]
    fn test_patcher_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        std::fs::write(&path, DOC).unwrap();

        let mut patcher = DocumentPatcher::new(path.clone());

        let outcome = patcher.apply("foo", "fresh docs").unwrap();
        assert_eq!(outcome, PatchOutcome::Patched);

        let first = std::fs::read_to_string(&path).unwrap();
        assert!(first.contains("fresh docs"));
        assert!(first.contains("old bar docs"));

        // Second application of the same content changes nothing
        patcher.apply("foo", "fresh docs").unwrap();
        let second = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);

        let outcome = patcher.apply("missing", "text").unwrap();
        assert_eq!(outcome, PatchOutcome::RegionNotFound);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), second);
    }
}
