//! Filename search over the library directory.

use filebot_error::{FilebotResult, LibraryError};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Outcome of a library search.
///
/// An empty `matches` list is the normal "nothing found" answer, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Query tokens as they were matched, joined by single spaces
    pub query: String,
    /// Matching files, relative to the search root, in walk order
    pub matches: Vec<PathBuf>,
}

impl SearchResult {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matches sorted for presentation.
    pub fn sorted(&self) -> Vec<PathBuf> {
        let mut sorted = self.matches.clone();
        sorted.sort();
        sorted
    }
}

/// Lowercase, trim and drop empty tokens.
pub fn normalize_query<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|t| t.as_ref().split_whitespace())
        .map(str::to_lowercase)
        .collect()
}

/// Find every file under `root` whose name contains all `tokens`.
///
/// Matching is case-insensitive and applies to the file name only, not to
/// the directories above it. Entries that cannot be read below the root are
/// skipped. An empty query matches nothing.
///
/// # Errors
///
/// Returns a [`LibraryError`] when `root` is missing, is not a directory, or
/// cannot be listed.
#[instrument(skip(tokens, root), fields(root = %root.as_ref().display()))]
pub fn locate<S: AsRef<str>>(tokens: &[S], root: impl AsRef<Path>) -> FilebotResult<SearchResult> {
    let root = root.as_ref();
    let needles = normalize_query(tokens);
    let query = needles.join(" ");

    let metadata = std::fs::metadata(root)
        .map_err(|e| LibraryError::new(root.display().to_string(), e.to_string()))?;
    if !metadata.is_dir() {
        return Err(LibraryError::new(root.display().to_string(), "not a directory").into());
    }

    if needles.is_empty() {
        debug!("Empty query, nothing to match");
        return Ok(SearchResult {
            query,
            matches: Vec::new(),
        });
    }

    let mut matches = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(LibraryError::new(root.display().to_string(), e.to_string()).into());
            }
            Err(e) => {
                debug!(error = %e, "Skipping unreadable library entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        if needles.iter().all(|needle| name.contains(needle.as_str())) {
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf();
            matches.push(relative);
        }
    }

    debug!(query = %query, count = matches.len(), "Library search finished");
    Ok(SearchResult { query, matches })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(
            normalize_query(&["  Alice ", "TRIP", ""]),
            vec!["alice".to_string(), "trip".to_string()]
        );
        assert_eq!(normalize_query(&["bob smith"]), vec!["bob", "smith"]);
        assert!(normalize_query::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_sorted_does_not_reorder_original() {
        let result = SearchResult {
            query: "x".into(),
            matches: vec![PathBuf::from("b.jpg"), PathBuf::from("a.jpg")],
        };
        assert_eq!(
            result.sorted(),
            vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]
        );
        assert_eq!(result.matches[0], PathBuf::from("b.jpg"));
    }
}
