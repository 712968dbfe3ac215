//! Library statistics for the `/stats` command.

use derive_getters::Getters;
use filebot_error::{FilebotResult, LibraryError};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Summary of the files under a library root.
///
/// Files are grouped by their leading name token: the file stem up to the
/// first `_`, lowercased. `alice_trip.jpg` and `Alice_beach.png` both count
/// towards `alice`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct LibraryStats {
    total_files: usize,
    total_bytes: u64,
    by_name: BTreeMap<String, usize>,
}

impl LibraryStats {
    /// Walk `root` once and collect statistics.
    ///
    /// # Errors
    ///
    /// Returns a [`LibraryError`] if `root` is not a readable directory.
    #[instrument(skip(root), fields(root = %root.as_ref().display()))]
    pub fn collect(root: impl AsRef<Path>) -> FilebotResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(LibraryError::new(root.display().to_string(), "not a directory").into());
        }

        let mut stats = Self::default();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(
                        LibraryError::new(root.display().to_string(), e.to_string()).into(),
                    );
                }
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable library entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            stats.total_files += 1;
            stats.total_bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);

            let stem = entry
                .path()
                .file_stem()
                .map(|s| s.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            let name = stem.split('_').next().unwrap_or_default().to_string();
            if !name.is_empty() {
                *stats.by_name.entry(name).or_default() += 1;
            }
        }

        debug!(
            total_files = stats.total_files,
            total_bytes = stats.total_bytes,
            names = stats.by_name.len(),
            "Collected library statistics"
        );
        Ok(stats)
    }

    /// Names with the most files, highest count first, ties alphabetical.
    pub fn top_names(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut names: Vec<_> = self
            .by_name
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        names.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        names.truncate(limit);
        names
    }

    /// Markdown summary listing up to `top_n` names.
    pub fn render_markdown(&self, top_n: usize) -> String {
        let mut message = format!(
            "*Library statistics*\nFiles: {}\nTotal size: {}\nNames: {}\n",
            self.total_files,
            human_bytes(self.total_bytes),
            self.by_name.len()
        );

        let top = self.top_names(top_n);
        if !top.is_empty() {
            message.push_str("\n*Top names*\n");
            for (rank, (name, count)) in top.iter().enumerate() {
                message.push_str(&format!("{}. {}: {}\n", rank + 1, name, count));
            }
        }
        message
    }
}

fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
