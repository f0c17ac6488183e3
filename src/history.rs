// src/history.rs
//! Run History
//!
//! Most-recent-first record of past analyses, kept in a small JSON file.
//! History is a convenience: every load, save and clear failure is logged
//! and otherwise ignored.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::models::AnalysisResult;

pub const MAX_ENTRIES: usize = 10;
pub const DEFAULT_HISTORY_FILE: &str = "doc-signals-history.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub result: AnalysisResult,
}

#[derive(Debug)]
pub struct AnalysisHistory {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl AnalysisHistory {
    /// Read the history at `path`. A missing or unreadable file is an empty history.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str::<Vec<HistoryEntry>>(&data) {
                Ok(mut entries) => {
                    entries.truncate(MAX_ENTRIES);
                    entries
                }
                Err(e) => {
                    warn!("Ignoring unreadable history {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Failed to read history {}: {}", path.display(), e);
                Vec::new()
            }
        };

        debug!("Loaded {} history entries from {}", entries.len(), path.display());
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepend a run, drop anything past `MAX_ENTRIES` and persist.
    pub fn record(&mut self, result: &AnalysisResult) {
        self.push(HistoryEntry {
            url: result.url.clone(),
            timestamp: Utc::now(),
            result: result.clone(),
        });
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_ENTRIES);
        self.save();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed history {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to clear history {}: {}", self.path.display(), e),
        }
    }

    fn save(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize history: {}", e);
                return;
            }
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create {}: {}", parent.display(), e);
                return;
            }
        }

        if let Err(e) = fs::write(&self.path, json) {
            warn!("Failed to write history {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    fn result_for(url: &str) -> AnalysisResult {
        analyze(&["<body><main><h1>x</h1></main></body>"], url).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = AnalysisHistory::load(dir.path().join("none.json"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_newest_first_and_capped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut history = AnalysisHistory::load(&path);

        for i in 0..12 {
            history.record(&result_for(&format!("https://example.com/{i}")));
        }

        assert_eq!(history.len(), MAX_ENTRIES);
        assert_eq!(history.entries()[0].url, "https://example.com/11");
        assert_eq!(history.entries()[9].url, "https://example.com/2");

        let reloaded = AnalysisHistory::load(&path);
        assert_eq!(reloaded.entries(), history.entries());
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{not json").unwrap();

        let mut history = AnalysisHistory::load(&path);
        assert!(history.is_empty());

        history.record(&result_for("https://example.com/"));
        assert_eq!(AnalysisHistory::load(&path).len(), 1);
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut history = AnalysisHistory::load(&path);
        history.record(&result_for("https://example.com/"));
        assert!(path.exists());

        history.clear();
        assert!(history.is_empty());
        assert!(!path.exists());

        // Clearing twice is harmless.
        history.clear();
    }
}
