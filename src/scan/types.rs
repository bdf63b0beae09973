//! Data passed in and out of the scan engine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::ScanError;
use super::exclude::ExclusionFilter;
use super::matcher::FileMatcher;
use super::path_utils;

/// What to scan for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub root_path: PathBuf,
    pub file_query: String,
    pub exclusion_terms: Vec<String>,
}

impl ScanRequest {
    pub fn new(root_path: impl Into<PathBuf>, file_query: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            file_query: file_query.into(),
            exclusion_terms: Vec::new(),
        }
    }

    pub fn with_exclusions<S: AsRef<str>>(mut self, terms: &[S]) -> Self {
        self.exclusion_terms = terms.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    /// Check the request and resolve the root to an absolute, cleaned path.
    ///
    /// Fails with `InvalidRequest` for an empty query or a root that is not a
    /// directory, and with `PathNotFound` / `AccessDenied` when the root
    /// cannot be inspected.
    pub fn validate(&self) -> Result<PathBuf, ScanError> {
        if self.file_query.trim().is_empty() {
            return Err(ScanError::invalid("file name to look for is empty"));
        }
        if self.root_path.as_os_str().is_empty() {
            return Err(ScanError::invalid("root folder is empty"));
        }

        let root = path_utils::absolute_clean(&self.root_path).map_err(|e| {
            ScanError::from_io_error(e, "resolving", self.root_path.clone())
        })?;

        let metadata = std::fs::metadata(&root)
            .map_err(|e| ScanError::from_io_error(e, "inspecting", root.clone()))?;
        if !metadata.is_dir() {
            return Err(ScanError::invalid(format!(
                "{} is not a folder",
                root.display()
            )));
        }

        Ok(root)
    }

    pub fn matcher(&self) -> FileMatcher {
        FileMatcher::new(&self.file_query)
    }

    pub fn exclusion_filter(&self) -> ExclusionFilter {
        ExclusionFilter::from_terms(&self.exclusion_terms)
    }
}

/// A folder that lacks the queried file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderRecord {
    pub path: PathBuf,
}

impl FolderRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOutcome {
    /// Every reachable folder was visited.
    #[default]
    Completed,
    /// The caller asked to stop; the result holds what was found so far.
    Cancelled,
}

/// Final result of a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub missing_folders: Vec<FolderRecord>,
    /// Folders whose files were listed and tested.
    pub folders_scanned: usize,
    /// Folders that could not be listed.
    pub folders_skipped: usize,
    pub outcome: ScanOutcome,
    pub duration: Duration,
}

impl ScanResult {
    pub fn is_cancelled(&self) -> bool {
        self.outcome == ScanOutcome::Cancelled
    }

    /// Folders visited, listed or not.
    pub fn folders_visited(&self) -> usize {
        self.folders_scanned + self.folders_skipped
    }
}

/// Emitted once per visited folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Folders visited so far, this one included.
    pub folders_scanned: usize,
    /// Expected number of folders; never below `folders_scanned`.
    pub folders_total: usize,
    pub current_path: PathBuf,
    /// `current_path` was just added to the missing list.
    pub missing: bool,
}

impl ProgressEvent {
    /// Completion ratio in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.folders_total == 0 {
            0.0
        } else {
            (self.folders_scanned as f64 / self.folders_total as f64).min(1.0)
        }
    }
}
