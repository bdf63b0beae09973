//! Folder exclusion by substring.
//!
//! A folder is excluded when its name or its full path contains any of the
//! terms. Excluded folders are pruned: neither they nor anything below them
//! is listed.

use std::path::Path;

/// Set of exclusion terms for folder pruning.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    /// Terms as given (trimmed, blanks dropped).
    terms: Vec<String>,
    /// Terms used for matching; lowercased when `ignore_case` is set.
    needles: Vec<String>,
    ignore_case: bool,
}

impl ExclusionFilter {
    /// Create an empty filter that excludes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a list of terms. Matching is case-sensitive.
    pub fn from_terms<S: AsRef<str>>(terms: &[S]) -> Self {
        let mut filter = Self::new();
        for term in terms {
            filter.add_term(term.as_ref());
        }
        filter
    }

    /// Switch between case-sensitive (default) and case-insensitive matching.
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        let needles = self.terms.iter().map(|t| self.fold(t)).collect();
        self.needles = needles;
        self
    }

    /// Add a term. Blank terms are ignored.
    pub fn add_term(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() || self.terms.iter().any(|t| t == term) {
            return;
        }
        let needle = self.fold(term);
        self.needles.push(needle);
        self.terms.push(term.to_string());
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check whether a folder should be pruned.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.is_empty() {
            return false;
        }

        let full = self.fold(&path.to_string_lossy());
        let name = path
            .file_name()
            .map(|n| self.fold(&n.to_string_lossy()))
            .unwrap_or_default();

        self.needles
            .iter()
            .any(|needle| name.contains(needle.as_str()) || full.contains(needle.as_str()))
    }

    fn fold(&self, s: &str) -> String {
        if self.ignore_case {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    }
}

/// Split a comma separated list of exclusion terms, dropping blanks.
pub fn parse_terms(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
