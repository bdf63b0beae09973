//! File-presence predicate.
//!
//! A folder "has" the queried file when any of its direct files matches the
//! query by one of four rules, tried from most to least specific. All
//! comparisons ignore case.

/// Which rule produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Whole file name equals the query (`config.txt` vs `config.txt`).
    Exact,
    /// File name without its extension equals the query (`config.txt` vs `config`).
    ExactStem,
    /// Query appears somewhere in the whole file name.
    Partial,
    /// Query appears somewhere in the file name without its extension.
    PartialStem,
}

/// Compiled file query.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    query: String,
}

impl FileMatcher {
    /// The query is trimmed and lowercased once here.
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_lowercase(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Test a single file name, returning the rule that matched first.
    pub fn match_kind(&self, file_name: &str) -> Option<MatchKind> {
        let name = file_name.to_lowercase();
        let stem = file_stem(&name);

        if name == self.query {
            Some(MatchKind::Exact)
        } else if stem == self.query {
            Some(MatchKind::ExactStem)
        } else if name.contains(&self.query) {
            Some(MatchKind::Partial)
        } else if stem.contains(&self.query) {
            Some(MatchKind::PartialStem)
        } else {
            None
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.match_kind(file_name).is_some()
    }
}

/// Strip the last extension from a file name.
///
/// Leading dots do not start an extension, so `.env` keeps its full name and
/// `archive.tar.gz` becomes `archive.tar`.
pub fn file_stem(name: &str) -> &str {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(dot) => &name[..leading + dot],
        None => name,
    }
}
