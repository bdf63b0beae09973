// Folder scanning module
// Walks a directory tree and reports folders that lack the queried file

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use jwalk::WalkDir;
use tracing::{debug, info, warn};

use super::error::ScanError;
use super::exclude::ExclusionFilter;
use super::matcher::{FileMatcher, MatchKind};
use super::types::{FolderRecord, ProgressEvent, ScanOutcome, ScanRequest, ScanResult};

/// Engine for finding folders that are missing a file
#[derive(Debug, Clone)]
pub struct ScanEngine {
    count_before_scan: bool,
    ignore_case_exclusions: bool,
}

/// Direct contents of one folder, sorted by name
#[derive(Debug, Default)]
struct FolderListing {
    files: Vec<String>,
    subfolders: Vec<PathBuf>,
}

impl ScanEngine {
    /// Create a new ScanEngine with default settings
    pub fn new() -> Self {
        Self {
            count_before_scan: true,
            ignore_case_exclusions: false,
        }
    }

    /// Count folders up front so progress has an exact total
    pub fn with_count_before_scan(mut self, count_before_scan: bool) -> Self {
        self.count_before_scan = count_before_scan;
        self
    }

    /// Match exclusion terms regardless of case
    pub fn with_ignore_case_exclusions(mut self, ignore_case: bool) -> Self {
        self.ignore_case_exclusions = ignore_case;
        self
    }

    /// Scan a folder tree for folders missing the requested file
    ///
    /// # Arguments
    /// * `request` - Root folder, file query and exclusion terms
    /// * `on_progress` - Called once for every visited folder
    /// * `is_cancelled` - Polled before each folder; `true` stops the walk
    ///
    /// # Returns
    /// The folders missing the file, in depth-first order. A cancelled scan
    /// returns what it found so far tagged with `ScanOutcome::Cancelled`.
    ///
    /// # Errors
    /// Only problems with the request or the root folder itself are errors;
    /// unreadable subfolders are counted in `folders_skipped`.
    pub fn scan<P, C>(
        &self,
        request: ScanRequest,
        mut on_progress: P,
        is_cancelled: C,
    ) -> Result<ScanResult, ScanError>
    where
        P: FnMut(&ProgressEvent),
        C: Fn() -> bool,
    {
        let start_time = Instant::now();
        let root = request.validate()?;
        let matcher = request.matcher();
        let filter = request
            .exclusion_filter()
            .with_ignore_case(self.ignore_case_exclusions);

        info!(
            root = %root.display(),
            query = matcher.query(),
            exclusions = ?filter.terms(),
            "starting scan"
        );

        let estimated_total = if self.count_before_scan {
            let total = count_folders(&root, &filter, &is_cancelled);
            debug!(total, "counted folders");
            total
        } else {
            0
        };

        let mut result = ScanResult::default();
        let mut pending = vec![root.clone()];

        while let Some(folder) = pending.pop() {
            if is_cancelled() {
                result.outcome = ScanOutcome::Cancelled;
                break;
            }

            // Excluded folders are never listed, so their subtree is never seen
            if filter.is_excluded(&folder) {
                debug!(folder = %folder.display(), "pruned by exclusion");
                continue;
            }

            let missing = match list_folder(&folder) {
                Ok(listing) => {
                    result.folders_scanned += 1;
                    // Reverse so the first subfolder by name is popped next
                    pending.extend(listing.subfolders.into_iter().rev());

                    let missing = match first_match(&listing.files, &matcher) {
                        Some((file, kind)) => {
                            debug!(folder = %folder.display(), file, ?kind, "file present");
                            false
                        }
                        None => true,
                    };
                    if missing {
                        result.missing_folders.push(FolderRecord::new(folder.clone()));
                    }
                    missing
                }
                Err(e) if folder == root => {
                    return Err(ScanError::from_io_error(e, "reading", folder));
                }
                Err(e) => {
                    warn!(folder = %folder.display(), error = %e, "skipping unreadable folder");
                    result.folders_skipped += 1;
                    false
                }
            };

            let visited = result.folders_visited();
            on_progress(&ProgressEvent {
                folders_scanned: visited,
                folders_total: estimated_total.max(visited),
                current_path: folder,
                missing,
            });
        }

        result.duration = start_time.elapsed();

        info!(
            missing = result.missing_folders.len(),
            scanned = result.folders_scanned,
            skipped = result.folders_skipped,
            outcome = ?result.outcome,
            elapsed_ms = result.duration.as_millis() as u64,
            "scan finished"
        );

        Ok(result)
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// First file (in name order) satisfying the query, with the rule it matched
fn first_match<'a>(files: &'a [String], matcher: &FileMatcher) -> Option<(&'a str, MatchKind)> {
    files
        .iter()
        .find_map(|name| matcher.match_kind(name).map(|kind| (name.as_str(), kind)))
}

/// List the direct files and subfolders of a folder
///
/// Symlinks count as files when they point at a file; symlinked folders are
/// not followed. Entries that fail to read are dropped, only a failure to
/// open the folder is an error.
fn list_folder(folder: &Path) -> io::Result<FolderListing> {
    let mut entries: Vec<(OsString, fs::DirEntry)> = Vec::new();

    for entry_result in fs::read_dir(folder)? {
        match entry_result {
            Ok(entry) => entries.push((entry.file_name(), entry)),
            Err(e) => {
                debug!(folder = %folder.display(), error = %e, "cannot read folder entry");
            }
        }
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut listing = FolderListing::default();

    for (name, entry) in entries {
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                debug!(path = %entry.path().display(), error = %e, "cannot read file type");
                continue;
            }
        };

        if file_type.is_dir() {
            listing.subfolders.push(entry.path());
        } else if file_type.is_file() || (file_type.is_symlink() && points_to_file(&entry.path())) {
            listing.files.push(name.to_string_lossy().into_owned());
        }
    }

    Ok(listing)
}

fn points_to_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Count the folders a scan will visit, honouring exclusions
///
/// Uses jwalk's parallel walk; the count stops early when cancelled.
fn count_folders<C>(root: &Path, filter: &ExclusionFilter, is_cancelled: &C) -> usize
where
    C: Fn() -> bool,
{
    if filter.is_excluded(root) {
        return 0;
    }

    let prune = filter.clone();
    let walker = WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .process_read_dir(move |_depth, _path, _state, children| {
            children.retain(|entry_result| match entry_result {
                Ok(entry) => !(entry.file_type().is_dir() && prune.is_excluded(&entry.path())),
                Err(_) => true,
            });
        });

    let mut total = 0;
    for entry_result in walker {
        if is_cancelled() {
            break;
        }
        match entry_result {
            Ok(entry) if entry.file_type().is_dir() => total += 1,
            Ok(_) => {}
            Err(e) => debug!(error = %e, "error while counting folders"),
        }
    }

    total
}
