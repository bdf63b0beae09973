// Tests for the scan engine
// Scenarios run against real temporary trees

use std::cell::{Cell, RefCell};
use std::fs;

use lacuna::scan::{ProgressEvent, ScanEngine, ScanError, ScanOutcome, ScanRequest, ScanResult};

use crate::common::{abc_tree, build_tree, missing, relative, root_of};

fn scan(request: ScanRequest) -> ScanResult {
    ScanEngine::new().scan(request, |_| {}, || false).unwrap()
}

#[test]
fn test_exact_name_query() {
    let dir = abc_tree();
    let root = root_of(&dir);

    let result = scan(ScanRequest::new(&root, "x.txt"));

    assert_eq!(missing(&result, &root), vec![".", "b", "c"]);
    assert_eq!(result.folders_scanned, 4);
    assert_eq!(result.folders_skipped, 0);
    assert_eq!(result.outcome, ScanOutcome::Completed);
}

#[test]
fn test_partial_query_without_extension() {
    let dir = abc_tree();
    let root = root_of(&dir);

    let result = scan(ScanRequest::new(&root, "txt"));

    assert_eq!(missing(&result, &root), vec![".", "b"]);
}

#[test]
fn test_stem_query_ignores_case() {
    let dir = build_tree(&["one", "two"], &["one/README.md", "two/notes.txt"]);
    let root = root_of(&dir);

    let result = scan(ScanRequest::new(&root, "readme"));

    assert_eq!(missing(&result, &root), vec![".", "two"]);
}

#[test]
fn test_exclusion_prunes_subtree() {
    let dir = build_tree(&["temp/deep/deeper", "keep"], &["temp/x.txt"]);
    let root = root_of(&dir);

    let seen = RefCell::new(Vec::new());
    let result = ScanEngine::new()
        .scan(
            ScanRequest::new(&root, "x.txt").with_exclusions(&["temp"]),
            |event: &ProgressEvent| seen.borrow_mut().push(relative(&event.current_path, &root)),
            || false,
        )
        .unwrap();

    assert_eq!(missing(&result, &root), vec![".", "keep"]);
    assert_eq!(result.folders_scanned, 2);
    assert_eq!(result.folders_skipped, 0);
    assert_eq!(*seen.borrow(), vec![".", "keep"]);
}

#[test]
fn test_exclusion_matches_path_fragment() {
    let dir = build_tree(&["archive/old/2019", "archive/new"], &[]);
    let root = root_of(&dir);

    let result = scan(ScanRequest::new(&root, "x").with_exclusions(&["archive/old"]));

    assert_eq!(missing(&result, &root), vec![".", "archive", "archive/new"]);
}

#[test]
fn test_exclusion_is_case_sensitive_unless_configured() {
    let dir = build_tree(&["Cache", "data"], &[]);
    let root = root_of(&dir);
    let request = ScanRequest::new(&root, "x").with_exclusions(&["cache"]);

    let result = scan(request.clone());
    assert_eq!(missing(&result, &root), vec![".", "Cache", "data"]);

    let result = ScanEngine::new()
        .with_ignore_case_exclusions(true)
        .scan(request, |_| {}, || false)
        .unwrap();
    assert_eq!(missing(&result, &root), vec![".", "data"]);
}

#[test]
fn test_excluded_root_scans_nothing() {
    let dir = abc_tree();
    let root = root_of(&dir);
    let root_name = root.file_name().unwrap().to_string_lossy().to_string();

    let result = scan(ScanRequest::new(&root, "x.txt").with_exclusions(&[root_name]));

    assert!(result.missing_folders.is_empty());
    assert_eq!(result.folders_scanned, 0);
    assert_eq!(result.outcome, ScanOutcome::Completed);
}

#[test]
fn test_only_direct_files_count() {
    // The file lives in a subfolder, so the parent is still missing it
    let dir = build_tree(&["parent/child"], &["parent/child/config.txt"]);
    let root = root_of(&dir);

    let result = scan(ScanRequest::new(&root, "config.txt"));

    assert_eq!(missing(&result, &root), vec![".", "parent"]);
}

#[test]
fn test_folder_named_like_query_is_not_a_file() {
    let dir = build_tree(&["config.txt"], &[]);
    let root = root_of(&dir);

    let result = scan(ScanRequest::new(&root, "config.txt"));

    assert_eq!(missing(&result, &root), vec![".", "config.txt"]);
}

#[test]
fn test_hidden_folders_are_scanned() {
    let dir = build_tree(&[".hidden", "visible"], &["visible/x.txt"]);
    let root = root_of(&dir);

    let result = scan(ScanRequest::new(&root, "x.txt"));

    assert_eq!(missing(&result, &root), vec![".", ".hidden"]);
}

#[test]
fn test_order_is_depth_first_and_repeatable() {
    let dir = build_tree(&["b/b2", "a/a2", "a/a1", "c"], &[]);
    let root = root_of(&dir);
    let request = ScanRequest::new(&root, "x");

    let first = scan(request.clone());
    let second = scan(request);

    assert_eq!(
        missing(&first, &root),
        vec![".", "a", "a/a1", "a/a2", "b", "b/b2", "c"]
    );
    assert_eq!(first.missing_folders, second.missing_folders);
}

#[test]
fn test_progress_reports_every_folder() {
    let dir = abc_tree();
    let root = root_of(&dir);

    let events = RefCell::new(Vec::new());
    let result = ScanEngine::new()
        .scan(
            ScanRequest::new(&root, "x.txt"),
            |event: &ProgressEvent| events.borrow_mut().push(event.clone()),
            || false,
        )
        .unwrap();

    let events = events.into_inner();
    assert_eq!(events.len(), result.folders_scanned);
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.folders_scanned, i + 1);
        assert_eq!(event.folders_total, 4);
    }

    let flagged: Vec<_> = events
        .iter()
        .filter(|e| e.missing)
        .map(|e| relative(&e.current_path, &root))
        .collect();
    assert_eq!(flagged, missing(&result, &root));
}

#[test]
fn test_total_without_count_tracks_visited() {
    let dir = abc_tree();
    let root = root_of(&dir);

    let totals = RefCell::new(Vec::new());
    ScanEngine::new()
        .with_count_before_scan(false)
        .scan(
            ScanRequest::new(&root, "x.txt"),
            |event: &ProgressEvent| totals.borrow_mut().push((event.folders_scanned, event.folders_total)),
            || false,
        )
        .unwrap();

    for (scanned, total) in totals.into_inner() {
        assert_eq!(scanned, total);
    }
}

#[test]
fn test_cancel_stops_after_current_folder() {
    let dir = build_tree(&["a/a1", "b/b1", "c/c1"], &[]);
    let root = root_of(&dir);

    let visited = Cell::new(0usize);
    let result = ScanEngine::new()
        .scan(
            ScanRequest::new(&root, "x"),
            |_| visited.set(visited.get() + 1),
            || visited.get() >= 2,
        )
        .unwrap();

    assert_eq!(result.outcome, ScanOutcome::Cancelled);
    assert!(result.is_cancelled());
    assert_eq!(result.folders_scanned, 2);
    assert_eq!(missing(&result, &root), vec![".", "a"]);
}

#[test]
fn test_cancel_before_start_returns_empty() {
    let dir = abc_tree();
    let root = root_of(&dir);

    let result = ScanEngine::new()
        .scan(ScanRequest::new(&root, "x.txt"), |_| {}, || true)
        .unwrap();

    assert_eq!(result.outcome, ScanOutcome::Cancelled);
    assert_eq!(result.folders_visited(), 0);
    assert!(result.missing_folders.is_empty());
}

#[test]
fn test_empty_query_is_rejected() {
    let dir = abc_tree();

    let err = ScanEngine::new()
        .scan(ScanRequest::new(dir.path(), "   "), |_| {}, || false)
        .unwrap_err();

    assert!(matches!(err, ScanError::InvalidRequest { .. }));
}

#[test]
fn test_file_root_is_rejected() {
    let dir = build_tree(&[], &["file.txt"]);

    let err = ScanEngine::new()
        .scan(ScanRequest::new(dir.path().join("file.txt"), "x"), |_| {}, || false)
        .unwrap_err();

    assert!(matches!(err, ScanError::InvalidRequest { .. }));
    assert!(err.to_string().contains("not a folder"));
}

#[test]
fn test_missing_root_is_path_not_found() {
    let dir = abc_tree();

    let err = ScanEngine::new()
        .scan(ScanRequest::new(dir.path().join("gone"), "x"), |_| {}, || false)
        .unwrap_err();

    assert!(matches!(err, ScanError::PathNotFound { .. }));
}

#[test]
fn test_relative_root_is_reported_absolute() {
    let dir = abc_tree();
    let root = root_of(&dir);
    let dotted = root.join("a").join("..");

    let result = scan(ScanRequest::new(&dotted, "x.txt"));

    assert!(result.missing_folders.iter().all(|r| r.path.is_absolute()));
    assert_eq!(missing(&result, &root), vec![".", "b", "c"]);
}

#[test]
fn test_folder_removed_during_scan_is_skipped() {
    let dir = abc_tree();
    let root = root_of(&dir);

    // "b" is already queued once the root has been listed
    let result = ScanEngine::new()
        .scan(
            ScanRequest::new(&root, "x.txt"),
            |event: &ProgressEvent| {
                if event.folders_scanned == 1 {
                    fs::remove_dir_all(root.join("b")).unwrap();
                }
            },
            || false,
        )
        .unwrap();

    assert_eq!(result.outcome, ScanOutcome::Completed);
    assert_eq!(result.folders_skipped, 1);
    assert_eq!(result.folders_scanned, 3);
    assert_eq!(missing(&result, &root), vec![".", "c"]);
}

#[cfg(unix)]
#[test]
fn test_unreadable_folder_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = build_tree(&["locked/inner", "open"], &["open/x.txt"]);
    let root = root_of(&dir);
    let locked = root.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read it anyway; nothing to test then
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let last_event = RefCell::new(None);
    let result = ScanEngine::new().scan(
        ScanRequest::new(&root, "x.txt"),
        |event: &ProgressEvent| *last_event.borrow_mut() = Some(event.clone()),
        || false,
    );

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let result = result.unwrap();

    assert_eq!(result.outcome, ScanOutcome::Completed);
    assert_eq!(result.folders_skipped, 1);
    assert_eq!(result.folders_scanned, 2);
    assert_eq!(missing(&result, &root), vec!["."]);

    let last = last_event.into_inner().unwrap();
    assert_eq!(last.folders_scanned, 3);
    assert_eq!(last.folders_total, 3);
}

#[cfg(unix)]
#[test]
fn test_symlinks() {
    use std::os::unix::fs::symlink;

    let dir = build_tree(&["real", "linked_file"], &["real/config.txt"]);
    let root = root_of(&dir);
    symlink(root.join("real"), root.join("loop")).unwrap();
    symlink(root.join("real/config.txt"), root.join("linked_file/config.txt")).unwrap();

    let result = scan(ScanRequest::new(&root, "config"));

    // The folder symlink is not followed, the file symlink counts as a file
    assert_eq!(missing(&result, &root), vec!["."]);
    assert_eq!(result.folders_scanned, 3);
}
