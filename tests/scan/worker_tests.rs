// Tests for the background scan worker

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use lacuna::scan::{ScanEngine, ScanError, ScanEvent, ScanOutcome, ScanRequest, ScanWorker};

use crate::common::{abc_tree, missing, root_of};

#[test]
fn test_wait_returns_same_result_as_direct_scan() {
    let dir = abc_tree();
    let root = root_of(&dir);
    let request = ScanRequest::new(&root, "x.txt");

    let direct = ScanEngine::new().scan(request.clone(), |_| {}, || false).unwrap();
    let background = ScanWorker::spawn(ScanEngine::new(), request).wait().unwrap();

    assert_eq!(direct.missing_folders, background.missing_folders);
    assert_eq!(direct.folders_scanned, background.folders_scanned);
    assert_eq!(missing(&background, &root), vec![".", "b", "c"]);
}

#[test]
fn test_events_end_with_single_finished() {
    let dir = abc_tree();
    let root = root_of(&dir);

    let handle = ScanWorker::spawn(ScanEngine::new(), ScanRequest::new(&root, "x.txt"));
    let events: Vec<ScanEvent> = handle.events().iter().collect();

    let finished = events
        .iter()
        .filter(|e| matches!(e, ScanEvent::Finished(_)))
        .count();
    assert_eq!(finished, 1);
    assert!(matches!(events.last(), Some(ScanEvent::Finished(Ok(_)))));

    let progress = events
        .iter()
        .filter(|e| matches!(e, ScanEvent::Progress(_)))
        .count();
    assert_eq!(progress, 4);
    assert!(handle.try_events().is_empty());
}

#[test]
fn test_preset_flag_cancels_immediately() {
    let dir = abc_tree();
    let root = root_of(&dir);

    let flag = Arc::new(AtomicBool::new(true));
    let handle = ScanWorker::spawn_with_flag(ScanEngine::new(), ScanRequest::new(&root, "x.txt"), flag);
    assert!(handle.is_cancelled());

    let result = handle.wait().unwrap();
    assert_eq!(result.outcome, ScanOutcome::Cancelled);
    assert_eq!(result.folders_visited(), 0);
}

#[test]
fn test_cancel_through_handle() {
    let dir = abc_tree();
    let root = root_of(&dir);

    let handle = ScanWorker::spawn(ScanEngine::new(), ScanRequest::new(&root, "x.txt"));
    handle.cancel();
    assert!(handle.is_cancelled());

    // The tree is tiny, so the scan may already be done; either way it ends cleanly
    let result = handle.wait().unwrap();
    if result.is_cancelled() {
        assert!(result.folders_visited() <= 4);
    } else {
        assert_eq!(result.folders_scanned, 4);
    }
}

#[test]
fn test_request_error_is_delivered() {
    let dir = abc_tree();

    let handle = ScanWorker::spawn(ScanEngine::new(), ScanRequest::new(dir.path(), ""));
    let err = handle.wait().unwrap_err();

    assert!(matches!(err, ScanError::InvalidRequest { .. }));
}

#[test]
fn test_handle_reports_finished() {
    let dir = abc_tree();

    let handle = ScanWorker::spawn(ScanEngine::new(), ScanRequest::new(dir.path(), "x.txt"));
    // Draining until disconnect means the thread has sent its last event
    let _: Vec<_> = handle.events().iter().collect();
    for _ in 0..100 {
        if handle.is_finished() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
    assert!(handle.is_finished());
}
