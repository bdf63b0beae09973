use std::path::PathBuf;

use tracing::{info, warn};

use crate::actions;
use crate::config::Config;
use crate::scan::{
    parse_terms, FolderRecord, ProgressEvent, ScanError, ScanEvent, ScanHandle, ScanOutcome,
    ScanResult, ScanWorker,
};
use crate::ui::ResultList;

/// Which widget receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Root,
    Query,
    Exclusions,
    Results,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Root => Focus::Query,
            Focus::Query => Focus::Exclusions,
            Focus::Exclusions => Focus::Results,
            Focus::Results => Focus::Root,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Focus::Root => Focus::Results,
            Focus::Query => Focus::Root,
            Focus::Exclusions => Focus::Query,
            Focus::Results => Focus::Exclusions,
        }
    }

    pub fn is_input(self) -> bool {
        !matches!(self, Focus::Results)
    }
}

/// Lifecycle of the current scan, as seen by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    /// The scan never started (bad request or unreadable root).
    Failed,
}

/// Summary of the last finished scan, kept for the status bar.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub query: String,
    pub missing: usize,
    pub scanned: usize,
    pub skipped: usize,
    pub elapsed_ms: u128,
}

pub struct App {
    pub root_input: String,
    pub query_input: String,
    pub exclusions_input: String,
    pub focus: Focus,
    pub message: String,
    pub state: ScanState,
    pub progress: Option<ProgressEvent>,
    pub results: ResultList,
    pub summary: Option<ScanSummary>,
    pub config: Config,
    pub should_quit: bool,
    scan: Option<ScanHandle>,
    running_query: String,
}

impl App {
    pub fn new(config: Config) -> Self {
        let root_input = config
            .default_root
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        Self {
            root_input,
            query_input: String::new(),
            exclusions_input: String::new(),
            focus: Focus::Root,
            message: "Enter a folder and a file name, then press Enter to scan".to_string(),
            state: ScanState::Idle,
            progress: None,
            results: ResultList::new(),
            summary: None,
            config,
            should_quit: false,
            scan: None,
            running_query: String::new(),
        }
    }

    /// Pre-fill inputs from the command line
    pub fn with_inputs(
        mut self,
        root: Option<PathBuf>,
        query: Option<String>,
        exclusions: Option<String>,
    ) -> Self {
        if let Some(root) = root {
            self.root_input = root.display().to_string();
        }
        if let Some(query) = query {
            self.query_input = query;
        }
        if let Some(exclusions) = exclusions {
            self.exclusions_input = exclusions;
        }
        self
    }

    pub fn is_scanning(&self) -> bool {
        self.state == ScanState::Running
    }

    pub fn focused_input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Root => Some(&mut self.root_input),
            Focus::Query => Some(&mut self.query_input),
            Focus::Exclusions => Some(&mut self.exclusions_input),
            Focus::Results => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(input) = self.focused_input_mut() {
            input.push(c);
        }
    }

    pub fn input_backspace(&mut self) {
        if let Some(input) = self.focused_input_mut() {
            input.pop();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Validate the inputs and launch a background scan
    pub fn start_scan(&mut self) {
        if self.is_scanning() {
            self.message = "A scan is already running (Esc to cancel)".to_string();
            return;
        }

        let root = self.root_input.trim();
        let query = self.query_input.trim();
        if root.is_empty() {
            self.message = "Please choose a folder to scan".to_string();
            self.focus = Focus::Root;
            return;
        }
        if query.is_empty() {
            self.message = "Please enter a file name to look for".to_string();
            self.focus = Focus::Query;
            return;
        }

        let terms = parse_terms(&self.exclusions_input);
        let request = self.config.request(root, query, &terms);

        info!(root, query, exclusions = ?request.exclusion_terms, "launching scan");

        self.running_query = query.to_string();
        self.results.clear();
        self.progress = None;
        self.summary = None;
        self.state = ScanState::Running;
        self.message = format!("Scanning {}...", root);
        self.scan = Some(ScanWorker::spawn(self.config.engine(), request));
    }

    pub fn cancel_scan(&mut self) {
        if let Some(ref handle) = self.scan {
            handle.cancel();
            self.message = "Cancelling scan...".to_string();
        }
    }

    /// Apply everything the worker has sent since the last tick (non-blocking)
    pub fn poll_scan(&mut self) {
        let Some(handle) = self.scan.as_ref() else {
            return;
        };

        for event in handle.try_events() {
            match event {
                ScanEvent::Progress(progress) => {
                    if progress.missing {
                        self.results
                            .push(FolderRecord::new(progress.current_path.clone()));
                    }
                    self.progress = Some(progress);
                }
                ScanEvent::Finished(result) => {
                    self.scan = None;
                    self.finish_scan(result);
                    return;
                }
            }
        }
    }

    fn finish_scan(&mut self, result: Result<ScanResult, ScanError>) {
        self.progress = None;

        match result {
            Ok(result) => {
                let summary = ScanSummary {
                    query: self.running_query.clone(),
                    missing: result.missing_folders.len(),
                    scanned: result.folders_scanned,
                    skipped: result.folders_skipped,
                    elapsed_ms: result.duration.as_millis(),
                };

                self.state = match result.outcome {
                    ScanOutcome::Completed => ScanState::Completed,
                    ScanOutcome::Cancelled => ScanState::Cancelled,
                };
                self.message = match result.outcome {
                    ScanOutcome::Completed if summary.scanned + summary.skipped == 0 => {
                        "Root folder is excluded, nothing scanned".to_string()
                    }
                    ScanOutcome::Completed if summary.missing == 0 => {
                        format!("✓ Every folder contains '{}'", summary.query)
                    }
                    ScanOutcome::Completed => format!(
                        "✓ {} folders missing '{}'",
                        summary.missing, summary.query
                    ),
                    ScanOutcome::Cancelled => format!(
                        "Scan cancelled: {} folders missing so far",
                        summary.missing
                    ),
                };

                self.results.replace(result.missing_folders);
                if self.state == ScanState::Completed && !self.results.is_empty() {
                    self.focus = Focus::Results;
                }
                self.summary = Some(summary);
            }
            Err(e) => {
                self.state = ScanState::Failed;
                // Only the first line; the suggestion does not fit the status bar
                let first_line = e.to_string().lines().next().unwrap_or_default().to_string();
                self.message = format!("✗ {}", first_line);
            }
        }
    }

    pub fn open_selected(&mut self) {
        let Some(record) = self.results.selected() else {
            self.message = "No folder selected".to_string();
            return;
        };
        let path = record.path().to_path_buf();

        self.message = match actions::open_folder(&path) {
            Ok(()) => format!("Opened {}", path.display()),
            Err(e) => {
                warn!(error = %e, "failed to open folder");
                format!("✗ Could not open folder: {}", e)
            }
        };
    }

    pub fn copy_selected(&mut self) {
        let Some(record) = self.results.selected() else {
            self.message = "No folder selected".to_string();
            return;
        };
        let path = record.path().to_path_buf();

        self.message = match actions::copy_path(&path) {
            Ok(()) => format!("Copied {}", path.display()),
            Err(e) => format!("✗ Could not copy path: {}", e),
        };
    }

    pub fn quit(&mut self) {
        self.cancel_scan();
        self.should_quit = true;
    }
}
