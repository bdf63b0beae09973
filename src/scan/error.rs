// Error types for the scan engine
// Every message ends with a suggestion line the shell can show as-is

use std::io;
use std::path::PathBuf;

/// Errors that stop a scan before (or instead of) producing a result.
///
/// Failures below the root folder never surface here: they are folded into
/// `ScanResult::folders_skipped` and the walk carries on.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The folder could not be listed because of its permissions
    #[error("Permission denied while reading folder: {}\nSuggestion: Check folder permissions or run with appropriate privileges", path.display())]
    AccessDenied { path: PathBuf },

    /// The folder does not exist (or vanished)
    #[error("Folder not found: {}\nSuggestion: Check that the folder path is correct and the folder exists", path.display())]
    PathNotFound { path: PathBuf },

    /// The request itself is unusable
    #[error("Invalid scan request: {message}\nSuggestion: Provide an existing folder and a non-empty file name")]
    InvalidRequest { message: String },

    /// Any other I/O failure at scan start
    #[error("I/O error while {operation} {}: {source}\nSuggestion: Check that the folder is accessible", path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: io::Error,
    },

    /// The background worker exited without reporting a result
    #[error("Scan worker stopped unexpectedly\nSuggestion: Run the scan again and check the log for details")]
    WorkerStopped,
}

impl ScanError {
    /// Build an error from an `io::Error`, picking the specific variant for
    /// missing paths and permission problems.
    pub fn from_io_error(err: io::Error, operation: &str, path: PathBuf) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ScanError::PathNotFound { path },
            io::ErrorKind::PermissionDenied => ScanError::AccessDenied { path },
            _ => ScanError::Io {
                path,
                operation: operation.to_string(),
                source: err,
            },
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ScanError::InvalidRequest {
            message: message.into(),
        }
    }
}
