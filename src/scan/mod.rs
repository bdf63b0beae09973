// Scan engine
// Finds folders in a tree that are missing a file, on a background worker if asked

pub mod engine;
pub mod error;
pub mod exclude;
pub mod matcher;
pub mod path_utils;
pub mod types;
pub mod worker;

// Re-export commonly used types for convenience
pub use engine::ScanEngine;
pub use error::ScanError;
pub use exclude::{parse_terms, ExclusionFilter};
pub use matcher::{FileMatcher, MatchKind};
pub use types::{FolderRecord, ProgressEvent, ScanOutcome, ScanRequest, ScanResult};
pub use worker::{ScanEvent, ScanHandle, ScanWorker};
