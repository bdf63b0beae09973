//! Actions on result entries: open the folder, copy its path.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("folder no longer exists: {}", path.display())]
    FolderMissing { path: PathBuf },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },

    #[error("no clipboard tool found (tried {tried})")]
    NoClipboard { tried: String },
}

/// Open a folder in the platform file manager.
pub fn open_folder(path: &Path) -> Result<(), ActionError> {
    if !path.is_dir() {
        return Err(ActionError::FolderMissing {
            path: path.to_path_buf(),
        });
    }

    let program = file_manager();
    debug!(program, path = %path.display(), "opening folder");

    // Not waited on; explorer.exe exits with 1 even on success
    Command::new(program)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ActionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    Ok(())
}

fn file_manager() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Clipboard commands to try, in order.
#[cfg(target_os = "windows")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Copy a path to the system clipboard.
pub fn copy_path(path: &Path) -> Result<(), ActionError> {
    let text = path.display().to_string();

    for (program, args) in CLIPBOARD_COMMANDS {
        match pipe_to(program, args, &text) {
            Ok(()) => {
                debug!(program, "copied path to clipboard");
                return Ok(());
            }
            Err(ActionError::Spawn { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                continue;
            }
            Err(e) => {
                warn!(program, error = %e, "clipboard command failed");
                return Err(e);
            }
        }
    }

    Err(ActionError::NoClipboard {
        tried: CLIPBOARD_COMMANDS
            .iter()
            .map(|(program, _)| *program)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<(), ActionError> {
    let spawn_err = |source| ActionError::Spawn {
        program: program.to_string(),
        source,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(spawn_err)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).map_err(spawn_err)?;
    }

    let status = child.wait().map_err(spawn_err)?;
    if status.success() {
        Ok(())
    } else {
        Err(ActionError::Failed {
            program: program.to_string(),
            status: status.to_string(),
        })
    }
}
