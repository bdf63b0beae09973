// Path normalization for reported folders
// Paths are made absolute without resolving symlinks, then cleaned of "." and ".."

use std::io;
use std::path::{Component, Path, PathBuf};

/// Make a path absolute against the current directory and clean it
pub fn absolute_clean(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    Ok(clean_path(&absolute))
}

/// Remove redundant components like "." and ".." without touching the filesystem
pub fn clean_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir => {
                // Only pop a normal component; ".." at the root stays at the root
                match components.last() {
                    Some(Component::Normal(_)) => {
                        components.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => components.push(component),
                }
            }
            _ => components.push(component),
        }
    }

    let result: PathBuf = components.iter().collect();

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}
