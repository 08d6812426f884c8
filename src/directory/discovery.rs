use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::utils::error::Result;

pub const LAYOUT_FILE: &str = "_layout.html";
pub const LEGACY_HEAD_FILE: &str = "_head.html";
pub const LEGACY_TAIL_FILE: &str = "_tail.html";

/// Layout files live next to the pages but are never rendered as pages
pub fn is_reserved_name(file_name: &str) -> bool {
    file_name.starts_with("_layout.") || file_name == LEGACY_HEAD_FILE || file_name == LEGACY_TAIL_FILE
}

/// A reserved name below the top of the pages directory. Such files are
/// neither rendered nor used as the layout.
fn is_misplaced_layout(relative: &Path) -> bool {
    relative.components().count() > 1
        && relative
            .file_name()
            .and_then(|name| name.to_str())
            .map(is_reserved_name)
            .unwrap_or(false)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Recursively list the files under `dir`, sorted by path.
///
/// Reserved layout files and hidden entries are left out. A missing
/// directory has no files.
pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        debug!("Skipping discovery, {} is not a directory", dir.display());
        return Ok(files);
    }

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let reserved = entry
            .file_name()
            .to_str()
            .map(is_reserved_name)
            .unwrap_or(false);
        if reserved {
            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            if is_misplaced_layout(relative) {
                warn!(
                    "Ignoring {}: layout files are only read from the top of {}",
                    entry.path().display(),
                    dir.display()
                );
            }
            continue;
        }
        files.push(entry.into_path());
    }

    files.sort();
    debug!("Discovered {} files in {}", files.len(), dir.display());
    Ok(files)
}
