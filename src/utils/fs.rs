use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::utils::error::Result;

/// Create a directory and any parent directories if they don't exist
pub fn create_directory<P: AsRef<Path>>(path: P) -> Result<()> {
    fs::create_dir_all(path.as_ref())?;
    Ok(())
}

/// Read a file to string
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(fs::read_to_string(path.as_ref())?)
}

/// Write bytes to `path` so that readers never observe a half-written file.
///
/// The bytes land in a uniquely named hidden sibling first and are renamed
/// over the target once fully flushed, so concurrent writers to the same
/// path never share a staging file. On failure the sibling is removed and
/// the previous contents of `path` (if any) are left untouched.
pub fn write_file_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    create_directory(parent)?;

    let mut staging = tempfile::Builder::new()
        .prefix(".alvu-")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    staging.write_all(contents)?;
    staging.as_file().sync_all()?;
    staging.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Copy a file from source to destination
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> Result<u64> {
    if let Some(parent) = to.as_ref().parent() {
        create_directory(parent)?;
    }

    let bytes_copied = fs::copy(from, to)?;
    Ok(bytes_copied)
}

/// List all files in a directory recursively. Symlinks are not followed.
pub fn list_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if !dir.as_ref().is_dir() {
        return Ok(files);
    }

    for entry in walkdir::WalkDir::new(dir.as_ref()).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
