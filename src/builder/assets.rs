use std::path::Path;

use log::{debug, info};
use rayon::prelude::*;

use super::output::copy_destination;
use crate::utils::error::Result;
use crate::utils::fs::{copy_file, list_files};

/// Copy everything under `public_dir` into `out_dir`, keeping relative paths.
///
/// Copies run on the calling rayon pool; every copy finishes before the
/// first error (if any) is returned. A missing public directory copies
/// nothing.
pub fn copy_public_files(public_dir: &Path, out_dir: &Path) -> Result<usize> {
    let files = list_files(public_dir)?;
    if files.is_empty() {
        debug!("No static files in {}", public_dir.display());
        return Ok(0);
    }

    let results: Vec<Result<u64>> = files
        .par_iter()
        .map(|file| copy_file(file, copy_destination(file, public_dir, out_dir)))
        .collect();

    let mut bytes = 0;
    for result in results {
        bytes += result?;
    }

    info!("Copied {} static files ({} bytes)", files.len(), bytes);
    Ok(files.len())
}
