use std::path::{Component, Path, PathBuf};

use crate::utils::path::make_relative;

/// Where a page is written: the output root plus the page's path below the
/// pages directory, with an `.html` extension
pub fn destination_path(source: &Path, pages_root: &Path, out_root: &Path) -> PathBuf {
    let mut relative = relative_to(source, pages_root);
    relative.set_extension("html");
    out_root.join(relative)
}

/// Where a file copied as-is is written: same relative path, same extension
pub fn copy_destination(source: &Path, root: &Path, out_root: &Path) -> PathBuf {
    out_root.join(relative_to(source, root))
}

/// Destination chosen by a hook's `name`, always kept inside `out_root`
pub fn override_destination(out_root: &Path, name: &str) -> PathBuf {
    let mut path = out_root.to_path_buf();
    for component in Path::new(name).components() {
        if let Component::Normal(part) = component {
            path.push(part);
        }
    }
    path
}

fn relative_to(source: &Path, root: &Path) -> PathBuf {
    make_relative(source, root).unwrap_or_else(|| {
        source
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| source.to_path_buf())
    })
}
