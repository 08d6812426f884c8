use std::path::{Component, Path, PathBuf};

/// Get file extension with its leading dot (".md"), or an empty string
pub fn get_extension<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| format!(".{}", s))
        .unwrap_or_default()
}

/// Make a path relative to another path, or `None` if it lives elsewhere
pub fn make_relative<P: AsRef<Path>, B: AsRef<Path>>(path: P, base: B) -> Option<PathBuf> {
    path.as_ref()
        .strip_prefix(base.as_ref())
        .ok()
        .map(|p| p.to_path_buf())
}

/// The slash-separated name of `path` below `root` ("blog/post.md").
///
/// Falls back to the full path when `path` is not under `root`.
pub fn logical_name<P: AsRef<Path>, B: AsRef<Path>>(path: P, root: B) -> String {
    let relative = make_relative(&path, &root).unwrap_or_else(|| path.as_ref().to_path_buf());
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_extension() {
        assert_eq!(get_extension("pages/index.md"), ".md");
        assert_eq!(get_extension("pages/README"), "");
    }

    #[test]
    fn test_logical_name_uses_forward_slashes() {
        let root = Path::new("site").join("pages");
        let file = root.join("blog").join("post.md");
        assert_eq!(logical_name(&file, &root), "blog/post.md");
    }

    #[test]
    fn test_make_relative_outside_root() {
        assert!(make_relative("/a/b", "/c").is_none());
    }
}
