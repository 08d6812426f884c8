use std::path::Path;
use std::sync::Arc;

use liquid::Parser;
use log::debug;

use super::slot::inject_in_slot;
use crate::directory::{LAYOUT_FILE, LEGACY_HEAD_FILE, LEGACY_TAIL_FILE};
use crate::hooks::HookedFile;
use crate::liquid::{create_globals, create_parser, parse_liquid};
use crate::transformers::TransformerRegistry;
use crate::utils::error::Result;
use crate::utils::fs;
use crate::utils::warnings::{Deprecation, DeprecationWarnings};

/// Layout used when a site has none
pub const DEFAULT_LAYOUT: &str = "<slot/>";

/// Read the site layout from the pages directory.
///
/// Falls back to `_head.html` + slot + `_tail.html` for older sites, then to
/// `DEFAULT_LAYOUT`.
pub fn read_layout(pages_dir: &Path, warnings: &DeprecationWarnings) -> Result<String> {
    let layout_path = pages_dir.join(LAYOUT_FILE);
    if layout_path.is_file() {
        debug!("Using layout: {}", layout_path.display());
        return fs::read_file(&layout_path);
    }

    let head_path = pages_dir.join(LEGACY_HEAD_FILE);
    let tail_path = pages_dir.join(LEGACY_TAIL_FILE);
    if head_path.is_file() || tail_path.is_file() {
        warnings.warn_once(Deprecation::HeadTail);
        let head = if head_path.is_file() { fs::read_file(&head_path)? } else { String::new() };
        let tail = if tail_path.is_file() { fs::read_file(&tail_path)? } else { String::new() };
        return Ok(format!("{}{}{}", head, DEFAULT_LAYOUT, tail));
    }

    Ok(DEFAULT_LAYOUT.to_string())
}

/// Wraps pages in the site layout and runs the final template pass
pub struct LayoutRenderer {
    layout: String,
    base_url: String,
    parser: Parser,
    warnings: Arc<DeprecationWarnings>,
}

impl LayoutRenderer {
    pub fn new(
        layout: impl Into<String>,
        base_url: impl Into<String>,
        registry: Arc<TransformerRegistry>,
        warnings: Arc<DeprecationWarnings>,
    ) -> Result<Self> {
        let layout = layout.into();
        let layout = if layout.trim().is_empty() { DEFAULT_LAYOUT.to_string() } else { layout };

        Ok(LayoutRenderer {
            layout,
            base_url: base_url.into(),
            parser: create_parser(registry)?,
            warnings,
        })
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Slot the page content into the layout, then render the template
    pub fn render(&self, page: &HookedFile) -> Result<String> {
        let document = inject_in_slot(&self.layout, &page.content, &self.warnings);
        let globals = create_globals(&self.base_url, page)?;
        parse_liquid(&document, &self.parser, &globals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front_matter::Meta;
    use crate::transformers::{MarkdownOptions, TransformedFile};
    use serde_json::json;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn renderer(layout: &str) -> LayoutRenderer {
        let warnings = Arc::new(DeprecationWarnings::new());
        let registry = Arc::new(TransformerRegistry::with_defaults(&MarkdownOptions::default(), warnings.clone()));
        LayoutRenderer::new(layout, "/blog/", registry, warnings).unwrap()
    }

    fn page(content: &str) -> HookedFile {
        HookedFile::new(TransformedFile {
            source_path: "pages/index.md".into(),
            name: "index.md".to_string(),
            extension: ".md".to_string(),
            chain: vec!["markdown"],
            meta: Meta::new(),
            body: String::new(),
            content: content.to_string(),
        })
    }

    #[test]
    fn test_render_into_layout() {
        let mut hooked = page("<h1>Hello</h1>");
        hooked.data.insert("tag".to_string(), json!("x"));

        let out = renderer("<base href=\"{{ Meta.BaseURL }}\"><main><slot/></main><i>{{ Data.tag }}</i>")
            .render(&hooked)
            .unwrap();

        assert_eq!(out, "<base href=\"/blog/\"><main><h1>Hello</h1></main><i>x</i>");
    }

    #[test]
    fn test_empty_layout_uses_default() {
        let r = renderer("  ");
        assert_eq!(r.layout(), DEFAULT_LAYOUT);
        assert_eq!(r.render(&page("<p>x</p>")).unwrap(), "<p>x</p>");
    }

    #[test]
    fn test_read_layout_variants() {
        let tmp = TempDir::new().unwrap();
        let warnings = DeprecationWarnings::new();

        assert_eq!(read_layout(tmp.path(), &warnings).unwrap(), DEFAULT_LAYOUT);

        stdfs::write(tmp.path().join("_head.html"), "<html><body>").unwrap();
        stdfs::write(tmp.path().join("_tail.html"), "</body></html>").unwrap();
        assert_eq!(
            read_layout(tmp.path(), &warnings).unwrap(),
            "<html><body><slot/></body></html>"
        );
        assert!(warnings.has_fired(Deprecation::HeadTail));

        stdfs::write(tmp.path().join("_layout.html"), "<div><slot></slot></div>").unwrap();
        assert_eq!(read_layout(tmp.path(), &warnings).unwrap(), "<div><slot></slot></div>");
    }
}
