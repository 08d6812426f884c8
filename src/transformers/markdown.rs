use std::path::Path;
use std::sync::Arc;

use comrak::plugins::syntect::SyntectAdapter;
use comrak::Options;

use super::Transformer;
use crate::front_matter::{parse_meta, Meta};
use crate::markdown::{create_comrak_options, create_highlighter, render_markdown, rewrite_link, LinkRewrite};
use crate::utils::error::{AlvuError, Result};
use crate::utils::warnings::{Deprecation, DeprecationWarnings};

/// Rendering switches for Markdown pages
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    pub hard_wrap: bool,
    pub highlight: bool,
    pub highlight_theme: String,
    pub base_url: String,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        MarkdownOptions {
            hard_wrap: true,
            highlight: false,
            highlight_theme: "base16-ocean.dark".to_string(),
            base_url: "/".to_string(),
        }
    }
}

/// Markdown to HTML through comrak, with root links rewritten against the
/// base URL
pub struct MarkdownTransformer {
    options: Options<'static>,
    base_url: String,
    highlighter: Option<SyntectAdapter>,
    warnings: Arc<DeprecationWarnings>,
}

impl MarkdownTransformer {
    pub fn new(options: &MarkdownOptions, warnings: Arc<DeprecationWarnings>) -> Self {
        let highlighter = options
            .highlight
            .then(|| create_highlighter(&options.highlight_theme));

        MarkdownTransformer {
            options: create_comrak_options(options.hard_wrap),
            base_url: options.base_url.clone(),
            highlighter,
            warnings,
        }
    }
}

impl Transformer for MarkdownTransformer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extract_meta<'a>(&self, path: &Path, input: &'a str) -> Result<(Meta, &'a str)> {
        parse_meta(path, input)
    }

    fn transform_content(&self, path: &Path, input: &str) -> Result<String> {
        let (_, body) = self.extract_meta(path, input)?;

        render_markdown(body, &self.options, self.highlighter.as_ref(), |url| {
            match rewrite_link(url, &self.base_url) {
                LinkRewrite::Unchanged => None,
                LinkRewrite::Rewritten(url) => Some(url),
                LinkRewrite::Legacy(url) => {
                    self.warnings.warn_once(Deprecation::BaseUrlLink);
                    Some(url)
                }
            }
        })
        .map_err(|e| AlvuError::transform(path, e))
    }
}
