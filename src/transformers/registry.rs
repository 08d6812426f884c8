use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::debug;

use super::{HtmlTransformer, MarkdownOptions, MarkdownTransformer, SourceFile, TransformedFile, Transformer};
use crate::front_matter::Meta;
use crate::utils::error::Result;
use crate::utils::warnings::DeprecationWarnings;

/// Maps a file extension to its ordered transformer chain
#[derive(Default, Clone)]
pub struct TransformerRegistry {
    chains: HashMap<String, Vec<Arc<dyn Transformer>>>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markdown for `.md`/`.markdown`, pass-through for `.html`
    pub fn with_defaults(options: &MarkdownOptions, warnings: Arc<DeprecationWarnings>) -> Self {
        let markdown: Arc<dyn Transformer> = Arc::new(MarkdownTransformer::new(options, warnings));
        let html: Arc<dyn Transformer> = Arc::new(HtmlTransformer);

        let mut registry = Self::new();
        registry.register(".md", vec![markdown.clone()]);
        registry.register(".markdown", vec![markdown]);
        registry.register(".html", vec![html]);
        registry
    }

    /// Register the chain for `extension` ("md" and ".md" are the same key),
    /// replacing any previous one
    pub fn register(&mut self, extension: &str, chain: Vec<Arc<dyn Transformer>>) {
        self.chains.insert(normalize_extension(extension), chain);
    }

    pub fn chain(&self, extension: &str) -> Option<&[Arc<dyn Transformer>]> {
        self.chains
            .get(&normalize_extension(extension))
            .map(|chain| chain.as_slice())
            .filter(|chain| !chain.is_empty())
    }

    pub fn handles(&self, extension: &str) -> bool {
        self.chain(extension).is_some()
    }

    /// Run the chain registered for the file's extension.
    ///
    /// Returns `None` when no chain is registered. Metadata comes from the
    /// first transformer that finds any; content goes through every
    /// transformer in order.
    pub fn run(&self, file: &SourceFile) -> Result<Option<TransformedFile>> {
        let extension = file.extension();
        let chain = match self.chain(&extension) {
            Some(chain) => chain,
            None => return Ok(None),
        };

        let mut meta = Meta::new();
        let mut body = None;
        for transformer in chain {
            let (found, rest) = transformer.extract_meta(&file.path, &file.raw)?;
            if body.is_none() {
                body = Some(rest);
            }
            if !found.is_empty() {
                meta = found;
                body = Some(rest);
                break;
            }
        }

        let content = thread_content(chain, &file.path, &file.raw)?;
        debug!(
            "Transformed {} through [{}]",
            file.name,
            chain.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
        );

        Ok(Some(TransformedFile {
            source_path: file.path.clone(),
            name: file.name.clone(),
            extension,
            chain: chain.iter().map(|t| t.name()).collect(),
            meta,
            body: body.unwrap_or(file.raw.as_str()).to_string(),
            content,
        }))
    }

    /// Run the chain for `extension` over a snippet, without front matter
    /// bookkeeping
    pub fn transform_str(&self, extension: &str, input: &str) -> Result<Option<String>> {
        match self.chain(extension) {
            Some(chain) => thread_content(chain, Path::new(extension), input).map(Some),
            None => Ok(None),
        }
    }
}

fn thread_content(chain: &[Arc<dyn Transformer>], path: &Path, input: &str) -> Result<String> {
    let mut content = input.to_string();
    for transformer in chain {
        content = transformer.transform_content(path, &content)?;
    }
    Ok(content)
}

fn normalize_extension(extension: &str) -> String {
    format!(".{}", extension.trim_start_matches('.').to_ascii_lowercase())
}
