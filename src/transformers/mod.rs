//! Content transformers turn the raw text of a page into HTML and pull its
//! front matter out along the way.

pub mod html;
pub mod markdown;
pub mod registry;

use std::path::{Path, PathBuf};

use crate::front_matter::Meta;
use crate::utils::error::Result;
use crate::utils::path::{get_extension, logical_name};

pub use html::HtmlTransformer;
pub use markdown::{MarkdownOptions, MarkdownTransformer};
pub use registry::TransformerRegistry;

/// One step of a transformer chain
pub trait Transformer: Send + Sync {
    /// Short name used in logs and in `TransformedFile::chain`
    fn name(&self) -> &'static str;

    /// Split the front matter from `input`, returning the metadata and the
    /// remaining body
    fn extract_meta<'a>(&self, path: &Path, input: &'a str) -> Result<(Meta, &'a str)>;

    /// Rewrite `input` into the transformer's output format
    fn transform_content(&self, path: &Path, input: &str) -> Result<String>;
}

/// A page read from disk
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the pages directory, slash separated
    pub name: String,
    pub raw: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, raw: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            name: name.into(),
            raw: raw.into(),
        }
    }

    /// Read `path`, naming it relative to `pages_root`
    pub fn read(path: &Path, pages_root: &Path) -> Result<Self> {
        let raw = crate::utils::fs::read_file(path)?;
        Ok(SourceFile::new(path, logical_name(path, pages_root), raw))
    }

    pub fn extension(&self) -> String {
        get_extension(&self.path)
    }
}

/// A page after its transformer chain ran
#[derive(Debug, Clone)]
pub struct TransformedFile {
    pub source_path: PathBuf,
    pub name: String,
    pub extension: String,
    /// Names of the transformers the content went through, in order
    pub chain: Vec<&'static str>,
    pub meta: Meta,
    /// Text after the front matter, before any transformation
    pub body: String,
    /// Final output of the chain
    pub content: String,
}
