use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::front_matter::Meta;
use crate::transformers::TransformedFile;

/// Which files a hook's `Writer` applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookScope {
    Global,
    /// Only the page with this logical name ("blog/post.md")
    ForFile(String),
}

impl HookScope {
    /// Scope declared by a hook's `ForFile` marker, if any
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker.map(normalize_name) {
            Some(name) if !name.is_empty() => HookScope::ForFile(name),
            _ => HookScope::Global,
        }
    }

    pub fn applies_to(&self, name: &str) -> bool {
        match self {
            HookScope::Global => true,
            HookScope::ForFile(target) => target == name,
        }
    }
}

fn normalize_name(name: &str) -> String {
    let name = name.trim().replace('\\', "/");
    let name = name.strip_prefix("./").unwrap_or(&name);
    name.trim_start_matches('/').to_string()
}

/// JSON handed to every `Writer` call for a page
#[derive(Debug, Clone, Serialize)]
pub struct HookRequest<'a> {
    pub name: &'a str,
    pub source_path: String,
    pub dest_path: String,
    pub meta: &'a Meta,
    /// Page body without front matter, before transformation
    pub content: &'a str,
    /// Transformed page content
    pub html: &'a str,
}

impl<'a> HookRequest<'a> {
    pub fn new(file: &'a TransformedFile, dest_path: &Path) -> Self {
        HookRequest {
            name: &file.name,
            source_path: file.source_path.to_string_lossy().into_owned(),
            dest_path: dest_path.to_string_lossy().into_owned(),
            meta: &file.meta,
            content: &file.body,
            html: &file.content,
        }
    }
}

/// What a `Writer` call may return. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HookResponse {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub extras: Option<Map<String, Value>>,
}

impl HookResponse {
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// A transformed page plus everything its hooks contributed
#[derive(Debug, Clone)]
pub struct HookedFile {
    pub file: TransformedFile,
    /// Content to place in the layout slot
    pub content: String,
    /// Destination override, relative to the output directory
    pub name: Option<String>,
    pub data: Map<String, Value>,
    pub extras: Map<String, Value>,
}

impl HookedFile {
    pub fn new(file: TransformedFile) -> Self {
        let content = file.content.clone();
        HookedFile {
            file,
            content,
            name: None,
            data: Map::new(),
            extras: Map::new(),
        }
    }

    /// Fold one hook's response in. Later keys win; absent keys are kept.
    pub fn apply(&mut self, response: HookResponse) {
        if let Some(content) = response.content {
            self.content = content;
        }
        if let Some(name) = response.name {
            self.name = Some(name);
        }
        if let Some(data) = response.data {
            self.data.extend(data);
        }
        if let Some(extras) = response.extras {
            self.extras.extend(extras);
        }
    }
}
