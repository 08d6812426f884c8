pub mod parser;

pub use parser::{parse_meta, split_front_matter};

/// Structured front matter of a page. Values are JSON-compatible trees so they
/// can be handed to hooks and templates as they are.
pub type Meta = serde_json::Map<String, serde_json::Value>;
