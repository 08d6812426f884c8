use std::path::Path;

use super::Transformer;
use crate::front_matter::{parse_meta, Meta};
use crate::utils::error::Result;

/// HTML pages are already in their final format; only the front matter is
/// removed.
#[derive(Debug, Default)]
pub struct HtmlTransformer;

impl Transformer for HtmlTransformer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn extract_meta<'a>(&self, path: &Path, input: &'a str) -> Result<(Meta, &'a str)> {
        parse_meta(path, input)
    }

    fn transform_content(&self, path: &Path, input: &str) -> Result<String> {
        let (_, body) = self.extract_meta(path, input)?;
        Ok(body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_html_passes_through_without_front_matter() {
        let transformer = HtmlTransformer;
        let input = "---\ntitle: About\n---\n<h1>About</h1>\n";
        let path = Path::new("pages/about.html");

        let (meta, _) = transformer.extract_meta(path, input).unwrap();
        assert_eq!(meta.get("title"), Some(&json!("About")));
        assert_eq!(transformer.transform_content(path, input).unwrap(), "<h1>About</h1>\n");
        assert_eq!(transformer.transform_content(path, "<p>x</p>").unwrap(), "<p>x</p>");
    }
}
