mod filters;
mod preprocess;

use std::sync::Arc;

use liquid::model::{KString, Value};
use liquid::{Object, Parser, ParserBuilder};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::hooks::HookedFile;
use crate::transformers::TransformerRegistry;
use crate::utils::error::{AlvuError, Result};

pub use preprocess::preprocess_legacy_fields;

static FIELD_REF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(Data|Extras|Page\.Meta)\.([A-Za-z_][A-Za-z0-9_]*)").unwrap()
});

/// Liquid parser with the standard library and the site's filters
pub fn create_parser(registry: Arc<TransformerRegistry>) -> Result<Parser> {
    let parser_builder = filters::register_filters(ParserBuilder::with_stdlib(), registry);
    parser_builder
        .build()
        .map_err(|e| AlvuError::Template(format!("Failed to build template parser: {}", e)))
}

/// Template variables for one page: `Meta.BaseURL`, `Data`, `Extras` and
/// `Page` (logical name and front matter)
pub fn create_globals(base_url: &str, page: &HookedFile) -> Result<Object> {
    let globals = json!({
        "Meta": { "BaseURL": base_url },
        "Data": page.data,
        "Extras": page.extras,
        "Page": {
            "Name": page.file.name,
            "Meta": page.file.meta,
        },
    });

    liquid::to_object(&globals)
        .map_err(|e| AlvuError::Template(format!("Invalid template data for {}: {}", page.file.name, e)))
}

/// Give every `Data`, `Extras` and `Page.Meta` key the template reads a
/// value, nil when the page has none, so a missing key renders empty
fn fill_missing_fields(template: &str, globals: &mut Object) {
    for caps in FIELD_REF_REGEX.captures_iter(template) {
        let parent = match &caps[1] {
            "Page.Meta" => globals
                .get_mut("Page")
                .and_then(Value::as_object_mut)
                .and_then(|page| page.get_mut("Meta")),
            root => globals.get_mut(root),
        };
        if let Some(fields) = parent.and_then(Value::as_object_mut) {
            if !fields.contains_key(&caps[2]) {
                fields.insert(KString::from_ref(&caps[2]), Value::Nil);
            }
        }
    }
}

/// Parse and render `content` with Liquid
pub fn parse_liquid(content: &str, parser: &Parser, globals: &Object) -> Result<String> {
    let preprocessed = preprocess_legacy_fields(content);

    let template = parser
        .parse(&preprocessed)
        .map_err(|e| AlvuError::Template(format!("Error parsing template: {}", e)))?;

    let mut globals = globals.clone();
    fill_missing_fields(&preprocessed, &mut globals);

    template.render(&globals).map_err(|e| {
        debug!("Available template globals:");
        for (key, _value) in globals.iter() {
            debug!("- {}", key);
        }
        AlvuError::Template(format!("Error rendering template: {}", e))
    })
}
