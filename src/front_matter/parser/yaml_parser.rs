use std::path::Path;

use serde_json::Value;

use super::split_front_matter;
use crate::front_matter::Meta;
use crate::utils::error::{AlvuError, Result};

/// Parse the YAML front matter of `input`.
///
/// Without a complete `---` fence the metadata is empty and the body is the
/// whole input. A block that is not valid YAML, or not a mapping, is an error
/// naming `path`.
pub fn parse_meta<'a>(path: &Path, input: &'a str) -> Result<(Meta, &'a str)> {
    let (block, body) = match split_front_matter(input) {
        Some(parts) => parts,
        None => return Ok((Meta::new(), input)),
    };

    if block.trim().is_empty() {
        return Ok((Meta::new(), body));
    }

    let value: Value =
        serde_yaml::from_str(block).map_err(|e| AlvuError::front_matter(path, e))?;

    match value {
        Value::Object(map) => Ok((map, body)),
        Value::Null => Ok((Meta::new(), body)),
        other => Err(AlvuError::front_matter(
            path,
            format!("expected a mapping of keys to values, found {}", kind_of(&other)),
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
