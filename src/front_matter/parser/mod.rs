mod yaml_parser;

pub use yaml_parser::parse_meta;

/// Split `input` into the text between the `---` fences and the body after
/// the closing fence.
///
/// Returns `None` when the input does not open with a fence line or the
/// fence is never closed.
pub fn split_front_matter(input: &str) -> Option<(&str, &str)> {
    let rest = input.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(|c| c == '\r' || c == '\n') == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}
